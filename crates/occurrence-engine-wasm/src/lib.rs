//! WASM bindings for occurrence-engine.
//!
//! Exposes token validation, normalization, expansion, the date-membership
//! query and labels to JavaScript via `wasm-bindgen`, under the names the
//! to-do front end already calls. All complex types are passed as JSON
//! strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p occurrence-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/occurrence-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/occurrence_engine_wasm.wasm
//! ```

use chrono::NaiveDate;
use occurrence_engine::{Action, RecurringItem};
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Host entities crossing the boundary as JSON
// ---------------------------------------------------------------------------

/// A to-do object from JavaScript, kept whole so it can be handed back.
struct HostEntity {
    raw: Value,
    item: RecurringItem,
}

impl AsRef<RecurringItem> for HostEntity {
    fn as_ref(&self) -> &RecurringItem {
        &self.item
    }
}

fn parse_item(json: &str) -> Result<RecurringItem, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid item JSON: {}", e))
}

fn parse_tokens(json: &str) -> Result<Vec<String>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid occurrences JSON: {}", e))
}

/// Entities without usable recurrence fields are skipped.
fn parse_entities(json: &str) -> Result<Vec<HostEntity>, String> {
    let values: Vec<Value> =
        serde_json::from_str(json).map_err(|e| format!("Invalid items JSON: {}", e))?;
    Ok(values
        .into_iter()
        .filter_map(|raw| {
            let item = RecurringItem::deserialize(&raw).ok()?;
            Some(HostEntity { raw, item })
        })
        .collect())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Boundary-free implementations (testable off-wasm)
// ---------------------------------------------------------------------------

fn transmogrify(set_json: &str, action: &str, token: Option<&str>) -> Result<String, String> {
    let set = parse_tokens(set_json)?;
    let action: Action = action.parse().map_err(|e| format!("{}", e))?;
    to_json(&occurrence_engine::transmogrify_occurrences(&set, action, token))
}

fn dates(item_json: &str) -> Result<String, String> {
    to_json(&occurrence_engine::todo_dates(&parse_item(item_json)?))
}

fn days(item_json: &str) -> Result<String, String> {
    to_json(&occurrence_engine::todo_days(&parse_item(item_json)?))
}

fn by_date(items_json: &str, date: &str) -> Result<String, String> {
    let entities = parse_entities(items_json)?;
    let matches: Vec<&Value> = occurrence_engine::todos_by_date(&entities, date)
        .into_iter()
        .map(|entity| &entity.raw)
        .collect();
    to_json(&matches)
}

fn labels(set_json: &str) -> Result<String, String> {
    to_json(&occurrence_engine::repeats_labels(&parse_tokens(set_json)?))
}

fn next(item_json: &str, from: &str) -> Result<Option<String>, String> {
    let item = parse_item(item_json)?;
    let from: NaiveDate = occurrence_engine::parse_date(from).map_err(|e| e.to_string())?;
    Ok(occurrence_engine::next_occurrence(&item, from).map(|d| d.format("%Y-%m-%d").to_string()))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Whether a single token belongs to the occurrence grammar.
#[wasm_bindgen(js_name = "isValidOccurrence")]
pub fn is_valid_occurrence(token: &str) -> bool {
    occurrence_engine::is_valid_occurrence(token)
}

/// Apply `add`, `remove` or `vet` to a JSON array of tokens.
///
/// Returns the canonical set as a JSON array of strings.
#[wasm_bindgen(js_name = "transmogrifyOccurrences")]
pub fn transmogrify_occurrences(
    set_json: &str,
    action: &str,
    token: Option<String>,
) -> Result<String, JsValue> {
    transmogrify(set_json, action, token.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Range-bounded expansion of a `{startsOn, endsOn, occurrences}` object.
#[wasm_bindgen(js_name = "todo2Dates")]
pub fn todo2_dates(item_json: &str) -> Result<String, JsValue> {
    dates(item_json).map_err(|e| JsValue::from_str(&e))
}

/// Weekday-matching expansion, used for calendar highlighting.
#[wasm_bindgen(js_name = "todo2Days")]
pub fn todo2_days(item_json: &str) -> Result<String, JsValue> {
    days(item_json).map_err(|e| JsValue::from_str(&e))
}

/// Filter a JSON array of to-dos down to those occurring on `date`.
///
/// Matching objects are returned unchanged, in input order.
#[wasm_bindgen(js_name = "todosByDate")]
pub fn todos_by_date(items_json: &str, date: &str) -> Result<String, JsValue> {
    by_date(items_json, date).map_err(|e| JsValue::from_str(&e))
}

/// Human-readable labels for a JSON array of tokens.
#[wasm_bindgen(js_name = "repeatsLabels")]
pub fn repeats_labels(set_json: &str) -> Result<String, JsValue> {
    labels(set_json).map_err(|e| JsValue::from_str(&e))
}

/// Earliest occurrence on or after `from`, or `undefined`.
#[wasm_bindgen(js_name = "nextOccurrence")]
pub fn next_occurrence(item_json: &str, from: &str) -> Result<Option<String>, JsValue> {
    next(item_json, from).map_err(|e| JsValue::from_str(&e))
}
