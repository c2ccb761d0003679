// src/locate/mod.rs

//! Find the packing-list records inside an extraction response.
//!
//! The service wraps its output in envelopes that change between deployments,
//! so this is an ordered chain of probes rather than a schema. Each probe is a
//! pure function; the first one that yields a usable array wins.

use serde_json::Value;
use tracing::debug;

/// Output key the extraction workflow writes the list under.
pub const PACKING_LIST_KEY: &str = "Packing List_1";

type Extractor = fn(&Value) -> Option<&Vec<Value>>;

/// Probes in priority order, each with a name for logging.
static EXTRACTORS: &[(&str, Extractor)] = &[
    ("message.result[0].result.output", from_message_envelope),
    ("result.output", from_result_envelope),
    ("output", from_output_envelope),
    ("top-level key", from_top_level_key),
    ("bare array", from_bare_array),
];

/// Return the record array inside `response`, or `None` when no known shape
/// matches. Never fails: a missing key or wrong type just moves on to the
/// next probe.
pub fn locate(response: &Value) -> Option<&Vec<Value>> {
    for (name, extract) in EXTRACTORS {
        if let Some(records) = extract(response).filter(|r| is_record_array(r)) {
            debug!(shape = name, records = records.len(), "located packing list");
            return Some(records);
        }
    }
    debug!("no known response shape matched");
    None
}

/// A usable candidate is non-empty and holds at least one object. Stray
/// non-object elements are kept; the projector renders them as blank rows.
fn is_record_array(values: &[Value]) -> bool {
    values.iter().any(Value::is_object)
}

fn packing_list_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a Vec<Value>> {
    value.pointer(pointer)?.get(PACKING_LIST_KEY)?.as_array()
}

// `message.result` must be a real array; a JSON pointer would also accept an
// object keyed "0".
fn from_message_envelope(response: &Value) -> Option<&Vec<Value>> {
    let first = response.get("message")?.get("result")?.as_array()?.first()?;
    packing_list_at(first, "/result/output")
}

fn from_result_envelope(response: &Value) -> Option<&Vec<Value>> {
    packing_list_at(response, "/result/output")
}

fn from_output_envelope(response: &Value) -> Option<&Vec<Value>> {
    packing_list_at(response, "/output")
}

fn from_top_level_key(response: &Value) -> Option<&Vec<Value>> {
    response.get(PACKING_LIST_KEY)?.as_array()
}

fn from_bare_array(response: &Value) -> Option<&Vec<Value>> {
    let items = response.as_array()?;
    items.first()?.get("item_name")?;
    Some(items)
}
