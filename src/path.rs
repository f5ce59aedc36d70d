//! Dotted attribute paths over JSON payloads.
//!
//! Payloads are user-submitted and possibly incomplete, so lookup is lenient: a
//! missing segment or a non-object intermediate resolves to nothing rather than an
//! error. Writes are the mirror image and always land, creating or clobbering
//! intermediates as needed.

use serde_json::{Map, Value};

/// Resolve a dot-separated attribute path against a payload.
///
/// A path with no `.` is a direct key lookup. Returns `None` when the path is empty,
/// any segment is absent, or an intermediate value is not an object.
///
/// # Example
///
/// ```
/// use zenrules::lookup_path;
///
/// let payload = serde_json::json! {{"trip": {"origin": "LHR"}}};
/// let payload = payload.as_object().unwrap();
/// assert_eq!(lookup_path(payload, "trip.origin"), Some(&serde_json::json!("LHR")));
/// assert_eq!(lookup_path(payload, "trip.destination"), None);
/// ```
pub fn lookup_path<'a>(payload: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut segments = path.split('.');
    let mut current = payload.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Write `value` at a dot-separated path inside `payload`.
///
/// Missing intermediates are created; intermediates that exist but are not objects
/// are replaced with fresh objects so the write always lands.
pub fn store_path(payload: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };
    let mut current = payload;
    for segment in segments {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot.as_object_mut() {
            Some(map) => map,
            None => return,
        };
    }
    current.insert(last.to_string(), value);
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
