//! Vector codec: textual serialization of embedding vectors.
//!
//! The stored form is a JSON array of numbers. `decode` additionally accepts
//! arrays whose elements were stringified with a tensor-formatting wrapper
//! (e.g. `"tensor(0.123)"`): the upstream embedding library's default string
//! conversion leaks its internal representation into serialized output, and
//! the codec is the last line of defense against that leak.

use serde_json::Value;

use crate::error::StoreError;

/// Encode a vector as JSON array text.
///
/// serde_json emits the shortest representation that parses back to the
/// identical f64, so the round trip is lossless for any finite value.
pub fn encode(values: &[f64]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(values)?)
}

/// Decode JSON array text into a vector.
///
/// Elements may be JSON numbers or wrapper-polluted strings; anything that
/// is not parseable as a float after stripping known wrappers is a
/// [`StoreError::MalformedVector`].
pub fn decode(text: &str) -> Result<Vec<f64>, StoreError> {
    let value: Value = serde_json::from_str(text).map_err(|e| StoreError::MalformedVector {
        detail: format!("not a JSON array: {}", e),
    })?;

    let elements = value.as_array().ok_or_else(|| StoreError::MalformedVector {
        detail: format!("expected array, got {}", json_type_name(&value)),
    })?;

    elements.iter().map(clean_element).collect()
}

/// Coerce one array element to f64, stripping wrapper artifacts from strings.
pub fn clean_element(value: &Value) -> Result<f64, StoreError> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| StoreError::MalformedVector {
            detail: format!("non-float number: {}", n),
        }),
        Value::String(s) => parse_wrapped(s),
        other => Err(StoreError::MalformedVector {
            detail: format!("expected number or string, got {}", json_type_name(other)),
        }),
    }
}

/// Parse a float out of a possibly wrapper-formatted string.
///
/// Handles `tensor(0.5)` and similar `identifier(...)` wrappers; plain
/// numeric strings pass through untouched.
fn parse_wrapped(raw: &str) -> Result<f64, StoreError> {
    let trimmed = raw.trim();

    let inner = match (trimmed.find('('), trimmed.ends_with(')')) {
        (Some(open), true) if is_wrapper_name(&trimmed[..open]) => {
            trimmed[open + 1..trimmed.len() - 1].trim()
        }
        _ => trimmed,
    };

    inner
        .parse::<f64>()
        .map_err(|_| StoreError::MalformedVector {
            detail: format!("unparseable element: {:?}", raw),
        })
}

/// A wrapper name looks like an identifier path: `tensor`, `np.float64`.
fn is_wrapper_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
