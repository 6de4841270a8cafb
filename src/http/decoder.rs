//! Response decoding
//!
//! Pulls the items, the total count and an optional extra payload out of a
//! JSON page response.

use crate::error::{Error, Result};
use crate::pagination::PageResponse;
use serde_json::Value;

/// Where each part of a page response lives in the JSON body
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    /// Path to the item array; `None` means the body itself is the array
    records_path: Option<String>,
    /// Path to the total item count
    total_path: String,
    /// Path to the extra payload
    extra_path: Option<String>,
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self {
            records_path: None,
            total_path: "total".to_string(),
            extra_path: None,
        }
    }
}

impl ResponseDecoder {
    /// Create a decoder reading the total count from `total_path`
    pub fn new(total_path: impl Into<String>) -> Self {
        Self {
            total_path: total_path.into(),
            ..Default::default()
        }
    }

    /// Read items from a path instead of the body root
    #[must_use]
    pub fn with_records_path(mut self, path: impl Into<String>) -> Self {
        self.records_path = Some(path.into());
        self
    }

    /// Read extra data from a path
    #[must_use]
    pub fn with_extra_path(mut self, path: impl Into<String>) -> Self {
        self.extra_path = Some(path.into());
        self
    }

    /// Decode a parsed body
    pub fn decode(&self, body: &Value) -> Result<PageResponse<Value, Value>> {
        let items = self.extract_items(body)?;
        let total_count = self.extract_total(body)?;
        let extra_data = self
            .extra_path
            .as_deref()
            .and_then(|path| extract_simple_path(body, path))
            .filter(|v| !v.is_null());

        Ok(PageResponse {
            items,
            total_count,
            extra_data,
        })
    }

    /// Decode a raw body
    pub fn decode_str(&self, body: &str) -> Result<PageResponse<Value, Value>> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;
        self.decode(&value)
    }

    fn extract_items(&self, body: &Value) -> Result<Vec<Value>> {
        match &self.records_path {
            // Wildcards go through jsonpath-rust; plain paths stay on the fast path
            Some(path) if path.contains('*') => extract_with_jsonpath(body, path),
            Some(path) => match extract_simple_path(body, path) {
                Some(Value::Array(arr)) => Ok(arr),
                Some(Value::Null) | None => Ok(Vec::new()),
                Some(other) => Err(Error::decode(format!(
                    "Expected an array at '{path}', found {}",
                    type_name(&other)
                ))),
            },
            None => match body {
                Value::Array(arr) => Ok(arr.clone()),
                other => Err(Error::decode(format!(
                    "Expected an array body, found {}",
                    type_name(other)
                ))),
            },
        }
    }

    fn extract_total(&self, body: &Value) -> Result<u64> {
        let value = extract_simple_path(body, &self.total_path)
            .ok_or_else(|| Error::missing_field(&self.total_path))?;

        match &value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            Error::decode(format!(
                "Total count at '{}' is not a non-negative integer: {value}",
                self.total_path
            ))
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract a value using simple dot-notation path, with `name[i]` indexing
pub(crate) fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value.clone());
    }

    let mut current = value;
    for part in path.split('.') {
        // "data[0]" or "items[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index = index_str.parse::<i64>().ok()?;
            let arr = current.as_array()?;
            #[allow(clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                arr.len() as i64 + index
            } else {
                index
            };
            current = arr.get(usize::try_from(idx).ok()?)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}

/// Extract values using jsonpath-rust
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath: {e}")))?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(Vec::new()),
        other => Ok(vec![other]),
    }
}
