//! Conversion between JSON documents and DynamoDB attribute values.
//!
//! | JSON | DynamoDB |
//! |------|----------|
//! | object | `M` |
//! | array | `L` |
//! | string | `S` |
//! | number | `N` |
//! | bool | `BOOL` |
//! | null | `NULL` |
//!
//! String and number sets (`SS`, `NS`) written by other tools are read back as
//! arrays. Binary attributes have no JSON form and are rejected.
//!
//! DynamoDB normalizes numbers on write, so a float with a zero fraction such
//! as `1.0` is stored as `N("1")` and reads back as the integer `1`. Documents
//! holding such values compare unequal to the fetched original after a round
//! trip through this backend. The SQLite backend keeps the JSON text as-is.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Number, Value};

use super::Document;
use crate::error::StoreError;

/// Convert a document into a DynamoDB map.
pub fn to_attribute_map(document: &Document) -> HashMap<String, AttributeValue> {
    document
        .iter()
        .map(|(key, value)| (key.clone(), to_attribute(value)))
        .collect()
}

/// Convert a JSON value into a DynamoDB attribute value.
pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(to_attribute_map(map)),
    }
}

/// Convert a DynamoDB map back into a document.
pub fn from_attribute_map(map: &HashMap<String, AttributeValue>) -> Result<Document, StoreError> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), from_attribute(value)?)))
        .collect()
}

/// Convert a DynamoDB attribute value into a JSON value.
pub fn from_attribute(value: &AttributeValue) -> Result<Value, StoreError> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::L(items) => items.iter().map(from_attribute).collect::<Result<_, _>>().map(Value::Array),
        AttributeValue::M(map) => from_attribute_map(map).map(Value::Object),
        AttributeValue::Ss(items) => Ok(Value::Array(items.iter().cloned().map(Value::String).collect())),
        AttributeValue::Ns(items) => items
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<Result<_, _>>()
            .map(Value::Array),
        other => Err(StoreError::MalformedRecord(format!("unsupported attribute type: {other:?}"))),
    }
}

/// Parse a DynamoDB number string, preferring integer representations.
fn parse_number(raw: &str) -> Result<Number, StoreError> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| StoreError::MalformedRecord(format!("invalid number attribute: {raw}")))
}
