//! Parsed JSON document with an object root

use keypath_resolver::Object;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root value of a JSON file
///
/// Invariant: the root is always an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Object);

impl Document {
    /// Create empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a value, if it is an object
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Root object
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Object {
        &self.0
    }

    /// Mutable root object
    #[inline]
    pub fn root_mut(&mut self) -> &mut Object {
        &mut self.0
    }

    /// Convert back into a `serde_json::Value`
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Object> for Document {
    fn from(map: Object) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_requires_object() {
        assert!(Document::from_value(json!({"a": 1})).is_some());
        assert!(Document::from_value(json!([1, 2])).is_none());
        assert!(Document::from_value(json!("text")).is_none());
        assert!(Document::from_value(Value::Null).is_none());
    }

    #[test]
    fn serializes_transparently() {
        let doc = Document::from_value(json!({"k": "v"})).unwrap();
        assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"k":"v"}"#);
    }

    #[test]
    fn into_value_roundtrip() {
        let value = json!({"nested": {"x": [1, 2, 3]}});
        let doc = Document::from_value(value.clone()).unwrap();
        assert_eq!(doc.into_value(), value);
    }
}
