use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Identifier of a record as it appeared in the input (`id` key).
///
/// Ids are reported verbatim; the input mixes numeric and string ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordId(Option<Value>);

impl RecordId {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self(None),
            Some(value) => Self(Some(value.clone())),
        }
    }

    pub fn unknown() -> Self {
        Self(None)
    }

    pub fn is_known(&self) -> bool {
        self.0.is_some()
    }

    pub fn as_value(&self) -> Option<&Value> {
        self.0.as_ref()
    }
}

impl From<Value> for RecordId {
    fn from(value: Value) -> Self {
        Self::from_value(Some(&value))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("unknown"),
            Some(Value::String(text)) => f.write_str(text),
            Some(other) => write!(f, "{other}"),
        }
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
