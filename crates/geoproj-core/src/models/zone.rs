use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::geometry::Geometry;

/// One polygon feature of a zone dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Feature id from the source document, or its position when absent
    pub id: String,

    /// Containment geometry
    pub geometry: Geometry,

    /// Free-form feature attributes
    pub properties: Map<String, Value>,
}

impl Zone {
    pub fn new(id: impl Into<String>, geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self { id: id.into(), geometry, properties }
    }

    /// Resolve the first usable attribute among `keys`, in order.
    ///
    /// Strings are trimmed and must be non-empty; numbers and booleans are
    /// rendered as text. Nulls, arrays and objects are skipped.
    pub fn attribute(&self, keys: &[String]) -> Option<String> {
        keys.iter().find_map(|key| match self.properties.get(key)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }
}
