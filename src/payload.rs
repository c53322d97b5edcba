//! Ingest payload and the mapping forwarded to the host
//!
//! A `POST /qr/*` body `{"id": "abc", "x": 1, "y": 2, "r": 3}` becomes the
//! single-entry mapping `{"abc": {"x": 1, "y": 2, "r": 3}}`. Coordinate values
//! are carried as raw JSON: no coercion, no range checks.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Number, Value};

/// Body of an ingest request
///
/// All four fields must be present. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IngestPayload {
    pub id: Value,
    pub x: Value,
    pub y: Value,
    pub r: Value,
}

/// Position record stored under the marker id
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Coordinates {
    pub x: Value,
    pub y: Value,
    pub r: Value,
}

/// `{ id: {x, y, r} }`, serialized as a JSON object with exactly one key
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMapping {
    pub id: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("`id` must be a string, number or boolean, got {0}")]
pub struct InvalidKey(&'static str);

impl IngestPayload {
    /// Parse a raw request body
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Repackage into the outbound mapping, keyed by `id`
    pub fn into_mapping(self) -> Result<OutboundMapping, InvalidKey> {
        let id = mapping_key(&self.id)?;
        Ok(OutboundMapping {
            id,
            coordinates: Coordinates {
                x: self.x,
                y: self.y,
                r: self.r,
            },
        })
    }
}

/// Object keys are strings; scalars other than strings use their JSON text.
fn mapping_key(id: &Value) -> Result<String, InvalidKey> {
    match id {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(number_key(n)),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(InvalidKey("null")),
        Value::Array(_) => Err(InvalidKey("an array")),
        Value::Object(_) => Err(InvalidKey("an object")),
    }
}

/// Integral floats drop their fraction, so `1.0` and `1e3` key as `1` and `1000`
fn number_key(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        // Exact up to 1e21; `+ 0.0` folds -0 into 0
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f + 0.0),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

impl OutboundMapping {
    /// Compact JSON text as delivered to the host
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for OutboundMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.id, &self.coordinates)?;
        map.end()
    }
}
