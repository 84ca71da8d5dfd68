//! JSON interop for state trees.
//!
//! JSON is the easiest way to seed a store and the usual way to hand a slice
//! of state to a serde type. The conversion is lossy in one direction only:
//! handles and non-finite floats have no JSON form and become `null`.

use serde::{Serialize, de::DeserializeOwned};

use super::{List, Map, Value, ValueError};

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect::<List>())
            }
            serde_json::Value::Object(entries) => {
                Value::Map(entries.into_iter().map(|(k, v)| (k, Value::from(v))).collect::<Map>())
            }
        }
    }
}

impl Value {
    /// Converts to a `serde_json::Value`.
    ///
    /// Handles and non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Handle(_) => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Text(s) => serde_json::Value::String(s.to_string()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::List(list) => {
                serde_json::Value::Array(list.iter().map(Value::to_json).collect())
            }
        }
    }

    /// Converts to a compact JSON string for display and debugging.
    ///
    /// ```
    /// # use showstate::value::{Map, Value};
    /// let tree: Value = Map::new().with("zoom", 2).with("name", "a\"b").into();
    /// assert_eq!(tree.to_json_string(), r#"{"zoom":2,"name":"a\"b"}"#);
    /// ```
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    /// Builds a value from any serializable type.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> crate::Result<Value> {
        let json = serde_json::to_value(value).map_err(|e| ValueError::SerializationFailed {
            reason: e.to_string(),
        })?;
        Ok(Value::from(json))
    }

    /// Deserializes this value into a serde type.
    ///
    /// ```
    /// # use showstate::value::{Map, Value};
    /// #[derive(serde::Deserialize, Debug, PartialEq)]
    /// struct Playback {
    ///     #[serde(rename = "currentTime")]
    ///     current_time: f64,
    ///     #[serde(rename = "isPlaying")]
    ///     is_playing: bool,
    /// }
    ///
    /// let playback: Value = Map::new().with("currentTime", 1.5).with("isPlaying", false).into();
    /// let typed: Playback = playback.deserialize_into()?;
    /// assert_eq!(typed, Playback { current_time: 1.5, is_playing: false });
    /// # Ok::<(), showstate::Error>(())
    /// ```
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> crate::Result<T> {
        serde_json::from_value(self.to_json()).map_err(|e| {
            ValueError::SerializationFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }
}
