//! The `index.json` manifest (spec §4.7): top-level schema plus the
//! escape-hatch handling for unknown keys (scenario S6 — warn at parse
//! time, drop, never re-emit).

pub mod annotations;
pub mod file_data;
pub mod model_data;
pub mod state_valuations;
pub mod transition_system;

pub use annotations::Annotations;
pub use file_data::FileData;
pub use model_data::ModelData;
pub use state_valuations::StateValuations;
pub use transition_system::TransitionSystem;

use crate::error::UmbError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UmbIndex {
    #[serde(rename = "format-version")]
    pub format_version: u64,
    #[serde(rename = "format-revision")]
    pub format_revision: u64,
    #[serde(rename = "model-data", skip_serializing_if = "Option::is_none")]
    pub model_data: Option<ModelData>,
    #[serde(rename = "file-data", skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
    #[serde(rename = "transition-system")]
    pub transition_system: TransitionSystem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    #[serde(rename = "state-valuations", skip_serializing_if = "Option::is_none")]
    pub state_valuations: Option<StateValuations>,
    /// Unrecognized top-level keys, kept only so a caller can introspect
    /// what was dropped. Never re-emitted by [`UmbIndex::to_json`].
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

const KNOWN_KEYS: &[&str] = &[
    "format-version",
    "format-revision",
    "model-data",
    "file-data",
    "transition-system",
    "annotations",
    "state-valuations",
];

impl UmbIndex {
    /// Parses a manifest from its JSON text, logging a warning for any
    /// top-level key this reader does not recognize and stashing it in
    /// [`Self::extra`] rather than failing the parse.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let mut root: Value = serde_json::from_str(text)
            .map_err(|e| UmbError::SchemaViolation(format!("index.json is not valid JSON: {e}")))?;
        let obj = root
            .as_object_mut()
            .ok_or_else(|| UmbError::SchemaViolation("index.json root must be an object".into()))?;

        let mut extra = Map::new();
        let leftover_keys: Vec<String> =
            obj.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())).cloned().collect();
        for key in leftover_keys {
            if let Some(value) = obj.remove(&key) {
                tracing::warn!(key = %key, "unrecognized top-level manifest key, ignoring");
                extra.insert(key, value);
            }
        }

        let mut index: UmbIndex = serde_json::from_value(root)
            .map_err(|e| UmbError::SchemaViolation(format!("index.json does not match the manifest schema: {e}")))?;
        index.extra = extra;
        Ok(index)
    }

    /// Serializes the manifest back to JSON text. Null-valued object
    /// fields are dropped recursively so optional sections that were
    /// never set don't reappear as explicit `null`s; [`Self::extra`]
    /// is never re-emitted.
    pub fn to_json(&self) -> anyhow::Result<String> {
        let mut value = serde_json::to_value(self)?;
        drop_null_object_values(&mut value);
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

fn drop_null_object_values(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            for v in map.values_mut() {
                drop_null_object_values(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                drop_null_object_values(v);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn minimal_manifest() -> String {
        serde_json::json!({
            "format-version": 1,
            "format-revision": 0,
            "transition-system": {
                "#players": 1,
                "#states": 1,
                "#initial-states": 1,
                "#choices": 1,
                "#choice-actions": 0,
                "#branches": 1,
                "#branch-actions": 0,
                "#observations": 0
            }
        })
        .to_string()
    }

    #[test]
    fn parses_minimal_manifest() {
        let index = UmbIndex::from_json(&minimal_manifest()).unwrap();
        assert_eq!(index.format_version, 1);
        assert_eq!(index.transition_system.num_states, 1);
        assert!(index.extra.is_empty());
    }

    #[test]
    fn unknown_top_level_key_is_captured_and_not_reemitted() {
        let mut raw: Value = serde_json::from_str(&minimal_manifest()).unwrap();
        raw.as_object_mut().unwrap().insert("vendor-extension".into(), serde_json::json!("surprise"));
        let index = UmbIndex::from_json(&raw.to_string()).unwrap();
        assert_eq!(index.extra.get("vendor-extension").unwrap(), "surprise");

        let emitted = index.to_json().unwrap();
        assert!(!emitted.contains("vendor-extension"));
    }

    #[test]
    fn optional_sections_absent_round_trip_without_nulls() {
        let index = UmbIndex::from_json(&minimal_manifest()).unwrap();
        let emitted = index.to_json().unwrap();
        assert!(!emitted.contains("null"));
    }
}
