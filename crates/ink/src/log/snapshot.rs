//! Persisted canvas data.
//!
//! The storage collaborator sees a versioned envelope:
//!
//! ```text
//! {"version": "2", "data": "{\"width\":800,\"height\":800,\"global\":[...],\"totalStrokes\":3}"}
//! ```
//!
//! `data` is written as a JSON string; an inline object is accepted on read.
//! Version "1" predates the stroke counter, which is recomputed as the
//! number of strokes. Per-author lists are never stored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::constants::{SNAPSHOT_VERSION, SNAPSHOT_VERSION_LEGACY};
use crate::error::SnapshotError;
use crate::types::Stroke;
use crate::validation::{validate_extent, validate_stroke};

/// Canvas extent plus the full stroke log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub global: Vec<Stroke>,
    pub total_strokes: u64,
}

#[derive(Debug, Deserialize)]
struct LegacySnapshot {
    width: u32,
    height: u32,
    global: Vec<Stroke>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(default)]
    version: Option<String>,
    data: Value,
}

impl Snapshot {
    pub fn new(width: u32, height: u32, global: Vec<Stroke>, total_strokes: u64) -> Self {
        Self {
            width,
            height,
            global,
            total_strokes,
        }
    }

    /// Check extent and strokes
    pub fn validate(&self) -> Result<(), SnapshotError> {
        validate_extent(self.width, self.height)?;
        for (index, stroke) in self.global.iter().enumerate() {
            validate_stroke(index, stroke)?;
        }
        Ok(())
    }

    /// Serialize into the current envelope
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        let envelope = Envelope {
            version: Some(SNAPSHOT_VERSION.to_string()),
            data: Value::String(serde_json::to_string(self)?),
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Parse any supported envelope version
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let envelope: Envelope = serde_json::from_str(json)?;
        let snapshot = match envelope.version.as_deref() {
            Some(SNAPSHOT_VERSION) => decode_data::<Snapshot>(envelope.data)?,
            Some(SNAPSHOT_VERSION_LEGACY) => {
                let legacy = decode_data::<LegacySnapshot>(envelope.data)?;
                let total_strokes = legacy.global.len() as u64;
                Snapshot::new(legacy.width, legacy.height, legacy.global, total_strokes)
            }
            Some(other) => {
                return Err(SnapshotError::DataFormat(format!(
                    "unknown snapshot version {other:?}"
                )));
            }
            None => {
                return Err(SnapshotError::DataFormat(
                    "missing snapshot version".to_string(),
                ));
            }
        };

        snapshot.validate()?;
        debug!(
            "Snapshot::from_json: {}x{}, {} strokes",
            snapshot.width,
            snapshot.height,
            snapshot.global.len()
        );
        Ok(snapshot)
    }
}

/// `data` holds either a JSON string or the object itself
fn decode_data<T: DeserializeOwned>(data: Value) -> Result<T, SnapshotError> {
    match data {
        Value::String(text) => Ok(serde_json::from_str(&text)?),
        other => Ok(serde_json::from_value(other)?),
    }
}
