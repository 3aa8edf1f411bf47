use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{export::ExportSettings, grid::GridLayout, Result};

/// Top-level configuration structure for a show build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Seed for every random sample. `None` draws a fresh seed per build.
    pub seed: Option<u64>,
    pub grid: GridLayout,
    pub export: ExportSettings,
}

impl SequencerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        tracing::debug!(?path, "loaded sequencer config");
        Ok(config)
    }
}
