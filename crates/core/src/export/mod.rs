use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    animation::TrackAnimation,
    scene::{PlacedInstance, PrefabAssignment},
    timeline::{MaterialEvent, Timeline},
    Result,
};

/// Configuration options for the export step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_directory: PathBuf,
    pub file_name: String,
    pub pretty: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("output"),
            file_name: "show.json".to_string(),
            pretty: true,
        }
    }
}

/// Finished event set, ordered by beat. Entries sharing a beat keep the order
/// they were emitted in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDocument {
    pub requirements: Vec<String>,
    pub object_prefabs: Vec<PrefabAssignment>,
    pub instances: Vec<PlacedInstance>,
    pub material_events: Vec<MaterialEvent>,
    pub animations: Vec<TrackAnimation>,
}

impl ShowDocument {
    pub fn from_timeline(timeline: Timeline, requirements: Vec<String>) -> Self {
        let parts = timeline.into_parts();
        let mut instances = parts.instances;
        let mut material_events = parts.material_events;
        let mut animations = parts.animations;
        // `sort_by` is stable, which keeps last-write-wins at equal beats.
        instances.sort_by(|a, b| a.beat().total_cmp(&b.beat()));
        material_events.sort_by(|a, b| a.beat.total_cmp(&b.beat));
        animations.sort_by(|a, b| a.beat.total_cmp(&b.beat));

        Self {
            requirements,
            object_prefabs: parts.prefab_assignments,
            instances,
            material_events,
            animations,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Writes finished documents to disk.
#[derive(Debug, Default)]
pub struct Exporter {
    settings: ExportSettings,
}

impl Exporter {
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    pub fn target_path(&self) -> PathBuf {
        self.settings.output_directory.join(&self.settings.file_name)
    }

    /// Serialises `document` and moves it into place only once the whole file
    /// is written, so a failed export never leaves a partial document behind.
    pub fn write(&self, document: &ShowDocument) -> Result<PathBuf> {
        let json = document.to_json(self.settings.pretty)?;
        std::fs::create_dir_all(&self.settings.output_directory)?;

        let target = self.target_path();
        let staging = staging_path(&target);
        let staged = (|| -> std::io::Result<()> {
            let mut file = std::fs::File::create(&staging)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
            drop(file);
            std::fs::rename(&staging, &target)
        })();
        if let Err(err) = staged {
            if let Err(cleanup) = std::fs::remove_file(&staging) {
                tracing::warn!(path = ?staging, error = %cleanup, "could not remove staging file");
            }
            return Err(err.into());
        }

        tracing::info!(
            path = ?target,
            instances = document.instances.len(),
            material_events = document.material_events.len(),
            animations = document.animations.len(),
            object_prefabs = document.object_prefabs.len(),
            "exported show"
        );
        Ok(target)
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    target.with_file_name(name)
}
