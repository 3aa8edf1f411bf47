use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{material::MaterialHandle, Result, SequencerError};

/// Bundle manifest listing every prefab and material by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleManifest {
    #[serde(default)]
    pub prefabs: BTreeMap<String, String>,
    #[serde(default)]
    pub materials: BTreeMap<String, String>,
}

/// Registry for all assets a show may reference.
#[derive(Debug, Default, Clone)]
pub struct AssetCatalog {
    prefabs: BTreeMap<String, String>,
    materials: BTreeMap<String, String>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_manifest(manifest: BundleManifest) -> Self {
        Self {
            prefabs: manifest.prefabs,
            materials: manifest.materials,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let manifest: BundleManifest = serde_json::from_str(json)?;
        Ok(Self::from_manifest(manifest))
    }

    /// Reads a bundle manifest from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&text)?;
        tracing::debug!(
            ?path,
            prefabs = catalog.prefabs.len(),
            materials = catalog.materials.len(),
            "loaded asset catalog"
        );
        Ok(catalog)
    }

    pub fn register_prefab(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.prefabs.insert(name.into(), path.into());
    }

    pub fn register_material(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.materials.insert(name.into(), path.into());
    }

    /// Bundle path of a prefab, or an error naming the missing asset.
    pub fn prefab(&self, name: &str) -> Result<&str> {
        self.prefabs
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| SequencerError::UnknownAsset(name.to_string()))
    }

    pub fn material(&self, name: &str) -> Result<MaterialHandle> {
        if self.materials.contains_key(name) {
            Ok(MaterialHandle::new(name))
        } else {
            Err(SequencerError::UnknownMaterial(name.to_string()))
        }
    }

    pub fn prefab_names(&self) -> impl Iterator<Item = &str> {
        self.prefabs.keys().map(String::as_str)
    }

    pub fn material_names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}
