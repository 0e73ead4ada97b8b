use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Failure to read an asset manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("invalid asset manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Asset manifest describing the named images and sounds of a game.
/// Loaded from a JSON file at runtime by the host page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Source images by name (e.g. "forest").
    #[serde(default)]
    pub images: HashMap<String, ImageDescriptor>,
    /// Audio assets by name (e.g. "success_sound").
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// Describes a source image the host fetches and hands to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Relative path to the encoded file (e.g., "forest.jpg").
    pub path: String,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether an audio asset with this name exists.
    pub fn has_sound(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Whether a source image with this name exists.
    pub fn has_image(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }
}
