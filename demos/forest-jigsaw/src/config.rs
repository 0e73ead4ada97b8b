use glam::{UVec2, Vec2};
use serde::Deserialize;

use crate::layout::{BoardGeometry, GeometryError, Rect};

/// Where the scrambled tiles wait before the player picks them up.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    /// Horizontal distance between neighbouring tiles in a strip.
    pub spacing: f32,
    /// Distance of the first slot from the left edge of the play area.
    pub inset_x: f32,
    /// Distance of each strip from the top/bottom edge of the play area.
    pub inset_y: f32,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            spacing: 95.0,
            inset_x: 95.0,
            inset_y: 160.0,
        }
    }
}

/// Tunables for one puzzle. Every field has a default, so a partial JSON
/// document (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Name of the source image in the image library.
    pub image_name: String,
    /// Size the source image is stretched to before slicing.
    pub image_size: UVec2,
    pub piece_size: UVec2,
    /// Max per-axis distance between a tile and its slot for a snap.
    pub snap_distance: f32,
    /// Max angular distance from upright (radians) for a snap.
    pub rotation_tolerance: f32,
    /// Duration of rotate and return animations, in seconds.
    pub animation_duration: f32,
    pub tray: TrayConfig,
    /// Play area size in scene units; the board is centered in it.
    pub world_size: Vec2,
    /// Seed for the scatter RNG.
    pub seed: u64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            image_name: "forest".to_string(),
            image_size: UVec2::new(760, 700),
            piece_size: UVec2::new(190, 175),
            snap_distance: 50.0,
            rotation_tolerance: 0.1,
            animation_duration: 0.25,
            tray: TrayConfig::default(),
            world_size: Vec2::new(1024.0, 1366.0),
            seed: 0x5eed_f0e5,
        }
    }
}

impl PuzzleConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Play area in scene coordinates, origin at the bottom-left corner.
    pub fn play_area(&self) -> Rect {
        Rect::from_min_size(Vec2::ZERO, self.world_size)
    }

    /// Check the configuration and derive the board it describes.
    pub fn validate(&self) -> Result<BoardGeometry, GeometryError> {
        let checks = [
            ("snap_distance", self.snap_distance > 0.0),
            ("rotation_tolerance", self.rotation_tolerance > 0.0),
            ("animation_duration", self.animation_duration >= 0.0),
        ];
        if let Some((name, _)) = checks.iter().find(|(_, ok)| !ok) {
            return Err(GeometryError::Tolerance(*name));
        }
        BoardGeometry::centered(self.image_size, self.piece_size, self.play_area())
    }
}
