use crate::api::types::TextureId;

/// Sprite component: a textured rectangle.
/// The whole texture is stretched over the entity's `size`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComponent {
    /// Which published texture to draw.
    pub texture: TextureId,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
}

impl SpriteComponent {
    pub fn new(texture: TextureId) -> Self {
        Self { texture, alpha: 1.0 }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self::new(TextureId(0))
    }
}
