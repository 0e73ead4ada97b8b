/// Render layer: controls draw order for entities.
///
/// Layers are drawn back-to-front: Guide first, Held last.
/// Within a layer, entities are ordered by their `order` value.
/// Default layer is `Loose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum RenderLayer {
    /// Reference artwork underneath the board.
    Guide = 0,
    /// Pieces locked into their slot.
    Placed = 1,
    /// Pieces the player can still pick up.
    #[default]
    Loose = 2,
    /// The piece currently being dragged.
    Held = 3,
}

impl RenderLayer {
    /// Convert to u8 for the render buffer.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}
