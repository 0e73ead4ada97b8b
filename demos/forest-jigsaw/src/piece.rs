use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use image::RgbaImage;

use crate::layout::Rect;

/// Orientation as counter-clockwise quarter turns, always `0..4`.
///
/// A full turn wraps back to upright, so there is no separate
/// "360 degrees" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rotation(u8);

impl Rotation {
    pub const UPRIGHT: Rotation = Rotation(0);

    pub fn from_quarter_turns(turns: u32) -> Self {
        Rotation((turns % 4) as u8)
    }

    pub fn quarter_turns(self) -> u32 {
        self.0 as u32
    }

    pub fn radians(self) -> f32 {
        self.0 as f32 * FRAC_PI_2
    }

    /// One more quarter turn, wrapping at a full turn.
    pub fn turned(self) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + 1)
    }

    /// Shortest angle to upright, in `[0, PI]`.
    pub fn distance_from_upright(self) -> f32 {
        let r = self.radians();
        r.min(TAU - r)
    }

    /// Width and height trade places at 90 and 270 degrees.
    pub fn is_sideways(self) -> bool {
        self.0 % 2 == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieceState {
    #[default]
    Movable,
    Locked,
}

/// One tile of the picture.
#[derive(Debug, Clone)]
pub struct Piece {
    /// Row-major slicing index; stable for the whole round.
    pub index: usize,
    pub image: RgbaImage,
    pub position: Vec2,
    pub rotation: Rotation,
    pub correct_position: Vec2,
    pub state: PieceState,
    /// Stacking order among pieces; higher is on top.
    pub z: u32,
}

impl Piece {
    pub fn new(index: usize, image: RgbaImage, correct_position: Vec2) -> Self {
        Self {
            index,
            image,
            position: correct_position,
            rotation: Rotation::UPRIGHT,
            correct_position,
            state: PieceState::Movable,
            z: index as u32,
        }
    }

    /// Unrotated size in scene units (one pixel per unit).
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32)
    }

    /// Axis-aligned bounds at the current quarter turn.
    pub fn bounds(&self) -> Rect {
        let size = self.size();
        let size = if self.rotation.is_sideways() {
            Vec2::new(size.y, size.x)
        } else {
            size
        };
        Rect::from_center_size(self.position, size)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains(point)
    }

    pub fn is_locked(&self) -> bool {
        self.state == PieceState::Locked
    }

    pub fn is_movable(&self) -> bool {
        self.state == PieceState::Movable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps_at_a_full_turn() {
        let mut r = Rotation::from_quarter_turns(3);
        assert_eq!(r.radians(), 3.0 * FRAC_PI_2);
        r = r.turned();
        assert_eq!(r, Rotation::UPRIGHT);
        assert_eq!(Rotation::from_quarter_turns(4), Rotation::UPRIGHT);
        assert_eq!(Rotation::from_quarter_turns(6).quarter_turns(), 2);
    }

    #[test]
    fn distance_from_upright_is_the_short_way_round() {
        assert_eq!(Rotation::UPRIGHT.distance_from_upright(), 0.0);
        assert!((Rotation::from_quarter_turns(1).distance_from_upright() - FRAC_PI_2).abs() < 1e-6);
        assert!((Rotation::from_quarter_turns(3).distance_from_upright() - FRAC_PI_2).abs() < 1e-6);
        assert!((Rotation::from_quarter_turns(2).distance_from_upright() - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn sideways_pieces_swap_their_bounds() {
        let mut piece = Piece::new(0, RgbaImage::new(190, 175), Vec2::new(100.0, 100.0));
        assert!(piece.contains(Vec2::new(100.0 + 94.0, 100.0)));
        assert!(!piece.contains(Vec2::new(100.0, 100.0 + 94.0)));

        piece.rotation = Rotation::from_quarter_turns(1);
        assert!(!piece.contains(Vec2::new(100.0 + 94.0, 100.0)));
        assert!(piece.contains(Vec2::new(100.0, 100.0 + 94.0)));
    }
}
