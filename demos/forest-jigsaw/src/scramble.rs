use glam::Vec2;
use rand::Rng;

use crate::config::TrayConfig;
use crate::layout::Rect;
use crate::piece::{Piece, Rotation};

/// Deal `pieces` into the two trays with random orientations.
///
/// The first half goes to a strip along the top of `play_area`, the rest to
/// a strip along the bottom. Each piece turns by 1 to 4 quarter turns; four
/// quarter turns lands back on upright.
pub fn scatter<R: Rng + ?Sized>(pieces: &mut [Piece], play_area: Rect, tray: &TrayConfig, rng: &mut R) {
    let count = pieces.len();
    let top = count / 2;
    let per_strip = count.div_ceil(2).max(1);

    for (i, piece) in pieces.iter_mut().enumerate() {
        let (slot, y) = if i < top {
            (i, play_area.max.y - tray.inset_y)
        } else {
            (i % per_strip, play_area.min.y + tray.inset_y)
        };
        piece.position = Vec2::new(play_area.min.x + tray.inset_x + slot as f32 * tray.spacing, y);
        piece.rotation = Rotation::from_quarter_turns(rng.random_range(1..=4));
        piece.z = i as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pieces(n: usize) -> Vec<Piece> {
        (0..n)
            .map(|i| Piece::new(i, RgbaImage::new(4, 4), Vec2::ZERO))
            .collect()
    }

    fn play_area() -> Rect {
        Rect::from_min_size(Vec2::ZERO, Vec2::new(1024.0, 1366.0))
    }

    #[test]
    fn sixteen_pieces_fill_two_strips_of_eight() {
        let mut deck = pieces(16);
        let tray = TrayConfig::default();
        scatter(&mut deck, play_area(), &tray, &mut StdRng::seed_from_u64(7));

        for (i, piece) in deck.iter().enumerate() {
            let slot = (i % 8) as f32;
            let expected_y = if i < 8 { 1366.0 - 160.0 } else { 160.0 };
            assert_eq!(piece.position, Vec2::new(95.0 + slot * 95.0, expected_y), "piece {i}");
        }
    }

    #[test]
    fn rotations_stay_within_a_turn() {
        let mut deck = pieces(16);
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = [false; 4];
        for _ in 0..20 {
            scatter(&mut deck, play_area(), &TrayConfig::default(), &mut rng);
            for piece in &deck {
                assert!(piece.rotation.quarter_turns() < 4);
                seen[piece.rotation.quarter_turns() as usize] = true;
            }
        }
        assert_eq!(seen, [true; 4], "upright comes from four quarter turns");
    }

    #[test]
    fn same_seed_same_deal() {
        let mut a = pieces(16);
        let mut b = pieces(16);
        let tray = TrayConfig::default();
        scatter(&mut a, play_area(), &tray, &mut StdRng::seed_from_u64(3));
        scatter(&mut b, play_area(), &tray, &mut StdRng::seed_from_u64(3));
        let turns = |deck: &[Piece]| deck.iter().map(|p| p.rotation).collect::<Vec<_>>();
        assert_eq!(turns(&a), turns(&b));
    }

    #[test]
    fn odd_counts_keep_bottom_slots_distinct() {
        let mut deck = pieces(9);
        scatter(&mut deck, play_area(), &TrayConfig::default(), &mut StdRng::seed_from_u64(1));
        let mut bottom: Vec<f32> = deck[4..].iter().map(|p| p.position.x).collect();
        bottom.sort_by(f32::total_cmp);
        bottom.dedup();
        assert_eq!(bottom.len(), 5);
        assert!(deck[..4].iter().all(|p| p.position.y == 1366.0 - 160.0));
    }
}
