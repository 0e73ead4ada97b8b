use glam::UVec2;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SliceError {
    #[error("source image is empty")]
    EmptySource,
    #[error("target {target} and piece {piece} sizes must be non-zero")]
    ZeroSize { target: UVec2, piece: UVec2 },
    #[error("piece {piece} is larger than target {target}")]
    PieceTooLarge { target: UVec2, piece: UVec2 },
}

/// Stretch `image` to exactly `target` pixels. Aspect ratio is not kept.
pub fn normalize(image: &DynamicImage, target: UVec2) -> RgbaImage {
    imageops::resize(image, target.x, target.y, FilterType::Triangle)
}

/// Resize `image` to `target` and cut it into `piece`-sized tiles.
///
/// Produces `floor(target / piece)` columns and rows, row-major starting at
/// the top-left corner. Any remainder strip on the right or bottom edge is
/// discarded.
pub fn slice(image: &DynamicImage, target: UVec2, piece: UVec2) -> Result<Vec<RgbaImage>, SliceError> {
    slice_with_guide(image, target, piece).map(|(_, tiles)| tiles)
}

/// Like `slice`, but also hands back the resized whole image.
pub fn slice_with_guide(
    image: &DynamicImage,
    target: UVec2,
    piece: UVec2,
) -> Result<(RgbaImage, Vec<RgbaImage>), SliceError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(SliceError::EmptySource);
    }
    if target.min_element() == 0 || piece.min_element() == 0 {
        return Err(SliceError::ZeroSize { target, piece });
    }
    if piece.x > target.x || piece.y > target.y {
        return Err(SliceError::PieceTooLarge { target, piece });
    }
    let normalized = normalize(image, target);
    let tiles = cut(&normalized, piece);
    Ok((normalized, tiles))
}

fn cut(image: &RgbaImage, piece: UVec2) -> Vec<RgbaImage> {
    let cols = image.width() / piece.x;
    let rows = image.height() / piece.y;
    let mut tiles = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let tile = imageops::crop_imm(image, col * piece.x, row * piece.y, piece.x, piece.y);
            tiles.push(tile.to_image());
        }
    }
    tiles
}
