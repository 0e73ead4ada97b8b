use glam::{UVec2, Vec2};

/// Board configurations that cannot be tiled.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("image and piece sizes must be non-zero")]
    Empty,
    #[error("piece {piece} does not fit in image {image}")]
    PieceTooLarge { image: UVec2, piece: UVec2 },
    #[error("piece {piece} does not evenly divide image {image}")]
    Uneven { image: UVec2, piece: UVec2 },
    #[error("`{0}` must be positive")]
    Tolerance(&'static str),
}

/// Axis-aligned rectangle in scene space (y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self { min, max: min + size }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Inclusive on all edges.
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Where the slot for tile `index` sits on the board.
///
/// Tiles are numbered row-major with row 0 at the top of the picture.
/// Since scene y grows upwards, row 0 gets the largest y.
pub fn correct_position_for(
    index: usize,
    rows: usize,
    cols: usize,
    piece_size: Vec2,
    board_frame: Rect,
) -> Vec2 {
    let row = (index / cols) as f32;
    let col = (index % cols) as f32;
    let middle_row = (rows as f32 - 1.0) / 2.0;
    Vec2::new(
        board_frame.min.x + piece_size.x / 2.0 + col * piece_size.x,
        board_frame.center().y + (middle_row - row) * piece_size.y,
    )
}

/// Grid dimensions and placement of the board for one round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub rows: usize,
    pub cols: usize,
    pub image_size: UVec2,
    pub piece_size: UVec2,
    /// The board rectangle; its size equals the image size.
    pub frame: Rect,
}

impl BoardGeometry {
    /// Validate the tiling and center the board in `play_area`.
    pub fn centered(image_size: UVec2, piece_size: UVec2, play_area: Rect) -> Result<Self, GeometryError> {
        if image_size.min_element() == 0 || piece_size.min_element() == 0 {
            return Err(GeometryError::Empty);
        }
        if piece_size.x > image_size.x || piece_size.y > image_size.y {
            return Err(GeometryError::PieceTooLarge { image: image_size, piece: piece_size });
        }
        if image_size.x % piece_size.x != 0 || image_size.y % piece_size.y != 0 {
            return Err(GeometryError::Uneven { image: image_size, piece: piece_size });
        }

        let grid = image_size / piece_size;
        Ok(Self {
            rows: grid.y as usize,
            cols: grid.x as usize,
            image_size,
            piece_size,
            frame: Rect::from_center_size(play_area.center(), image_size.as_vec2()),
        })
    }

    pub fn piece_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn piece_extent(&self) -> Vec2 {
        self.piece_size.as_vec2()
    }

    pub fn correct_position(&self, index: usize) -> Vec2 {
        correct_position_for(index, self.rows, self.cols, self.piece_extent(), self.frame)
    }

    /// Every slot, in tile order.
    pub fn correct_positions(&self) -> Vec<Vec2> {
        (0..self.piece_count()).map(|i| self.correct_position(i)).collect()
    }

    /// Strictly between the bottom and top edges of the board.
    pub fn spans_vertically(&self, y: f32) -> bool {
        self.frame.min.y < y && y < self.frame.max.y
    }
}
