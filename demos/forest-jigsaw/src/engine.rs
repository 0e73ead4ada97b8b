use glam::Vec2;
use image::RgbaImage;
use rand::rngs::StdRng;
use rand::SeedableRng;
use snap_engine::{AssetError, ImageSource};

use crate::config::PuzzleConfig;
use crate::layout::{BoardGeometry, GeometryError};
use crate::piece::{Piece, PieceState};
use crate::scramble;
use crate::slicer::{self, SliceError};

#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("cannot slice puzzle image: {0}")]
    Slice(#[from] SliceError),
    #[error("invalid puzzle geometry: {0}")]
    Geometry(#[from] GeometryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Board dealt, pieces hidden, waiting for the first touch.
    Start,
    Playing,
    Won,
}

/// Outcomes of engine operations, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum PuzzleEvent {
    /// A fresh board was sliced and laid out.
    Dealt,
    /// Pieces were scattered into the trays.
    Started,
    Rotated { piece: usize, quarter_turns: u32 },
    Snapped { piece: usize },
    ScoreChanged { score: usize, total: usize },
    /// Released on the board away from its slot; sent back to `to`.
    Rejected { piece: usize, from: Vec2, to: Vec2 },
    /// Released off the board; left where it is.
    Dropped { piece: usize },
    Won,
}

#[derive(Debug, Clone, Copy)]
struct Selection {
    piece: usize,
    drag_start: Vec2,
    pointer: Vec2,
}

/// One round of the puzzle: pieces, score and the interaction state machine.
pub struct PuzzleEngine {
    config: PuzzleConfig,
    board: BoardGeometry,
    guide: RgbaImage,
    pieces: Vec<Piece>,
    phase: GamePhase,
    score: usize,
    selection: Option<Selection>,
    events: Vec<PuzzleEvent>,
    rng: StdRng,
    next_z: u32,
}

impl PuzzleEngine {
    /// Slice the configured image and lay out a board in the `Start` phase.
    pub fn new<S: ImageSource + ?Sized>(config: PuzzleConfig, images: &S) -> Result<Self, PuzzleError> {
        let (board, guide, pieces) = deal(&config, images)?;
        let rng = StdRng::seed_from_u64(config.seed);
        let mut engine = Self {
            next_z: pieces.len() as u32,
            config,
            board,
            guide,
            pieces,
            phase: GamePhase::Start,
            score: 0,
            selection: None,
            events: Vec::new(),
            rng,
        };
        engine.events.push(PuzzleEvent::Dealt);
        Ok(engine)
    }

    /// Deal a fresh board from the current image and go back to `Start`.
    ///
    /// On error the current round is left untouched.
    pub fn restart<S: ImageSource + ?Sized>(&mut self, images: &S) -> Result<(), PuzzleError> {
        let (board, guide, pieces) = deal(&self.config, images)?;
        self.board = board;
        self.guide = guide;
        self.next_z = pieces.len() as u32;
        self.pieces = pieces;
        self.phase = GamePhase::Start;
        self.score = 0;
        self.selection = None;
        self.events.push(PuzzleEvent::Dealt);
        log::info!("puzzle restarted");
        Ok(())
    }

    pub fn pointer_down(&mut self, at: Vec2, taps: u32) {
        match self.phase {
            GamePhase::Start => self.start(),
            GamePhase::Playing => self.select(at, taps),
            GamePhase::Won => {}
        }
    }

    /// Pointer down on piece `index` drawn at `drawn` rather than at its
    /// logical position, as for a piece still sliding back on screen. The
    /// piece takes over the drawn position before it is selected.
    pub fn pointer_down_on(&mut self, index: usize, drawn: Vec2, at: Vec2, taps: u32) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(piece) = self.pieces.get_mut(index).filter(|p| p.is_movable()) else {
            return;
        };
        piece.position = drawn;
        self.take(index, at, taps);
    }

    pub fn pointer_move(&mut self, at: Vec2) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let Some(selection) = self.selection.as_mut() else {
            return;
        };
        let delta = at - selection.pointer;
        selection.pointer = at;
        let piece = &mut self.pieces[selection.piece];
        if piece.is_movable() {
            piece.position += delta;
        }
    }

    pub fn pointer_up(&mut self, at: Vec2) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.pointer_move(at);
        let Some(selection) = self.selection.take() else {
            return;
        };
        if self.pieces[selection.piece].is_movable() {
            self.release(selection);
        }
    }

    fn start(&mut self) {
        let play_area = self.config.play_area();
        for piece in &mut self.pieces {
            piece.state = PieceState::Movable;
        }
        scramble::scatter(&mut self.pieces, play_area, &self.config.tray, &mut self.rng);
        self.next_z = self.pieces.len() as u32;
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.events.push(PuzzleEvent::Started);
        log::info!("puzzle started with {} pieces", self.pieces.len());
    }

    fn select(&mut self, at: Vec2, taps: u32) {
        if let Some(index) = self.piece_at(at) {
            self.take(index, at, taps);
        }
    }

    fn take(&mut self, index: usize, at: Vec2, taps: u32) {
        let z = self.raise();
        let piece = &mut self.pieces[index];
        piece.z = z;
        if taps == 2 {
            piece.rotation = piece.rotation.turned();
            log::debug!("piece {} rotated to {} quarter turns", index, piece.rotation.quarter_turns());
            self.events.push(PuzzleEvent::Rotated { piece: index, quarter_turns: 1 });
        }
        self.selection = Some(Selection {
            piece: index,
            drag_start: piece.position,
            pointer: at,
        });
    }

    fn release(&mut self, selection: Selection) {
        let index = selection.piece;
        let snap = self.config.snap_distance;
        let tolerance = self.config.rotation_tolerance;
        let piece = &mut self.pieces[index];
        let offset = (piece.position - piece.correct_position).abs();

        if offset.x < snap && offset.y < snap && piece.rotation.distance_from_upright() < tolerance {
            piece.position = piece.correct_position;
            piece.state = PieceState::Locked;
            self.lock_score(index);
        } else if self.board.spans_vertically(piece.position.y) {
            let from = piece.position;
            piece.position = selection.drag_start;
            log::debug!("piece {} rejected, returning to {}", index, selection.drag_start);
            self.events.push(PuzzleEvent::Rejected {
                piece: index,
                from,
                to: selection.drag_start,
            });
        } else {
            self.events.push(PuzzleEvent::Dropped { piece: index });
        }
    }

    fn lock_score(&mut self, index: usize) {
        let previous = self.score;
        self.score = self.pieces.iter().filter(|p| p.is_locked()).count();
        log::debug!("piece {} locked ({}/{})", index, self.score, self.total());
        if self.score > previous {
            self.events.push(PuzzleEvent::Snapped { piece: index });
            self.events.push(PuzzleEvent::ScoreChanged {
                score: self.score,
                total: self.total(),
            });
        }
        if self.score == self.total() {
            self.phase = GamePhase::Won;
            self.events.push(PuzzleEvent::Won);
            log::info!("puzzle solved");
        }
    }

    fn raise(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Topmost movable piece under `at`. Locked pieces never answer.
    pub fn piece_at(&self, at: Vec2) -> Option<usize> {
        self.pieces
            .iter()
            .filter(|p| p.is_movable() && p.contains(at))
            .max_by_key(|p| p.z)
            .map(|p| p.index)
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, PuzzleEvent> {
        self.events.drain(..)
    }

    // ---- Accessors ----

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.pieces.len()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, index: usize) -> Option<&Piece> {
        self.pieces.get(index)
    }

    /// The piece currently held by the pointer, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selection.map(|s| s.piece)
    }

    pub fn board(&self) -> &BoardGeometry {
        &self.board
    }

    /// The whole resized picture.
    pub fn guide(&self) -> &RgbaImage {
        &self.guide
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }
}

fn deal<S: ImageSource + ?Sized>(
    config: &PuzzleConfig,
    images: &S,
) -> Result<(BoardGeometry, RgbaImage, Vec<Piece>), PuzzleError> {
    let board = config.validate()?;
    let source = images.load_image(&config.image_name)?;
    let (guide, tiles) = slicer::slice_with_guide(&source, board.image_size, board.piece_size)?;
    let pieces = tiles
        .into_iter()
        .enumerate()
        .map(|(index, image)| Piece::new(index, image, board.correct_position(index)))
        .collect::<Vec<_>>();
    log::info!(
        "dealt `{}` as a {}x{} board",
        config.image_name,
        board.cols,
        board.rows
    );
    Ok((board, guide, pieces))
}
