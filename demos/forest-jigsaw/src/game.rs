use std::f32::consts::TAU;

use glam::Vec2;
use snap_engine::*;

use crate::config::PuzzleConfig;
use crate::engine::{GamePhase, PuzzleEngine, PuzzleError, PuzzleEvent};
use crate::layout::Rect;
use crate::piece::Piece;

// Game event kinds (Rust → host page)
pub const EVENT_SCORE: f32 = 1.0;
pub const EVENT_PHASE: f32 = 2.0;
pub const EVENT_WON: f32 = 3.0;
pub const EVENT_UNAVAILABLE: f32 = 4.0;

// Custom event kinds (host page → Rust)
pub const CUSTOM_RESTART: u32 = 1;

// Sound cues
const SOUND_SUCCESS: SoundEvent = SoundEvent(1);
const SOUND_WRONG: SoundEvent = SoundEvent(2);
const SOUND_APPLAUSE: SoundEvent = SoundEvent(3);

const GUIDE_TAG: &str = "guide";
const PIECE_TAG: &str = "piece";
const GUIDE_TEXTURE: TextureId = TextureId(0);
const GUIDE_ALPHA_PLAYING: f32 = 0.3;

enum Session {
    Ready(PuzzleEngine),
    /// No playable board; retried when the image library changes.
    Unavailable { reason: String, revision: u64 },
}

/// Presentation layer for the forest jigsaw: turns engine events into
/// entities, tweens, sound cues and host events.
pub struct ForestJigsaw {
    config: PuzzleConfig,
    session: Session,
    tweens: TweenState,
    /// Entity of each piece, by piece index. Empty until the round starts.
    piece_entities: Vec<EntityId>,
    guide: Option<EntityId>,
    dt: f32,
}

impl ForestJigsaw {
    pub fn new() -> Self {
        Self::with_config(PuzzleConfig::default())
    }

    pub fn with_config(config: PuzzleConfig) -> Self {
        Self {
            config,
            session: Session::Unavailable {
                reason: "not initialized".to_string(),
                revision: u64::MAX,
            },
            tweens: TweenState::new(),
            piece_entities: Vec::new(),
            guide: None,
            dt: GameConfig::default().fixed_dt,
        }
    }

    pub fn engine(&self) -> Option<&PuzzleEngine> {
        match &self.session {
            Session::Ready(engine) => Some(engine),
            Session::Unavailable { .. } => None,
        }
    }

    /// Why there is no board, if there isn't one.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.session {
            Session::Ready(_) => None,
            Session::Unavailable { reason, .. } => Some(reason.as_str()),
        }
    }

    /// Build a fresh session from the image library.
    fn open(&mut self, ctx: &mut EngineContext) {
        match PuzzleEngine::new(self.config.clone(), &ctx.images) {
            Ok(engine) => {
                self.session = Session::Ready(engine);
                self.apply_events(ctx);
            }
            Err(err) => self.unavailable(ctx, err),
        }
    }

    fn restart(&mut self, ctx: &mut EngineContext) {
        let result = match &mut self.session {
            Session::Ready(engine) => engine.restart(&ctx.images),
            Session::Unavailable { .. } => return self.open(ctx),
        };
        match result {
            Ok(()) => self.apply_events(ctx),
            Err(err) => self.unavailable(ctx, err),
        }
    }

    fn unavailable(&mut self, ctx: &mut EngineContext, err: PuzzleError) {
        log::error!("puzzle unavailable: {}", err);
        self.clear_board(ctx);
        self.session = Session::Unavailable {
            reason: err.to_string(),
            revision: ctx.images.revision(),
        };
        ctx.emit_event(GameEvent::new(EVENT_UNAVAILABLE, 0.0));
    }

    fn clear_board(&mut self, ctx: &mut EngineContext) {
        self.tweens.clear();
        ctx.scene.despawn_tagged(GUIDE_TAG);
        ctx.scene.despawn_tagged(PIECE_TAG);
        self.piece_entities.clear();
        self.guide = None;
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, event: &InputEvent) {
        if let InputEvent::Custom { kind: CUSTOM_RESTART, .. } = event {
            self.restart(ctx);
            return;
        }
        let Session::Ready(engine) = &mut self.session else {
            return;
        };
        match *event {
            InputEvent::PointerDown { x, y, taps } => {
                let at = Vec2::new(x, y);
                if engine.phase() != GamePhase::Playing {
                    engine.pointer_down(at, taps);
                } else if let Some((index, drawn)) =
                    drawn_piece_at(ctx, engine, &self.piece_entities, &self.tweens, at)
                {
                    // Grabbing a piece mid-return drops the animation.
                    self.tweens.cancel(self.piece_entities[index], TweenChannel::Position);
                    engine.pointer_down_on(index, drawn, at, taps);
                }
            }
            InputEvent::PointerMove { x, y } => engine.pointer_move(Vec2::new(x, y)),
            InputEvent::PointerUp { x, y } => engine.pointer_up(Vec2::new(x, y)),
            InputEvent::Custom { .. } => {}
        }
        self.apply_events(ctx);
    }

    fn apply_events(&mut self, ctx: &mut EngineContext) {
        let Session::Ready(engine) = &mut self.session else {
            return;
        };
        let events: Vec<PuzzleEvent> = engine.drain_events().collect();
        for event in events {
            self.apply(ctx, event);
        }
    }

    fn apply(&mut self, ctx: &mut EngineContext, event: PuzzleEvent) {
        let Session::Ready(engine) = &self.session else {
            return;
        };
        let duration = self.config.animation_duration;
        match event {
            PuzzleEvent::Dealt => {
                self.tweens.clear();
                ctx.scene.despawn_tagged(PIECE_TAG);
                ctx.scene.despawn_tagged(GUIDE_TAG);
                self.piece_entities.clear();
                publish_textures(ctx, engine);
                self.guide = Some(spawn_guide(ctx, engine));
                emit_phase(ctx, GamePhase::Start);
                emit_score(ctx, engine.score(), engine.total());
            }
            PuzzleEvent::Started => {
                self.piece_entities = spawn_pieces(ctx, engine.pieces());
                if let Some(guide) = self.guide {
                    let fade = Tween::alpha(1.0, GUIDE_ALPHA_PLAYING, duration, Easing::SmoothStep);
                    self.tweens.add(guide, fade);
                }
                emit_phase(ctx, GamePhase::Playing);
                emit_score(ctx, engine.score(), engine.total());
            }
            PuzzleEvent::Rotated { piece, .. } => {
                let (Some(&id), Some(p)) = (self.piece_entities.get(piece), engine.piece(piece)) else {
                    return;
                };
                let from = ctx.scene.get(id).map_or(0.0, |e| e.rotation);
                let mut to = p.rotation.radians();
                // Always turn forward, even across the wrap to upright.
                while to <= from + 1e-4 {
                    to += TAU;
                }
                self.tweens.add(id, Tween::rotation(from, to, duration, Easing::Linear));
            }
            PuzzleEvent::Rejected { piece, from, to } => {
                if let Some(&id) = self.piece_entities.get(piece) {
                    self.tweens.add(id, Tween::position(from, to, duration, Easing::Linear));
                }
                ctx.emit_sound(SOUND_WRONG);
            }
            PuzzleEvent::Snapped { piece } => {
                if let Some(&id) = self.piece_entities.get(piece) {
                    self.tweens.cancel(id, TweenChannel::Position);
                }
                ctx.emit_sound(SOUND_SUCCESS);
            }
            PuzzleEvent::ScoreChanged { score, total } => emit_score(ctx, score, total),
            PuzzleEvent::Dropped { .. } => {}
            PuzzleEvent::Won => {
                ctx.emit_sound(SOUND_APPLAUSE);
                ctx.emit_event(GameEvent::new(EVENT_WON, engine.total() as f32));
                emit_phase(ctx, GamePhase::Won);
            }
        }
    }

    /// Copy engine state onto the entities, leaving animated channels to
    /// their tweens.
    fn sync_entities(&self, ctx: &mut EngineContext) {
        let Session::Ready(engine) = &self.session else {
            return;
        };

        let selected = engine.selected();
        for (piece, &id) in engine.pieces().iter().zip(&self.piece_entities) {
            let Some(entity) = ctx.scene.get_mut(id) else {
                continue;
            };
            if !self.tweens.animates(id, TweenChannel::Position) {
                entity.pos = piece.position;
            }
            if !self.tweens.animates(id, TweenChannel::Rotation) {
                entity.rotation = piece.rotation.radians();
            }
            entity.layer = if piece.is_locked() {
                RenderLayer::Placed
            } else if selected == Some(piece.index) {
                RenderLayer::Held
            } else {
                RenderLayer::Loose
            };
            entity.order = piece.z;
        }
    }
}

impl Default for ForestJigsaw {
    fn default() -> Self {
        Self::new()
    }
}

fn publish_textures(ctx: &mut EngineContext, engine: &PuzzleEngine) {
    let mut textures = Vec::with_capacity(engine.total() + 1);
    textures.push(Texture::from(engine.guide()));
    textures.extend(engine.pieces().iter().map(|p| Texture::from(&p.image)));
    ctx.textures.publish(textures);
}

fn spawn_guide(ctx: &mut EngineContext, engine: &PuzzleEngine) -> EntityId {
    let frame = engine.board().frame;
    let id = ctx.next_id();
    ctx.scene.spawn(
        Entity::new(id)
            .with_tag(GUIDE_TAG)
            .with_pos(frame.center())
            .with_size(frame.size())
            .with_layer(RenderLayer::Guide)
            .with_sprite(SpriteComponent::new(GUIDE_TEXTURE)),
    );
    id
}

fn spawn_pieces(ctx: &mut EngineContext, pieces: &[Piece]) -> Vec<EntityId> {
    pieces
        .iter()
        .map(|piece| {
            let id = ctx.next_id();
            ctx.scene.spawn(
                Entity::new(id)
                    .with_tag(PIECE_TAG)
                    .with_pos(piece.position)
                    .with_rotation(piece.rotation.radians())
                    .with_size(piece.size())
                    .with_layer(RenderLayer::Loose)
                    .with_order(piece.z)
                    .with_sprite(SpriteComponent::new(TextureId(1 + piece.index as u32))),
            );
            id
        })
        .collect()
}

/// Topmost movable piece whose sprite covers `at`, with where it is drawn.
/// A piece sliding back answers at its sprite, not at its destination.
fn drawn_piece_at(
    ctx: &EngineContext,
    engine: &PuzzleEngine,
    entities: &[EntityId],
    tweens: &TweenState,
    at: Vec2,
) -> Option<(usize, Vec2)> {
    engine
        .pieces()
        .iter()
        .zip(entities)
        .filter(|(piece, _)| piece.is_movable())
        .filter_map(|(piece, &id)| {
            let drawn = if tweens.animates(id, TweenChannel::Position) {
                ctx.scene.get(id)?.pos
            } else {
                piece.position
            };
            let rect = Rect::from_center_size(drawn, piece.bounds().size());
            rect.contains(at).then_some((piece, drawn))
        })
        .max_by_key(|(piece, _)| piece.z)
        .map(|(piece, drawn)| (piece.index, drawn))
}

fn emit_score(ctx: &mut EngineContext, score: usize, total: usize) {
    ctx.emit_event(GameEvent {
        kind: EVENT_SCORE,
        a: score as f32,
        b: total as f32,
        c: 0.0,
    });
}

fn emit_phase(ctx: &mut EngineContext, phase: GamePhase) {
    let code = match phase {
        GamePhase::Start => 0.0,
        GamePhase::Playing => 1.0,
        GamePhase::Won => 2.0,
    };
    ctx.emit_event(GameEvent::new(EVENT_PHASE, code));
}

impl Game for ForestJigsaw {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: self.config.world_size.x,
            world_height: self.config.world_size.y,
            max_instances: 64,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.dt = self.config().fixed_dt;
        self.open(ctx);
        self.sync_entities(ctx);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            self.handle_input(ctx, event);
        }

        if let Session::Unavailable { revision, .. } = &self.session {
            if *revision != ctx.images.revision() {
                log::info!("image library changed, retrying puzzle setup");
                self.open(ctx);
            }
        }

        self.tweens.tick(self.dt, &mut ctx.scene);
        self.sync_entities(ctx);
    }

    fn sound_name(&self, sound: SoundEvent) -> Option<&'static str> {
        match sound {
            SOUND_SUCCESS => Some("success_sound"),
            SOUND_WRONG => Some("wrong_sound"),
            SOUND_APPLAUSE => Some("applause_sound"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn context_with_image() -> EngineContext {
        let mut ctx = EngineContext::new();
        ctx.images.insert_decoded("forest", DynamicImage::new_rgba8(760, 700));
        ctx
    }

    fn step(game: &mut ForestJigsaw, ctx: &mut EngineContext, events: &[InputEvent]) {
        ctx.clear_frame_data();
        let mut input = InputQueue::new();
        for event in events {
            input.push(*event);
        }
        game.update(ctx, &input);
    }

    fn idle(game: &mut ForestJigsaw, ctx: &mut EngineContext, frames: usize) {
        for _ in 0..frames {
            step(game, ctx, &[]);
        }
    }

    fn down(at: Vec2, taps: u32) -> InputEvent {
        InputEvent::PointerDown { x: at.x, y: at.y, taps }
    }

    fn tap(at: Vec2, taps: u32) -> [InputEvent; 2] {
        [down(at, taps), InputEvent::PointerUp { x: at.x, y: at.y }]
    }

    fn drag(from: Vec2, to: Vec2) -> [InputEvent; 3] {
        [
            down(from, 1),
            InputEvent::PointerMove { x: to.x, y: to.y },
            InputEvent::PointerUp { x: to.x, y: to.y },
        ]
    }

    fn started() -> (ForestJigsaw, EngineContext) {
        let mut ctx = context_with_image();
        let mut game = ForestJigsaw::new();
        game.init(&mut ctx);
        step(&mut game, &mut ctx, &[down(Vec2::ZERO, 1)]);
        (game, ctx)
    }

    /// The last piece of the top tray: nothing overlaps its center.
    const PIECE: usize = 7;

    /// Double-tap piece 7 until it is upright. Returns where it sits.
    fn make_upright(game: &mut ForestJigsaw, ctx: &mut EngineContext) -> Vec2 {
        let engine = game.engine().unwrap();
        let at = engine.pieces()[PIECE].position;
        assert_eq!(engine.piece_at(at), Some(PIECE));
        let turns = engine.pieces()[PIECE].rotation.quarter_turns();
        for _ in 0..(4 - turns) % 4 {
            step(game, ctx, &tap(at, 2));
        }
        idle(game, ctx, 20);
        at
    }

    fn entity(ctx: &EngineContext, game: &ForestJigsaw, piece: usize) -> Entity {
        ctx.scene.get(game.piece_entities[piece]).unwrap().clone()
    }

    #[test]
    fn init_shows_the_guide_only() {
        let mut ctx = context_with_image();
        let mut game = ForestJigsaw::new();
        game.init(&mut ctx);

        assert_eq!(game.engine().unwrap().phase(), GamePhase::Start);
        assert_eq!(ctx.textures.len(), 17);
        assert_eq!(ctx.scene.len(), 1);
        let guide = ctx.scene.find_by_tag(GUIDE_TAG).unwrap();
        assert_eq!(guide.layer, RenderLayer::Guide);
        assert_eq!(guide.sprite.as_ref().unwrap().alpha, 1.0);
        assert!(ctx.events.contains(&GameEvent::new(EVENT_PHASE, 0.0)));
    }

    fn score_event(score: f32) -> GameEvent {
        GameEvent { kind: EVENT_SCORE, a: score, b: 16.0, c: 0.0 }
    }

    #[test]
    fn play_starts_with_an_empty_score() {
        let (_game, ctx) = started();
        let phase = ctx.events.iter().position(|e| *e == GameEvent::new(EVENT_PHASE, 1.0));
        let score = ctx.events.iter().position(|e| *e == score_event(0.0));
        assert!(phase.is_some());
        assert!(score > phase, "score follows the phase change: {:?}", ctx.events);
    }

    #[test]
    fn first_touch_deals_the_pieces() {
        let (game, ctx) = started();
        assert_eq!(game.engine().unwrap().phase(), GamePhase::Playing);
        assert_eq!(ctx.scene.len(), 17);
        assert!(ctx.events.contains(&GameEvent::new(EVENT_PHASE, 1.0)));

        for (i, piece) in game.engine().unwrap().pieces().iter().enumerate() {
            let e = entity(&ctx, &game, i);
            assert_eq!(e.pos, piece.position);
            assert_eq!(e.sprite.unwrap().texture, TextureId(1 + i as u32));
        }
    }

    #[test]
    fn guide_fades_once_play_starts() {
        let (mut game, mut ctx) = started();
        let alpha = |ctx: &EngineContext| ctx.scene.find_by_tag(GUIDE_TAG).unwrap().sprite.as_ref().unwrap().alpha;

        let fading = alpha(&ctx);
        assert!(fading < 1.0 && fading > GUIDE_ALPHA_PLAYING, "alpha {fading}");

        idle(&mut game, &mut ctx, 20);
        assert!((alpha(&ctx) - GUIDE_ALPHA_PLAYING).abs() < 1e-5);
    }

    #[test]
    fn double_tap_animates_a_quarter_turn() {
        let (mut game, mut ctx) = started();
        let at = game.engine().unwrap().pieces()[PIECE].position;
        let before = entity(&ctx, &game, PIECE).rotation;

        step(&mut game, &mut ctx, &tap(at, 2));
        let logical = game.engine().unwrap().pieces()[PIECE].rotation.radians();
        let mid = entity(&ctx, &game, PIECE).rotation;
        assert!(mid > before && mid < before + std::f32::consts::FRAC_PI_2);

        idle(&mut game, &mut ctx, 20);
        assert!((entity(&ctx, &game, PIECE).rotation - logical).abs() < 1e-4);
    }

    #[test]
    fn snapping_scores_and_plays_success() {
        let (mut game, mut ctx) = started();
        let at = make_upright(&mut game, &mut ctx);
        let slot = game.engine().unwrap().pieces()[PIECE].correct_position;

        step(&mut game, &mut ctx, &drag(at, slot + Vec2::new(12.0, 8.0)));

        assert!(game.engine().unwrap().pieces()[PIECE].is_locked());
        assert_eq!(ctx.sounds, vec![SOUND_SUCCESS]);
        assert!(ctx.events.contains(&score_event(1.0)));
        let e = entity(&ctx, &game, PIECE);
        assert_eq!(e.pos, slot);
        assert_eq!(e.layer, RenderLayer::Placed);
    }

    #[test]
    fn rejected_piece_slides_back_with_wrong_sound() {
        let (mut game, mut ctx) = started();
        let at = make_upright(&mut game, &mut ctx);
        let board_center = game.engine().unwrap().board().frame.center();

        step(&mut game, &mut ctx, &drag(at, board_center));
        assert_eq!(ctx.sounds, vec![SOUND_WRONG]);
        assert_eq!(game.engine().unwrap().pieces()[PIECE].position, at);

        let moving = entity(&ctx, &game, PIECE).pos;
        assert!(moving.distance(at) > 1.0, "still on its way back");

        idle(&mut game, &mut ctx, 20);
        assert!(entity(&ctx, &game, PIECE).pos.distance(at) < 1e-3);
    }

    #[test]
    fn grabbing_a_returning_piece_where_it_is_drawn_stops_the_slide() {
        let (mut game, mut ctx) = started();
        let at = make_upright(&mut game, &mut ctx);
        let board_center = game.engine().unwrap().board().frame.center();

        step(&mut game, &mut ctx, &drag(at, board_center));
        let drawn = entity(&ctx, &game, PIECE).pos;
        assert!(drawn.distance(at) > 100.0);

        step(&mut game, &mut ctx, &[down(drawn, 1)]);
        let engine = game.engine().unwrap();
        assert_eq!(engine.selected(), Some(PIECE));
        assert_eq!(engine.pieces()[PIECE].position, drawn);
        let e = entity(&ctx, &game, PIECE);
        assert_eq!(e.pos, drawn);
        assert_eq!(e.layer, RenderLayer::Held);

        idle(&mut game, &mut ctx, 20);
        assert_eq!(entity(&ctx, &game, PIECE).pos, drawn, "no longer sliding");
    }

    #[test]
    fn destination_of_a_returning_piece_is_empty_until_it_lands() {
        let (mut game, mut ctx) = started();
        let at = make_upright(&mut game, &mut ctx);
        let board_center = game.engine().unwrap().board().frame.center();

        // Inside the tray slot, clear of the neighbouring piece.
        let inside = at + Vec2::new(60.0, 0.0);

        step(&mut game, &mut ctx, &drag(at, board_center));
        step(&mut game, &mut ctx, &tap(inside, 1));
        assert_eq!(game.engine().unwrap().selected(), None);
        assert!(entity(&ctx, &game, PIECE).pos.distance(at) > 1.0, "still sliding");

        idle(&mut game, &mut ctx, 20);
        step(&mut game, &mut ctx, &[down(inside, 1)]);
        assert_eq!(game.engine().unwrap().selected(), Some(PIECE));
    }

    #[test]
    fn missing_image_is_unavailable_until_it_arrives() {
        let mut ctx = EngineContext::new();
        let mut game = ForestJigsaw::new();
        game.init(&mut ctx);

        assert!(game.engine().is_none());
        assert!(game.unavailable_reason().unwrap().contains("forest"));
        assert!(ctx.events.contains(&GameEvent::new(EVENT_UNAVAILABLE, 0.0)));
        assert!(ctx.scene.is_empty());

        step(&mut game, &mut ctx, &[down(Vec2::ZERO, 1)]);
        assert!(game.engine().is_none());

        ctx.images.insert_decoded("forest", DynamicImage::new_rgba8(760, 700));
        step(&mut game, &mut ctx, &[]);
        assert_eq!(game.engine().unwrap().phase(), GamePhase::Start);
        assert_eq!(ctx.textures.len(), 17);
    }

    #[test]
    fn restart_event_deals_again() {
        let (mut game, mut ctx) = started();
        let revision = ctx.textures.revision();
        step(
            &mut game,
            &mut ctx,
            &[InputEvent::Custom { kind: CUSTOM_RESTART, a: 0.0, b: 0.0, c: 0.0 }],
        );

        let engine = game.engine().unwrap();
        assert_eq!(engine.phase(), GamePhase::Start);
        assert_eq!(engine.score(), 0);
        assert_eq!(ctx.scene.len(), 1, "only the guide remains");
        assert!(ctx.textures.revision() > revision);
        assert!(ctx.sounds.is_empty());
        assert!(ctx.events.contains(&score_event(0.0)));
        let guide = ctx.scene.find_by_tag(GUIDE_TAG).unwrap();
        assert_eq!(guide.sprite.as_ref().unwrap().alpha, 1.0);
    }

    #[test]
    fn sound_names() {
        let game = ForestJigsaw::new();
        assert_eq!(game.sound_name(SOUND_SUCCESS), Some("success_sound"));
        assert_eq!(game.sound_name(SOUND_WRONG), Some("wrong_sound"));
        assert_eq!(game.sound_name(SOUND_APPLAUSE), Some("applause_sound"));
        assert_eq!(game.sound_name(SoundEvent(42)), None);
    }
}
