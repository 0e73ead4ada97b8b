// extensions/tween.rs
//
// Tween system: fire-and-forget transitions of an entity's position,
// rotation or opacity, addressed by EntityId.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(entity_id, Tween::position(from, to, 0.25, Easing::Linear));
//   tweens.tick(dt, &mut scene);  // Advances all tweens, updates entities

use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::easing::{Easing, ease, ease_vec2};

/// What property a tween animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    /// Animate Entity.pos
    Position { from: Vec2, to: Vec2 },
    /// Animate Entity.rotation (radians, not wrapped)
    Rotation { from: f32, to: f32 },
    /// Animate sprite alpha (if sprite exists)
    Alpha { from: f32, to: f32 },
}

impl TweenTarget {
    pub fn channel(&self) -> TweenChannel {
        match self {
            TweenTarget::Position { .. } => TweenChannel::Position,
            TweenTarget::Rotation { .. } => TweenChannel::Rotation,
            TweenTarget::Alpha { .. } => TweenChannel::Alpha,
        }
    }
}

/// The entity property a tween owns while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenChannel {
    Position,
    Rotation,
    Alpha,
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl Tween {
    fn new(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    pub fn position(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { from, to }, duration, easing)
    }

    pub fn rotation(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Rotation { from, to }, duration, easing)
    }

    /// Fade the entity's sprite.
    pub fn alpha(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Alpha { from, to }, duration, easing)
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Manages all active tweens. Tweens run in the order they were added.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: Vec<(EntityId, Tween)>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for an entity. A running tween on the same channel of
    /// the same entity is replaced.
    pub fn add(&mut self, entity: EntityId, tween: Tween) {
        self.cancel(entity, tween.target.channel());
        self.tweens.push((entity, tween));
    }

    /// Stop the tween driving `channel` on `entity`, leaving the property
    /// wherever it currently is.
    pub fn cancel(&mut self, entity: EntityId, channel: TweenChannel) -> bool {
        let before = self.tweens.len();
        self.tweens
            .retain(|(e, tween)| !(*e == entity && tween.target.channel() == channel));
        self.tweens.len() != before
    }

    /// Whether a tween currently drives `channel` on `entity`.
    pub fn animates(&self, entity: EntityId, channel: TweenChannel) -> bool {
        self.tweens
            .iter()
            .any(|(e, tween)| *e == entity && tween.target.channel() == channel)
    }

    /// Advance all tweens and apply them to entities in the scene.
    /// Finished tweens are dropped after their final value is applied.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene) {
        for (entity_id, tween) in self.tweens.iter_mut() {
            tween.elapsed += dt;
            let t = tween.progress();

            let Some(entity) = scene.get_mut(*entity_id) else {
                continue;
            };
            match tween.target {
                TweenTarget::Position { from, to } => {
                    entity.pos = ease_vec2(from, to, t, tween.easing);
                }
                TweenTarget::Rotation { from, to } => {
                    entity.rotation = ease(from, to, t, tween.easing);
                }
                TweenTarget::Alpha { from, to } => {
                    if let Some(sprite) = &mut entity.sprite {
                        sprite.alpha = ease(from, to, t, tween.easing);
                    }
                }
            }
        }
        self.tweens.retain(|(_, tween)| !tween.is_complete());
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entity::Entity;
    use crate::components::sprite::SpriteComponent;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn tween_position() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(1);

        scene.spawn(Entity::new(id).with_pos(Vec2::ZERO));
        tweens.add(id, Tween::position(
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            1.0,
            Easing::Linear,
        ));

        tweens.tick(0.5, &mut scene);
        assert!((scene.get(id).unwrap().pos.x - 50.0).abs() < 0.01);

        tweens.tick(0.5, &mut scene);
        assert!((scene.get(id).unwrap().pos.x - 100.0).abs() < 0.01);
        assert!(tweens.is_empty());
    }

    #[test]
    fn quarter_turn_at_sixty_hertz() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(3);
        scene.spawn(Entity::new(id).with_rotation(FRAC_PI_2));

        tweens.add(id, Tween::rotation(FRAC_PI_2, 2.0 * FRAC_PI_2, 0.25, Easing::Linear));
        for _ in 0..16 {
            tweens.tick(1.0 / 60.0, &mut scene);
        }
        assert!(tweens.is_empty());
        assert!((scene.get(id).unwrap().rotation - 2.0 * FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn channels_are_independent() {
        let mut tweens = TweenState::new();
        let id = EntityId(1);
        tweens.add(id, Tween::position(Vec2::ZERO, Vec2::ONE, 1.0, Easing::Linear));
        tweens.add(id, Tween::rotation(0.0, 1.0, 1.0, Easing::Linear));

        assert!(tweens.animates(id, TweenChannel::Position));
        assert!(tweens.animates(id, TweenChannel::Rotation));
        assert!(!tweens.animates(id, TweenChannel::Alpha));

        assert!(tweens.cancel(id, TweenChannel::Position));
        assert!(!tweens.animates(id, TweenChannel::Position));
        assert!(tweens.animates(id, TweenChannel::Rotation));
    }

    #[test]
    fn adding_on_busy_channel_replaces() {
        let mut tweens = TweenState::new();
        let id = EntityId(1);
        tweens.add(id, Tween::position(Vec2::ZERO, Vec2::ONE, 1.0, Easing::Linear));
        tweens.add(id, Tween::position(Vec2::ONE, Vec2::ZERO, 1.0, Easing::Linear));
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn fade_settles_on_target_alpha() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(2);
        scene.spawn(Entity::new(id).with_sprite(SpriteComponent::default()));

        tweens.add(id, Tween::alpha(1.0, 0.3, 0.5, Easing::SmoothStep));
        tweens.tick(0.25, &mut scene);
        let halfway = scene.get(id).unwrap().sprite.as_ref().unwrap().alpha;
        assert!((halfway - 0.65).abs() < 1e-5);

        tweens.tick(0.25, &mut scene);
        let alpha = scene.get(id).unwrap().sprite.as_ref().unwrap().alpha;
        assert!((alpha - 0.3).abs() < 1e-5);
        assert!(tweens.is_empty());
    }

    #[test]
    fn fade_without_sprite_is_ignored() {
        let mut tweens = TweenState::new();
        let mut scene = Scene::new();
        let id = EntityId(4);
        scene.spawn(Entity::new(id));

        tweens.add(id, Tween::alpha(1.0, 0.0, 0.1, Easing::Linear));
        tweens.tick(0.1, &mut scene);
        assert!(scene.get(id).unwrap().sprite.is_none());
        assert!(tweens.is_empty());
    }
}
