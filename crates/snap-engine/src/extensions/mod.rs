// extensions/mod.rs
//
// Optional extension modules for SnapEngine.
// These are decoupled from core Entity/Scene; games opt in by creating these systems.

pub mod easing;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec2, ease, ease_vec2};
pub use tween::{TweenState, Tween, TweenTarget, TweenChannel};
