pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext, RenderContext};
pub use api::types::{EntityId, SoundEvent, GameEvent, TextureId};
pub use components::entity::Entity;
pub use components::layer::RenderLayer;
pub use components::sprite::SpriteComponent;
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use renderer::instance::{RenderInstance, RenderBuffer};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::{AssetManifest, ManifestError};
pub use assets::library::{AssetError, ImageLibrary, ImageSource};
pub use assets::textures::{Texture, TextureStore};
pub use systems::render::build_render_buffer;

// Extensions: decoupled optional systems
pub use extensions::{
    Easing, lerp, lerp_vec2, ease, ease_vec2,
    TweenState, Tween, TweenTarget, TweenChannel,
};
