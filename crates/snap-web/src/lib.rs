pub mod audio;
pub mod runner;

pub use audio::{AudioSink, SoundQueue};
pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers,
///   asset loading, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use snap_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// snap_web::export_game!(MyGame, "my-game");
/// ```
///
/// The calling crate depends on `wasm-bindgen`, `js-sys`, `log`,
/// `console_log` and `console_error_panic_hook`.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32, taps: u32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y, taps }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) {
            with_runner(|r| r.load_manifest(json));
        }

        /// False when the loaded manifest does not list `name`.
        #[wasm_bindgen]
        pub fn game_load_image(name: &str, bytes: &[u8]) -> bool {
            with_runner(|r| r.load_image(name, bytes.to_vec()))
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count())
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            with_runner(|r| r.game_events_ptr())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            with_runner(|r| r.game_events_len())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height())
        }

        /// Most recent sound cue since the last call, if any.
        #[wasm_bindgen]
        pub fn get_sound_cue() -> Option<String> {
            with_runner(|r| r.audio_mut().take())
        }

        // ---- Texture accessors ----

        #[wasm_bindgen]
        pub fn get_texture_count() -> u32 {
            with_runner(|r| r.texture_count())
        }

        #[wasm_bindgen]
        pub fn get_texture_revision() -> u32 {
            with_runner(|r| r.texture_revision())
        }

        #[wasm_bindgen]
        pub fn get_texture_width(index: u32) -> u32 {
            with_runner(|r| r.texture_width(index))
        }

        #[wasm_bindgen]
        pub fn get_texture_height(index: u32) -> u32 {
            with_runner(|r| r.texture_height(index))
        }

        #[wasm_bindgen]
        pub fn get_texture_pixels(index: u32) -> js_sys::Uint8Array {
            with_runner(|r| js_sys::Uint8Array::from(r.texture_pixels(index)))
        }
    };
}
