use snap_engine::{
    build_render_buffer, AssetManifest, EngineContext, FixedTimestep, Game, GameConfig,
    InputEvent, InputQueue, RenderBuffer, RenderContext, TextureId,
};

use crate::audio::{AudioSink, SoundQueue};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner (see
/// `export_game!`) and exports free functions via `#[wasm_bindgen]`,
/// because wasm-bindgen cannot export generic structs directly.
pub struct GameRunner<G: Game, A: AudioSink = SoundQueue> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    manifest: Option<AssetManifest>,
    audio: A,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        Self::with_audio(game, SoundQueue::new())
    }
}

impl<G: Game, A: AudioSink> GameRunner<G, A> {
    pub fn with_audio(game: G, audio: A) -> Self {
        let config = game.config();
        Self {
            timestep: FixedTimestep::new(config.fixed_dt),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            config,
            manifest: None,
            audio,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.timestep = FixedTimestep::new(self.config.fixed_dt);
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.finish_frame();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Parse and install the asset manifest. A bad manifest is logged and
    /// the previous one kept.
    pub fn load_manifest(&mut self, json: &str) {
        match AssetManifest::from_json(json) {
            Ok(manifest) => {
                log::info!(
                    "asset manifest: {} images, {} sounds",
                    manifest.images.len(),
                    manifest.sounds.len()
                );
                self.manifest = Some(manifest);
            }
            Err(err) => log::error!("{err}"),
        }
    }

    /// Register encoded image bytes under `name`. Returns false when a
    /// loaded manifest does not list the image; it is registered anyway.
    pub fn load_image(&mut self, name: &str, bytes: Vec<u8>) -> bool {
        let listed = self.manifest.as_ref().map_or(true, |m| m.has_image(name));
        if !listed {
            log::warn!("image `{}` is not in the asset manifest", name);
        }
        log::info!("image `{}` registered ({} bytes)", name, bytes.len());
        self.ctx.images.insert_encoded(name, bytes);
        listed
    }

    /// Run one frame tick: update game, build render buffer, dispatch sounds.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        if steps == 0 {
            // Keep queued input for the next frame that actually steps.
            return;
        }

        let idle = InputQueue::new();
        for step in 0..steps {
            let input = if step == 0 { &self.input } else { &idle };
            self.game.update(&mut self.ctx, input);
        }
        self.input.drain();

        self.finish_frame();
    }

    fn finish_frame(&mut self) {
        build_render_buffer(&self.ctx.scene, &mut self.render_buffer, self.config.max_instances);
        {
            let mut render_ctx = RenderContext {
                render_buffer: &mut self.render_buffer,
            };
            self.game.render(&mut render_ctx);
        }
        self.dispatch_sounds();
    }

    fn dispatch_sounds(&mut self) {
        for &sound in self.ctx.sounds.iter().take(self.config.max_sounds) {
            let Some(name) = self.game.sound_name(sound) else {
                log::warn!("sound cue {} has no audio asset", sound.0);
                continue;
            };
            if let Some(manifest) = &self.manifest {
                if !manifest.has_sound(name) {
                    log::warn!("audio asset `{}` missing from manifest, skipped", name);
                    continue;
                }
            }
            self.audio.play(name);
        }
    }

    // ---- Accessors ----

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.config.max_events) as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn texture_count(&self) -> u32 {
        self.ctx.textures.len() as u32
    }

    pub fn texture_revision(&self) -> u32 {
        self.ctx.textures.revision() as u32
    }

    pub fn texture_width(&self, index: u32) -> u32 {
        self.ctx.textures.get(TextureId(index)).map_or(0, |t| t.width)
    }

    pub fn texture_height(&self, index: u32) -> u32 {
        self.ctx.textures.get(TextureId(index)).map_or(0, |t| t.height)
    }

    pub fn texture_pixels(&self, index: u32) -> &[u8] {
        self.ctx
            .textures
            .get(TextureId(index))
            .map(|t| t.pixels.as_slice())
            .unwrap_or(&[])
    }
}
