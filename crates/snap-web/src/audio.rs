/// Playback capability handed to the runner.
///
/// Playback is fire-and-forget: a sink never reports back, and a new cue
/// replaces whatever is currently playing.
pub trait AudioSink {
    fn play(&mut self, name: &str);
}

/// Audio sink for the browser host: remembers the most recent cue of the
/// frame, which the page polls and plays.
#[derive(Debug, Default)]
pub struct SoundQueue {
    latest: Option<String>,
}

impl SoundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending cue, leaving the queue empty.
    pub fn take(&mut self) -> Option<String> {
        self.latest.take()
    }
}

impl AudioSink for SoundQueue {
    fn play(&mut self, name: &str) {
        self.latest = Some(name.to_string());
    }
}
