/// Frame counter of a song.
///
/// `frame` follows the stage's frame count; `start_frame` is captured when
/// playback starts, so `song_frame()` is 0 on the frame `play()` was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackClock {
    frame: i64,
    start_frame: i64,
    playing: bool,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, frame: i64) {
        self.frame = frame;
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.start_frame = self.frame;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn frame(&self) -> i64 {
        self.frame
    }

    pub fn start_frame(&self) -> i64 {
        self.start_frame
    }

    /// Frames since `play()`. Never negative while playing.
    pub fn song_frame(&self) -> i64 {
        (self.frame - self.start_frame).max(0)
    }
}
