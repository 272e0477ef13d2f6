//! Per-note scheduling
//!
//! A [`Note`] is advanced once per frame with the song-relative frame number
//! and forwards its note-on and note-off to a [`SoundOutput`].

use serde::Serialize;

use crate::sound::SoundOutput;

/// A note in frame units with its playback state.
///
/// # Fields
/// - `time`: start offset in frames from the beginning of the song
/// - `duration`: length in frames
/// - `pitch`, `velocity`, `channel`: forwarded to the sound output as-is
///
/// # State
/// `played` turns true on the first update after `time`; `finished` turns
/// true when the note-off has been sent. Moving the frame back before `time`
/// clears both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub time: i64,
    pub duration: i64,
    pub pitch: u8,
    pub velocity: u8,
    pub channel: u8,
    played: bool,
    finished: bool,
    /// Frame the note-on went out on.
    #[serde(skip)]
    on_frame: Option<i64>,
}

impl Note {
    pub fn new(time: i64, duration: i64, pitch: u8, velocity: u8, channel: u8) -> Self {
        Note {
            time,
            duration: duration.max(0),
            pitch,
            velocity,
            channel,
            played: false,
            finished: false,
            on_frame: None,
        }
    }

    pub fn played(&self) -> bool {
        self.played
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn end_time(&self) -> i64 {
        self.time + self.duration
    }

    /// Whether a note-on went out without its note-off yet.
    pub fn is_sounding(&self) -> bool {
        self.played && !self.finished
    }

    /// Advance to `frame`.
    ///
    /// For gap-free increasing frames this sends exactly one note-on (on the
    /// first frame after `time`) and one note-off (on `end_time`, or the same
    /// frame as the note-on for notes shorter than a frame).
    pub fn update(&mut self, frame: i64, output: &mut dyn SoundOutput) {
        if frame < self.time {
            if self.is_sounding() {
                self.silence(output);
            }
            self.played = false;
            self.finished = false;
            self.on_frame = None;
            return;
        }

        if frame > self.time && !self.played {
            output.note_on(self.pitch, self.velocity, self.channel);
            self.played = true;
            self.on_frame = Some(frame);
        }

        if self.is_sounding() && frame >= self.end_time() {
            let late = frame > self.end_time() && self.on_frame.map_or(false, |on| on < frame);
            if late {
                log::warn!(
                    "note {} on channel {} ended at frame {} but was stopped at frame {}",
                    self.pitch,
                    self.channel,
                    self.end_time(),
                    frame
                );
            }
            output.note_off(self.pitch, self.velocity, self.channel);
            self.finished = true;
        }
    }

    /// Send the pending note-off of a sounding note and mark it finished.
    pub fn silence(&mut self, output: &mut dyn SoundOutput) {
        if self.is_sounding() {
            output.note_off(self.pitch, self.velocity, self.channel);
            self.finished = true;
        }
    }

    /// Forget all playback state without touching the output.
    pub fn reset(&mut self) {
        self.played = false;
        self.finished = false;
        self.on_frame = None;
    }
}
