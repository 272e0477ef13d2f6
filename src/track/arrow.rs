//! Arrow state machine
//!
//! ```text
//!            in window + press           all notes finished
//! Falling ─────────────────────▶ Playing ──────────────────▶ Finished
//!    │
//!    │ below window, never pressed
//!    └─────────────────────────────────────────────────────▶ Finished (missed)
//! ```

use std::f64::consts::PI;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::lanes::Lane;
use crate::playback::Note;
use crate::sound::SoundOutput;

use super::render::{lane_x, AssetKey, Sprite};

/// Frames over which the hit pulse plays at most.
const PULSE_FRAMES: i64 = 40;

/// Something the stage has to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ArrowEvent {
    /// The arrow left the hit window without being played.
    Missed { lane: Lane },
    /// Every note of a played arrow has ended.
    Completed { lane: Lane },
}

/// A chord the player has to hit: one or more notes starting on the same frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    notes: Vec<Note>,
    time: i64,
    duration: i64,
    lane: Lane,
    target: i32,
    opacity: i32,
    playing: bool,
    finished: bool,
}

impl Arrow {
    /// `None` for an empty chord.
    pub fn new(notes: Vec<Note>, lane: Lane, config: &EngineConfig) -> Option<Self> {
        let time = notes.first()?.time;
        let duration = notes.iter().map(|n| n.duration).max().unwrap_or(0);
        Some(Arrow {
            notes,
            time,
            duration,
            lane,
            target: config.target_line,
            opacity: 255,
            playing: false,
            finished: false,
        })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Start frame shared by all notes.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Longest note duration.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn opacity(&self) -> u8 {
        self.opacity.clamp(0, 255) as u8
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn pitches(&self) -> Vec<u8> {
        self.notes.iter().map(|n| n.pitch).collect()
    }

    /// Vertical position: on the target line at `time`, `fall_speed` pixels
    /// further away per frame before it. Pinned to the target while playing.
    pub fn position(&self, song_frame: i64, config: &EngineConfig) -> i64 {
        if self.playing {
            return self.target as i64;
        }
        self.target as i64 + (self.time - song_frame) * config.fall_speed as i64
    }

    /// Whether a press in this arrow's lane would play it now.
    pub fn is_playable(&self, song_frame: i64, config: &EngineConfig) -> bool {
        if self.playing || self.finished {
            return false;
        }
        let y = self.position(song_frame, config);
        let half = config.half_range() as i64;
        let target = self.target as i64;
        target - half < y && y < target + half
    }

    /// Player hit the arrow. Returns false if it was already played or missed.
    pub fn play(&mut self) -> bool {
        if self.playing || self.finished {
            return false;
        }
        self.playing = true;
        true
    }

    /// Advance to `song_frame`.
    ///
    /// A playing arrow drives its notes and completes when all of them have
    /// finished; a falling arrow is missed once it is below the hit window.
    pub fn update(
        &mut self,
        song_frame: i64,
        config: &EngineConfig,
        output: &mut dyn SoundOutput,
    ) -> Option<ArrowEvent> {
        let mut event = None;

        if self.playing {
            for note in &mut self.notes {
                note.update(song_frame, output);
            }
            if !self.finished && self.notes.iter().all(Note::finished) {
                self.finished = true;
                event = Some(ArrowEvent::Completed { lane: self.lane });
            }
        } else if !self.finished {
            let floor = self.target as i64 - config.half_range() as i64;
            if self.position(song_frame, config) < floor {
                self.finished = true;
                event = Some(ArrowEvent::Missed { lane: self.lane });
            }
        }

        self.update_opacity(song_frame, config);
        event
    }

    fn update_opacity(&mut self, song_frame: i64, config: &EngineConfig) {
        if !self.finished {
            let y = self.position(song_frame, config);
            let line = config.fade_in_line as i64;
            if y < line && self.opacity < config.fade_in_cap {
                self.opacity += config.fade_in_step;
            } else if y > line {
                self.opacity = 0;
            }
        } else if song_frame > self.time + self.duration {
            self.opacity -= config.fade_out_step;
        }
        self.opacity = self.opacity.clamp(0, 255);
    }

    /// Stop any note still sounding.
    pub fn silence(&mut self, output: &mut dyn SoundOutput) {
        for note in &mut self.notes {
            note.silence(output);
        }
    }

    /// Pulse progress in 0..=1 while the arrow's notes sound.
    fn pulse(&self, song_frame: i64) -> f64 {
        if !self.playing || song_frame >= self.time + self.duration {
            return 0.0;
        }
        let span = self.duration.min(PULSE_FRAMES).max(1);
        let progress = (song_frame - self.time) as f64 / span as f64;
        if (0.0..=1.0).contains(&progress) {
            progress
        } else {
            0.0
        }
    }

    /// Centre the hit pulse grows around, while there is one.
    pub fn grow_center(&self, song_frame: i64, config: &EngineConfig) -> Option<(i32, i32)> {
        if self.pulse(song_frame) > 0.0 {
            let half = config.arrow_size / 2;
            Some((lane_x(config, self.lane) + half, self.target + half))
        } else {
            None
        }
    }

    /// What to draw for this arrow, if anything.
    pub fn sprite(&self, song_frame: i64, config: &EngineConfig) -> Option<Sprite> {
        let y = self.position(song_frame, config);
        let end = self.time + self.duration;
        let visible = (!self.playing && 0 < y && y < config.area_height as i64)
            || (self.playing && song_frame <= end)
            || (song_frame > end && self.opacity > 0);
        if !visible {
            return None;
        }

        let base = config.arrow_size;
        let (x, y, size) = match self.grow_center(song_frame, config) {
            Some((cx, cy)) => {
                let grow = config.enlarge_size as f64 * (PI * self.pulse(song_frame)).sin();
                let size = base + grow as i32;
                (cx - size / 2, cy - size / 2, size)
            }
            None => (lane_x(config, self.lane), y as i32, base),
        };

        Some(Sprite {
            asset: AssetKey::Arrow(self.lane),
            x,
            y,
            width: size,
            height: size,
            opacity: self.opacity(),
        })
    }
}
