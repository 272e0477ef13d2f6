//! Decoded MIDI data
//!
//! These types hold what the parser read from the file, in seconds. They are
//! immutable once parsing is done; frame timing lives on
//! [`Note`](crate::playback::Note).

use serde::Serialize;

/// The channel General MIDI reserves for percussion (channel 10, zero-based).
pub const DRUM_CHANNEL: u8 = 9;

/// A note as written in the file.
///
/// # Fields
/// - `pitch`: MIDI key number (60 = middle C)
/// - `start` / `end`: seconds from the start of the file, tempo map applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawNote {
    pub pitch: u8,
    pub velocity: u8,
    pub start: f64,
    pub end: f64,
}

impl RawNote {
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// One voice of the composition: the notes a single track played with a
/// single program on a single channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub program: u8,
    pub is_drum: bool,
    /// Index of the SMF track the notes came from.
    pub track: usize,
    /// Channel the notes were written on. Playback channels are reassigned.
    pub source_channel: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub notes: Vec<RawNote>,
}

impl Instrument {
    pub fn new(program: u8, source_channel: u8, track: usize) -> Self {
        Instrument {
            program,
            is_drum: source_channel == DRUM_CHANNEL,
            track,
            source_channel,
            name: None,
            notes: Vec::new(),
        }
    }

    /// Builder used when assembling instruments by hand.
    pub fn with_notes(mut self, notes: Vec<RawNote>) -> Self {
        self.notes = notes;
        self
    }
}
