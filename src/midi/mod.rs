//! # MIDI Module
//!
//! Load a Standard MIDI File into frame-timed notes, grouped by instrument.
//!
//! ## Sub-modules
//! - `types` - Instrument and RawNote, the decoded file contents (seconds)
//! - `parser` - SMF decoding with the tempo map applied
//! - `channels` - Output channel assignment with the percussion channel reserved
//! - `source` - MidiSource, the frame-timed view the game plays from
//!
//! ## Time Conversion
//! ```text
//! frame_time     = round(start_seconds * frame_rate / tempo)
//! frame_duration = round((end_seconds - start_seconds) * frame_rate / tempo)
//! ```
//!
//! ## Example
//! ```rust
//! use arrow_rush::midi::{Instrument, MidiSource, RawNote};
//!
//! let piano = Instrument::new(0, 0, 0).with_notes(vec![
//!     RawNote { pitch: 60, velocity: 100, start: 0.5, end: 1.0 },
//! ]);
//! let mut source = MidiSource::from_instruments(vec![piano], 1.0, 60);
//! source.intro(3.0);
//!
//! assert_eq!(source.notes()[0][0].time, 210);
//! assert_eq!(source.notes()[0][0].duration, 30);
//! ```

mod channels;
mod parser;
mod source;
mod types;

#[cfg(test)]
mod tests;

pub use channels::assign_channels;
pub use parser::parse_instruments;
pub use source::{MidiSource, DEFAULT_FRAME_RATE};
pub use types::{Instrument, RawNote, DRUM_CHANNEL};
