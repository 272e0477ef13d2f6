//! # Playback Module
//!
//! Frame-stepped note scheduling.
//!
//! ## Purpose
//! The game runs one update per rendered frame. Every note is advanced with
//! the song-relative frame number and decides by itself when its note-on and
//! note-off go out, so a song with any number of simultaneous notes and
//! instruments needs no central event queue.
//!
//! ## Key Types
//! - [`Note`] - One note in frame units, with `played` / `finished` state
//! - [`PlaybackClock`] - Stage frame to song frame conversion
//!
//! ## Example
//! ```rust
//! use arrow_rush::playback::Note;
//! use arrow_rush::RecordingOutput;
//!
//! let mut output = RecordingOutput::new();
//! let mut note = Note::new(10, 5, 60, 100, 0);
//!
//! for frame in 0..20 {
//!     note.update(frame, &mut output);
//! }
//!
//! assert!(note.finished());
//! assert_eq!(output.note_ons().count(), 1);
//! assert_eq!(output.note_offs().count(), 1);
//! ```
//!
//! ## Timing
//! - Note-on: first frame strictly after `time`
//! - Note-off: first frame at or after `time + duration`; a late note-off is
//!   logged as a warning but still sent
//! - Rewind: a frame before `time` silences the note and clears its state

mod clock;
mod note;


pub use clock::PlaybackClock;
pub use note::Note;
