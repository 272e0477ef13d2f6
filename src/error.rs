//! # Error Types
//!
//! This module defines all error types for the Arrow Rush engine.
//!
//! Every error that comes from a file carries the path it was read from, so a
//! level list or a command line tool can tell the player which track is broken.
//!
//! ## Error Types
//! - `ParseError` - Malformed MIDI data or track definition syntax
//! - `LoadError` - Missing files or definitions that cannot be satisfied
//! - `InvalidDifficulty` - Difficulty index outside the track's level list
//! - `InvalidInstrument` - Instrument index outside a MIDI file's instruments
//! - `ConfigError` - Invalid engine configuration
//!
//! ## Usage
//! ```rust,no_run
//! use arrow_rush::{EngineConfig, RushError, SilentOutput, Stage};
//!
//! let mut stage = Stage::new(EngineConfig::default(), SilentOutput);
//! match stage.load("songs/tetris.json", 0) {
//!     Ok(()) => stage.play(),
//!     Err(RushError::InvalidDifficulty { index, available }) => {
//!         eprintln!("Level {} does not exist ({} available)", index, available);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RushError {
    /// File contents could not be decoded.
    ///
    /// Occurs when a MIDI file is not a valid Standard MIDI File or a track
    /// definition is not valid JSON/YAML.
    ///
    /// # Example
    /// ```
    /// # use arrow_rush::RushError;
    /// let err = RushError::ParseError {
    ///     path: "song.mid".into(),
    ///     message: "invalid header".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error in song.mid: invalid header");
    /// ```
    #[error("Parse error in {}: {message}", path.display())]
    ParseError { path: PathBuf, message: String },

    /// A track could not be loaded.
    ///
    /// Occurs when a file is missing or unreadable, or when a definition refers
    /// to data the MIDI file does not have.
    #[error("Failed to load {}: {message}", path.display())]
    LoadError { path: PathBuf, message: String },

    /// The requested difficulty does not exist in the track definition.
    ///
    /// # Example
    /// ```
    /// # use arrow_rush::RushError;
    /// let err = RushError::InvalidDifficulty { index: 3, available: 2 };
    /// assert_eq!(err.to_string(), "Invalid difficulty 3 (track has 2 levels)");
    /// ```
    #[error("Invalid difficulty {index} (track has {available} levels)")]
    InvalidDifficulty { index: usize, available: usize },

    /// A level selects an instrument the MIDI data does not have.
    ///
    /// Raised by [`MidiSource::instruments_by_index`](crate::MidiSource::instruments_by_index)
    /// and [`Song::from_source`](crate::Song::from_source); loading a track
    /// from disk reports it as a `LoadError` naming the definition file.
    #[error("Invalid instrument {index} (MIDI data has {available} instruments)")]
    InvalidInstrument { index: usize, available: usize },

    /// Invalid engine configuration.
    #[error("Invalid config: {0}")]
    ConfigError(String),
}

impl RushError {
    pub(crate) fn load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        RushError::LoadError {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        RushError::ParseError {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
