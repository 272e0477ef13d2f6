//! Track definition files
//!
//! A track definition names a song, points at its MIDI file and lists which
//! instruments the player plays on each difficulty:
//!
//! ```json
//! {
//!     "name": "Korobeiniki",
//!     "artist": "Traditional",
//!     "midi": "tetris.mid",
//!     "tempo": 1.2,
//!     "levels": [[0], [0, 1], [0, 1, 2]]
//! }
//! ```
//!
//! JSON is the native format; files ending in `.yaml` or `.yml` are read as
//! YAML with the same fields.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::RushError;

fn unknown() -> String {
    "Unknown".to_string()
}

fn default_tempo() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackDefinition {
    #[serde(default = "unknown")]
    pub name: String,
    #[serde(default = "unknown")]
    pub artist: String,
    /// MIDI file, relative to the definition file.
    pub midi: String,
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// Instrument indices played on each difficulty, easiest first.
    pub levels: Vec<Vec<usize>>,
}

impl TrackDefinition {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RushError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| RushError::load(path, e))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let definition = if is_yaml {
            Self::from_yaml_str(&source)
        } else {
            Self::from_json_str(&source)
        }
        .map_err(|message| RushError::parse(path, message))?;

        definition.validate(path)?;
        Ok(definition)
    }

    pub fn from_json_str(source: &str) -> Result<Self, String> {
        serde_json::from_str(source).map_err(|e| e.to_string())
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, String> {
        serde_yaml::from_str(source).map_err(|e| e.to_string())
    }

    fn validate(&self, path: &Path) -> Result<(), RushError> {
        if self.midi.trim().is_empty() {
            return Err(RushError::load(path, "no midi file given"));
        }
        if !(self.tempo.is_finite() && self.tempo > 0.0) {
            return Err(RushError::load(
                path,
                format!("tempo must be positive (got {})", self.tempo),
            ));
        }
        if self.levels.is_empty() {
            return Err(RushError::load(path, "no levels defined"));
        }
        Ok(())
    }

    /// Location of the MIDI file for a definition read from `definition_path`.
    pub fn midi_path(&self, definition_path: impl AsRef<Path>) -> PathBuf {
        match definition_path.as_ref().parent() {
            Some(dir) => dir.join(&self.midi),
            None => PathBuf::from(&self.midi),
        }
    }

    /// Instrument selection for a difficulty.
    pub fn level(&self, difficulty: usize) -> Result<&[usize], RushError> {
        self.levels
            .get(difficulty)
            .map(Vec::as_slice)
            .ok_or(RushError::InvalidDifficulty {
                index: difficulty,
                available: self.levels.len(),
            })
    }
}
