use std::fs;
use std::path::Path;

use crate::error::RushError;
use crate::playback::Note;
use crate::sound::SoundOutput;

use super::channels::assign_channels;
use super::parser::parse_instruments;
use super::types::Instrument;

/// Frame rate used by [`MidiSource::load`].
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// A parsed MIDI file converted to frame-timed notes.
///
/// Instruments, channels and notes are parallel: `notes()[i]` and
/// `channels()[i]` belong to `instruments()[i]`.
#[derive(Debug, Clone)]
pub struct MidiSource {
    instruments: Vec<Instrument>,
    channels: Vec<u8>,
    notes: Vec<Vec<Note>>,
    frame_rate: u32,
}

impl MidiSource {
    /// Load a MIDI file at the default 60 frames per second.
    ///
    /// `tempo` scales playback speed: 2.0 plays twice as fast.
    pub fn load(path: impl AsRef<Path>, tempo: f64) -> Result<Self, RushError> {
        Self::load_at(path, tempo, DEFAULT_FRAME_RATE)
    }

    pub fn load_at(path: impl AsRef<Path>, tempo: f64, frame_rate: u32) -> Result<Self, RushError> {
        let path = path.as_ref();
        if !(tempo.is_finite() && tempo > 0.0) {
            return Err(RushError::load(path, format!("tempo must be positive (got {})", tempo)));
        }
        let data = fs::read(path).map_err(|e| RushError::load(path, e))?;
        let instruments = parse_instruments(&data).map_err(|e| RushError::parse(path, e))?;
        Ok(Self::from_instruments(instruments, tempo, frame_rate))
    }

    /// Build a source from already decoded instruments.
    pub fn from_instruments(instruments: Vec<Instrument>, tempo: f64, frame_rate: u32) -> Self {
        let channels = assign_channels(&instruments);
        let scale = frame_rate as f64 / tempo;

        let notes = instruments
            .iter()
            .zip(&channels)
            .map(|(instrument, &channel)| {
                instrument
                    .notes
                    .iter()
                    .map(|raw| {
                        Note::new(
                            (raw.start * scale).round() as i64,
                            (raw.duration() * scale).round() as i64,
                            raw.pitch,
                            raw.velocity,
                            channel,
                        )
                    })
                    .collect()
            })
            .collect();

        MidiSource {
            instruments,
            channels,
            notes,
            frame_rate,
        }
    }

    /// Delay every note by `seconds`, giving the player a lead-in.
    pub fn intro(&mut self, seconds: f64) {
        let offset = (seconds * self.frame_rate as f64).round() as i64;
        for note in self.notes.iter_mut().flatten() {
            note.time += offset;
        }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn channels(&self) -> &[u8] {
        &self.channels
    }

    pub fn notes(&self) -> &[Vec<Note>] {
        &self.notes
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Instruments at the given positions, in the order asked for.
    ///
    /// Fails with the first index that is out of range.
    pub fn instruments_by_index(&self, indices: &[usize]) -> Result<Vec<&Instrument>, RushError> {
        indices
            .iter()
            .map(|&index| {
                self.instruments
                    .get(index)
                    .ok_or(RushError::InvalidInstrument {
                        index,
                        available: self.instruments.len(),
                    })
            })
            .collect()
    }

    /// Send each instrument's program to its channel.
    pub fn initialise_player(&self, output: &mut dyn SoundOutput) {
        for (instrument, &channel) in self.instruments.iter().zip(&self.channels) {
            output.set_instrument(instrument.program, channel);
        }
    }
}
