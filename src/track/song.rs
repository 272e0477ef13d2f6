use std::collections::BTreeMap;
use std::path::Path;

use crate::config::EngineConfig;
use crate::error::RushError;
use crate::lanes::{Lane, LaneAssigner};
use crate::midi::{Instrument, MidiSource};
use crate::playback::{Note, PlaybackClock};
use crate::sound::SoundOutput;

use super::arrow::{Arrow, ArrowEvent};
use super::definition::TrackDefinition;
use super::render::Sprite;

/// A loaded track: the player's arrows plus the accompaniment.
///
/// Notes of the instruments selected by the difficulty become arrows, one per
/// distinct start frame, ordered by time. Every other note plays on its own as
/// accompaniment.
#[derive(Debug, Clone)]
pub struct Song {
    name: String,
    artist: String,
    difficulty: usize,
    source: MidiSource,
    playing_instruments: Vec<usize>,
    assigner: LaneAssigner,
    arrows: Vec<Arrow>,
    background: Vec<Note>,
    clock: PlaybackClock,
}

impl Song {
    /// Load a track definition and its MIDI file for one difficulty.
    ///
    /// Notes are delayed by `config.intro_seconds` and every instrument's
    /// program is sent to `output` once the track is known to be valid.
    pub fn load(
        path: impl AsRef<Path>,
        difficulty: usize,
        config: &EngineConfig,
        output: &mut dyn SoundOutput,
    ) -> Result<Song, RushError> {
        let path = path.as_ref();
        let definition = TrackDefinition::load(path)?;
        let level = definition.level(difficulty)?.to_vec();
        let midi_path = definition.midi_path(path);

        let mut source = MidiSource::load_at(&midi_path, definition.tempo, config.frame_rate)?;
        source.intro(config.intro_seconds);
        let available = source.instruments().len();

        let mut song = Song::from_source(source, &level, config).map_err(|e| match e {
            RushError::InvalidInstrument { index, available } => RushError::load(
                path,
                format!(
                    "level {} uses instrument {} but {} has {} instruments",
                    difficulty,
                    index,
                    midi_path.display(),
                    available
                ),
            ),
            other => other,
        })?;
        song.name = definition.name;
        song.artist = definition.artist;
        song.difficulty = difficulty;
        song.source.initialise_player(output);

        log::info!(
            "loaded \"{}\" by {} (difficulty {}): {} arrows, {} instruments, {} playable",
            song.name,
            song.artist,
            difficulty,
            song.arrows.len(),
            available,
            song.playing_instruments.len()
        );
        Ok(song)
    }

    /// Build a song from a MIDI source, playing the instruments at `level`.
    ///
    /// Fails with `InvalidInstrument` for the first index that is not an
    /// instrument of the source.
    pub fn from_source(
        source: MidiSource,
        level: &[usize],
        config: &EngineConfig,
    ) -> Result<Song, RushError> {
        source.instruments_by_index(level)?;

        let mut playing_instruments: Vec<usize> = Vec::new();
        for &index in level {
            if !playing_instruments.contains(&index) {
                playing_instruments.push(index);
            }
        }

        let (assigner, arrows, background) = build(&source, &playing_instruments, config);
        Ok(Song {
            name: "Unknown".to_string(),
            artist: "Unknown".to_string(),
            difficulty: 0,
            source,
            playing_instruments,
            assigner,
            arrows,
            background,
            clock: PlaybackClock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// "NAME | ARTIST", as shown under the playfield.
    pub fn caption(&self) -> String {
        format!("{} | {}", self.name, self.artist).to_uppercase()
    }

    pub fn instruments(&self) -> &[Instrument] {
        self.source.instruments()
    }

    pub fn playing_instruments(&self) -> &[usize] {
        &self.playing_instruments
    }

    pub fn lane_assigner(&self) -> &LaneAssigner {
        &self.assigner
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    /// Accompaniment notes, played without player input.
    pub fn background(&self) -> &[Note] {
        &self.background
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn song_frame(&self) -> i64 {
        self.clock.song_frame()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn play(&mut self) {
        self.clock.play();
    }

    /// Stop the clock and release every sounding note.
    pub fn stop(&mut self, output: &mut dyn SoundOutput) {
        self.clock.stop();
        for note in &mut self.background {
            note.silence(output);
        }
        for arrow in &mut self.arrows {
            arrow.silence(output);
        }
    }

    /// Stop, then rebuild arrows and accompaniment from the MIDI data.
    pub fn restart(&mut self, config: &EngineConfig, output: &mut dyn SoundOutput) {
        self.stop(output);
        let (assigner, arrows, background) = build(&self.source, &self.playing_instruments, config);
        self.assigner = assigner;
        self.arrows = arrows;
        self.background = background;
        self.clock = PlaybackClock::new();
    }

    /// True once every arrow is finished and the accompaniment has ended.
    pub fn is_finished(&self) -> bool {
        self.arrows.iter().all(Arrow::is_finished) && self.background.iter().all(Note::finished)
    }

    /// Advance to stage frame `frame`.
    ///
    /// Accompaniment notes move first, then arrows in order. Returns the
    /// events raised by arrows, with their index.
    pub fn update(
        &mut self,
        frame: i64,
        config: &EngineConfig,
        output: &mut dyn SoundOutput,
    ) -> Vec<(usize, ArrowEvent)> {
        self.clock.tick(frame);
        if !self.clock.is_playing() {
            return Vec::new();
        }
        let song_frame = self.clock.song_frame();

        for note in &mut self.background {
            note.update(song_frame, output);
        }

        self.arrows
            .iter_mut()
            .enumerate()
            .filter_map(|(index, arrow)| {
                arrow
                    .update(song_frame, config, output)
                    .map(|event| (index, event))
            })
            .collect()
    }

    /// Indices of arrows inside the hit window right now, earliest first.
    /// Empty while the song is stopped.
    pub fn playable_arrows(&self, config: &EngineConfig) -> Vec<usize> {
        if !self.clock.is_playing() {
            return Vec::new();
        }
        let song_frame = self.clock.song_frame();
        self.arrows
            .iter()
            .enumerate()
            .filter(|(_, arrow)| arrow.is_playable(song_frame, config))
            .map(|(index, _)| index)
            .collect()
    }

    /// Start the arrow at `index`. False if it was not playable or the song
    /// is stopped.
    pub fn play_arrow(&mut self, index: usize, config: &EngineConfig) -> bool {
        if !self.clock.is_playing() {
            return false;
        }
        let song_frame = self.clock.song_frame();
        match self.arrows.get_mut(index) {
            Some(arrow) if arrow.is_playable(song_frame, config) => arrow.play(),
            _ => false,
        }
    }

    pub fn first_playable_in_lane(&self, lane: Lane, config: &EngineConfig) -> Option<usize> {
        self.playable_arrows(config)
            .into_iter()
            .find(|&index| self.arrows[index].lane() == lane)
    }

    /// Arrow sprites, latest arrow first.
    pub fn sprites(&self, config: &EngineConfig) -> Vec<Sprite> {
        let song_frame = self.clock.song_frame();
        self.arrows
            .iter()
            .rev()
            .filter_map(|arrow| arrow.sprite(song_frame, config))
            .collect()
    }
}

fn build(
    source: &MidiSource,
    playing: &[usize],
    config: &EngineConfig,
) -> (LaneAssigner, Vec<Arrow>, Vec<Note>) {
    let mut chords: BTreeMap<i64, Vec<Note>> = BTreeMap::new();
    let mut background = Vec::new();

    for (index, notes) in source.notes().iter().enumerate() {
        if playing.contains(&index) {
            for note in notes {
                let mut note = note.clone();
                note.reset();
                chords.entry(note.time).or_default().push(note);
            }
        } else {
            background.extend(notes.iter().cloned().map(|mut note| {
                note.reset();
                note
            }));
        }
    }

    let assigner = LaneAssigner::new(chords.values().flatten().map(|note| note.pitch));
    let arrows = chords
        .into_values()
        .filter_map(|notes| {
            let pitches: Vec<u8> = notes.iter().map(|note| note.pitch).collect();
            let lane = assigner.lane_for(&pitches);
            Arrow::new(notes, lane, config)
        })
        .collect();

    (assigner, arrows, background)
}
