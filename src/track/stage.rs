use std::path::Path;

use crate::config::EngineConfig;
use crate::error::RushError;
use crate::input::{Judgement, LaneInput};
use crate::lanes::Lane;
use crate::sound::SoundOutput;

use super::arrow::ArrowEvent;
use super::controls::Controls;
use super::render::{AssetTable, Frame};
use super::score::{Score, Tally};
use super::song::Song;

/// The game screen: playfield, song, score and input handling.
///
/// # Frame loop
/// ```text
/// stage.handle_input(..)   // for each input event
/// stage.update(frame)      // once per frame
/// stage.render()           // once per frame, after update
/// ```
///
/// Within `update` the order is fixed: lane glows, accompaniment notes,
/// arrows (which drive their own notes), arrow events, score counter.
pub struct Stage<S: SoundOutput> {
    config: EngineConfig,
    output: S,
    assets: AssetTable,
    controls: Controls,
    song: Option<Song>,
    score: Score,
    tally: Tally,
    starting_frame: Option<i64>,
}

impl<S: SoundOutput> Stage<S> {
    pub fn new(config: EngineConfig, output: S) -> Self {
        Stage {
            assets: AssetTable::new(&config),
            controls: Controls::new(&config),
            score: Score::new(config.score_smoothing),
            tally: Tally::default(),
            song: None,
            starting_frame: None,
            config,
            output,
        }
    }

    /// Load a track definition for one difficulty, replacing the current song.
    ///
    /// On error nothing changes.
    pub fn load(&mut self, path: impl AsRef<Path>, difficulty: usize) -> Result<(), RushError> {
        let song = Song::load(path, difficulty, &self.config, &mut self.output)?;
        self.set_song(song);
        Ok(())
    }

    /// Install an already built song, replacing the current one.
    pub fn set_song(&mut self, song: Song) {
        self.reset();
        self.song = Some(song);
    }

    /// Start the loaded song on the next update.
    pub fn play(&mut self) {
        if let Some(song) = &mut self.song {
            song.play();
        }
    }

    /// Stop playback, release all sounding notes and drop the song.
    pub fn reset(&mut self) {
        if let Some(song) = &mut self.song {
            song.stop(&mut self.output);
        }
        self.song = None;
        self.clear_state();
    }

    /// Rewind the current song to its initial state, keeping it loaded.
    pub fn restart(&mut self) {
        if let Some(song) = &mut self.song {
            song.restart(&self.config, &mut self.output);
        }
        self.clear_state();
    }

    fn clear_state(&mut self) {
        self.controls = Controls::new(&self.config);
        self.score = Score::new(self.config.score_smoothing);
        self.tally = Tally::default();
        self.starting_frame = None;
    }

    /// Advance to global frame `frame`. The first call after a load or reset
    /// becomes frame 0 of the stage.
    pub fn update(&mut self, frame: i64) {
        let start = *self.starting_frame.get_or_insert(frame);
        let frame = frame - start;

        self.controls.update(frame);

        if let Some(song) = &mut self.song {
            let events = song.update(frame, &self.config, &mut self.output);
            for (_, event) in events {
                match event {
                    ArrowEvent::Missed { lane } => {
                        log::debug!("missed arrow in lane {}", lane);
                        self.score.break_streak();
                        self.tally.missed += 1;
                    }
                    ArrowEvent::Completed { lane } => self.controls.stop_glow(lane),
                }
            }
        }

        self.score.update();
    }

    pub fn handle_input(&mut self, input: LaneInput) -> Option<Judgement> {
        if input.pressed {
            Some(self.press(input.lane))
        } else {
            self.release(input.lane);
            None
        }
    }

    /// Judge a press in `lane`.
    ///
    /// The earliest playable arrow in the lane is played. A press with nothing
    /// playable anywhere costs `miss_penalty`; any press that plays nothing
    /// breaks the streak. The lane lights up either way.
    pub fn press(&mut self, lane: Lane) -> Judgement {
        let playable = self
            .song
            .as_ref()
            .map(|song| song.playable_arrows(&self.config))
            .unwrap_or_default();

        let target = self.song.as_ref().and_then(|song| {
            playable
                .iter()
                .copied()
                .find(|&index| song.arrows()[index].lane() == lane)
        });

        let judgement = match (playable.is_empty(), target) {
            (true, _) => {
                self.score.add(-self.config.miss_penalty);
                self.score.break_streak();
                self.tally.empty += 1;
                Judgement::Empty
            }
            (false, Some(index)) => {
                let played = self
                    .song
                    .as_mut()
                    .map_or(false, |song| song.play_arrow(index, &self.config));
                if played {
                    self.score.add(self.config.hit_reward);
                    self.score.hit();
                    self.tally.hits += 1;
                    Judgement::Hit { arrow: index }
                } else {
                    self.score.break_streak();
                    self.tally.wrong_lane += 1;
                    Judgement::WrongLane
                }
            }
            (false, None) => {
                self.score.break_streak();
                self.tally.wrong_lane += 1;
                Judgement::WrongLane
            }
        };

        log::debug!("press {} -> {:?}", lane, judgement);
        self.controls.glow(lane);
        judgement
    }

    pub fn release(&mut self, lane: Lane) {
        self.controls.stop_glow(lane);
    }

    pub fn render(&self) -> Frame {
        Frame {
            glows: self.controls.glows(&self.config),
            receptors: self.controls.receptors(&self.config),
            arrows: self
                .song
                .as_ref()
                .map(|song| song.sprites(&self.config))
                .unwrap_or_default(),
            caption: self.song.as_ref().map(Song::caption).unwrap_or_default(),
        }
    }

    /// True when a song is loaded and fully played out.
    pub fn is_finished(&self) -> bool {
        self.song.as_ref().map_or(false, Song::is_finished)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn song(&self) -> Option<&Song> {
        self.song.as_ref()
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn output(&self) -> &S {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut S {
        &mut self.output
    }

    pub fn into_output(mut self) -> S {
        if let Some(song) = &mut self.song {
            song.stop(&mut self.output);
        }
        self.output
    }
}
