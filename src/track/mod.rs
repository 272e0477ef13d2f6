//! # Track Module
//!
//! The playable side of the engine: arrows falling towards the receptor row,
//! the lanes lighting up under the player's presses and the score.
//!
//! ## Sub-modules
//! - `definition` - Track definition files (song name, MIDI path, levels)
//! - `arrow` - One chord as a falling arrow with its hit window
//! - `song` - Arrows and accompaniment built from a MIDI source
//! - `controls` - Lane glow feedback
//! - `score` - Score, streak and the animated counter
//! - `render` - Sprites, frames and the asset table
//! - `stage` - Ties everything together behind one frame loop
//!
//! ## Example
//! ```rust
//! use arrow_rush::midi::{Instrument, MidiSource, RawNote};
//! use arrow_rush::track::{Song, Stage};
//! use arrow_rush::{EngineConfig, Judgement, RecordingOutput};
//!
//! let config = EngineConfig::default();
//! let lead = Instrument::new(0, 0, 0).with_notes(vec![
//!     RawNote { pitch: 60, velocity: 100, start: 1.0, end: 1.5 },
//! ]);
//! let source = MidiSource::from_instruments(vec![lead], 1.0, config.frame_rate);
//! let song = Song::from_source(source, &[0], &config).unwrap();
//!
//! let mut stage = Stage::new(config, RecordingOutput::new());
//! stage.set_song(song);
//! stage.play();
//!
//! for frame in 0..=60 {
//!     stage.update(frame);
//! }
//! let lane = stage.song().unwrap().arrows()[0].lane();
//! assert_eq!(stage.press(lane), Judgement::Hit { arrow: 0 });
//! assert_eq!(stage.score().value(), 25);
//! ```
//!
//! ## Judging a press
//! | Situation                               | Score           | Streak |
//! |-----------------------------------------|-----------------|--------|
//! | playable arrow in the pressed lane      | `+hit_reward`   | +1     |
//! | arrows playable, none in the lane       | unchanged       | reset  |
//! | nothing playable anywhere               | `-miss_penalty` | reset  |
//! | arrow leaves the window unplayed        | unchanged       | reset  |

mod arrow;
mod controls;
mod definition;
mod render;
mod score;
mod song;
mod stage;


pub use arrow::{Arrow, ArrowEvent};
pub use controls::{Controls, GlowState};
pub use definition::TrackDefinition;
pub use render::{lane_x, AssetInfo, AssetKey, AssetTable, Frame, GlowOverlay, Sprite, Surface};
pub use score::{Score, Tally};
pub use song::Song;
pub use stage::Stage;
