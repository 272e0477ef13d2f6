pub mod autoplay;
pub mod catalog;
pub mod config;
pub mod error;
pub mod input;
pub mod lanes;
pub mod midi;
pub mod playback;
pub mod sound;
pub mod track;

pub use catalog::{Catalog, CatalogEntry};
pub use config::EngineConfig;
pub use error::*;
pub use input::{Judgement, LaneInput};
pub use lanes::{Lane, LaneAssigner};
pub use midi::MidiSource;
pub use sound::{LogOutput, RecordingOutput, SilentOutput, SoundEvent, SoundOutput};
pub use track::{Song, Stage, TrackDefinition};

/// Load a track definition at one difficulty into a new stage.
/// This is the main entry point for front ends.
pub fn open<S: SoundOutput>(
    config: EngineConfig,
    output: S,
    path: impl AsRef<std::path::Path>,
    difficulty: usize,
) -> Result<Stage<S>, RushError> {
    config.validate()?;
    let mut stage = Stage::new(config, output);
    stage.load(path, difficulty)?;
    Ok(stage)
}
