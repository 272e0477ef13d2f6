//! Perfect-play driver
//!
//! Plays a loaded stage without a player: every arrow's lane is pressed on
//! the arrow's start frame and released on the following frame. Used by the
//! command line tool and by tests.

use serde::Serialize;

use crate::lanes::Lane;
use crate::sound::SoundOutput;
use crate::track::{Score, Stage, Tally};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoplayReport {
    /// Stage frames that were run.
    pub frames: i64,
    pub score: i64,
    pub max_streak: u32,
    pub tally: Tally,
}

impl AutoplayReport {
    fn new(frames: i64, score: &Score, tally: &Tally) -> Self {
        AutoplayReport {
            frames,
            score: score.value(),
            max_streak: score.max_streak(),
            tally: *tally,
        }
    }
}

/// Start the stage's song and play it until it finishes or `max_frames`
/// frames have run. The stage should be freshly loaded or reset.
pub fn run<S: SoundOutput>(stage: &mut Stage<S>, max_frames: i64) -> AutoplayReport {
    if stage.song().is_none() {
        log::warn!("autoplay started without a song");
        return AutoplayReport::new(0, stage.score(), stage.tally());
    }

    stage.play();
    let mut held: Vec<Lane> = Vec::new();
    let mut frames = 0;

    for frame in 0..max_frames {
        for lane in held.drain(..) {
            stage.release(lane);
        }
        stage.update(frame);
        frames = frame + 1;

        let due: Vec<Lane> = match stage.song() {
            Some(song) => {
                let song_frame = song.song_frame();
                song.arrows()
                    .iter()
                    .filter(|arrow| {
                        arrow.time() == song_frame && !arrow.is_playing() && !arrow.is_finished()
                    })
                    .map(|arrow| arrow.lane())
                    .collect()
            }
            None => Vec::new(),
        };
        for lane in due {
            let judgement = stage.press(lane);
            if !judgement.is_hit() {
                log::warn!("autoplay press in lane {} was judged {:?}", lane, judgement);
            }
            held.push(lane);
        }

        if stage.is_finished() {
            break;
        }
    }

    for lane in held {
        stage.release(lane);
    }

    let report = AutoplayReport::new(frames, stage.score(), stage.tally());
    log::info!(
        "autoplay finished after {} frames: score {}, max streak {}",
        report.frames,
        report.score,
        report.max_streak
    );
    report
}
