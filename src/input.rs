//! Player input events and their judgements
//!
//! Device polling and key bindings belong to the front end; the engine only
//! sees "lane N went down/up".

use serde::Serialize;

use crate::lanes::Lane;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaneInput {
    pub lane: Lane,
    pub pressed: bool,
}

impl LaneInput {
    pub fn press(lane: Lane) -> Self {
        LaneInput {
            lane,
            pressed: true,
        }
    }

    pub fn release(lane: Lane) -> Self {
        LaneInput {
            lane,
            pressed: false,
        }
    }
}

/// Outcome of a lane press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Judgement {
    /// The arrow at this index in the song started playing.
    Hit { arrow: usize },
    /// Some arrow was playable, but not in the pressed lane.
    WrongLane,
    /// Nothing was playable at all.
    Empty,
}

impl Judgement {
    pub fn is_hit(&self) -> bool {
        matches!(self, Judgement::Hit { .. })
    }
}
