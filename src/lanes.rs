//! Lanes and pitch-based lane assignment
//!
//! The playfield has four lanes (left, up, down, right). Every arrow goes to
//! the lane of its pitch quartile: the sorted pitches of all notes the player
//! will play are cut at 1/4, 2/4 and 3/4, and an arrow's average pitch is
//! compared against those cut points.

use std::fmt;

use serde::Serialize;

/// One of the four input lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct Lane(u8);

impl Lane {
    pub const COUNT: usize = 4;

    pub const LEFT: Lane = Lane(0);
    pub const UP: Lane = Lane(1);
    pub const DOWN: Lane = Lane(2);
    pub const RIGHT: Lane = Lane(3);

    pub const ALL: [Lane; 4] = [Lane::LEFT, Lane::UP, Lane::DOWN, Lane::RIGHT];

    /// `None` unless `index` is 0..=3.
    pub fn new(index: usize) -> Option<Lane> {
        if index < Self::COUNT {
            Some(Lane(index as u8))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Lowercase direction name, also the stem of the lane's image files.
    pub fn name(self) -> &'static str {
        match self.0 {
            0 => "left",
            1 => "up",
            2 => "down",
            _ => "right",
        }
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> u8 {
        lane.0
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pitch quartile splitter.
#[derive(Debug, Clone, Default)]
pub struct LaneAssigner {
    frequencies: Vec<u8>,
}

impl LaneAssigner {
    /// Build from the pitches of every playable note, in any order.
    pub fn new(pitches: impl IntoIterator<Item = u8>) -> Self {
        let mut frequencies: Vec<u8> = pitches.into_iter().collect();
        frequencies.sort_unstable();
        LaneAssigner { frequencies }
    }

    /// The sorted pitch distribution.
    pub fn frequencies(&self) -> &[u8] {
        &self.frequencies
    }

    /// Lane for a chord with the given pitches.
    ///
    /// The lane starts at 0 and moves right once for every cut point the
    /// average pitch is strictly above, stopping at the first one it is not.
    /// Cut points sit at `step`, `2 * step` and `3 * step` with
    /// `step = (count - 1) / 4`; for fewer than five pitches the step is
    /// raised to 1 and positions are clamped to the last pitch.
    pub fn lane_for(&self, pitches: &[u8]) -> Lane {
        if self.frequencies.is_empty() || pitches.is_empty() {
            return Lane::LEFT;
        }
        let average = pitches.iter().map(|&p| p as f64).sum::<f64>() / pitches.len() as f64;

        let last = self.frequencies.len() - 1;
        let step = (last / 4).max(1);
        let mut lane = 0;
        for cut in 1..Lane::COUNT {
            let threshold = self.frequencies[(cut * step).min(last)];
            if average > threshold as f64 {
                lane += 1;
            } else {
                break;
            }
        }
        Lane(lane as u8)
    }
}
