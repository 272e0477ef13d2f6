use serde::Serialize;

/// Score, streak and the animated score counter.
///
/// `value()` is the judged score; `displayed()` follows it smoothly, covering
/// `1 / smoothing` of the remaining distance each frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    target: i64,
    displayed: f64,
    streak: u32,
    max_streak: u32,
    #[serde(skip)]
    smoothing: f64,
}

impl Score {
    pub fn new(smoothing: u32) -> Self {
        Score {
            target: 0,
            displayed: 0.0,
            streak: 0,
            max_streak: 0,
            smoothing: smoothing.max(1) as f64,
        }
    }

    pub fn value(&self) -> i64 {
        self.target
    }

    pub fn displayed(&self) -> i64 {
        self.displayed as i64
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn max_streak(&self) -> u32 {
        self.max_streak
    }

    pub fn add(&mut self, delta: i64) {
        self.target += delta;
    }

    /// One more consecutive hit.
    pub fn hit(&mut self) {
        self.streak += 1;
        self.max_streak = self.max_streak.max(self.streak);
    }

    pub fn break_streak(&mut self) {
        self.streak = 0;
    }

    /// Move the displayed value one frame towards the score.
    pub fn update(&mut self) {
        let target = self.target as f64;
        if self.displayed == target {
            return;
        }
        self.displayed += (target - self.displayed) / self.smoothing;
        if (self.displayed - target).abs() < 0.1 {
            self.displayed = target;
        }
    }
}

/// How the player's presses and the arrows they missed were judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub hits: u32,
    /// Presses while arrows were playable, but none in the pressed lane.
    pub wrong_lane: u32,
    /// Presses with nothing playable anywhere.
    pub empty: u32,
    /// Arrows that passed the hit window unplayed.
    pub missed: u32,
}
