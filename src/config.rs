//! Engine configuration
//!
//! All gameplay and layout constants live in [`EngineConfig`]. The defaults
//! match a 1280x720 window; a YAML file can override any subset:
//!
//! ```rust
//! use arrow_rush::EngineConfig;
//!
//! let config = EngineConfig::from_yaml_str("fall_speed: 8\nintro_seconds: 2.0\n").unwrap();
//! assert_eq!(config.fall_speed, 8);
//! assert_eq!(config.play_range, 75);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RushError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Frames per second of the update loop; also the seconds-to-frames factor.
    pub frame_rate: u32,
    /// Pixels an arrow travels per frame.
    pub fall_speed: i32,
    /// Height of the hit window around the target line, in pixels.
    pub play_range: i32,
    /// Extra pixels an arrow grows by at the peak of its pulse.
    pub enlarge_size: i32,
    /// Lead-in before the first note.
    pub intro_seconds: f64,
    pub area_width: i32,
    pub area_height: i32,
    pub arrow_size: i32,
    /// Y coordinate of the receptor row arrows travel towards.
    pub target_line: i32,
    pub glow_size: i32,
    /// Arrows below this line are invisible.
    pub fade_in_line: i32,
    pub fade_in_step: i32,
    pub fade_in_cap: i32,
    pub fade_out_step: i32,
    /// Glow fade lost per frame after a lane is released.
    pub glow_fade_step: f32,
    pub hit_reward: i64,
    pub miss_penalty: i64,
    /// Frames the score counter takes to cover its remaining distance.
    pub score_smoothing: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            frame_rate: 60,
            fall_speed: 5,
            play_range: 75,
            enlarge_size: 20,
            intro_seconds: 3.0,
            area_width: 450,
            area_height: 720,
            arrow_size: 75,
            target_line: 200,
            glow_size: 13,
            fade_in_line: 600,
            fade_in_step: 16,
            fade_in_cap: 230,
            fade_out_step: 25,
            glow_fade_step: 0.05,
            hit_reward: 25,
            miss_penalty: 100,
            score_smoothing: 60,
        }
    }
}

impl EngineConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, RushError> {
        let config: EngineConfig =
            serde_yaml::from_str(source).map_err(|e| RushError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RushError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| RushError::load(path, e))?;
        Self::from_yaml_str(&source)
    }

    pub fn validate(&self) -> Result<(), RushError> {
        let positive = [
            ("frame_rate", self.frame_rate as i64),
            ("fall_speed", self.fall_speed as i64),
            ("play_range", self.play_range as i64),
            ("arrow_size", self.arrow_size as i64),
            ("area_width", self.area_width as i64),
            ("score_smoothing", self.score_smoothing as i64),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(RushError::ConfigError(format!(
                    "{} must be positive (got {})",
                    name, value
                )));
            }
        }
        if !(self.glow_fade_step > 0.0 && self.glow_fade_step <= 1.0) {
            return Err(RushError::ConfigError(format!(
                "glow_fade_step must be in (0, 1] (got {})",
                self.glow_fade_step
            )));
        }
        if !self.intro_seconds.is_finite() || self.intro_seconds < 0.0 {
            return Err(RushError::ConfigError(format!(
                "intro_seconds must be a non-negative number (got {})",
                self.intro_seconds
            )));
        }
        Ok(())
    }

    /// Half of the hit window, truncated like the rest of the pixel maths.
    pub fn half_range(&self) -> i32 {
        self.play_range / 2
    }

    /// Horizontal distance between two lane centres.
    pub fn lane_spacing(&self) -> i32 {
        self.area_width / 4
    }
}
