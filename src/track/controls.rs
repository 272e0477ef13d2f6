//! Lane highlight feedback
//!
//! Pressing a lane lights its receptor; releasing it fades the light out over
//! a few frames. Each lane fades on its own.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::lanes::Lane;

use super::render::{lane_x, AssetKey, GlowOverlay, Sprite};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "level", rename_all = "camelCase")]
pub enum GlowState {
    Idle,
    Lit,
    /// Released; the level drops from 1 to 0.
    Fading(f32),
}

#[derive(Debug, Clone)]
pub struct Controls {
    states: [GlowState; Lane::COUNT],
    alphas: [Option<u8>; Lane::COUNT],
    fade_step: f32,
}

impl Controls {
    pub fn new(config: &EngineConfig) -> Self {
        Controls {
            states: [GlowState::Idle; Lane::COUNT],
            alphas: [None; Lane::COUNT],
            fade_step: config.glow_fade_step,
        }
    }

    /// Light a lane, cancelling any fade in progress.
    pub fn glow(&mut self, lane: Lane) {
        self.states[lane.index()] = GlowState::Lit;
    }

    /// Start fading a lit lane.
    pub fn stop_glow(&mut self, lane: Lane) {
        let state = &mut self.states[lane.index()];
        if *state == GlowState::Lit {
            *state = GlowState::Fading(1.0);
        }
    }

    pub fn state(&self, lane: Lane) -> GlowState {
        self.states[lane.index()]
    }

    /// Glow alpha computed by the last update, `None` when the lane is dark.
    pub fn glow_alpha(&self, lane: Lane) -> Option<u8> {
        self.alphas[lane.index()]
    }

    /// Advance fades and recompute the pulsing alpha for `frame`.
    pub fn update(&mut self, frame: i64) {
        let pulse = 160.0 + ((0.5 * frame as f64).sin() + 1.0) * 30.0;

        for (state, alpha) in self.states.iter_mut().zip(self.alphas.iter_mut()) {
            *alpha = match *state {
                GlowState::Idle => None,
                GlowState::Lit => Some(pulse as u8),
                GlowState::Fading(level) => {
                    let level = level - self.fade_step;
                    if level <= 0.0 {
                        *state = GlowState::Idle;
                        None
                    } else {
                        *state = GlowState::Fading(level);
                        Some((pulse * level as f64) as u8)
                    }
                }
            };
        }
    }

    pub fn receptors(&self, config: &EngineConfig) -> Vec<Sprite> {
        Lane::ALL
            .iter()
            .map(|&lane| Sprite {
                asset: AssetKey::Receptor(lane),
                x: lane_x(config, lane),
                y: config.target_line,
                width: config.arrow_size,
                height: config.arrow_size,
                opacity: 255,
            })
            .collect()
    }

    pub fn glows(&self, config: &EngineConfig) -> Vec<GlowOverlay> {
        let size = config.arrow_size + config.glow_size;
        let offset = config.glow_size / 2;
        Lane::ALL
            .iter()
            .filter_map(|&lane| {
                let alpha = self.glow_alpha(lane)?;
                Some(GlowOverlay {
                    lane,
                    sprite: Sprite {
                        asset: AssetKey::Glow(lane),
                        x: lane_x(config, lane) - offset,
                        y: config.target_line - offset,
                        width: size,
                        height: size,
                        opacity: alpha,
                    },
                })
            })
            .collect()
    }
}
