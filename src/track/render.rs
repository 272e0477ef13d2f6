//! Render output
//!
//! The stage does not draw. Once per frame, after `update`, the front end
//! asks for a [`Frame`] and draws it, either by reading the fields or by
//! handing a [`Surface`] to [`Frame::draw_to`].
//!
//! Coordinates are pixels relative to the top-left corner of the arrow area
//! (`area_width` x `area_height`).

use std::collections::HashMap;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::lanes::Lane;

/// Image a sprite shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "lane", rename_all = "camelCase")]
pub enum AssetKey {
    /// Falling arrow.
    Arrow(Lane),
    /// Outline on the target line.
    Receptor(Lane),
    /// Highlight behind a receptor while its lane is pressed.
    Glow(Lane),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetInfo {
    pub file: String,
    pub width: i32,
    pub height: i32,
}

/// Every image the stage refers to, with the size it is drawn at.
///
/// Built once per stage; front ends load and scale each file once, keyed by
/// [`AssetKey`].
#[derive(Debug, Clone)]
pub struct AssetTable {
    entries: HashMap<AssetKey, AssetInfo>,
}

impl AssetTable {
    pub fn new(config: &EngineConfig) -> Self {
        let size = config.arrow_size;
        let glow = config.arrow_size + config.glow_size;
        let mut entries = HashMap::new();
        for lane in Lane::ALL {
            let name = lane.name();
            entries.insert(AssetKey::Arrow(lane), asset(format!("{}.png", name), size));
            entries.insert(AssetKey::Receptor(lane), asset(format!("{}o.png", name), size));
            entries.insert(AssetKey::Glow(lane), asset(format!("{}g.png", name), glow));
        }
        AssetTable { entries }
    }

    pub fn get(&self, key: AssetKey) -> Option<&AssetInfo> {
        self.entries.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssetKey, &AssetInfo)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn asset(file: String, size: i32) -> AssetInfo {
    AssetInfo {
        file,
        width: size,
        height: size,
    }
}

/// Left edge of a lane's arrows.
pub fn lane_x(config: &EngineConfig, lane: Lane) -> i32 {
    let spacing = config.lane_spacing();
    spacing / 2 + lane.index() as i32 * spacing - config.arrow_size / 2
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sprite {
    pub asset: AssetKey,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub opacity: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlowOverlay {
    pub lane: Lane,
    pub sprite: Sprite,
}

/// Everything visible on one frame, in draw order per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub glows: Vec<GlowOverlay>,
    pub receptors: Vec<Sprite>,
    /// Latest arrow first, so earlier arrows are drawn on top.
    pub arrows: Vec<Sprite>,
    pub caption: String,
}

/// Drawing target for [`Frame::draw_to`].
pub trait Surface {
    fn draw_sprite(&mut self, sprite: &Sprite);

    fn draw_caption(&mut self, _text: &str) {}
}

impl Frame {
    /// Draw glows, receptors, arrows and the caption, in that order.
    pub fn draw_to(&self, surface: &mut impl Surface) {
        for glow in &self.glows {
            surface.draw_sprite(&glow.sprite);
        }
        for sprite in self.receptors.iter().chain(&self.arrows) {
            surface.draw_sprite(sprite);
        }
        if !self.caption.is_empty() {
            surface.draw_caption(&self.caption);
        }
    }
}
