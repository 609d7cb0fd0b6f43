/// Landing-page "featured tools" showcase.
///
/// Purely decorative. A single configuration drives every visual variant;
/// the output is a deterministic scene description (card slots with
/// positions and accents) that any renderer can animate.
use std::f64::consts::TAU;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::model::PricingType;
use crate::present::BadgeTone;

pub const DEFAULT_SHOWCASE_CARDS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStyle {
    /// Cards spin in place around a ring.
    #[default]
    Orbit,
    /// Cards bob vertically.
    Float,
    /// Cards flip on hover.
    Flip,
    /// Cards breathe in scale.
    Pulse,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Layout {
    Ring { radius: f64 },
    Grid { columns: usize, spacing: f64 },
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Ring { radius: 4.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShowcaseConfig {
    #[serde(default)]
    pub style: AnimationStyle,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default = "default_particles")]
    pub particle_count: usize,
    #[serde(default = "default_cards")]
    pub max_cards: usize,
    #[serde(default = "default_hover_scale")]
    pub hover_scale: f64,
    /// Radians per second.
    #[serde(default = "default_spin_speed")]
    pub spin_speed: f64,
}

fn default_particles() -> usize {
    2000
}

fn default_cards() -> usize {
    DEFAULT_SHOWCASE_CARDS
}

fn default_hover_scale() -> f64 {
    1.1
}

fn default_spin_speed() -> f64 {
    0.5
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            style: AnimationStyle::default(),
            layout: Layout::default(),
            particle_count: default_particles(),
            max_cards: default_cards(),
            hover_scale: default_hover_scale(),
            spin_speed: default_spin_speed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CardSlot {
    pub tool_id: String,
    pub name: String,
    /// Click-through target.
    pub website: String,
    pub position: [f64; 3],
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Showcase {
    pub config: ShowcaseConfig,
    pub cards: Vec<CardSlot>,
}

impl Showcase {
    pub fn build(catalog: &Catalog, config: ShowcaseConfig) -> Self {
        let featured = catalog.featured(config.max_cards);
        let n = featured.len();
        let cards = featured
            .iter()
            .enumerate()
            .map(|(i, tool)| CardSlot {
                tool_id: tool.id.clone(),
                name: tool.name.clone(),
                website: tool.website.clone(),
                position: slot_position(&config.layout, i, n),
                accent: accent(tool.pricing.kind).to_string(),
            })
            .collect();
        Self { config, cards }
    }
}

fn slot_position(layout: &Layout, index: usize, count: usize) -> [f64; 3] {
    match *layout {
        Layout::Ring { radius } => {
            let angle = index as f64 / count.max(1) as f64 * TAU;
            [round3(angle.cos() * radius), 0.0, round3(angle.sin() * radius)]
        }
        Layout::Grid { columns, spacing } => {
            let columns = columns.max(1);
            let rows = count.div_ceil(columns);
            let col = (index % columns) as f64;
            let row = (index / columns) as f64;
            let x = (col - (columns as f64 - 1.0) / 2.0) * spacing;
            let y = ((rows as f64 - 1.0) / 2.0 - row) * spacing;
            [round3(x), round3(y), 0.0]
        }
    }
}

fn accent(kind: PricingType) -> &'static str {
    BadgeTone::from(kind).hex()
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_showcase_features_first_six() {
        let catalog = Catalog::bundled().unwrap();
        let showcase = Showcase::build(&catalog, ShowcaseConfig::default());
        assert_eq!(showcase.cards.len(), DEFAULT_SHOWCASE_CARDS);
        let expected: Vec<_> = catalog.tools()[..6].iter().map(|t| t.id.as_str()).collect();
        let got: Vec<_> = showcase.cards.iter().map(|c| c.tool_id.as_str()).collect();
        assert_eq!(got, expected);
        assert_eq!(showcase.cards[0].position, [4.0, 0.0, 0.0]);
    }

    #[test]
    fn ring_positions_sit_on_radius() {
        for i in 0..6 {
            let [x, y, z] = slot_position(&Layout::Ring { radius: 4.0 }, i, 6);
            assert_eq!(y, 0.0);
            assert!(((x * x + z * z).sqrt() - 4.0).abs() < 0.01);
        }
    }

    #[test]
    fn grid_is_centered() {
        let layout = Layout::Grid { columns: 3, spacing: 2.0 };
        assert_eq!(slot_position(&layout, 0, 6), [-2.0, 1.0, 0.0]);
        assert_eq!(slot_position(&layout, 5, 6), [2.0, -1.0, 0.0]);
    }

    #[test]
    fn config_defaults_from_partial_json() {
        let config: ShowcaseConfig = serde_json::from_str(r#"{"style":"pulse"}"#).unwrap();
        assert_eq!(config.style, AnimationStyle::Pulse);
        assert_eq!(config.max_cards, 6);
        assert_eq!(config.layout, Layout::Ring { radius: 4.0 });
    }
}
