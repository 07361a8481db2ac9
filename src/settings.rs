//! Game configuration and marble appearance
//!
//! Loaded from JSON by the host; the simulation only sees validated values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_SEGMENT_COUNT;
use crate::sim::ObstacleKind;

/// Errors from reading a configuration document
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Slider bounds the appearance form exposes
pub mod bounds {
    pub const RADIUS_MIN: f32 = 0.2;
    pub const RADIUS_MAX: f32 = 0.5;
    pub const UNIT_MIN: f32 = 0.0;
    pub const UNIT_MAX: f32 = 1.0;
}

/// How the marble looks. Radius also sizes its collider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarbleAppearance {
    /// `#rrggbb`
    pub color: String,
    pub radius: f32,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for MarbleAppearance {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            radius: 0.3,
            metalness: 0.5,
            roughness: 0.5,
        }
    }
}

impl MarbleAppearance {
    /// Clamp every field into its slider range.
    ///
    /// An unparseable color falls back to the default white.
    pub fn clamped(mut self) -> Self {
        use bounds::*;

        if parse_hex_color(&self.color).is_none() {
            log::warn!("Ignoring invalid marble color {:?}", self.color);
            self.color = Self::default().color;
        }
        self.radius = clamp_or(self.radius, RADIUS_MIN, RADIUS_MAX, Self::default().radius);
        self.metalness = clamp_or(self.metalness, UNIT_MIN, UNIT_MAX, Self::default().metalness);
        self.roughness = clamp_or(self.roughness, UNIT_MIN, UNIT_MAX, Self::default().roughness);
        self
    }

    /// Color as 0-1 sRGB channels for renderers (not linearized)
    pub fn rgb(&self) -> [f32; 3] {
        let [r, g, b] = parse_hex_color(&self.color).unwrap_or([255, 255, 255]);
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Parse `#rrggbb` (leading `#` optional)
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Everything needed to build a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Obstacle segments between start and end pads
    pub segment_count: u32,
    /// Kinds drawn uniformly per segment; repeat a kind to weight it
    pub obstacle_types: Vec<ObstacleKind>,
    /// Seed for the track and per-obstacle parameters
    pub seed: u64,
    /// Marble appearance defaults
    pub marble: MarbleAppearance,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            segment_count: DEFAULT_SEGMENT_COUNT,
            obstacle_types: ObstacleKind::ALL.to_vec(),
            seed: 0,
            marble: MarbleAppearance::default(),
        }
    }
}

impl GameConfig {
    /// Parse from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: GameConfig = serde_json::from_str(json)?;
        config.marble = config.marble.clamped();
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appearance_clamps_to_slider_bounds() {
        let marble = MarbleAppearance {
            color: "#12ab9f".to_string(),
            radius: 2.0,
            metalness: -1.0,
            roughness: f32::NAN,
        }
        .clamped();

        assert_eq!(marble.color, "#12ab9f");
        assert_eq!(marble.radius, bounds::RADIUS_MAX);
        assert_eq!(marble.metalness, 0.0);
        assert_eq!(marble.roughness, 0.5);
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let marble = MarbleAppearance {
            color: "orangered".to_string(),
            ..Default::default()
        }
        .clamped();
        assert_eq!(marble.color, "#ffffff");
    }

    #[test]
    fn test_rgb_channels() {
        let marble = MarbleAppearance {
            color: "#ff3300".to_string(),
            ..Default::default()
        };
        assert_eq!(marble.rgb(), [1.0, 0.2, 0.0]);
        assert_eq!(MarbleAppearance::default().rgb(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some([255, 128, 0]));
        assert_eq!(parse_hex_color("00ff00"), Some([0, 255, 0]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config = GameConfig::from_json(r#"{ "segment_count": 8, "seed": 42 }"#).unwrap();
        assert_eq!(config.segment_count, 8);
        assert_eq!(config.seed, 42);
        assert_eq!(config.obstacle_types, ObstacleKind::ALL.to_vec());
        assert_eq!(config.marble, MarbleAppearance::default());
    }

    #[test]
    fn test_config_json_kinds_and_clamping() {
        let json = r#"{
            "obstacle_types": ["spinner", "axe", "axe"],
            "marble": { "radius": 0.9 }
        }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(
            config.obstacle_types,
            vec![ObstacleKind::Spinner, ObstacleKind::Axe, ObstacleKind::Axe]
        );
        assert_eq!(config.marble.radius, bounds::RADIUS_MAX);
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        let err = GameConfig::from_json("{ segment_count: }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_config_json_round_trip_keeps_values() {
        let config = GameConfig {
            seed: 7,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }
}
