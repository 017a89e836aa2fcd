//! Data-driven game balance
//!
//! Everything the simulation reads at load time lives in [`GameConfig`]. The
//! defaults reproduce the shipped game; a JSON file can override any of it.
//! A config is validated once, before the first tick, and a bad config
//! refuses to start rather than running with undefined tier ordering.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::parse_hex_color;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A scalar option is out of range
    #[error("invalid value for `{field}`: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: String,
    },

    /// Speed tier thresholds must be strictly ascending
    #[error("speed tier {index} at distance {distance} does not come after {previous}")]
    TierOrder {
        index: usize,
        distance: f32,
        previous: f32,
    },

    /// Speed tier is malformed
    #[error("speed tier {index}: {reason}")]
    InvalidTier { index: usize, reason: String },

    /// A category entry is malformed
    #[error("category `{name}`: {reason}")]
    InvalidCategory { name: String, reason: String },

    /// Two categories share a name
    #[error("duplicate category name `{0}`")]
    DuplicateCategory(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// What happens when the player touches a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Solid obstacle: touching it ends the run
    Hazard,
    /// Pickup: touching it adds `score_delta` (negative for penalties)
    Collectible,
}

/// Static description of one obstacle/collectible kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Unique identifier, also used in log lines and events
    pub name: String,
    pub kind: CategoryKind,
    /// Opaque model reference for the renderer
    pub model_ref: String,
    /// Uniform visual scale
    pub scale: f32,
    /// Placements wanted per section (best effort)
    pub target_count: u32,
    /// Player-to-placement distance below which a collision fires
    pub collision_radius: f32,
    /// Score change on pickup (ignored for hazards, must be 0 there)
    #[serde(default)]
    pub score_delta: i64,
    /// Minimum planar distance to any other placement in the same section
    pub min_separation: f32,
    /// Y coordinate of generated placements
    #[serde(default)]
    pub height: f32,
    /// Vertical bob amplitude for rendering
    #[serde(default)]
    pub float_amplitude: f32,
    /// Spin speed around Y for rendering (radians/s)
    #[serde(default)]
    pub rotation_speed: f32,
    /// Rest orientation (euler XYZ, radians)
    #[serde(default)]
    pub base_rotation: [f32; 3],
}

impl CategoryConfig {
    pub fn is_hazard(&self) -> bool {
        self.kind == CategoryKind::Hazard
    }

    fn validate(&self) -> ConfigResult<()> {
        let fail = |reason: &str| ConfigError::InvalidCategory {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(fail("name must not be empty"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(fail("scale must be positive"));
        }
        if !(self.collision_radius.is_finite() && self.collision_radius > 0.0) {
            return Err(fail("collision_radius must be positive"));
        }
        if !(self.min_separation.is_finite() && self.min_separation >= 0.0) {
            return Err(fail("min_separation must be non-negative"));
        }
        if !self.height.is_finite() || !self.float_amplitude.is_finite() {
            return Err(fail("height and float_amplitude must be finite"));
        }
        if self.target_count > MAX_TARGET_COUNT {
            return Err(fail(&format!(
                "target_count {} exceeds {}",
                self.target_count, MAX_TARGET_COUNT
            )));
        }
        if self.is_hazard() && self.score_delta != 0 {
            return Err(fail("hazards end the run and cannot carry a score_delta"));
        }
        Ok(())
    }
}

/// A distance at which the player's speed steps up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTier {
    /// Forward distance (absolute Z) that triggers the tier
    pub distance: f32,
    /// Added to the player's speed when the tier is reached
    pub speed_increment: f32,
    /// Hazard tint from this tier on (`#RRGGBB`)
    #[serde(default)]
    pub tint: Option<String>,
}

/// Smoothing rates for the player's three motion controllers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionRates {
    pub lateral: f32,
    pub forward: f32,
    pub roll: f32,
}

impl Default for MotionRates {
    fn default() -> Self {
        Self {
            lateral: LATERAL_RATE,
            forward: FORWARD_RATE,
            roll: ROLL_RATE,
        }
    }
}

/// Passive score earned while running
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreIncome {
    pub points: i64,
    pub interval_secs: f32,
}

impl Default for ScoreIncome {
    fn default() -> Self {
        Self {
            points: INCOME_POINTS,
            interval_secs: INCOME_INTERVAL_SECS,
        }
    }
}

/// Complete load-time configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub section_length: f32,
    pub runway_offset: f32,
    pub visible_sections: usize,
    pub total_sections: usize,
    pub field_width: f32,
    pub left_bound: f32,
    pub right_bound: f32,
    pub starting_speed: f32,
    pub starting_position: [f32; 3],
    pub frame_rate: f32,
    pub motion: MotionRates,
    pub roll_angle: f32,
    pub score_income: ScoreIncome,
    pub attempt_factor: u32,
    /// Run seed for placement generation
    pub seed: u64,
    pub speed_tiers: Vec<SpeedTier>,
    /// Hazard tint before the first tier (`#RRGGBB`)
    pub base_tint: Option<String>,
    /// Generation order: hazards should come first so pickups avoid them
    pub categories: Vec<CategoryConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            section_length: SECTION_LENGTH,
            runway_offset: RUNWAY_OFFSET,
            visible_sections: VISIBLE_SECTIONS,
            total_sections: TOTAL_SECTIONS,
            field_width: FIELD_WIDTH,
            left_bound: LEFT_BOUND,
            right_bound: RIGHT_BOUND,
            starting_speed: STARTING_SPEED,
            starting_position: STARTING_POSITION,
            frame_rate: FRAME_RATE,
            motion: MotionRates::default(),
            roll_angle: ROLL_ANGLE,
            score_income: ScoreIncome::default(),
            attempt_factor: ATTEMPT_FACTOR,
            seed: 0x5eed_1031,
            speed_tiers: default_speed_tiers(),
            base_tint: Some("#FF8C00".into()),
            categories: default_categories(),
        }
    }
}

fn default_speed_tiers() -> Vec<SpeedTier> {
    [(4000.0, "#32CD32"), (10000.0, "#888888"), (18000.0, "#222222")]
        .into_iter()
        .map(|(distance, tint)| SpeedTier {
            distance,
            speed_increment: 5.0,
            tint: Some(tint.to_string()),
        })
        .collect()
}

fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig {
            name: "pumpkin".into(),
            kind: CategoryKind::Hazard,
            model_ref: "/models/obstacles/halloween_pumpkin_2.glb".into(),
            scale: 0.1,
            target_count: 250,
            collision_radius: 15.0,
            score_delta: 0,
            min_separation: 20.0,
            height: 1.0,
            float_amplitude: 0.0,
            rotation_speed: 0.0,
            base_rotation: [0.0; 3],
        },
        CategoryConfig {
            name: "candy_corn".into(),
            kind: CategoryKind::Collectible,
            model_ref: "/models/collectibles/candy_corn.glb".into(),
            scale: 3.0,
            target_count: 100,
            collision_radius: 8.0,
            score_delta: 10,
            min_separation: 25.0,
            height: 5.0,
            float_amplitude: 0.5,
            rotation_speed: 2.0,
            base_rotation: [0.0; 3],
        },
        CategoryConfig {
            name: "treasure_chest".into(),
            kind: CategoryKind::Collectible,
            model_ref: "/models/collectibles/treasure_chest.glb".into(),
            scale: 0.008,
            target_count: 30,
            collision_radius: 8.0,
            score_delta: 50,
            min_separation: 25.0,
            height: 5.0,
            float_amplitude: 2.0,
            rotation_speed: 0.7,
            base_rotation: [0.0; 3],
        },
        CategoryConfig {
            name: "ghost".into(),
            kind: CategoryKind::Collectible,
            model_ref: "/models/collectibles/halloween_ghost.glb".into(),
            scale: 2.0,
            target_count: 40,
            collision_radius: 8.0,
            score_delta: -30,
            min_separation: 25.0,
            height: 5.0,
            float_amplitude: 1.5,
            rotation_speed: 1.0,
            base_rotation: [0.0; 3],
        },
        CategoryConfig {
            name: "bottle".into(),
            kind: CategoryKind::Collectible,
            model_ref: "/models/collectibles/bottle.glb".into(),
            scale: 1.5,
            target_count: 40,
            collision_radius: 8.0,
            score_delta: -20,
            min_separation: 25.0,
            height: 5.0,
            float_amplitude: 0.5,
            rotation_speed: 1.5,
            base_rotation: [0.0; 3],
        },
    ]
}

fn out_of_range(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, format!("{value} must be positive")))
    }
}

fn unit_rate(field: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(out_of_range(field, format!("{value} must be in (0, 1]")))
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!(
            "Loaded config from {} ({} categories, {} speed tiers)",
            path.as_ref().display(),
            config.categories.len(),
            config.speed_tiers.len()
        );
        Ok(config)
    }

    /// Check every option; the first fault found is returned
    pub fn validate(&self) -> ConfigResult<()> {
        positive("section_length", self.section_length)?;
        positive("field_width", self.field_width)?;
        positive("frame_rate", self.frame_rate)?;

        if !(self.runway_offset >= 0.0 && self.runway_offset < self.section_length) {
            return Err(out_of_range(
                "runway_offset",
                format!(
                    "{} must be in [0, section_length = {})",
                    self.runway_offset, self.section_length
                ),
            ));
        }
        if self.visible_sections == 0 {
            return Err(out_of_range("visible_sections", "must be at least 1"));
        }
        if self.total_sections == 0 {
            return Err(out_of_range("total_sections", "must be at least 1"));
        }
        if !(self.left_bound.is_finite()
            && self.right_bound.is_finite()
            && self.left_bound < self.right_bound)
        {
            return Err(out_of_range(
                "left_bound",
                format!("{} must be left of {}", self.left_bound, self.right_bound),
            ));
        }
        if !(self.starting_speed.is_finite() && self.starting_speed >= 0.0) {
            return Err(out_of_range("starting_speed", "must be non-negative"));
        }
        if self.starting_position.iter().any(|v| !v.is_finite()) {
            return Err(out_of_range("starting_position", "must be finite"));
        }

        unit_rate("motion.lateral", self.motion.lateral)?;
        unit_rate("motion.forward", self.motion.forward)?;
        unit_rate("motion.roll", self.motion.roll)?;
        if !self.roll_angle.is_finite() {
            return Err(out_of_range("roll_angle", "must be finite"));
        }

        let interval = self.score_income.interval_secs;
        if !(interval.is_finite() && interval >= MIN_INCOME_INTERVAL_SECS) {
            return Err(out_of_range(
                "score_income.interval_secs",
                format!("{interval} must be at least {MIN_INCOME_INTERVAL_SECS}"),
            ));
        }

        if !(5..=8).contains(&self.attempt_factor) {
            return Err(out_of_range(
                "attempt_factor",
                format!("{} must be between 5 and 8", self.attempt_factor),
            ));
        }

        if let Some(tint) = &self.base_tint {
            if parse_hex_color(tint).is_none() {
                return Err(out_of_range("base_tint", format!("`{tint}` is not #RRGGBB")));
            }
        }

        self.validate_tiers()?;
        self.validate_categories()
    }

    fn validate_tiers(&self) -> ConfigResult<()> {
        let mut previous: Option<f32> = None;
        for (index, tier) in self.speed_tiers.iter().enumerate() {
            if !(tier.distance.is_finite() && tier.distance >= 0.0) {
                return Err(ConfigError::InvalidTier {
                    index,
                    reason: format!("distance {} must be non-negative", tier.distance),
                });
            }
            if !(tier.speed_increment.is_finite() && tier.speed_increment >= 0.0) {
                return Err(ConfigError::InvalidTier {
                    index,
                    reason: "speed never decreases; increment must be non-negative".into(),
                });
            }
            if let Some(tint) = &tier.tint {
                if parse_hex_color(tint).is_none() {
                    return Err(ConfigError::InvalidTier {
                        index,
                        reason: format!("tint `{tint}` is not #RRGGBB"),
                    });
                }
            }
            match previous {
                Some(previous) if tier.distance <= previous => {
                    return Err(ConfigError::TierOrder {
                        index,
                        distance: tier.distance,
                        previous,
                    });
                }
                _ => {}
            }
            previous = Some(tier.distance);
        }
        Ok(())
    }

    fn validate_categories(&self) -> ConfigResult<()> {
        let mut seen = std::collections::HashSet::new();
        for category in &self.categories {
            category.validate()?;
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
        }
        Ok(())
    }

    /// Index of a category by name
    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }
}
