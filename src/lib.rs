//! Pumpkin Run - An endless Halloween runner
//!
//! Core modules:
//! - `sim`: Simulation core (section streaming, placement, collisions, game state)
//! - `tuning`: Data-driven game balance and configuration
//! - `instances`: Instanced-rendering transforms for the presentation layer
//! - `highscores`: Top-N leaderboard
//! - `platform`: Browser bindings

pub mod highscores;
pub mod instances;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use instances::InstanceTransform;
pub use sim::{TickInput, World, tick};
pub use tuning::{ConfigError, GameConfig};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Length of one track section along the forward (-Z) axis
    pub const SECTION_LENGTH: f32 = 2000.0;
    /// Start bound of section 0; everything before it is obstacle-free runway
    pub const RUNWAY_OFFSET: f32 = 250.0;
    /// Number of sections materialized at once
    pub const VISIBLE_SECTIONS: usize = 3;
    /// Hard cap on the track length in sections
    pub const TOTAL_SECTIONS: usize = 100;

    /// Lateral extent of the playfield
    pub const FIELD_WIDTH: f32 = 1000.0;
    pub const LEFT_BOUND: f32 = -FIELD_WIDTH / 2.0;
    pub const RIGHT_BOUND: f32 = FIELD_WIDTH / 2.0;

    /// Player defaults
    pub const STARTING_SPEED: f32 = 12.0;
    pub const STARTING_POSITION: [f32; 3] = [0.0, 2.0, -20.0];
    /// Speeds are expressed per frame at this rate
    pub const FRAME_RATE: f32 = 60.0;
    /// Longest frame a single tick will simulate (tab switches, stalls)
    pub const MAX_TICK_DT: f32 = 0.1;

    /// Smoothing rates for the player's motion controllers
    pub const LATERAL_RATE: f32 = 0.2;
    pub const FORWARD_RATE: f32 = 0.15;
    pub const ROLL_RATE: f32 = 0.2;
    /// Bank angle while steering (radians)
    pub const ROLL_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

    /// Passive score income: points per interval while running
    pub const INCOME_POINTS: i64 = 3;
    pub const INCOME_INTERVAL_SECS: f32 = 0.2;
    /// Shortest accepted income interval
    pub const MIN_INCOME_INTERVAL_SECS: f32 = 1e-3;

    /// Placement sampling budget as a multiple of the target count
    pub const ATTEMPT_FACTOR: u32 = 5;
    /// Upper bound on a category's per-section target count
    pub const MAX_TARGET_COUNT: u32 = 2000;

    /// Number of high scores kept
    pub const MAX_HIGH_SCORES: usize = 3;
}

/// Distance between two points ignoring height
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Parse a `#RRGGBB` color into linear-ish RGB components in [0, 1]
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some([
        ((value >> 16) & 0xff) as f32 / 255.0,
        ((value >> 8) & 0xff) as f32 / 255.0,
        (value & 0xff) as f32 / 255.0,
    ])
}
