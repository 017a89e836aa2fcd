//! Distance-based speed tiers
//!
//! Tiers are consumed strictly in order. If a long tick jumps past several
//! thresholds at once, each one still fires its own speed increase.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};
use crate::parse_hex_color;
use crate::tuning::{GameConfig, SpeedTier};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionController {
    /// Ascending by distance (checked at config load)
    tiers: Vec<SpeedTier>,
    /// Index of the next unreached tier
    next: usize,
    base_tint: Option<String>,
}

impl ProgressionController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            tiers: config.speed_tiers.clone(),
            next: 0,
            base_tint: config.base_tint.clone(),
        }
    }

    /// Apply every tier whose threshold `state.distance()` has reached.
    /// Returns the 1-based tier numbers reached by this call.
    pub fn update(&mut self, state: &mut GameState) -> Vec<usize> {
        let mut reached = Vec::new();
        if state.is_game_over() {
            return reached;
        }

        let distance = state.distance();
        while let Some(tier) = self.tiers.get(self.next) {
            if distance < tier.distance {
                break;
            }
            self.next += 1;
            state.add_player_speed(tier.speed_increment);
            log::info!(
                "Tier {} reached at distance {:.0}: speed {}",
                self.next,
                distance,
                state.player_speed()
            );
            state.push_event(GameEvent::TierReached {
                tier: self.next,
                speed: state.player_speed(),
                tint: tier.tint.clone(),
            });
            reached.push(self.next);
        }
        reached
    }

    /// Tiers reached so far (0 = starting tier)
    pub fn tier(&self) -> usize {
        self.next
    }

    /// Distance of the next threshold, if any remain
    pub fn next_threshold(&self) -> Option<f32> {
        self.tiers.get(self.next).map(|t| t.distance)
    }

    /// Hazard tint for the current tier: the most recent reached tier that
    /// sets one, else the base tint
    pub fn current_tint(&self) -> Option<[f32; 3]> {
        self.tiers[..self.next]
            .iter()
            .rev()
            .find_map(|t| t.tint.as_deref())
            .or(self.base_tint.as_deref())
            .and_then(parse_hex_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn tier(distance: f32, inc: f32) -> SpeedTier {
        SpeedTier {
            distance,
            speed_increment: inc,
            tint: None,
        }
    }

    fn setup(tiers: Vec<SpeedTier>) -> (GameState, ProgressionController) {
        let mut config = GameConfig::default();
        config.speed_tiers = tiers;
        (GameState::new(&config), ProgressionController::new(&config))
    }

    fn move_to(state: &mut GameState, z: f32) {
        state.set_player_pose(Vec3::new(0.0, 2.0, z), 0.0);
    }

    #[test]
    fn test_single_crossing() {
        let (mut state, mut prog) = setup(vec![tier(4000.0, 5.0), tier(10000.0, 5.0)]);
        move_to(&mut state, -3999.0);
        assert!(prog.update(&mut state).is_empty());
        assert_eq!(state.player_speed(), 12.0);

        move_to(&mut state, -4000.0);
        assert_eq!(prog.update(&mut state), vec![1]);
        assert_eq!(state.player_speed(), 17.0);

        // Same distance again: nothing
        assert!(prog.update(&mut state).is_empty());
        assert_eq!(state.player_speed(), 17.0);
        assert_eq!(prog.next_threshold(), Some(10000.0));
    }

    #[test]
    fn test_skipped_thresholds_each_fire() {
        let (mut state, mut prog) = setup(vec![
            tier(4000.0, 5.0),
            tier(10000.0, 3.0),
            tier(18000.0, 2.0),
        ]);
        move_to(&mut state, -20000.0);
        assert_eq!(prog.update(&mut state), vec![1, 2, 3]);
        assert_eq!(state.player_speed(), 22.0);
        assert_eq!(prog.tier(), 3);
        assert_eq!(prog.next_threshold(), None);

        let tiers: Vec<usize> = state
            .events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::TierReached { tier, .. } => Some(*tier),
                _ => None,
            })
            .collect();
        assert_eq!(tiers, vec![1, 2, 3]);
    }

    #[test]
    fn test_no_progress_after_game_over() {
        let (mut state, mut prog) = setup(vec![tier(4000.0, 5.0)]);
        move_to(&mut state, -5000.0);
        state.set_game_over();
        assert!(prog.update(&mut state).is_empty());
        assert_eq!(state.player_speed(), 12.0);
    }

    #[test]
    fn test_tint_follows_tiers() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        let mut prog = ProgressionController::new(&config);

        let orange = parse_hex_color("#FF8C00");
        assert_eq!(prog.current_tint(), orange);

        move_to(&mut state, -4500.0);
        prog.update(&mut state);
        assert_eq!(prog.current_tint(), parse_hex_color("#32CD32"));
    }
}
