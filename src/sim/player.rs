//! Player steering and forward auto-advance
//!
//! Three independent motion controllers (lateral X, forward Z, roll) turn raw
//! steering input into eased movement. Only a running game moves the player.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::motion::MotionController;
use super::state::GameState;
use crate::tuning::GameConfig;

/// Resolved steering direction for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
    #[default]
    Straight,
}

impl Steer {
    /// Left wins when both are held
    pub fn from_keys(left: bool, right: bool) -> Self {
        if left {
            Steer::Left
        } else if right {
            Steer::Right
        } else {
            Steer::Straight
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMotionModel {
    x: MotionController,
    z: MotionController,
    roll: MotionController,
    height: f32,
    left_bound: f32,
    right_bound: f32,
    roll_angle: f32,
    frame_rate: f32,
}

impl PlayerMotionModel {
    pub fn new(config: &GameConfig) -> Self {
        let [x, y, z] = config.starting_position;
        Self {
            x: MotionController::new(x, config.motion.lateral),
            z: MotionController::new(z, config.motion.forward),
            roll: MotionController::new(0.0, config.motion.roll),
            height: y,
            left_bound: config.left_bound,
            right_bound: config.right_bound,
            roll_angle: config.roll_angle,
            frame_rate: config.frame_rate,
        }
    }

    /// Advance one tick and write the smoothed pose into `state`.
    ///
    /// Speeds are per-frame at `frame_rate`, so the step is scaled by
    /// `frame_rate · dt`. Returns false when the game is not running.
    pub fn step(&mut self, state: &mut GameState, steer: Steer, dt: f32) -> bool {
        if !state.is_running() {
            return false;
        }

        let step = state.player_speed() * self.frame_rate * dt;

        match steer {
            Steer::Left => {
                self.roll.set_target(-self.roll_angle);
                self.x
                    .set_target((self.x.value() - step).max(self.left_bound));
            }
            Steer::Right => {
                self.roll.set_target(self.roll_angle);
                self.x
                    .set_target((self.x.value() + step).min(self.right_bound));
            }
            Steer::Straight => {
                self.roll.set_target(0.0);
            }
        }
        self.z.set_target(self.z.value() - step);

        let x = self.x.update();
        let z = self.z.update();
        let roll = self.roll.update();
        state.set_player_pose(Vec3::new(x, self.height, z), roll);
        true
    }

    /// Current smoothed position (matches `GameState` after a step)
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x.value(), self.height, self.z.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (GameConfig, GameState, PlayerMotionModel) {
        let config = GameConfig::default();
        let state = GameState::new(&config);
        let model = PlayerMotionModel::new(&config);
        (config, state, model)
    }

    #[test]
    fn test_steer_left_priority() {
        assert_eq!(Steer::from_keys(true, true), Steer::Left);
        assert_eq!(Steer::from_keys(false, true), Steer::Right);
        assert_eq!(Steer::from_keys(false, false), Steer::Straight);
    }

    #[test]
    fn test_forward_advance() {
        let (_, mut state, mut model) = setup();
        assert!(model.step(&mut state, Steer::Straight, DT));
        // Target moves 12 units ahead, controller closes 15% of that
        let pos = state.player_position();
        assert!((pos.z - (-20.0 - 12.0 * 0.15)).abs() < 1e-4);
        assert_eq!(pos.x, 0.0);
        assert_eq!(pos.y, 2.0);
        assert_eq!(pos, model.position());

        for _ in 0..100 {
            model.step(&mut state, Steer::Straight, DT);
        }
        assert!(state.player_position().z < pos.z);
    }

    #[test]
    fn test_steering_moves_and_banks() {
        let (_, mut state, mut model) = setup();
        model.step(&mut state, Steer::Left, DT);
        assert!(state.player_position().x < 0.0);
        assert!(state.player_roll() < 0.0);

        for _ in 0..30 {
            model.step(&mut state, Steer::Straight, DT);
        }
        assert!(state.player_roll().abs() < 0.01);

        let x_before = state.player_position().x;
        model.step(&mut state, Steer::Right, DT);
        assert!(state.player_position().x > x_before);
        assert!(state.player_roll() > 0.0);
    }

    #[test]
    fn test_lateral_clamped_to_bounds() {
        let (config, mut state, mut model) = setup();
        for _ in 0..2000 {
            model.step(&mut state, Steer::Right, DT);
        }
        let x = state.player_position().x;
        assert!(x <= config.right_bound);
        assert!(x > config.right_bound - 1.0);

        for _ in 0..4000 {
            model.step(&mut state, Steer::Left, DT);
        }
        assert!(state.player_position().x >= config.left_bound);
    }

    #[test]
    fn test_no_motion_when_paused_or_over() {
        let (_, mut state, mut model) = setup();
        state.toggle_pause();
        let before = state.player_position();
        assert!(!model.step(&mut state, Steer::Left, DT));
        assert_eq!(state.player_position(), before);

        state.toggle_pause();
        state.set_game_over();
        assert!(!model.step(&mut state, Steer::Left, DT));
        assert_eq!(state.player_position(), before);
    }

    #[test]
    fn test_step_scales_with_dt() {
        let (_, mut fast, mut a) = setup();
        let (_, mut slow, mut b) = setup();
        a.step(&mut fast, Steer::Straight, 2.0 * DT);
        b.step(&mut slow, Steer::Straight, DT);
        let da = -20.0 - fast.player_position().z;
        let db = -20.0 - slow.player_position().z;
        assert!((da - 2.0 * db).abs() < 1e-3);
    }
}
