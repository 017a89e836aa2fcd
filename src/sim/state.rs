//! Game state and core simulation types
//!
//! `GameState` is the single source of truth for everything the HUD and the
//! renderer read. It is only mutated through the methods below, from inside
//! the tick, so readers always observe a consistent snapshot between ticks.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tuning::{GameConfig, ScoreIncome};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player advancing, collisions live
    Running,
    /// Simulation suspended; the tick still runs but mutates nothing
    Paused,
    /// Run ended (terminal until restart)
    GameOver,
}

/// Transient floating-score feedback, acknowledged by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub id: u32,
    pub position: Vec3,
    pub delta: i64,
}

/// Things that happened during a tick, for audio/UI observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A section was materialized for the first time
    SectionRevealed { section: usize },
    /// A collectible was picked up
    Collected {
        section: usize,
        category: usize,
        delta: i64,
    },
    /// The player touched a hazard
    HazardHit { section: usize, category: usize },
    /// A speed tier was reached (`tier` is 1-based; 0 is the starting tier)
    TierReached {
        tier: usize,
        speed: f32,
        tint: Option<String>,
    },
    /// Run ended
    GameOver { final_score: i64, distance: f32 },
    Paused,
    Resumed,
}

/// Complete mutable game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase; changed only by `set_game_over` and `toggle_pause`
    phase: GamePhase,
    /// Authoritative player position (written only by the motion model)
    player_position: Vec3,
    /// Player bank angle around Z (radians)
    player_roll: f32,
    /// Forward speed, only ever increased
    player_speed: f32,
    /// Score, frozen once the run ends
    score: i64,
    /// Pending floating-score feedback (oldest first)
    score_events: Vec<ScoreEvent>,
    /// Pending observer events (oldest first)
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Simulation tick counter
    time_ticks: u64,
    /// Simulated seconds while running
    elapsed_secs: f32,
    /// Seconds accumulated toward the next passive score payout
    income_accumulator: f32,
    /// Next score event ID
    next_event_id: u32,
}

impl GameState {
    /// Fresh state at the configured start
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: GamePhase::Running,
            player_position: Vec3::from_array(config.starting_position),
            player_roll: 0.0,
            player_speed: config.starting_speed,
            score: 0,
            score_events: Vec::new(),
            events: Vec::new(),
            time_ticks: 0,
            elapsed_secs: 0.0,
            income_accumulator: 0.0,
            next_event_id: 1,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Ticks simulated while running
    #[inline]
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn player_position(&self) -> Vec3 {
        self.player_position
    }

    #[inline]
    pub fn player_roll(&self) -> f32 {
        self.player_roll
    }

    #[inline]
    pub fn player_speed(&self) -> f32 {
        self.player_speed
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.score
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Forward distance traveled (magnitude of Z)
    #[inline]
    pub fn distance(&self) -> f32 {
        self.player_position.z.abs()
    }

    /// Move the player; ignored once the run is over
    pub fn set_player_pose(&mut self, position: Vec3, roll: f32) {
        if self.is_game_over() {
            return;
        }
        self.player_position = position;
        self.player_roll = roll;
    }

    /// Raise the forward speed; negative increments are ignored
    pub fn add_player_speed(&mut self, increment: f32) {
        if increment > 0.0 {
            self.player_speed += increment;
        }
    }

    /// Apply a score delta. Returns false (and changes nothing) while paused
    /// or after game over.
    pub fn add_score(&mut self, delta: i64) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.score += delta;
        true
    }

    /// One-way transition into `GameOver`. Returns true only for the call
    /// that actually ended the run.
    pub fn set_game_over(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over at distance {:.0} with score {}",
            self.distance(),
            self.score
        );
        self.events.push(GameEvent::GameOver {
            final_score: self.score,
            distance: self.distance(),
        });
        true
    }

    /// Running <-> Paused; no effect after game over
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                self.events.push(GameEvent::Resumed);
            }
            GamePhase::GameOver => {}
        }
    }

    /// Queue floating-score feedback and return its ID
    pub fn push_score_event(&mut self, position: Vec3, delta: i64) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.score_events.push(ScoreEvent { id, position, delta });
        id
    }

    /// Pending score events, oldest first
    pub fn score_events(&self) -> &[ScoreEvent] {
        &self.score_events
    }

    /// HUD acknowledgement; returns false for an unknown or already-cleared ID
    pub fn clear_score_event(&mut self, id: u32) -> bool {
        match self.score_events.iter().position(|e| e.id == id) {
            Some(i) => {
                self.score_events.remove(i);
                true
            }
            None => false,
        }
    }

    /// Count one running tick of `dt` seconds
    pub(crate) fn advance_clock(&mut self, dt: f32) {
        if !self.is_running() {
            return;
        }
        self.time_ticks += 1;
        self.elapsed_secs += dt;
    }

    /// Accrue `dt` toward passive income and pay every full interval.
    /// Returns the number of intervals paid.
    pub(crate) fn accrue_income(&mut self, dt: f32, income: ScoreIncome) -> u32 {
        if !self.is_running() {
            return 0;
        }
        self.income_accumulator += dt;
        let intervals = (self.income_accumulator / income.interval_secs).floor();
        if !(intervals >= 1.0) {
            return 0;
        }
        self.income_accumulator -= intervals * income.interval_secs;
        let intervals = intervals as u32;
        self.add_score(income.points * i64::from(intervals));
        intervals
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending observer events, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending observer events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
