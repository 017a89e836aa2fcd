//! Browser bindings
//!
//! `WebGame` owns a `World` and exposes the frame loop, HUD getters and
//! flattened instance buffers to JavaScript. Rendering and audio stay on the
//! JS side; they read from here and never drive the simulation.

use wasm_bindgen::prelude::*;

use crate::highscores::HighScores;
use crate::instances::{InstanceTransform, as_floats, instance_transforms};
use crate::sim::{GameEvent, TickInput, World, tick};
use crate::tuning::GameConfig;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Pumpkin Run starting...");
}

/// Game instance handed to JS
#[wasm_bindgen]
pub struct WebGame {
    world: World,
    high_scores: HighScores,
    /// Events from the last tick, serialized on request
    pending: Vec<GameEvent>,
    /// Rank of the last finished run, if it made the board
    last_rank: Option<usize>,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a session. `config_json` overrides the built-in tuning.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebGame, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json(&json),
            None => Ok(GameConfig::default()),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let world = World::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            world,
            high_scores: HighScores::load(),
            pending: Vec::new(),
            last_rank: None,
        })
    }

    /// Advance one displayed frame
    pub fn tick(&mut self, dt: f32, left: bool, right: bool, toggle_pause: bool) {
        let input = TickInput {
            left,
            right,
            toggle_pause,
        };
        tick(&mut self.world, &input, dt);

        self.pending = self.world.drain_events();
        for event in &self.pending {
            if let GameEvent::GameOver {
                final_score,
                distance,
            } = *event
            {
                self.last_rank =
                    self.high_scores
                        .add_score(final_score, distance, js_sys::Date::now());
                if let Some(rank) = self.last_rank {
                    log::info!("New high score #{}: {}", rank, final_score);
                    self.high_scores.save();
                }
            }
        }
    }

    /// Start over; `seed` of None keeps the current seed
    pub fn restart(&mut self, seed: Option<u64>) {
        self.world.restart(seed);
        self.pending.clear();
        self.last_rank = None;
    }

    pub fn score(&self) -> i64 {
        self.world.state().score()
    }

    pub fn speed(&self) -> f32 {
        self.world.state().player_speed()
    }

    pub fn distance(&self) -> f32 {
        self.world.state().distance()
    }

    pub fn is_paused(&self) -> bool {
        self.world.state().is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.world.state().is_game_over()
    }

    /// `[x, y, z, roll]`
    pub fn player_pose(&self) -> Vec<f32> {
        let p = self.world.state().player_position();
        vec![p.x, p.y, p.z, self.world.state().player_roll()]
    }

    /// Visible section indices, ascending
    pub fn visible_sections(&self) -> Vec<u32> {
        self.world
            .visible_sections()
            .iter()
            .map(|&s| s as u32)
            .collect()
    }

    /// Pending floating-score events as JSON
    pub fn score_events_json(&self) -> String {
        serde_json::to_string(self.world.score_events()).unwrap_or_else(|_| "[]".into())
    }

    /// HUD finished displaying a score event
    pub fn clear_score_event(&mut self, id: u32) -> bool {
        self.world.clear_score_event(id)
    }

    /// Events produced by the last tick as JSON (audio cues, banners)
    pub fn events_json(&self) -> String {
        serde_json::to_string(&self.pending).unwrap_or_else(|_| "[]".into())
    }

    /// Category index for a configured name
    pub fn category_index(&self, name: &str) -> Option<u32> {
        self.world.config().category_index(name).map(|i| i as u32)
    }

    /// Floats per instance in `instance_buffer`
    pub fn instance_stride() -> usize {
        InstanceTransform::STRIDE_F32
    }

    /// Live instances of one category across all visible sections, flattened
    pub fn instance_buffer(&self, category: usize, time: f32) -> Vec<f32> {
        let Some(config) = self.world.config().categories.get(category) else {
            return Vec::new();
        };
        let mut transforms = Vec::new();
        for &section in self.world.visible_sections() {
            if let Some(placements) = self.world.placements().placements(section, category) {
                transforms.extend(instance_transforms(placements, config, time));
            }
        }
        as_floats(&transforms).to_vec()
    }

    /// Current hazard tint as `[r, g, b]`
    pub fn hazard_tint(&self) -> Option<Vec<f32>> {
        self.world.progression().current_tint().map(|c| c.to_vec())
    }

    /// Rank of the run that just ended, if it made the board
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Leaderboard as JSON
    pub fn high_scores_json(&self) -> String {
        serde_json::to_string(&self.high_scores).unwrap_or_else(|_| "{\"entries\":[]}".into())
    }
}
