//! Per-frame simulation tick
//!
//! Core game loop: steer, stream sections, collide, progress, pay income.

use super::collision::evaluate_collisions;
use super::placement::{Placement, PlacementGenerator};
use super::player::{PlayerMotionModel, Steer};
use super::progression::ProgressionController;
use super::section::{SectionBounds, SectionWindow};
use super::state::{GameEvent, GameState, ScoreEvent};
use crate::consts::MAX_TICK_DT;
use crate::tuning::{ConfigResult, GameConfig};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Steer left (held)
    pub left: bool,
    /// Steer right (held)
    pub right: bool,
    /// Pause toggle (edge-triggered)
    pub toggle_pause: bool,
}

/// Owned simulation context: state plus everything that derives from it
#[derive(Debug, Clone)]
pub struct World {
    config: GameConfig,
    state: GameState,
    window: SectionWindow,
    placements: PlacementGenerator,
    player: PlayerMotionModel,
    progression: ProgressionController,
}

impl World {
    /// Validate `config` and build a fresh session with the starting
    /// sections already materialized
    pub fn new(config: GameConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mut world = Self {
            state: GameState::new(&config),
            window: SectionWindow::from_config(&config),
            placements: PlacementGenerator::new(&config),
            player: PlayerMotionModel::new(&config),
            progression: ProgressionController::new(&config),
            config,
        };
        world.stream_sections();
        log::info!(
            "Session started (seed {}, {} sections visible)",
            world.config.seed,
            world.window.visible().len()
        );
        Ok(world)
    }

    /// Throw everything away and start over, optionally with a new seed
    pub fn restart(&mut self, seed: Option<u64>) {
        let mut config = self.config.clone();
        if let Some(seed) = seed {
            config.seed = seed;
        }
        self.state = GameState::new(&config);
        self.window = SectionWindow::from_config(&config);
        self.placements = PlacementGenerator::new(&config);
        self.player = PlayerMotionModel::new(&config);
        self.progression = ProgressionController::new(&config);
        self.config = config;
        self.stream_sections();
        log::info!("Session restarted (seed {})", self.config.seed);
    }

    /// Move the window to the player's distance and fill newly revealed
    /// sections
    fn stream_sections(&mut self) {
        let Some(change) = self.window.advance(self.state.distance()) else {
            return;
        };
        for section in change.revealed {
            self.placements
                .materialize(section, &self.config.categories);
            log::debug!("Section {} revealed", section);
            self.state.push_event(GameEvent::SectionRevealed { section });
        }
    }

    /// Read-only view of the session state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn window(&self) -> &SectionWindow {
        &self.window
    }

    pub fn placements(&self) -> &PlacementGenerator {
        &self.placements
    }

    pub fn progression(&self) -> &ProgressionController {
        &self.progression
    }

    /// Visible section indices, ascending
    pub fn visible_sections(&self) -> &[usize] {
        self.window.visible()
    }

    pub fn section_bounds(&self, section: usize) -> SectionBounds {
        SectionBounds::from_config(section, &self.config)
    }

    /// Live placements of one visible `(section, category)` pair, slot order
    pub fn live_placements(
        &self,
        section: usize,
        category: usize,
    ) -> impl Iterator<Item = &Placement> {
        self.placements
            .placements(section, category)
            .unwrap_or(&[])
            .iter()
            .filter(|p| p.is_live())
    }

    /// Pending HUD score feedback
    pub fn score_events(&self) -> &[ScoreEvent] {
        self.state.score_events()
    }

    /// HUD acknowledgement of a displayed score event
    pub fn clear_score_event(&mut self, id: u32) -> bool {
        self.state.clear_score_event(id)
    }

    /// Take pending observer events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }
}

/// Advance the world by one frame of `dt` seconds
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if input.toggle_pause {
        world.state.toggle_pause();
    }

    // Paused or over: the tick still runs but changes nothing
    if !world.state.is_running() {
        return;
    }

    // A NaN frame time would poison the motion controllers for good
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_TICK_DT)
    } else {
        0.0
    };
    world.state.advance_clock(dt);

    let steer = Steer::from_keys(input.left, input.right);
    world.player.step(&mut world.state, steer, dt);

    world.stream_sections();

    evaluate_collisions(
        &mut world.state,
        &mut world.placements,
        world.window.visible(),
        &world.config.categories,
    );

    world.progression.update(&mut world.state);

    // Last, so the tick that ends the run pays nothing
    world.state.accrue_income(dt, world.config.score_income);
}
