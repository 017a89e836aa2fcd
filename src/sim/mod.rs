//! Simulation module
//!
//! All gameplay logic lives here. It must stay free of rendering and
//! platform dependencies:
//! - One tick per displayed frame, driven by the host
//! - Seeded RNG only
//! - Stable iteration order (section, category, slot)

pub mod collision;
pub mod motion;
pub mod placement;
pub mod player;
pub mod progression;
pub mod section;
pub mod state;
pub mod tick;

pub use collision::{CollisionOutcome, HitRef, evaluate_collisions};
pub use motion::MotionController;
pub use placement::{GenerationReport, Placement, PlacementGenerator, SectionPlacements};
pub use player::{PlayerMotionModel, Steer};
pub use progression::ProgressionController;
pub use section::{SectionBounds, SectionWindow, WindowChange};
pub use state::{GameEvent, GamePhase, GameState, ScoreEvent};
pub use tick::{TickInput, World, tick};
