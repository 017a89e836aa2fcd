//! Player vs. placement collisions
//!
//! Every running tick, the player is tested against each live placement in
//! the visible sections. Order is fixed (section ascending, then category in
//! config order, then slot ascending) so "first hazard wins" is reproducible.

use glam::Vec3;

use super::placement::PlacementGenerator;
use super::state::{GameEvent, GameState};
use crate::tuning::{CategoryConfig, CategoryKind};

/// Which placement was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRef {
    pub section: usize,
    pub category: usize,
    pub slot: usize,
}

/// What one evaluation pass changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    /// Collectibles consumed this pass, in evaluation order
    pub collected: Vec<(HitRef, i64)>,
    /// The hazard that ended the run, if any
    pub hazard: Option<HitRef>,
}

impl CollisionOutcome {
    pub fn is_empty(&self) -> bool {
        self.collected.is_empty() && self.hazard.is_none()
    }
}

/// Whether `player` is inside a sphere of `radius` around `target`
#[inline]
pub fn within_radius(player: Vec3, target: Vec3, radius: f32) -> bool {
    player.distance(target) < radius
}

/// Run one collision pass and apply its consequences to `state`.
///
/// No-op unless the game is running. Collectible hits are all applied;
/// the first hazard hit consumes that hazard, ends the run and stops the pass.
pub fn evaluate_collisions(
    state: &mut GameState,
    placements: &mut PlacementGenerator,
    visible: &[usize],
    categories: &[CategoryConfig],
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    if !state.is_running() {
        return outcome;
    }
    let player = state.player_position();

    'sections: for &section in visible {
        let Some(entry) = placements.section_mut(section) else {
            continue;
        };

        for (category, config) in categories.iter().enumerate() {
            let Some(list) = entry.category_mut(category) else {
                continue;
            };

            for (slot, placement) in list.iter_mut().enumerate() {
                if placement.consumed
                    || !within_radius(player, placement.position, config.collision_radius)
                {
                    continue;
                }
                placement.consumed = true;
                let hit = HitRef {
                    section,
                    category,
                    slot,
                };

                match config.kind {
                    CategoryKind::Hazard => {
                        log::info!(
                            "Hit `{}` at {:?} (section {})",
                            config.name,
                            placement.position,
                            section
                        );
                        state.push_event(GameEvent::HazardHit { section, category });
                        state.set_game_over();
                        outcome.hazard = Some(hit);
                        break 'sections;
                    }
                    CategoryKind::Collectible => {
                        let delta = config.score_delta;
                        if state.add_score(delta) {
                            state.push_score_event(placement.position, delta);
                            state.push_event(GameEvent::Collected {
                                section,
                                category,
                                delta,
                            });
                            log::debug!("Collected `{}` for {:+}", config.name, delta);
                        }
                        outcome.collected.push((hit, delta));
                    }
                }
            }
        }
    }

    outcome
}
