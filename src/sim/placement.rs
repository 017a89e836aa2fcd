//! Procedural placement of obstacles and collectibles
//!
//! Each section is filled once, category by category, by rejection sampling:
//! draw a uniform point in the section, keep it only if it is far enough from
//! everything already placed in that section. Sampling is capped at
//! `attempt_factor × target_count` draws, so a crowded section simply ends up
//! with fewer placements. Results are cached and never regenerated.

use std::collections::BTreeMap;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::section::SectionBounds;
use crate::planar_distance;
use crate::tuning::{CategoryConfig, GameConfig};

/// One obstacle or collectible instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    /// Index into `GameConfig::categories`
    pub category: usize,
    /// Consumed placements keep their slot but no longer render or collide
    pub consumed: bool,
}

impl Placement {
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.consumed
    }
}

/// Outcome of generating one `(section, category)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    pub section: usize,
    pub category: usize,
    pub placed: u32,
    pub target: u32,
    pub attempts: u32,
}

impl GenerationReport {
    /// Target count not reached within the attempt budget
    pub fn is_shortfall(&self) -> bool {
        self.placed < self.target
    }
}

/// All placements of one section, grouped by category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionPlacements {
    pub bounds: SectionBounds,
    /// Indexed by category; `None` until that category is generated
    by_category: Vec<Option<Vec<Placement>>>,
}

impl SectionPlacements {
    fn new(bounds: SectionBounds, category_count: usize) -> Self {
        Self {
            bounds,
            by_category: vec![None; category_count],
        }
    }

    /// Placements of one category, if generated
    pub fn category(&self, category: usize) -> Option<&[Placement]> {
        self.by_category.get(category)?.as_deref()
    }

    pub(crate) fn category_mut(&mut self, category: usize) -> Option<&mut Vec<Placement>> {
        self.by_category.get_mut(category)?.as_mut()
    }

    /// Every generated placement in the section, any category
    pub fn all(&self) -> impl Iterator<Item = &Placement> {
        self.by_category.iter().flatten().flatten()
    }

    /// Whether every category has been generated
    pub fn is_complete(&self) -> bool {
        self.by_category.iter().all(Option::is_some)
    }

    /// Live placement count across categories
    pub fn live_count(&self) -> usize {
        self.all().filter(|p| p.is_live()).count()
    }
}

/// Owns the per-section placement cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementGenerator {
    seed: u64,
    section_length: f32,
    runway_offset: f32,
    half_width: f32,
    attempt_factor: u32,
    category_count: usize,
    /// Append-only: sections are added, never removed
    sections: BTreeMap<usize, SectionPlacements>,
}

impl PlacementGenerator {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            seed: config.seed,
            section_length: config.section_length,
            runway_offset: config.runway_offset,
            half_width: config.field_width / 2.0,
            attempt_factor: config.attempt_factor,
            category_count: config.categories.len(),
            sections: BTreeMap::new(),
        }
    }

    /// RNG for one `(section, category)` pair, independent of generation order
    fn rng_for(&self, section: usize, category: usize) -> Pcg32 {
        let mixed = (section as u64)
            .wrapping_mul(2654435761)
            .wrapping_add(self.seed)
            .wrapping_add((category as u64).wrapping_mul(7919) << 32);
        Pcg32::seed_from_u64(mixed)
    }

    /// Placements for `(section, category)`, generating them on first call.
    ///
    /// New points avoid every placement already generated in the section, in
    /// any category, by `max(own min_separation, other min_separation)`.
    pub fn generate(
        &mut self,
        section: usize,
        category: usize,
        categories: &[CategoryConfig],
    ) -> (&[Placement], Option<GenerationReport>) {
        let fresh = match self.sections.get(&section) {
            Some(entry) => entry.category(category).is_none(),
            None => true,
        };
        let report = fresh.then(|| self.sample(section, category, categories));

        let placements = self
            .sections
            .get(&section)
            .and_then(|s| s.category(category))
            .unwrap_or(&[]);
        (placements, report)
    }

    fn sample(
        &mut self,
        section: usize,
        category: usize,
        categories: &[CategoryConfig],
    ) -> GenerationReport {
        let bounds = SectionBounds::for_index(section, self.section_length, self.runway_offset);
        let Some(config) = categories.get(category) else {
            log::warn!("Unknown category {category} requested for section {section}");
            return GenerationReport {
                section,
                category,
                placed: 0,
                target: 0,
                attempts: 0,
            };
        };

        let mut rng = self.rng_for(section, category);
        let half_width = self.half_width;
        let category_count = self.category_count.max(category + 1);
        let entry = self
            .sections
            .entry(section)
            .or_insert_with(|| SectionPlacements::new(bounds, category_count));

        // Everything already in the section, with its required clearance
        let existing: Vec<(Vec3, f32)> = entry
            .all()
            .map(|p| {
                let sep = categories
                    .get(p.category)
                    .map_or(0.0, |c| c.min_separation);
                (p.position, sep)
            })
            .collect();

        let target = config.target_count;
        let max_attempts = target.saturating_mul(self.attempt_factor);
        let own_sep = config.min_separation;
        let mut accepted: Vec<Placement> = Vec::with_capacity(target as usize);
        let mut attempts = 0u32;

        while (accepted.len() as u32) < target && attempts < max_attempts {
            attempts += 1;

            let x = rng.random_range(-half_width..half_width);
            // z in (end_z, start_z]
            let t: f32 = rng.random();
            let z = bounds.start_z - t * bounds.length();
            let candidate = Vec3::new(x, config.height, z);

            let clear_of_existing = existing
                .iter()
                .all(|&(pos, sep)| planar_distance(candidate, pos) >= sep.max(own_sep));
            let clear_of_own = accepted
                .iter()
                .all(|p| planar_distance(candidate, p.position) >= own_sep);

            if clear_of_existing && clear_of_own {
                accepted.push(Placement {
                    position: candidate,
                    category,
                    consumed: false,
                });
            }
        }

        let report = GenerationReport {
            section,
            category,
            placed: accepted.len() as u32,
            target,
            attempts,
        };
        if report.is_shortfall() {
            log::warn!(
                "Section {} `{}`: placed {}/{} after {} attempts",
                section,
                config.name,
                report.placed,
                report.target,
                report.attempts
            );
        } else {
            log::debug!(
                "Section {} `{}`: placed {} in {} attempts",
                section,
                config.name,
                report.placed,
                report.attempts
            );
        }

        if entry.by_category.len() <= category {
            entry.by_category.resize(category + 1, None);
        }
        entry.by_category[category] = Some(accepted);
        report
    }

    /// Generate every category of a section in config order. Returns the
    /// reports of pairs that were generated by this call.
    pub fn materialize(
        &mut self,
        section: usize,
        categories: &[CategoryConfig],
    ) -> Vec<GenerationReport> {
        (0..categories.len())
            .filter_map(|category| self.generate(section, category, categories).1)
            .collect()
    }

    pub fn section(&self, section: usize) -> Option<&SectionPlacements> {
        self.sections.get(&section)
    }

    pub(crate) fn section_mut(&mut self, section: usize) -> Option<&mut SectionPlacements> {
        self.sections.get_mut(&section)
    }

    /// Cached placements of one pair, without generating
    pub fn placements(&self, section: usize, category: usize) -> Option<&[Placement]> {
        self.sections.get(&section)?.category(category)
    }

    pub fn is_generated(&self, section: usize) -> bool {
        self.sections
            .get(&section)
            .is_some_and(SectionPlacements::is_complete)
    }

    /// Number of sections with any cached placements
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::CategoryKind;
    use proptest::prelude::*;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    fn category(name: &str, kind: CategoryKind, count: u32, sep: f32) -> CategoryConfig {
        CategoryConfig {
            name: name.into(),
            kind,
            model_ref: String::new(),
            scale: 1.0,
            target_count: count,
            collision_radius: 8.0,
            score_delta: if kind == CategoryKind::Hazard { 0 } else { 10 },
            min_separation: sep,
            height: 1.0,
            float_amplitude: 0.0,
            rotation_speed: 0.0,
            base_rotation: [0.0; 3],
        }
    }

    fn assert_separated(section: &SectionPlacements, categories: &[CategoryConfig]) {
        let all: Vec<&Placement> = section.all().collect();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                let required = categories[a.category]
                    .min_separation
                    .max(categories[b.category].min_separation);
                let d = planar_distance(a.position, b.position);
                assert!(
                    d >= required,
                    "{:?} and {:?} only {} apart (need {})",
                    a.position,
                    b.position,
                    d,
                    required
                );
            }
        }
    }

    #[test]
    fn test_generation_is_cached() {
        let cfg = config();
        let mut generator = PlacementGenerator::new(&cfg);

        let (first, report) = generator.generate(1, 0, &cfg.categories);
        let first = first.to_vec();
        assert!(report.is_some());

        let (second, report) = generator.generate(1, 0, &cfg.categories);
        assert!(report.is_none());
        assert_eq!(first, second);
    }

    #[test]
    fn test_placements_inside_section_and_field() {
        let cfg = config();
        let mut generator = PlacementGenerator::new(&cfg);
        for section in [0, 1, 7] {
            generator.materialize(section, &cfg.categories);
            let s = generator.section(section).unwrap();
            assert!(s.is_complete());
            for p in s.all() {
                assert!(s.bounds.contains_z(p.position.z), "{:?} outside {:?}", p, s.bounds);
                assert!(p.position.x >= cfg.left_bound && p.position.x < cfg.right_bound);
                assert_eq!(p.position.y, cfg.categories[p.category].height);
            }
        }
        // Runway before section 0 stays empty
        assert!(generator.section(0).unwrap().all().all(|p| p.position.z <= -250.0));
    }

    #[test]
    fn test_default_sections_respect_separation() {
        let cfg = config();
        let mut generator = PlacementGenerator::new(&cfg);
        generator.materialize(3, &cfg.categories);
        assert_separated(generator.section(3).unwrap(), &cfg.categories);
    }

    #[test]
    fn test_shortfall_is_bounded() {
        let mut cfg = config();
        // Far more than a 1000 x 1750 area can hold at this spacing
        cfg.categories = vec![category("rock", CategoryKind::Hazard, 5000, 200.0)];
        let mut generator = PlacementGenerator::new(&cfg);
        let reports = generator.materialize(0, &cfg.categories);

        assert_eq!(reports.len(), 1);
        let report = reports[0];
        assert!(report.is_shortfall());
        assert_eq!(report.attempts, 5000 * cfg.attempt_factor);
        assert!(report.placed > 0);
        assert_separated(generator.section(0).unwrap(), &cfg.categories);
    }

    #[test]
    fn test_collectibles_avoid_hazards() {
        let mut cfg = config();
        cfg.categories = vec![
            category("pumpkin", CategoryKind::Hazard, 200, 10.0),
            category("candy", CategoryKind::Collectible, 100, 40.0),
        ];
        let mut generator = PlacementGenerator::new(&cfg);
        generator.materialize(2, &cfg.categories);

        let s = generator.section(2).unwrap();
        let hazards = s.category(0).unwrap();
        let candies = s.category(1).unwrap();
        for c in candies {
            for h in hazards {
                assert!(planar_distance(c.position, h.position) >= 40.0);
            }
        }
    }

    #[test]
    fn test_order_independent_per_pair() {
        let cfg = config();
        let mut a = PlacementGenerator::new(&cfg);
        let mut b = PlacementGenerator::new(&cfg);

        a.materialize(4, &cfg.categories);
        b.materialize(9, &cfg.categories);
        b.materialize(4, &cfg.categories);

        assert_eq!(a.placements(4, 0), b.placements(4, 0));
        assert_eq!(a.placements(4, 2), b.placements(4, 2));
    }

    #[test]
    fn test_zero_target_generates_empty_list() {
        let mut cfg = config();
        cfg.categories[1].target_count = 0;
        let mut generator = PlacementGenerator::new(&cfg);
        let (list, report) = generator.generate(0, 1, &cfg.categories);
        assert!(list.is_empty());
        assert_eq!(report.unwrap().attempts, 0);
        assert!(!report.unwrap().is_shortfall());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_pairwise_separation(
            seed in any::<u64>(),
            section in 0usize..50,
            hazard_sep in 0.0f32..60.0,
            pickup_sep in 0.0f32..60.0,
        ) {
            let mut cfg = config();
            cfg.seed = seed;
            cfg.categories = vec![
                category("hazard", CategoryKind::Hazard, 120, hazard_sep),
                category("pickup", CategoryKind::Collectible, 60, pickup_sep),
            ];
            let mut generator = PlacementGenerator::new(&cfg);
            generator.materialize(section, &cfg.categories);
            assert_separated(generator.section(section).unwrap(), &cfg.categories);
        }
    }
}
