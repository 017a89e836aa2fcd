//! Track sections and the visibility window
//!
//! The track runs toward -Z and is cut into sections of length `L`. Section
//! `k > 0` spans `z ∈ (-(k+1)·L, -k·L]`; section 0 starts later, at
//! `-runway_offset`, so the first stretch after spawn is empty.

use serde::{Deserialize, Serialize};

use crate::tuning::GameConfig;

/// Z extent of one section. `start_z` is the bound nearer the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub start_z: f32,
    pub end_z: f32,
}

impl SectionBounds {
    /// Bounds of section `index` for the given length and runway
    pub fn for_index(index: usize, section_length: f32, runway_offset: f32) -> Self {
        if index == 0 {
            Self {
                start_z: -runway_offset,
                end_z: -section_length,
            }
        } else {
            let start_z = -(index as f32) * section_length;
            Self {
                start_z,
                end_z: start_z - section_length,
            }
        }
    }

    pub fn from_config(index: usize, config: &GameConfig) -> Self {
        Self::for_index(index, config.section_length, config.runway_offset)
    }

    /// Length along Z
    #[inline]
    pub fn length(&self) -> f32 {
        self.start_z - self.end_z
    }

    /// Whether `z` falls in `(end_z, start_z]`
    #[inline]
    pub fn contains_z(&self, z: f32) -> bool {
        z <= self.start_z && z > self.end_z
    }
}

/// Result of a window move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowChange {
    /// Section the player is now in
    pub current: usize,
    /// Sections visible for the first time this session, ascending
    pub revealed: Vec<usize>,
}

/// Sliding set of materialized sections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionWindow {
    section_length: f32,
    visible_count: usize,
    total_sections: usize,
    /// Index the window was last computed for
    current: Option<usize>,
    /// Currently visible, ascending
    visible: Vec<usize>,
    /// Highest index ever revealed
    high_water: Option<usize>,
}

impl SectionWindow {
    pub fn new(section_length: f32, visible_count: usize, total_sections: usize) -> Self {
        Self {
            section_length,
            visible_count,
            total_sections,
            current: None,
            visible: Vec::with_capacity(visible_count),
            high_water: None,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.section_length,
            config.visible_sections,
            config.total_sections,
        )
    }

    /// Section index for a forward distance
    #[inline]
    pub fn index_for(&self, distance: f32) -> usize {
        (distance.max(0.0) / self.section_length).floor() as usize
    }

    /// Recompute the window for `distance`.
    ///
    /// Returns `None` unless the section index moved forward. Moving back
    /// across a boundary is never handled; travel is assumed monotonic.
    pub fn advance(&mut self, distance: f32) -> Option<WindowChange> {
        let index = self.index_for(distance);
        if let Some(current) = self.current {
            if index <= current {
                return None;
            }
        }
        self.current = Some(index);

        let end = index
            .saturating_add(self.visible_count)
            .min(self.total_sections);
        self.visible = (index..end).collect();

        let revealed: Vec<usize> = self
            .visible
            .iter()
            .copied()
            .filter(|&i| self.high_water.is_none_or(|hw| i > hw))
            .collect();
        if let Some(&last) = revealed.last() {
            self.high_water = Some(last);
        }

        Some(WindowChange {
            current: index,
            revealed,
        })
    }

    /// Visible section indices, ascending
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_visible(&self, section: usize) -> bool {
        self.visible.binary_search(&section).is_ok()
    }
}
