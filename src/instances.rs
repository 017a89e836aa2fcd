//! Instance transforms for the renderer
//!
//! The simulation only knows positions. This module turns the live
//! placements of each visible section into per-instance transforms laid out
//! for direct upload into an instance buffer.

use bytemuck::{Pod, Zeroable};

use crate::sim::{Placement, World};
use crate::tuning::CategoryConfig;

/// One rendered instance: translation, euler rotation (XYZ) and uniform scale
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub position: [f32; 3],
    pub scale: f32,
    pub rotation: [f32; 3],
    pub _pad: f32,
}

impl InstanceTransform {
    pub const fn new(position: [f32; 3], rotation: [f32; 3], scale: f32) -> Self {
        Self {
            position,
            scale,
            rotation,
            _pad: 0.0,
        }
    }

    /// Floats per instance in a flattened buffer
    pub const STRIDE_F32: usize = std::mem::size_of::<Self>() / std::mem::size_of::<f32>();
}

/// Transforms for one `(section, category)` pair
#[derive(Debug, Clone)]
pub struct InstanceBatch {
    pub section: usize,
    pub category: usize,
    /// Tint to apply to the shared material, if any
    pub tint: Option<[f32; 3]>,
    pub transforms: Vec<InstanceTransform>,
}

/// Transforms for the live placements of one category at time `time`.
///
/// Consumed slots are skipped, so the count shrinks as items are collected,
/// but each instance keeps the bob/spin phase of its original slot.
pub fn instance_transforms(
    placements: &[Placement],
    category: &CategoryConfig,
    time: f32,
) -> Vec<InstanceTransform> {
    let [rx, ry, rz] = category.base_rotation;
    placements
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_live())
        .map(|(slot, p)| {
            let phase = slot as f32;
            let bob = (time + phase * 0.5).sin() * category.float_amplitude;
            // Tilted models keep their rest orientation
            let spin = if rx == 0.0 {
                ry + time * category.rotation_speed + phase * 0.1
            } else {
                ry
            };
            InstanceTransform::new(
                [p.position.x, p.position.y + bob, p.position.z],
                [rx, spin, rz],
                category.scale,
            )
        })
        .collect()
}

/// Every visible batch, in section then category order
pub fn visible_batches(world: &World, time: f32) -> Vec<InstanceBatch> {
    let categories = &world.config().categories;
    let hazard_tint = world.progression().current_tint();

    let mut batches = Vec::new();
    for &section in world.visible_sections() {
        for (index, category) in categories.iter().enumerate() {
            let Some(placements) = world.placements().placements(section, index) else {
                continue;
            };
            batches.push(InstanceBatch {
                section,
                category: index,
                tint: if category.is_hazard() { hazard_tint } else { None },
                transforms: instance_transforms(placements, category, time),
            });
        }
    }
    batches
}

/// View transforms as raw floats for upload
pub fn as_floats(transforms: &[InstanceTransform]) -> &[f32] {
    bytemuck::cast_slice(transforms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::GameConfig;
    use glam::Vec3;

    fn placements(n: usize) -> Vec<Placement> {
        (0..n)
            .map(|i| Placement {
                position: Vec3::new(i as f32, 5.0, -300.0 - i as f32),
                category: 1,
                consumed: false,
            })
            .collect()
    }

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<InstanceTransform>(), 32);
        assert_eq!(InstanceTransform::STRIDE_F32, 8);

        let t = [InstanceTransform::new([1.0, 2.0, 3.0], [0.0, 0.5, 0.0], 2.0)];
        assert_eq!(as_floats(&t), &[1.0, 2.0, 3.0, 2.0, 0.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_consumed_slots_are_skipped() {
        let config = GameConfig::default();
        let mut list = placements(4);
        list[1].consumed = true;

        let transforms = instance_transforms(&list, &config.categories[1], 0.0);
        assert_eq!(transforms.len(), 3);
        assert_eq!(transforms[1].position[0], 2.0);
    }

    #[test]
    fn test_float_and_spin() {
        let config = GameConfig::default();
        let candy = &config.categories[1];
        let list = placements(1);

        let t = std::f32::consts::FRAC_PI_2;
        let transforms = instance_transforms(&list, candy, t);
        let expected_y = 5.0 + t.sin() * candy.float_amplitude;
        assert!((transforms[0].position[1] - expected_y).abs() < 1e-5);
        assert!((transforms[0].rotation[1] - t * candy.rotation_speed).abs() < 1e-5);
        assert_eq!(transforms[0].scale, candy.scale);
    }

    #[test]
    fn test_tilted_models_do_not_spin() {
        let mut config = GameConfig::default();
        config.categories[1].base_rotation = [0.3, 1.0, 0.0];
        let transforms = instance_transforms(&placements(2), &config.categories[1], 10.0);
        assert!(transforms.iter().all(|t| t.rotation == [0.3, 1.0, 0.0]));
    }

    #[test]
    fn test_visible_batches_cover_window() {
        let world = World::new(GameConfig::default()).unwrap();
        let batches = visible_batches(&world, 0.0);
        let categories = world.config().categories.len();
        assert_eq!(batches.len(), 3 * categories);
        assert_eq!(batches[0].section, 0);
        assert!(batches[0].tint.is_some());
        assert!(batches[1].tint.is_none());
        assert_eq!(batches.last().unwrap().section, 2);
    }
}
