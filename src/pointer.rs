//! Pointer snapshot supplied by the host every frame.

use glam::Vec3;

use crate::params::{GridTopology, RepulsionParams};

/// Pointer projected onto the simulation plane (world units)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub world: Vec3,
}

impl PointerState {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            world: Vec3::new(x, y, z),
        }
    }

    /// Whether the pointer hovers the particle field (surface bounds
    /// expanded by the repulsion margin). Only x and y are tested.
    pub fn hovers(&self, topology: &GridTopology, repulsion: &RepulsionParams) -> bool {
        let max_x = topology.surface_width / 2.0 + repulsion.boundary_margin;
        let max_y = topology.surface_height / 2.0 + repulsion.boundary_margin;
        self.world.x.abs() < max_x && self.world.y.abs() < max_y
    }
}

/// Push `position` away from the pointer.
///
/// Active only while repulsion is enabled and the pointer hovers the field;
/// `hovering` is evaluated once per frame by the caller. Falls off linearly
/// to zero at `range`. A particle exactly under the pointer has no push
/// direction and is left alone.
pub fn repel(position: Vec3, pointer: Vec3, hovering: bool, repulsion: &RepulsionParams) -> Vec3 {
    if !hovering || !repulsion.enabled {
        return position;
    }
    let delta = pointer - position;
    let distance = delta.length();
    if distance >= repulsion.range || distance <= f32::EPSILON {
        return position;
    }
    let force = (1.0 - distance / repulsion.range) * repulsion.strength;
    position - (delta / distance) * force * 0.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> RepulsionParams {
        RepulsionParams {
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_hover_bounds() {
        let topology = GridTopology::default();
        let repulsion = RepulsionParams::default();
        assert!(PointerState::at(0.0, 0.0, 0.0).hovers(&topology, &repulsion));
        assert!(PointerState::at(149.0, 0.0, 0.0).hovers(&topology, &repulsion));
        assert!(!PointerState::at(151.0, 0.0, 0.0).hovers(&topology, &repulsion));
        assert!(!PointerState::at(0.0, -65.0, 0.0).hovers(&topology, &repulsion));
    }

    #[test]
    fn test_repel_pushes_away() {
        let repulsion = enabled();
        let pushed = repel(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, true, &repulsion);
        // force = (1 - 10/100) * 20 = 18, scaled by 0.1
        assert!((pushed.x - 11.8).abs() < 1e-5);
        assert_eq!(pushed.y, 0.0);
    }

    #[test]
    fn test_repel_inactive_cases() {
        let p = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(repel(p, Vec3::ZERO, false, &enabled()), p);
        assert_eq!(repel(p, Vec3::ZERO, true, &RepulsionParams::default()), p);
        assert_eq!(repel(p, p, true, &enabled()), p);
        assert_eq!(repel(p, Vec3::new(500.0, 0.0, 0.0), true, &enabled()), p);
    }
}
