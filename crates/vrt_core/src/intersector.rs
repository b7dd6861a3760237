//! The intersection query the kernel consumes.

use serde::{Deserialize, Serialize};
use vrt_math::Ray;

use crate::hit::HitRecord;

/// Bitmask of scene layers a ray is allowed to hit.
///
/// Layer numbers are 0-31. Geometry on an excluded layer (UI panels, debug
/// gizmos) is invisible to every ray the kernel casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Layer reserved for geometry the tracer must ignore.
    pub const IGNORE_RAYCAST: u32 = 9;

    /// Every layer.
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Every layer except `IGNORE_RAYCAST`.
    pub const TRACEABLE: LayerMask = LayerMask(!(1 << Self::IGNORE_RAYCAST));

    /// Return a mask with `layer` removed.
    pub fn excluding(self, layer: u32) -> Self {
        LayerMask(self.0 & !(1u32 << (layer & 31)))
    }

    /// Check whether geometry on `layer` can be hit.
    pub fn contains(self, layer: u32) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::TRACEABLE
    }
}

/// Trait for the scene traversal subsystem.
///
/// Used for primary hits, recursive bounces, shadow rays and ambient
/// occlusion rays. Implementations return the nearest hit with
/// `0 < distance < max_distance` on a layer contained in `layers`.
pub trait Intersector: Send + Sync {
    fn intersect(&self, ray: &Ray, max_distance: f32, layers: LayerMask) -> Option<HitRecord>;
}
