//! Preview and hit-testing of a selection displaced by a pending move.
//!
//! No geometry moves: the overlay shifts the viewpoint by the stored shift,
//! draws or queries, and shifts it back. The restore lives in
//! `ShiftedViewpoint`'s `Drop`, so it runs on every exit path.

use std::ops::{Deref, DerefMut};

use glam::{IVec3, Vec3};

use crate::render::ViewportBackend;
use crate::voxel::{Color, DEFAULT_VOXEL_SIZE};

/// Ray length used for shifted collision queries.
pub const DEFAULT_RAY_MAX_DISTANCE: f32 = 100_000.0;

/// Displacement of the selection preview, in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct ShiftedOverlay {
    direction: Vec3,
    magnitude: f32,
    voxel_size: f32,
    ray_max_distance: f32,
}

impl ShiftedOverlay {
    /// Creates an overlay with no shift.
    pub fn new(voxel_size: f32, ray_max_distance: f32) -> Self {
        Self {
            direction: Vec3::ZERO,
            magnitude: 0.0,
            voxel_size,
            ray_max_distance,
        }
    }

    /// Stores a shift given in voxels. A zero vector disables shifting.
    pub fn set_shift(&mut self, shift: IVec3) {
        let offset = shift.as_vec3();
        self.magnitude = offset.length() * self.voxel_size;
        self.direction = offset.normalize_or_zero();
    }

    /// Unit direction of the shift (zero when disabled).
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Length of the shift in world units.
    pub fn magnitude(&self) -> f32 {
        self.magnitude
    }

    /// World-space displacement applied to the viewpoint.
    pub fn offset(&self) -> Vec3 {
        self.direction * self.magnitude
    }

    /// Returns `true` if a nonzero shift is set.
    pub fn is_shifted(&self) -> bool {
        self.magnitude != 0.0
    }

    /// Renders the scene and its wireframe, seen from the shifted viewpoint
    /// when a shift is set.
    ///
    /// The wireframe uses `shifted` while a shift is active and `primary`
    /// otherwise.
    pub fn draw_shifted_overlay<B>(
        &self,
        backend: &mut B,
        buffer: &mut B::Buffer,
        primary: Color,
        shifted: Color,
    ) where
        B: ViewportBackend + ?Sized,
    {
        if self.is_shifted() {
            let mut view = ShiftedViewpoint::new(backend, self.offset());
            view.render_scene(buffer);
            view.draw_wireframe(buffer, shifted);
        } else {
            backend.render_scene(buffer);
            backend.draw_wireframe(buffer, primary);
        }
    }

    /// Casts a ray from the shifted viewpoint along `direction` and returns the
    /// world-space hit point, `viewpoint + direction × distance`.
    pub fn collision_along_shifted_ray<B>(&self, backend: &mut B, direction: Vec3) -> Option<Vec3>
    where
        B: ViewportBackend + ?Sized,
    {
        let view = ShiftedViewpoint::new(backend, self.offset());
        let origin = view.viewpoint_position();
        view.nearest_hit(origin, direction, self.ray_max_distance)
            .map(|hit| origin + direction * hit.distance)
    }
}

impl Default for ShiftedOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_VOXEL_SIZE, DEFAULT_RAY_MAX_DISTANCE)
    }
}

/// Moves a backend's viewpoint for as long as the guard lives.
struct ShiftedViewpoint<'a, B: ViewportBackend + ?Sized> {
    backend: &'a mut B,
    delta: Vec3,
}

impl<'a, B: ViewportBackend + ?Sized> ShiftedViewpoint<'a, B> {
    fn new(backend: &'a mut B, delta: Vec3) -> Self {
        backend.move_viewpoint(delta);
        Self { backend, delta }
    }
}

impl<B: ViewportBackend + ?Sized> Deref for ShiftedViewpoint<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        &*self.backend
    }
}

impl<B: ViewportBackend + ?Sized> DerefMut for ShiftedViewpoint<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        &mut *self.backend
    }
}

impl<B: ViewportBackend + ?Sized> Drop for ShiftedViewpoint<'_, B> {
    fn drop(&mut self) {
        self.backend.move_viewpoint(-self.delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_shift_scales_by_voxel_size() {
        let mut overlay = ShiftedOverlay::new(0.5, DEFAULT_RAY_MAX_DISTANCE);
        overlay.set_shift(IVec3::new(0, 4, 0));
        assert_eq!(overlay.direction(), Vec3::Y);
        assert!((overlay.magnitude() - 2.0).abs() < 1e-6);
        assert!((overlay.offset() - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_diagonal_shift_is_normalized() {
        let mut overlay = ShiftedOverlay::new(1.0, DEFAULT_RAY_MAX_DISTANCE);
        overlay.set_shift(IVec3::new(3, 4, 0));
        assert!((overlay.direction().length() - 1.0).abs() < 1e-6);
        assert!((overlay.magnitude() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_shift_disables() {
        let mut overlay = ShiftedOverlay::default();
        overlay.set_shift(IVec3::new(1, 0, 0));
        assert!(overlay.is_shifted());
        overlay.set_shift(IVec3::ZERO);
        assert!(!overlay.is_shifted());
        assert_eq!(overlay.offset(), Vec3::ZERO);
    }
}
