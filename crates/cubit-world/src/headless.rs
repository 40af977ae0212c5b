//! In-memory scene with a viewpoint and frame log.
//!
//! Stands in for the rendering subsystem in tools and tests: objects are kept
//! as axis-aligned boxes, ray queries use the slab test, and draw calls are
//! appended to a [`FrameLog`] instead of touching pixels.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::error::SceneError;
use crate::render::{RayHit, RenderHandle, RenderObject, RenderScene, ViewportBackend};
use crate::voxel::Color;

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEntry {
    /// Full scene render.
    Scene {
        /// Viewpoint at draw time.
        viewpoint: Vec3,
        /// Objects in the scene at draw time.
        objects: usize,
    },
    /// Wireframe pass.
    Wireframe {
        /// Viewpoint at draw time.
        viewpoint: Vec3,
        /// Line color.
        color: Color,
    },
}

/// Draw target for [`HeadlessScene`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameLog {
    /// Draw calls in order.
    pub entries: Vec<FrameEntry>,
}

impl FrameLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Clone, Debug)]
struct SceneObject {
    object: RenderObject,
    min: Vec3,
    max: Vec3,
}

/// Renderer-less implementation of [`RenderScene`] and [`ViewportBackend`].
#[derive(Debug)]
pub struct HeadlessScene {
    objects: FxHashMap<RenderHandle, SceneObject>,
    next_handle: u32,
    half_extent: f32,
    viewpoint: Vec3,
    capacity: Option<usize>,
    created: usize,
    removed: usize,
}

impl HeadlessScene {
    /// Creates an empty scene whose boxes have edge length `voxel_size`.
    pub fn new(voxel_size: f32) -> Self {
        Self {
            objects: FxHashMap::default(),
            next_handle: 1,
            half_extent: voxel_size * 0.5,
            viewpoint: Vec3::ZERO,
            capacity: None,
            created: 0,
            removed: 0,
        }
    }

    /// Refuses new objects once `capacity` of them exist. `None` lifts the limit.
    pub fn set_capacity(&mut self, capacity: Option<usize>) {
        self.capacity = capacity;
    }

    /// Number of objects currently in the scene.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Object description for `handle`.
    pub fn object(&self, handle: RenderHandle) -> Option<&RenderObject> {
        self.objects.get(&handle).map(|o| &o.object)
    }

    /// Returns `true` if `handle` names a live object.
    pub fn contains(&self, handle: RenderHandle) -> bool {
        self.objects.contains_key(&handle)
    }

    /// Total `add_object` successes since construction.
    pub fn created_total(&self) -> usize {
        self.created
    }

    /// Total `remove_object` calls that found their object.
    pub fn removed_total(&self) -> usize {
        self.removed
    }
}

impl RenderScene for HeadlessScene {
    fn add_object(&mut self, object: &RenderObject) -> Result<RenderHandle, SceneError> {
        if let Some(capacity) = self.capacity
            && self.objects.len() >= capacity
        {
            return Err(SceneError::CapacityExhausted(capacity));
        }
        if !object.position.is_finite() {
            return Err(SceneError::Rejected(format!(
                "non-finite position {}",
                object.position
            )));
        }
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        let half = Vec3::splat(self.half_extent);
        self.objects.insert(
            handle,
            SceneObject {
                object: object.clone(),
                min: object.position - half,
                max: object.position + half,
            },
        );
        self.created += 1;
        Ok(handle)
    }

    fn remove_object(&mut self, handle: RenderHandle) {
        if self.objects.remove(&handle).is_some() {
            self.removed += 1;
        }
    }
}

impl ViewportBackend for HeadlessScene {
    type Buffer = FrameLog;

    fn move_viewpoint(&mut self, delta: Vec3) {
        self.viewpoint += delta;
    }

    fn viewpoint_position(&self) -> Vec3 {
        self.viewpoint
    }

    fn render_scene(&mut self, buffer: &mut FrameLog) {
        buffer.entries.push(FrameEntry::Scene {
            viewpoint: self.viewpoint,
            objects: self.objects.len(),
        });
    }

    fn draw_wireframe(&mut self, buffer: &mut FrameLog, color: Color) {
        buffer.entries.push(FrameEntry::Wireframe {
            viewpoint: self.viewpoint,
            color,
        });
    }

    fn nearest_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.objects
            .iter()
            .filter_map(|(&handle, o)| {
                ray_box_entry(origin, direction, o.min, o.max)
                    .filter(|&t| t <= max_distance)
                    .map(|distance| RayHit { distance, handle })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Slab-method entry parameter of the ray `origin + t·direction` into the box,
/// clamped to 0 when the origin is inside.
fn ray_box_entry(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    for axis in 0..3 {
        let (o, d) = (origin[axis], direction[axis]);
        if d.abs() < f32::EPSILON {
            // Parallel to this slab: either always inside it or never.
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let t1 = (min[axis] - o) / d;
        let t2 = (max[axis] - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }
    (t_near <= t_far && t_far >= 0.0).then(|| t_near.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occlusion::VisibleFaces;

    fn object_at(position: Vec3) -> RenderObject {
        RenderObject {
            position,
            color: Color::WHITE,
            rotation: [0; 3],
            flip: [false; 3],
            texture: None,
            faces: VisibleFaces::ALL,
            culling: true,
            per_face_culling: true,
        }
    }

    #[test]
    fn test_add_remove_tracks_objects() {
        let mut scene = HeadlessScene::new(1.0);
        let h = scene.add_object(&object_at(Vec3::ZERO)).unwrap();
        assert!(scene.contains(h));
        scene.remove_object(h);
        scene.remove_object(h);
        assert_eq!(scene.object_count(), 0);
        assert_eq!(scene.removed_total(), 1);
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut scene = HeadlessScene::new(1.0);
        let a = scene.add_object(&object_at(Vec3::ZERO)).unwrap();
        scene.remove_object(a);
        let b = scene.add_object(&object_at(Vec3::ZERO)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_capacity_rejects_extra_objects() {
        let mut scene = HeadlessScene::new(1.0);
        scene.set_capacity(Some(1));
        scene.add_object(&object_at(Vec3::ZERO)).unwrap();
        let err = scene.add_object(&object_at(Vec3::X)).unwrap_err();
        assert_eq!(err, SceneError::CapacityExhausted(1));
    }

    #[test]
    fn test_non_finite_position_is_rejected() {
        let mut scene = HeadlessScene::new(1.0);
        let err = scene
            .add_object(&object_at(Vec3::new(f32::NAN, 0.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, SceneError::Rejected(_)));
        assert_eq!(scene.object_count(), 0);
        assert_eq!(scene.created_total(), 0);
    }

    #[test]
    fn test_nearest_hit_picks_closest_box() {
        let mut scene = HeadlessScene::new(1.0);
        let far = scene.add_object(&object_at(Vec3::new(0.0, 0.0, -10.0))).unwrap();
        let near = scene.add_object(&object_at(Vec3::new(0.0, 0.0, -4.0))).unwrap();
        let hit = scene
            .nearest_hit(Vec3::ZERO, Vec3::NEG_Z, 100.0)
            .expect("ray should hit");
        assert_eq!(hit.handle, near);
        assert_ne!(hit.handle, far);
        assert!((hit.distance - 3.5).abs() < 1e-5);
    }

    #[test]
    fn test_nearest_hit_respects_max_distance() {
        let mut scene = HeadlessScene::new(1.0);
        scene.add_object(&object_at(Vec3::new(0.0, 0.0, -50.0))).unwrap();
        assert!(scene.nearest_hit(Vec3::ZERO, Vec3::NEG_Z, 10.0).is_none());
    }

    #[test]
    fn test_ray_misses_box_behind_origin() {
        assert!(ray_box_entry(Vec3::ZERO, Vec3::X, Vec3::splat(-3.0), Vec3::splat(-2.0)).is_none());
    }

    #[test]
    fn test_draw_calls_record_viewpoint() {
        let mut scene = HeadlessScene::new(1.0);
        let mut log = FrameLog::new();
        scene.move_viewpoint(Vec3::Y);
        scene.render_scene(&mut log);
        scene.draw_wireframe(&mut log, Color::BLACK);
        assert_eq!(
            log.entries,
            vec![
                FrameEntry::Scene {
                    viewpoint: Vec3::Y,
                    objects: 0
                },
                FrameEntry::Wireframe {
                    viewpoint: Vec3::Y,
                    color: Color::BLACK
                },
            ]
        );
    }
}
