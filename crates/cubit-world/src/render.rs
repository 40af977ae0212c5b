//! Capabilities consumed from the rendering subsystem.
//!
//! The scene graph, camera and frame buffer live outside this crate. Only
//! [`crate::SceneSync`] creates or destroys objects through [`RenderScene`];
//! [`crate::ShiftedOverlay`] is the only user of [`ViewportBackend`].

use glam::Vec3;

use crate::error::SceneError;
use crate::occlusion::VisibleFaces;
use crate::voxel::Color;

/// Opaque identifier of a drawable object created by the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(pub u32);

/// Everything the scene needs to build one voxel box.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderObject {
    /// World-space position (`coord × voxel_size`).
    pub position: Vec3,
    /// Base color.
    pub color: Color,
    /// Quarter-turn rotation per axis.
    pub rotation: [i32; 3],
    /// Mirror flags per axis.
    pub flip: [bool; 3],
    /// Texture index per face, if textured.
    pub texture: Option<[i32; 6]>,
    /// Faces that receive geometry.
    pub faces: VisibleFaces,
    /// Back-face culling for the object as a whole.
    pub culling: bool,
    /// Whether individual faces may be culled against the view.
    pub per_face_culling: bool,
}

/// Result of a nearest-hit ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the query direction, in multiples of its length.
    pub distance: f32,
    /// The object that was hit.
    pub handle: RenderHandle,
}

/// Object creation and destruction in the render scene.
pub trait RenderScene {
    /// Adds a voxel box and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError`] when the scene refuses to create the object.
    fn add_object(&mut self, object: &RenderObject) -> Result<RenderHandle, SceneError>;

    /// Removes a previously added object. Unknown handles are ignored.
    fn remove_object(&mut self, handle: RenderHandle);
}

/// Viewpoint, draw calls and ray queries of the rendering subsystem.
pub trait ViewportBackend {
    /// Target that render and wireframe calls draw into.
    type Buffer;

    /// Moves the viewpoint by `delta` in world space.
    fn move_viewpoint(&mut self, delta: Vec3);

    /// Current viewpoint position.
    fn viewpoint_position(&self) -> Vec3;

    /// Renders the current scene into `buffer`.
    fn render_scene(&mut self, buffer: &mut Self::Buffer);

    /// Draws the scene as a wireframe in `color`.
    fn draw_wireframe(&mut self, buffer: &mut Self::Buffer, color: Color);

    /// Casts a ray and returns the closest object within `max_distance`.
    fn nearest_hit(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;
}
