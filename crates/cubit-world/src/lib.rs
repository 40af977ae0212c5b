//! Incremental voxel-to-scene synchronization: a sparse voxel store with
//! neighbor adjacency, per-voxel face occlusion, bounded per-frame scene
//! refresh, and a shifted preview overlay for selections being dragged.

pub mod dirty;
pub mod error;
pub mod face_direction;
pub mod headless;
mod mapping;
pub mod node;
pub mod occlusion;
pub mod overlay;
pub mod render;
pub mod store;
pub mod sync;
pub mod voxel;
pub mod world;

pub use cubit_config::SidePreset;
pub use dirty::DirtySet;
pub use error::{SceneError, SyncError};
pub use face_direction::FaceDirection;
pub use headless::{FrameEntry, FrameLog, HeadlessScene};
pub use node::{NodeId, VoxelNode};
pub use occlusion::{OcclusionMask, VisibleFaces};
pub use overlay::{DEFAULT_RAY_MAX_DISTANCE, ShiftedOverlay};
pub use render::{RayHit, RenderHandle, RenderObject, RenderScene, ViewportBackend};
pub use store::VoxelStore;
pub use sync::{DEFAULT_BATCH_SIZE, FaceMode, SceneSync, SyncStats};
pub use voxel::{Color, DEFAULT_VOXEL_SIZE, Voxel, VoxelCoord, VoxelId};
pub use world::VoxelWorld;
