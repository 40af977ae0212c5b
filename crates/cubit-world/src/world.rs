//! [`VoxelWorld`]: the store, its scene synchronizer and the shifted overlay
//! bundled around one render scene.

use cubit_config::Config;
use glam::{IVec3, Vec3};

use crate::error::SyncError;
use crate::occlusion::OcclusionMask;
use crate::overlay::ShiftedOverlay;
use crate::render::{RenderHandle, RenderScene, ViewportBackend};
use crate::store::VoxelStore;
use crate::sync::SceneSync;
use crate::voxel::{Color, Voxel, VoxelCoord, VoxelId};

/// Voxel data set kept in sync with a render scene `S`.
///
/// Edits go straight to the store and only mark nodes dirty. The owner calls
/// [`refresh`](Self::refresh) once per frame until it returns `true`.
#[derive(Debug)]
pub struct VoxelWorld<S> {
    store: VoxelStore,
    sync: SceneSync,
    overlay: ShiftedOverlay,
    scene: S,
    batch_size: usize,
}

impl<S> VoxelWorld<S> {
    /// Builds a world over `scene` using the `world`, `sync` and `overlay`
    /// config sections. These settings are fixed for the world's lifetime.
    pub fn new(config: &Config, scene: S) -> Self {
        Self {
            store: VoxelStore::new(),
            sync: SceneSync::from_config(&config.world),
            overlay: ShiftedOverlay::new(config.world.voxel_size, config.overlay.ray_max_distance),
            scene,
            batch_size: config.sync.batch_size.max(1),
        }
    }

    /// Inserts or refreshes a voxel.
    pub fn upsert(&mut self, voxel: Voxel) {
        self.store.upsert(voxel);
    }

    /// Removes the voxel at `coord`. Returns `false` if there was none.
    pub fn remove_at(&mut self, coord: impl Into<VoxelCoord>) -> bool {
        self.store.remove_at(coord.into())
    }

    /// Removes the voxel at the coordinate of `voxel`.
    pub fn remove_exact(&mut self, voxel: &Voxel) -> bool {
        self.store.remove_exact(voxel)
    }

    /// Removes every voxel.
    pub fn clear_all(&mut self) -> usize {
        self.store.clear_all()
    }

    /// Voxels with at least one exposed face, with their occlusion masks.
    pub fn visible_voxels(&self) -> Vec<(Voxel, OcclusionMask)> {
        self.store.visible_voxels()
    }

    /// Voxel id drawn by scene object `handle`.
    pub fn lookup_voxel_id(&self, handle: RenderHandle) -> Option<VoxelId> {
        self.sync.lookup_voxel_id(handle)
    }

    /// Sets the selection preview shift, in voxels.
    pub fn set_shift(&mut self, shift: impl Into<IVec3>) {
        self.overlay.set_shift(shift.into());
    }

    /// Read access to the voxel store.
    pub fn store(&self) -> &VoxelStore {
        &self.store
    }

    /// Read access to the synchronizer.
    pub fn sync(&self) -> &SceneSync {
        &self.sync
    }

    /// Read access to the overlay.
    pub fn overlay(&self) -> &ShiftedOverlay {
        &self.overlay
    }

    /// Read access to the render scene.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Batch size used by [`refresh`](Self::refresh). Never zero.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of voxels waiting for scene synchronization.
    pub fn pending_sync(&self) -> usize {
        self.store.pending_sync()
    }
}

impl<S: RenderScene> VoxelWorld<S> {
    /// Syncs at most `max_count` dirty voxels. Returns `true` when fully synced.
    ///
    /// # Errors
    ///
    /// See [`SceneSync::refresh_batch`].
    pub fn refresh_batch(&mut self, max_count: usize) -> Result<bool, SyncError> {
        self.sync.refresh_batch(&mut self.store, &mut self.scene, max_count)
    }

    /// One frame's worth of syncing with the configured batch size.
    ///
    /// # Errors
    ///
    /// See [`SceneSync::refresh_batch`].
    pub fn refresh(&mut self) -> Result<bool, SyncError> {
        self.refresh_batch(self.batch_size)
    }

    /// Syncs until nothing is pending. Returns the number of batches used.
    ///
    /// # Errors
    ///
    /// See [`SceneSync::refresh_all`].
    pub fn refresh_all(&mut self) -> Result<usize, SyncError> {
        self.sync.refresh_all(&mut self.store, &mut self.scene, self.batch_size)
    }
}

impl<S: ViewportBackend> VoxelWorld<S> {
    /// Renders the scene and wireframe from the shifted viewpoint, or from the
    /// nominal one with `primary` when no shift is set.
    pub fn draw_shifted_overlay(&mut self, buffer: &mut S::Buffer, primary: Color, shifted: Color) {
        self.overlay.draw_shifted_overlay(&mut self.scene, buffer, primary, shifted);
    }

    /// World-space point where a ray from the shifted viewpoint hits the scene.
    pub fn collision_along_shifted_ray(&mut self, direction: Vec3) -> Option<Vec3> {
        self.overlay.collision_along_shifted_ray(&mut self.scene, direction)
    }
}
