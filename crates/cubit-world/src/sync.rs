//! Amortized synchronization of dirty voxels into the render scene.
//!
//! Each call to [`SceneSync::refresh_batch`] handles a bounded number of dirty
//! nodes so that bulk edits spread their scene rebuild over several frames.
//! A node's representation is always rebuilt from its state at the moment it
//! is processed; the dirty mark only says "look again".

use cubit_config::{SidePreset, WorldConfig};
use tracing::{debug, trace, warn};

use crate::error::SyncError;
use crate::mapping::RenderMapping;
use crate::node::{NodeId, VoxelNode};
use crate::occlusion::OcclusionMask;
use crate::render::{RenderHandle, RenderObject, RenderScene};
use crate::store::VoxelStore;
use crate::voxel::VoxelId;

/// Default number of dirty nodes processed per batch.
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// How a node's occlusion mask is derived. Fixed for the lifetime of a [`SceneSync`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceMode {
    /// Faces are hidden where a neighbor is present.
    TrueOcclusion,
    /// Every voxel uses the same preset mask regardless of neighbors
    /// (sliced and flattened views).
    Fixed(OcclusionMask),
}

impl FaceMode {
    /// Mask showing only the −Z face.
    pub const SIDE_A: OcclusionMask = OcclusionMask(0b0001_1111);
    /// Mask showing only the −Y face.
    pub const SIDE_B: OcclusionMask = OcclusionMask(0b0011_0111);
    /// Mask showing only the −X face.
    pub const SIDE_C: OcclusionMask = OcclusionMask(0b0011_1101);

    /// Maps a configured side preset to its face mode.
    pub fn from_preset(preset: SidePreset) -> Self {
        match preset {
            SidePreset::AllSides => Self::TrueOcclusion,
            SidePreset::FixedSideA => Self::Fixed(Self::SIDE_A),
            SidePreset::FixedSideB => Self::Fixed(Self::SIDE_B),
            SidePreset::FixedSideC => Self::Fixed(Self::SIDE_C),
        }
    }

    /// Occlusion mask to render `node` with.
    pub fn mask_for(self, node: &VoxelNode) -> OcclusionMask {
        match self {
            Self::TrueOcclusion => node.occlusion(),
            Self::Fixed(mask) => mask,
        }
    }

    /// Per-face culling only makes sense when faces follow real neighbors.
    pub fn per_face_culling(self) -> bool {
        matches!(self, Self::TrueOcclusion)
    }
}

/// Counters for one call to [`SceneSync::refresh_batch`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Dirty nodes consumed.
    pub processed: usize,
    /// Scene objects created.
    pub created: usize,
    /// Scene objects destroyed.
    pub destroyed: usize,
}

/// Consumes the store's dirty set and keeps the scene and its handle mapping in step.
#[derive(Debug)]
pub struct SceneSync {
    face_mode: FaceMode,
    culling: bool,
    voxel_size: f32,
    mapping: RenderMapping,
    last_stats: SyncStats,
}

impl SceneSync {
    /// Creates a synchronizer with the given construction-time settings.
    pub fn new(culling: bool, preset: SidePreset, voxel_size: f32) -> Self {
        Self {
            face_mode: FaceMode::from_preset(preset),
            culling,
            voxel_size,
            mapping: RenderMapping::new(),
            last_stats: SyncStats::default(),
        }
    }

    /// Creates a synchronizer from the `world` config section.
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.culling, config.side_preset, config.voxel_size)
    }

    /// Processes at most `max_count` dirty nodes. Returns `true` once nothing
    /// is left to sync.
    ///
    /// With nothing dirty this touches neither the scene nor the mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Scene`] if the scene refuses to create an object.
    /// The failing node stays first in line and is retried on the next call.
    pub fn refresh_batch<S>(
        &mut self,
        store: &mut VoxelStore,
        scene: &mut S,
        max_count: usize,
    ) -> Result<bool, SyncError>
    where
        S: RenderScene + ?Sized,
    {
        let mut stats = SyncStats::default();
        while stats.processed < max_count {
            let Some(id) = store.dirty().front() else {
                break;
            };
            if let Err(err) = self.sync_node(store, scene, id, &mut stats) {
                warn!(%err, processed = stats.processed, "scene sync batch aborted");
                self.last_stats = stats;
                return Err(err);
            }
            store.dirty_mut().pop_front();
            if store.node(id).is_some_and(VoxelNode::is_removed) {
                store.release(id);
            }
            stats.processed += 1;
        }

        self.last_stats = stats;
        let remaining = store.pending_sync();
        if stats.processed > 0 {
            debug!(
                processed = stats.processed,
                created = stats.created,
                destroyed = stats.destroyed,
                remaining,
                "scene sync batch"
            );
        }
        Ok(remaining == 0)
    }

    /// Runs batches of `batch_size` until everything is synced. Returns the
    /// number of batches it took.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SyncError`] encountered.
    pub fn refresh_all<S>(
        &mut self,
        store: &mut VoxelStore,
        scene: &mut S,
        batch_size: usize,
    ) -> Result<usize, SyncError>
    where
        S: RenderScene + ?Sized,
    {
        let batch_size = batch_size.max(1);
        let mut batches = 0;
        loop {
            batches += 1;
            if self.refresh_batch(store, scene, batch_size)? {
                return Ok(batches);
            }
        }
    }

    /// Voxel id drawn by the scene object `handle`.
    pub fn lookup_voxel_id(&self, handle: RenderHandle) -> Option<VoxelId> {
        self.mapping.voxel_id(handle)
    }

    /// Scene object currently drawing voxel `id`.
    pub fn handle_for(&self, id: VoxelId) -> Option<RenderHandle> {
        self.mapping.handle(id)
    }

    /// Number of scene objects this synchronizer currently owns.
    pub fn live_representations(&self) -> usize {
        self.mapping.len()
    }

    /// Counters from the most recent batch.
    pub fn last_stats(&self) -> SyncStats {
        self.last_stats
    }

    /// Face mode chosen at construction.
    pub fn face_mode(&self) -> FaceMode {
        self.face_mode
    }

    /// World-space edge length used for placement.
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    fn sync_node<S>(
        &mut self,
        store: &mut VoxelStore,
        scene: &mut S,
        id: NodeId,
        stats: &mut SyncStats,
    ) -> Result<(), SyncError>
    where
        S: RenderScene + ?Sized,
    {
        let node = store.node_mut(id);

        // Drop the old object first so stale and fresh geometry never coexist.
        if let Some(handle) = node.take_render_handle() {
            scene.remove_object(handle);
            self.mapping.remove(handle);
            stats.destroyed += 1;
        }

        if node.is_removed() {
            trace!(coord = %node.voxel().coord, "removed voxel flushed");
            return Ok(());
        }

        let voxel = node.voxel();
        let object = RenderObject {
            position: voxel.coord.world_position(self.voxel_size),
            color: voxel.color,
            rotation: voxel.rotation,
            flip: voxel.flip,
            texture: voxel.texture,
            faces: self.face_mode.mask_for(node).visible_faces(),
            culling: self.culling,
            per_face_culling: self.face_mode.per_face_culling(),
        };
        let handle = scene
            .add_object(&object)
            .map_err(|source| SyncError::Scene {
                coord: voxel.coord,
                source,
            })?;

        let voxel_id = voxel.id;
        trace!(coord = %voxel.coord, handle = handle.0, "voxel synced");
        node.set_render_handle(handle);
        self.mapping.insert(handle, voxel_id);
        stats.created += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
