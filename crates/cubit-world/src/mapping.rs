//! Bidirectional render-handle ↔ voxel-id association.

use rustc_hash::FxHashMap;

use crate::render::RenderHandle;
use crate::voxel::VoxelId;

/// Maps scene objects back to the voxels they draw, and voxels to their objects.
///
/// Holds entries only for voxels currently represented in the scene.
#[derive(Debug, Default)]
pub(crate) struct RenderMapping {
    to_voxel: FxHashMap<RenderHandle, VoxelId>,
    to_handle: FxHashMap<VoxelId, RenderHandle>,
}

impl RenderMapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `handle` draws voxel `id`.
    pub fn insert(&mut self, handle: RenderHandle, id: VoxelId) {
        self.to_voxel.insert(handle, id);
        self.to_handle.insert(id, handle);
    }

    /// Forgets `handle`. Returns the voxel id it drew.
    pub fn remove(&mut self, handle: RenderHandle) -> Option<VoxelId> {
        let id = self.to_voxel.remove(&handle)?;
        // A newer object may already have claimed this id (remove + re-add
        // before the old node was flushed); leave that entry alone.
        if self.to_handle.get(&id) == Some(&handle) {
            self.to_handle.remove(&id);
        }
        Some(id)
    }

    /// Voxel drawn by `handle`.
    pub fn voxel_id(&self, handle: RenderHandle) -> Option<VoxelId> {
        self.to_voxel.get(&handle).copied()
    }

    /// Object currently drawing voxel `id`.
    pub fn handle(&self, id: VoxelId) -> Option<RenderHandle> {
        self.to_handle.get(&id).copied()
    }

    /// Number of mapped objects.
    pub fn len(&self) -> usize {
        self.to_voxel.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_then_lookup_both_ways() {
        let mut map = RenderMapping::new();
        map.insert(RenderHandle(10), VoxelId(3));
        assert_eq!(map.voxel_id(RenderHandle(10)), Some(VoxelId(3)));
        assert_eq!(map.handle(VoxelId(3)), Some(RenderHandle(10)));
    }

    #[test]
    fn test_remove_unknown_handle_is_none() {
        let mut map = RenderMapping::new();
        assert_eq!(map.remove(RenderHandle(1)), None);
    }

    #[test]
    fn test_remove_keeps_newer_claim_on_same_id() {
        let mut map = RenderMapping::new();
        map.insert(RenderHandle(1), VoxelId(7));
        map.insert(RenderHandle(2), VoxelId(7));

        assert_eq!(map.remove(RenderHandle(1)), Some(VoxelId(7)));
        assert_eq!(map.handle(VoxelId(7)), Some(RenderHandle(2)));
        assert_eq!(map.len(), 1);
    }
}
