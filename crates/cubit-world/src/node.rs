//! The atomic unit of the spatial graph: one voxel plus its six neighbor slots.

use crate::face_direction::FaceDirection;
use crate::occlusion::OcclusionMask;
use crate::render::RenderHandle;
use crate::voxel::Voxel;

/// Stable, non-owning handle to a node in the [`crate::VoxelStore`] arena.
///
/// The generation distinguishes a slot's current occupant from earlier ones,
/// so a stale id never resolves to a node that later reused the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Arena slot index.
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Slot generation at allocation time.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// A voxel wrapped with its adjacency and scene state.
#[derive(Clone, Debug)]
pub struct VoxelNode {
    voxel: Voxel,
    neighbors: [Option<NodeId>; 6],
    render: Option<RenderHandle>,
    removed: bool,
}

impl VoxelNode {
    pub(crate) fn new(voxel: Voxel) -> Self {
        Self {
            voxel,
            neighbors: [None; 6],
            render: None,
            removed: false,
        }
    }

    /// Current voxel value.
    pub fn voxel(&self) -> &Voxel {
        &self.voxel
    }

    /// Neighbor in `direction`, if one is linked.
    pub fn neighbor(&self, direction: FaceDirection) -> Option<NodeId> {
        self.neighbors[direction.index()]
    }

    /// Handle of the current scene representation, if synced.
    pub fn render_handle(&self) -> Option<RenderHandle> {
        self.render
    }

    /// `true` once the node has been deleted from the store.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Faces covered by linked neighbors.
    pub fn occlusion(&self) -> OcclusionMask {
        let mut mask = OcclusionMask::EXPOSED;
        for dir in FaceDirection::ALL {
            if self.neighbors[dir.index()].is_some() {
                mask.set_occluded(dir);
            }
        }
        mask
    }

    pub(crate) fn replace_voxel(&mut self, voxel: Voxel) {
        self.voxel = voxel;
    }

    /// Fills the neighbor slot in `direction`.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already occupied: the adjacency graph is corrupt.
    pub(crate) fn link(&mut self, direction: FaceDirection, neighbor: NodeId) {
        let slot = &mut self.neighbors[direction.index()];
        assert!(
            slot.is_none(),
            "neighbor slot {direction:?} of voxel {} already linked",
            self.voxel.coord
        );
        *slot = Some(neighbor);
    }

    /// Clears the neighbor slot in `direction` and returns what it held.
    ///
    /// # Panics
    ///
    /// Panics if the slot is already empty: the adjacency graph is corrupt.
    pub(crate) fn unlink(&mut self, direction: FaceDirection) -> NodeId {
        match self.neighbors[direction.index()].take() {
            Some(neighbor) => neighbor,
            None => panic!(
                "neighbor slot {direction:?} of voxel {} already empty",
                self.voxel.coord
            ),
        }
    }

    /// Linked neighbors with their directions.
    pub(crate) fn linked(&self) -> impl Iterator<Item = (FaceDirection, NodeId)> + '_ {
        FaceDirection::ALL
            .into_iter()
            .filter_map(|dir| self.neighbors[dir.index()].map(|id| (dir, id)))
    }

    pub(crate) fn mark_removed(&mut self) {
        self.removed = true;
    }

    pub(crate) fn take_render_handle(&mut self) -> Option<RenderHandle> {
        self.render.take()
    }

    pub(crate) fn set_render_handle(&mut self, handle: RenderHandle) {
        self.render = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::Color;

    fn node() -> VoxelNode {
        VoxelNode::new(Voxel::new(1, [0, 0, 0], Color::WHITE))
    }

    fn id(index: u32) -> NodeId {
        NodeId {
            index,
            generation: 0,
        }
    }

    #[test]
    fn test_new_node_is_exposed() {
        let n = node();
        assert_eq!(n.occlusion(), OcclusionMask::EXPOSED);
        assert!(n.render_handle().is_none());
        assert!(!n.is_removed());
    }

    #[test]
    fn test_link_sets_occlusion_bit() {
        let mut n = node();
        n.link(FaceDirection::NegY, id(4));
        assert_eq!(n.neighbor(FaceDirection::NegY), Some(id(4)));
        assert!(n.occlusion().is_occluded(FaceDirection::NegY));
        assert_eq!(n.occlusion().count(), 1);
    }

    #[test]
    fn test_unlink_returns_previous_neighbor() {
        let mut n = node();
        n.link(FaceDirection::PosZ, id(9));
        assert_eq!(n.unlink(FaceDirection::PosZ), id(9));
        assert_eq!(n.occlusion(), OcclusionMask::EXPOSED);
    }

    #[test]
    #[should_panic(expected = "already linked")]
    fn test_double_link_panics() {
        let mut n = node();
        n.link(FaceDirection::PosX, id(1));
        n.link(FaceDirection::PosX, id(2));
    }

    #[test]
    #[should_panic(expected = "already empty")]
    fn test_unlink_empty_slot_panics() {
        let mut n = node();
        n.unlink(FaceDirection::NegX);
    }
}
