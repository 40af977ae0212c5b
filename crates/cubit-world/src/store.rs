//! Sparse voxel storage with neighbor adjacency.
//!
//! Nodes live in an arena and refer to each other through [`NodeId`]s, so the
//! mutual neighbor links never own one another. A deleted node keeps its slot
//! until [`crate::SceneSync`] has flushed it; only then is the slot returned
//! to the free list, which is what keeps a fresh insert at the same coordinate
//! from colliding with the old node's pending sync.

use rustc_hash::FxHashMap;
use tracing::{info, trace};

use crate::dirty::DirtySet;
use crate::face_direction::FaceDirection;
use crate::node::{NodeId, VoxelNode};
use crate::occlusion::OcclusionMask;
use crate::voxel::{Voxel, VoxelCoord};

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<VoxelNode>,
}

/// Owner of every [`VoxelNode`] and the single source of truth for occupancy.
#[derive(Debug, Default)]
pub struct VoxelStore {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// At most one live node per coordinate.
    by_coord: FxHashMap<VoxelCoord, NodeId>,
    dirty: DirtySet,
}

impl VoxelStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `voxel` at its coordinate.
    ///
    /// An occupied coordinate keeps its node and only swaps the value (a
    /// refresh, marked dirty even if the value is unchanged). Otherwise a new
    /// node is created and linked to every live axis-aligned neighbor; each of
    /// those neighbors is marked dirty because its occlusion changed.
    pub fn upsert(&mut self, voxel: Voxel) -> NodeId {
        let coord = voxel.coord;
        if let Some(&id) = self.by_coord.get(&coord) {
            self.node_mut(id).replace_voxel(voxel);
            self.dirty.mark(id);
            trace!(%coord, "voxel refreshed");
            return id;
        }

        let id = self.allocate(VoxelNode::new(voxel));
        for dir in FaceDirection::ALL {
            let Some(&neighbor) = dir.offset(coord).and_then(|c| self.by_coord.get(&c)) else {
                continue;
            };
            self.node_mut(id).link(dir, neighbor);
            self.node_mut(neighbor).link(dir.opposite(), id);
            self.dirty.mark(neighbor);
        }
        self.by_coord.insert(coord, id);
        self.dirty.mark(id);
        trace!(%coord, index = id.index(), "voxel inserted");
        id
    }

    /// Deletes the live node at `coord`. Returns `false` if there was none.
    pub fn remove_at(&mut self, coord: VoxelCoord) -> bool {
        match self.by_coord.get(&coord).copied() {
            Some(id) => {
                self.remove_node(id);
                true
            }
            None => false,
        }
    }

    /// Deletes the live node at the coordinate of `voxel`.
    ///
    /// Whatever value currently occupies that coordinate is removed; the
    /// rest of `voxel` is not compared.
    pub fn remove_exact(&mut self, voxel: &Voxel) -> bool {
        self.remove_at(voxel.coord)
    }

    /// Deletes every live node. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        // Removal edits `by_coord`, so work from a snapshot.
        let ids: Vec<NodeId> = self.by_coord.values().copied().collect();
        for &id in &ids {
            self.remove_node(id);
        }
        info!(removed = ids.len(), "voxel store cleared");
        ids.len()
    }

    /// Every live voxel that is not fully enclosed, with its occlusion mask.
    pub fn visible_voxels(&self) -> Vec<(Voxel, OcclusionMask)> {
        self.live_nodes()
            .filter_map(|(_, node)| {
                let mask = node.occlusion();
                (!mask.is_fully_occluded()).then(|| (node.voxel().clone(), mask))
            })
            .collect()
    }

    /// Current value at `coord`.
    pub fn get(&self, coord: VoxelCoord) -> Option<&Voxel> {
        self.node_at(coord).map(VoxelNode::voxel)
    }

    /// Live node at `coord`.
    pub fn node_at(&self, coord: VoxelCoord) -> Option<&VoxelNode> {
        self.id_at(coord).and_then(|id| self.node(id))
    }

    /// Id of the live node at `coord`.
    pub fn id_at(&self, coord: VoxelCoord) -> Option<NodeId> {
        self.by_coord.get(&coord).copied()
    }

    /// Occlusion mask of the live node at `coord`.
    pub fn occlusion_at(&self, coord: VoxelCoord) -> Option<OcclusionMask> {
        self.node_at(coord).map(VoxelNode::occlusion)
    }

    /// Returns `true` if a live node occupies `coord`.
    pub fn contains(&self, coord: VoxelCoord) -> bool {
        self.by_coord.contains_key(&coord)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.by_coord.len()
    }

    /// Returns `true` if no live node exists.
    pub fn is_empty(&self) -> bool {
        self.by_coord.is_empty()
    }

    /// Number of nodes waiting for scene synchronization.
    pub fn pending_sync(&self) -> usize {
        self.dirty.len()
    }

    /// Nodes still held by the arena: live ones plus removed ones not yet flushed.
    pub fn allocated(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Looks up a node by id. Stale ids resolve to `None`.
    pub fn node(&self, id: NodeId) -> Option<&VoxelNode> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    /// Iterates over live nodes in no particular order.
    pub fn live_nodes(&self) -> impl Iterator<Item = (NodeId, &VoxelNode)> {
        self.by_coord
            .values()
            .filter_map(|&id| self.node(id).map(|node| (id, node)))
    }

    pub(crate) fn dirty(&self) -> &DirtySet {
        &self.dirty
    }

    pub(crate) fn dirty_mut(&mut self) -> &mut DirtySet {
        &mut self.dirty
    }

    /// # Panics
    ///
    /// Panics on a stale or released id.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut VoxelNode {
        let slot = &mut self.slots[id.index()];
        assert_eq!(
            slot.generation, id.generation,
            "stale node id {id:?} (slot is at generation {})",
            slot.generation
        );
        match slot.node.as_mut() {
            Some(node) => node,
            None => panic!("node id {id:?} refers to a released slot"),
        }
    }

    /// Returns a removed, flushed node's slot to the free list.
    ///
    /// # Panics
    ///
    /// Panics if the node is still live.
    pub(crate) fn release(&mut self, id: NodeId) {
        assert!(
            self.node_mut(id).is_removed(),
            "cannot release live node {id:?}"
        );
        let slot = &mut self.slots[id.index()];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
    }

    fn allocate(&mut self, node: VoxelNode) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).expect("voxel arena exceeds u32 slots");
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn remove_node(&mut self, id: NodeId) {
        let linked: Vec<(FaceDirection, NodeId)> = self.node_mut(id).linked().collect();
        for (dir, neighbor) in linked {
            self.node_mut(id).unlink(dir);
            self.node_mut(neighbor).unlink(dir.opposite());
            self.dirty.mark(neighbor);
        }

        let node = self.node_mut(id);
        node.mark_removed();
        let coord = node.voxel().coord;
        self.by_coord.remove(&coord);
        self.dirty.mark(id);
        trace!(%coord, index = id.index(), "voxel removed");
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
