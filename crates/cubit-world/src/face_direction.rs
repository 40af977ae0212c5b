//! The six axis-aligned neighbor directions of a voxel.

use crate::voxel::VoxelCoord;

/// One of the six cardinal directions a voxel face can point.
///
/// Directions come in opposite pairs along X, Y and Z. The `repr(u8)`
/// discriminant is the neighbor slot index inside a [`crate::VoxelNode`] and
/// the bit index inside [`crate::OcclusionMask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceDirection {
    /// +X direction.
    PosX = 0,
    /// −X direction.
    NegX = 1,
    /// +Y direction.
    PosY = 2,
    /// −Y direction.
    NegY = 3,
    /// +Z direction.
    PosZ = 4,
    /// −Z direction.
    NegZ = 5,
}

impl FaceDirection {
    /// All six directions in slot order.
    pub const ALL: [FaceDirection; 6] = [
        Self::PosX,
        Self::NegX,
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
    ];

    /// Returns the unit step `(dx, dy, dz)` for this direction.
    pub fn step(self) -> (i32, i32, i32) {
        match self {
            Self::PosX => (1, 0, 0),
            Self::NegX => (-1, 0, 0),
            Self::PosY => (0, 1, 0),
            Self::NegY => (0, -1, 0),
            Self::PosZ => (0, 0, 1),
            Self::NegZ => (0, 0, -1),
        }
    }

    /// Returns the coordinate one voxel away from `coord` in this direction.
    /// `None` at the edge of the grid.
    pub fn offset(self, coord: VoxelCoord) -> Option<VoxelCoord> {
        let (dx, dy, dz) = self.step();
        coord.offset(dx, dy, dz)
    }

    /// Returns the opposite face direction.
    ///
    /// Pairs are laid out so that even slots flip to `i + 1` and odd slots to `i - 1`.
    pub fn opposite(self) -> Self {
        match self {
            Self::PosX => Self::NegX,
            Self::NegX => Self::PosX,
            Self::PosY => Self::NegY,
            Self::NegY => Self::PosY,
            Self::PosZ => Self::NegZ,
            Self::NegZ => Self::PosZ,
        }
    }

    /// Returns the direction index (0–5).
    pub fn index(self) -> usize {
        self as usize
    }
}
