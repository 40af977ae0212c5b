//! Per-voxel face bitmasks.
//!
//! Both masks share one bit layout: bit `i` belongs to the face in
//! [`FaceDirection`] slot `i` (bit 0 = +X, bit 1 = −X, bit 2 = +Y,
//! bit 3 = −Y, bit 4 = +Z, bit 5 = −Z). An [`OcclusionMask`] sets a bit when
//! a neighbor covers that face; [`VisibleFaces`] is its complement and is what
//! the scene receives.

use std::fmt;

use crate::face_direction::FaceDirection;

const FACE_BITS: u8 = 0b0011_1111;

/// Bitmask of the faces blocked by a present neighbor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OcclusionMask(pub u8);

impl OcclusionMask {
    /// No neighbors: every face exposed.
    pub const EXPOSED: Self = Self(0);
    /// All six neighbors present.
    pub const FULLY_OCCLUDED: Self = Self(FACE_BITS);

    /// Returns `true` if the face in `direction` is covered by a neighbor.
    pub fn is_occluded(self, direction: FaceDirection) -> bool {
        self.0 & (1 << direction as u8) != 0
    }

    /// Marks the face in `direction` as covered.
    pub fn set_occluded(&mut self, direction: FaceDirection) {
        self.0 |= 1 << direction as u8;
    }

    /// Returns `true` when all six faces are covered.
    pub fn is_fully_occluded(self) -> bool {
        self.0 & FACE_BITS == FACE_BITS
    }

    /// Number of covered faces (0–6).
    pub fn count(self) -> u32 {
        (self.0 & FACE_BITS).count_ones()
    }

    /// The faces left uncovered.
    pub fn visible_faces(self) -> VisibleFaces {
        VisibleFaces(!self.0 & FACE_BITS)
    }
}

/// Six `0`/`1` characters in slot order, `1` meaning occluded.
impl fmt::Display for OcclusionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dir in FaceDirection::ALL {
            f.write_str(if self.is_occluded(dir) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Bitmask of the faces that should receive geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VisibleFaces(pub u8);

impl VisibleFaces {
    /// No faces visible.
    pub const NONE: Self = Self(0);
    /// All six faces visible.
    pub const ALL: Self = Self(FACE_BITS);

    /// Returns `true` if the face in the given direction is visible.
    pub fn is_visible(self, direction: FaceDirection) -> bool {
        self.0 & (1 << direction as u8) != 0
    }

    /// Returns the number of visible faces (0–6).
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposed_shows_every_face() {
        assert_eq!(OcclusionMask::EXPOSED.visible_faces(), VisibleFaces::ALL);
        assert_eq!(OcclusionMask::EXPOSED.count(), 0);
    }

    #[test]
    fn test_fully_occluded_shows_nothing() {
        assert!(OcclusionMask::FULLY_OCCLUDED.is_fully_occluded());
        assert_eq!(
            OcclusionMask::FULLY_OCCLUDED.visible_faces(),
            VisibleFaces::NONE
        );
    }

    #[test]
    fn test_single_neighbor_hides_one_face() {
        let mut mask = OcclusionMask::EXPOSED;
        mask.set_occluded(FaceDirection::PosX);
        let visible = mask.visible_faces();
        assert_eq!(visible.count(), 5);
        assert!(!visible.is_visible(FaceDirection::PosX));
        assert!(visible.is_visible(FaceDirection::NegX));
    }

    #[test]
    fn test_display_uses_slot_order() {
        let mut mask = OcclusionMask::EXPOSED;
        mask.set_occluded(FaceDirection::NegX);
        mask.set_occluded(FaceDirection::NegZ);
        assert_eq!(mask.to_string(), "010001");
        assert_eq!(OcclusionMask::FULLY_OCCLUDED.to_string(), "111111");
    }

    #[test]
    fn test_lone_open_face_is_the_only_visible_one() {
        for dir in FaceDirection::ALL {
            let mask = OcclusionMask(OcclusionMask::FULLY_OCCLUDED.0 & !(1 << dir as u8));
            let visible = mask.visible_faces();
            assert_eq!(visible.count(), 1);
            assert!(visible.is_visible(dir));
        }
    }
}
