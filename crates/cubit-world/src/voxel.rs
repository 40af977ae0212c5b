//! Voxel values exchanged with the editing layer.

use std::fmt;

use glam::{IVec3, Vec3};

/// World-space edge length of one voxel when no config overrides it.
pub const DEFAULT_VOXEL_SIZE: f32 = 0.5;

/// Integer grid coordinate of a voxel.
///
/// Formats as the canonical key `x_y_z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelCoord {
    /// Grid X coordinate.
    pub x: i32,
    /// Grid Y coordinate.
    pub y: i32,
    /// Grid Z coordinate.
    pub z: i32,
}

impl VoxelCoord {
    /// Creates a new coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the coordinate offset by `(dx, dy, dz)`, or `None` if it
    /// leaves the `i32` grid.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// World-space position of this voxel for the given voxel edge length.
    pub fn world_position(self, voxel_size: f32) -> Vec3 {
        IVec3::from(self).as_vec3() * voxel_size
    }
}

impl From<IVec3> for VoxelCoord {
    fn from(v: IVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<VoxelCoord> for IVec3 {
    fn from(c: VoxelCoord) -> Self {
        IVec3::new(c.x, c.y, c.z)
    }
}

impl From<[i32; 3]> for VoxelCoord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.x, self.y, self.z)
    }
}

/// Identifier assigned to a voxel by the editing layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelId(pub i32);

/// 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Snapshot of one voxel as the editing layer sees it.
///
/// The store never mutates a `Voxel`; a new value at an occupied coordinate
/// replaces the old one in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Voxel {
    /// Grid position.
    pub coord: VoxelCoord,
    /// Editing-layer identifier.
    pub id: VoxelId,
    /// Base color.
    pub color: Color,
    /// Quarter-turn rotation per axis.
    pub rotation: [i32; 3],
    /// Mirror flags per axis.
    pub flip: [bool; 3],
    /// Texture index per face in [`crate::FaceDirection`] order, if textured.
    pub texture: Option<[i32; 6]>,
}

impl Voxel {
    /// Creates an untextured, unrotated voxel.
    pub fn new(id: i32, coord: impl Into<VoxelCoord>, color: Color) -> Self {
        Self {
            coord: coord.into(),
            id: VoxelId(id),
            color,
            rotation: [0; 3],
            flip: [false; 3],
            texture: None,
        }
    }

    /// Returns a copy with a different color, keeping coordinate and id.
    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    /// Returns a copy with per-face textures.
    pub fn with_texture(mut self, texture: [i32; 6]) -> Self {
        self.texture = Some(texture);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_key_format() {
        assert_eq!(VoxelCoord::new(1, -2, 30).to_string(), "1_-2_30");
    }

    #[test]
    fn test_world_position_scales_by_voxel_size() {
        let p = VoxelCoord::new(2, -1, 4).world_position(0.5);
        assert_eq!(p, Vec3::new(1.0, -0.5, 2.0));
    }

    #[test]
    fn test_ivec_conversion_round_trips() {
        let c = VoxelCoord::new(7, 8, -9);
        assert_eq!(VoxelCoord::from(IVec3::from(c)), c);
    }

    #[test]
    fn test_with_color_keeps_identity() {
        let v = Voxel::new(3, [0, 0, 0], Color::WHITE);
        let red = v.with_color(Color::rgb(255, 0, 0));
        assert_eq!(red.id, v.id);
        assert_eq!(red.coord, v.coord);
        assert_ne!(red, v);
    }
}
