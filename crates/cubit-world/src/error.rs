//! Error types for scene synchronization.

use thiserror::Error;

use crate::voxel::VoxelCoord;

/// Failure reported by a [`crate::RenderScene`] implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The scene declined to create the object.
    #[error("scene rejected object: {0}")]
    Rejected(String),
    /// The scene has no room for more objects.
    #[error("scene object capacity exhausted ({0} objects)")]
    CapacityExhausted(usize),
}

/// Errors raised while pushing dirty voxels into the scene.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Creating the representation of the voxel at `coord` failed. The voxel
    /// stays pending and is retried on the next batch.
    #[error("failed to sync voxel at {coord}: {source}")]
    Scene {
        /// Coordinate of the voxel that could not be represented.
        coord: VoxelCoord,
        /// Underlying scene failure.
        #[source]
        source: SceneError,
    },
}
