//! CPU-side mesh descriptors for terrain chunks and the sea plane.
#![forbid(unsafe_code)]

mod build;
mod mesh_build;
mod quad;
mod water;

pub use build::build_terrain_mesh;
pub use mesh_build::TerrainMesh;
pub use quad::{QuadCorners, quad_indices};
pub use water::build_water_plane;
