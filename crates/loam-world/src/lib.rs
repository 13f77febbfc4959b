//! World sampling: chunk coordinates, worldgen parameters, the height field and vegetation.
#![forbid(unsafe_code)]

mod chunk_coord;
pub mod noise;
pub mod vegetation;
pub mod worldgen;

pub use chunk_coord::{ChunkCoord, WORLD_COORD_LIMIT};
pub use noise::{NoiseChannel, NoiseField, TerrainSample};
pub use vegetation::{VegetationInstance, VegetationSampler};
pub use worldgen::{ConfigError, WorldGenConfig, WorldGenParams, load_params_from_path};
