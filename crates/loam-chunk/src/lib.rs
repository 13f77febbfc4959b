//! Terrain chunks: height grid, generation and the keyed store.
#![forbid(unsafe_code)]

mod generate;
mod grid;
mod store;

use loam_mesh_cpu::TerrainMesh;
use loam_world::{ChunkCoord, VegetationInstance};

pub use generate::{ChunkGenError, ChunkTiming, generate_chunk};
pub use grid::HeightGrid;
pub use store::ChunkStore;

/// One generated region of terrain.
///
/// The chunk exclusively owns its mesh descriptor; dropping the chunk releases it.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    mesh: TerrainMesh,
    grid: HeightGrid,
    vegetation: Vec<VegetationInstance>,
    active: bool,
    timing: ChunkTiming,
}

impl Chunk {
    pub fn new(
        mesh: TerrainMesh,
        grid: HeightGrid,
        vegetation: Vec<VegetationInstance>,
        timing: ChunkTiming,
    ) -> Self {
        Self {
            coord: grid.coord(),
            mesh,
            grid,
            vegetation,
            active: true,
            timing,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    #[inline]
    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    #[inline]
    pub fn vegetation(&self) -> &[VegetationInstance] {
        &self.vegetation
    }

    #[inline]
    pub fn timing(&self) -> ChunkTiming {
        self.timing
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sets the active flag; returns true when it changed.
    #[inline]
    pub fn set_active(&mut self, active: bool) -> bool {
        let flipped = self.active != active;
        self.active = active;
        flipped
    }
}
