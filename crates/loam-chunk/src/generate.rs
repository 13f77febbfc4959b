use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};

use loam_mesh_cpu::build_terrain_mesh;
use loam_world::{ChunkCoord, NoiseField, VegetationSampler};

use crate::{Chunk, HeightGrid};

/// Wall-clock cost of each generation stage, in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkTiming {
    pub sample_us: u32,
    pub mesh_us: u32,
    pub vegetation_us: u32,
}

impl ChunkTiming {
    #[inline]
    pub fn total_us(&self) -> u32 {
        self.sample_us
            .saturating_add(self.mesh_us)
            .saturating_add(self.vegetation_us)
    }
}

#[inline]
fn micros(d: Duration) -> u32 {
    d.as_micros().min(u128::from(u32::MAX)) as u32
}

#[derive(Clone, Debug, PartialEq)]
pub enum ChunkGenError {
    /// The parameters describe a lattice with no cells.
    EmptyLattice { coord: ChunkCoord },
    /// The height field produced NaN or infinity at grid vertex `(i, j)`.
    NonFiniteSample { coord: ChunkCoord, i: usize, j: usize },
}

impl fmt::Display for ChunkGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkGenError::EmptyLattice { coord } => {
                write!(f, "chunk ({}, {}): lattice has no cells", coord.x, coord.z)
            }
            ChunkGenError::NonFiniteSample { coord, i, j } => write!(
                f,
                "chunk ({}, {}): non-finite height at vertex ({}, {})",
                coord.x, coord.z, i, j
            ),
        }
    }
}

impl Error for ChunkGenError {}

/// Samples the height grid, builds the mesh and places vegetation for `coord`.
///
/// The returned chunk is active.
pub fn generate_chunk(field: &NoiseField, coord: ChunkCoord) -> Result<Chunk, ChunkGenError> {
    let p = field.params();
    let cells = p.cells_per_axis;
    let step = p.vertex_step;
    if cells == 0 {
        return Err(ChunkGenError::EmptyLattice { coord });
    }
    let side = cells + 1;

    let t0 = Instant::now();
    let mut heights = Vec::with_capacity(side * side);
    let mut water = Vec::with_capacity(side * side);
    for j in 0..side {
        for i in 0..side {
            let (x, z) = coord.vertex_world(i, j, cells, step);
            let s = field.sample(x, z);
            if !s.height.is_finite() {
                return Err(ChunkGenError::NonFiniteSample { coord, i, j });
            }
            heights.push(s.height);
            water.push(s.water);
        }
    }
    let sample_us = micros(t0.elapsed());

    let t1 = Instant::now();
    let mesh = build_terrain_mesh(field, coord, &heights, &water);
    let mesh_us = micros(t1.elapsed());

    let t2 = Instant::now();
    let vegetation = VegetationSampler::new(field).sample(coord);
    let vegetation_us = micros(t2.elapsed());

    let grid = HeightGrid::from_samples(coord, cells, step, heights)
        .ok_or(ChunkGenError::EmptyLattice { coord })?;
    let timing = ChunkTiming {
        sample_us,
        mesh_us,
        vegetation_us,
    };
    log::debug!(
        "generated chunk ({}, {}) verts={} tris={} plants={} in {}us (sample {} mesh {} veg {})",
        coord.x,
        coord.z,
        mesh.vertex_count(),
        mesh.triangle_count(),
        vegetation.len(),
        timing.total_us(),
        sample_us,
        mesh_us,
        vegetation_us
    );
    Ok(Chunk::new(mesh, grid, vegetation, timing))
}
