//! Vegetation placement riding along with chunk generation.

use std::f32::consts::TAU;

use loam_geom::Vec3;

use crate::ChunkCoord;
use crate::noise::NoiseField;

/// One placed plant: world position (height already scaled) and yaw in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VegetationInstance {
    pub position: Vec3,
    pub rotation: f32,
}

/// Deterministic yaw from the placement position; same coordinates, same angle.
#[inline]
pub fn rotation_hash(x: f32, z: f32) -> f32 {
    let v = (x * 12.9898 + z * 78.233).sin() * 43_758.547;
    (v - v.floor()) * TAU
}

/// Samples the density channel on the terrain vertex lattice of a chunk.
pub struct VegetationSampler<'a> {
    field: &'a NoiseField,
}

impl<'a> VegetationSampler<'a> {
    pub fn new(field: &'a NoiseField) -> Self {
        Self { field }
    }

    /// Placements for `coord`. The far row and column belong to the neighbouring chunks,
    /// so adjacent chunks never place on the same lattice point.
    pub fn sample(&self, coord: ChunkCoord) -> Vec<VegetationInstance> {
        let p = self.field.params();
        let cells = p.cells_per_axis;
        let scale = p.height_scale;
        let sea = p.sea_level_world();
        let mut out = Vec::new();
        for j in 0..cells {
            for i in 0..cells {
                let (x, z) = coord.vertex_world(i, j, cells, p.vertex_step);
                if self.field.vegetation_density(x, z) >= p.vegetation_threshold {
                    continue;
                }
                let y = self.field.height(x, z) * scale;
                if y <= sea {
                    continue;
                }
                out.push(VegetationInstance {
                    position: Vec3::new(x, y, z),
                    rotation: rotation_hash(x, z),
                });
            }
        }
        out
    }
}
