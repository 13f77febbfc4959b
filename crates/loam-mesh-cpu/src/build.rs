use loam_geom::Vec3;
use loam_world::{ChunkCoord, NoiseField};

use crate::mesh_build::TerrainMesh;
use crate::quad::quad_indices;

/// Builds the render mesh for `coord` from its sampled height grid.
///
/// `heights` and `water` hold `(cells + 1)²` raw samples, row-major by z then x, taken
/// at [`ChunkCoord::vertex_world`]. Vertex positions use the same lattice, so the
/// surface matches the grid exactly. Normals past the chunk edge are sampled from
/// `field` so shading is continuous across borders.
pub fn build_terrain_mesh(
    field: &NoiseField,
    coord: ChunkCoord,
    heights: &[f32],
    water: &[f32],
) -> TerrainMesh {
    let p = field.params();
    let cells = p.cells_per_axis;
    let side = cells + 1;
    let step = p.vertex_step;
    let scale = p.height_scale;
    if cells == 0 || heights.len() != side * side || water.len() != heights.len() {
        log::warn!(
            "chunk ({}, {}): grid size {} does not match {}x{}, emitting empty mesh",
            coord.x,
            coord.z,
            heights.len(),
            side,
            side
        );
        return TerrainMesh::default();
    }

    let ceiling = p.max_raw_height();
    let sample = |i: i64, j: i64| -> f32 {
        if (0..side as i64).contains(&i) && (0..side as i64).contains(&j) {
            heights[j as usize * side + i as usize]
        } else {
            let (x, z) = coord.lattice_world(i, j, cells, step);
            field.height(x, z)
        }
    };

    let mut mesh = TerrainMesh::with_capacity(side * side, cells * cells);
    let inv_cells = 1.0 / cells as f32;
    for j in 0..side {
        for i in 0..side {
            let h = heights[j * side + i];
            let (x, z) = coord.vertex_world(i, j, cells, step);
            let (ii, jj) = (i as i64, j as i64);
            let hl = sample(ii - 1, jj) * scale;
            let hr = sample(ii + 1, jj) * scale;
            let hd = sample(ii, jj - 1) * scale;
            let hu = sample(ii, jj + 1) * scale;
            let normal = Vec3::new(hl - hr, 2.0 * step, hd - hu).normalized();
            let norm_height = if ceiling > 0.0 {
                (h / ceiling).clamp(0.0, 1.0)
            } else {
                0.0
            };
            mesh.push_vertex(
                Vec3::new(x, h * scale, z),
                normal,
                (i as f32 * inv_cells, j as f32 * inv_cells),
                norm_height,
                water[j * side + i],
            );
        }
    }

    let at = |i: usize, j: usize| (j * side + i) as u32;
    for j in 0..cells {
        for i in 0..cells {
            mesh.push_indices(&quad_indices(at(i, j), at(i + 1, j), at(i, j + 1), at(i + 1, j + 1)));
        }
    }
    mesh
}
