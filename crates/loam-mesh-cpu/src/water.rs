use loam_geom::Vec3;

use crate::mesh_build::TerrainMesh;
use crate::quad::quad_indices;

/// Flat, subdivided sea plane centred under the camera.
///
/// Covers `center ± half_extent` on x and z at height `sea_level_world`. Uses the terrain
/// vertex layout with height attribute `0` and water attribute `1`.
pub fn build_water_plane(
    center: Vec3,
    half_extent: f32,
    subdivisions: usize,
    sea_level_world: f32,
) -> TerrainMesh {
    if subdivisions == 0 || !(half_extent > 0.0) || !center.is_finite() {
        return TerrainMesh::default();
    }
    let side = subdivisions + 1;
    let cell = (2.0 * half_extent) / subdivisions as f32;
    let x0 = center.x - half_extent;
    let z0 = center.z - half_extent;
    let inv = 1.0 / subdivisions as f32;

    let mut mesh = TerrainMesh::with_capacity(side * side, subdivisions * subdivisions);
    for j in 0..side {
        for i in 0..side {
            let p = Vec3::new(x0 + i as f32 * cell, sea_level_world, z0 + j as f32 * cell);
            mesh.push_vertex(p, Vec3::UP, (i as f32 * inv, j as f32 * inv), 0.0, 1.0);
        }
    }
    let at = |i: usize, j: usize| (j * side + i) as u32;
    for j in 0..subdivisions {
        for i in 0..subdivisions {
            mesh.push_indices(&quad_indices(at(i, j), at(i + 1, j), at(i, j + 1), at(i + 1, j + 1)));
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_is_flat_and_centred() {
        let m = build_water_plane(Vec3::new(100.0, 30.0, -50.0), 200.0, 8, 24.0);
        assert_eq!(m.vertex_count(), 81);
        assert_eq!(m.triangle_count(), 128);
        assert_eq!(m.bounds.min, Vec3::new(-100.0, 24.0, -250.0));
        assert_eq!(m.bounds.max, Vec3::new(300.0, 24.0, 150.0));
        assert!(m.water.iter().all(|w| *w == 1.0));
        assert!(m.norm.chunks_exact(3).all(|n| n == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn degenerate_requests_are_empty() {
        assert!(build_water_plane(Vec3::ZERO, 100.0, 0, 0.0).is_empty());
        assert!(build_water_plane(Vec3::ZERO, 0.0, 4, 0.0).is_empty());
        assert!(build_water_plane(Vec3::new(f32::NAN, 0.0, 0.0), 10.0, 4, 0.0).is_empty());
    }
}
