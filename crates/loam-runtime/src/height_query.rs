//! Ground height under a world position, read from the loaded height grids.
//!
//! Queries use the same triangle split as the render mesh so a point placed with
//! [`StreamingController::height_at`] sits on the drawn surface.

use loam_chunk::HeightGrid;
use loam_mesh_cpu::QuadCorners;
use loam_world::ChunkCoord;

use crate::StreamingController;

/// Fraction used when a query lands past the last quad of a chunk.
pub const EDGE_FRACTION: f32 = 1.0 - 1e-4;
/// Fractions are kept within `[1 - INSET, INSET]` of a zero border.
pub const ZERO_BORDER_INSET: f32 = 0.99;
/// Replacement height for corners on a zero border.
pub const ZERO_BORDER_FLOOR: f32 = 1e-3;

impl StreamingController {
    /// Terrain height in world units under `(x, z)`.
    ///
    /// Loads the owning chunk if it is missing. Returns `0.0` for non-finite input or
    /// when the chunk cannot be produced.
    pub fn height_at(&mut self, x: f32, z: f32) -> f32 {
        if !x.is_finite() || !z.is_finite() {
            return 0.0;
        }
        let Some(coord) = ChunkCoord::containing(x, z, self.params().chunk_size) else {
            return 0.0;
        };
        if !self.store().contains(coord) {
            self.stats_mut().on_demand_loads += 1;
            log::debug!("height query at ({x}, {z}) loads chunk ({}, {})", coord.x, coord.z);
            if !self.load_chunk(coord) {
                return 0.0;
            }
        }
        self.height_at_loaded(x, z).unwrap_or(0.0)
    }

    /// Like [`height_at`](Self::height_at) but never generates; `None` when the owning
    /// chunk is not in the store.
    pub fn height_at_loaded(&self, x: f32, z: f32) -> Option<f32> {
        let coord = ChunkCoord::containing(x, z, self.params().chunk_size)?;
        let chunk = self.store().get(coord)?;
        Some(interpolate_grid(chunk.grid(), x, z) * self.params().height_scale)
    }
}

/// Raw height of `grid`'s triangulated surface at world `(x, z)`.
///
/// Positions outside the chunk are clamped onto its border quads.
pub fn interpolate_grid(grid: &HeightGrid, x: f32, z: f32) -> f32 {
    let cells = grid.cells();
    let step = grid.step();
    let (ox, oz) = grid.origin();
    let (i, fx) = cell_and_fraction(x - ox, step, cells);
    let (j, fz) = cell_and_fraction(z - oz, step, cells);
    let Some(mut q) = grid.quad(i, j) else {
        return 0.0;
    };
    let (fx, fz) = compensate_zero_border(&mut q, fx, fz, i, j, cells);
    q.interpolate(fx, fz)
}

fn cell_and_fraction(local: f32, step: f32, cells: usize) -> (usize, f32) {
    let t = local / step;
    if !t.is_finite() {
        return (0, 0.0);
    }
    let cell = t.floor();
    let last = (cells - 1) as f32;
    if cell < 0.0 {
        (0, 0.0)
    } else if cell > last {
        (cells - 1, EDGE_FRACTION)
    } else {
        (cell as usize, (t - cell).clamp(0.0, 1.0))
    }
}

/// Keeps queries off a chunk border whose two corners read exactly zero.
///
/// Only quad edges lying on the chunk border are considered. The sampler never writes
/// exact zeros there, so this only fires on degenerate grids.
fn compensate_zero_border(
    q: &mut QuadCorners,
    mut fx: f32,
    mut fz: f32,
    i: usize,
    j: usize,
    cells: usize,
) -> (f32, f32) {
    let left = i == 0 && q.h00 == 0.0 && q.h01 == 0.0;
    let right = i + 1 == cells && q.h10 == 0.0 && q.h11 == 0.0;
    let bottom = j == 0 && q.h00 == 0.0 && q.h10 == 0.0;
    let top = j + 1 == cells && q.h01 == 0.0 && q.h11 == 0.0;
    if left {
        fx = fx.max(1.0 - ZERO_BORDER_INSET);
        q.h00 = ZERO_BORDER_FLOOR;
        q.h01 = ZERO_BORDER_FLOOR;
    }
    if right {
        fx = fx.min(ZERO_BORDER_INSET);
        q.h10 = ZERO_BORDER_FLOOR;
        q.h11 = ZERO_BORDER_FLOOR;
    }
    if bottom {
        fz = fz.max(1.0 - ZERO_BORDER_INSET);
        q.h00 = ZERO_BORDER_FLOOR;
        q.h10 = ZERO_BORDER_FLOOR;
    }
    if top {
        fz = fz.min(ZERO_BORDER_INSET);
        q.h01 = ZERO_BORDER_FLOOR;
        q.h11 = ZERO_BORDER_FLOOR;
    }
    (fx, fz)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cells: usize, step: f32, f: impl Fn(usize, usize) -> f32) -> HeightGrid {
        let side = cells + 1;
        let mut s = Vec::with_capacity(side * side);
        for j in 0..side {
            for i in 0..side {
                s.push(f(i, j));
            }
        }
        HeightGrid::from_samples(ChunkCoord::new(0, 0), cells, step, s).unwrap()
    }

    #[test]
    fn vertices_are_exact() {
        let g = grid(4, 5.0, |i, j| 1.0 + i as f32 * 0.5 + j as f32 * 0.25);
        for j in 0..4 {
            for i in 0..4 {
                let h = interpolate_grid(&g, i as f32 * 5.0, j as f32 * 5.0);
                assert!((h - g.get(i, j).unwrap()).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn planar_grid_is_linear() {
        let g = grid(4, 5.0, |i, j| 2.0 + i as f32 - 0.5 * j as f32);
        let h = interpolate_grid(&g, 7.5, 3.0);
        assert!((h - (2.0 + 1.5 - 0.3)).abs() < 1e-5);
    }

    #[test]
    fn upper_clamp_stays_just_inside() {
        let g = grid(2, 1.0, |i, _| i as f32);
        let (cell, f) = cell_and_fraction(5.0, 1.0, 2);
        assert_eq!(cell, 1);
        assert_eq!(f, EDGE_FRACTION);
        let h = interpolate_grid(&g, 10.0, 0.5);
        assert!(h < 2.0 && h > 1.99);
    }

    #[test]
    fn lower_clamp_pins_to_first_vertex() {
        assert_eq!(cell_and_fraction(-3.0, 1.0, 4), (0, 0.0));
        let g = grid(2, 1.0, |i, j| 3.0 + i as f32 + j as f32);
        assert_eq!(interpolate_grid(&g, -1.0, -1.0), 3.0);
    }

    #[test]
    fn zero_border_is_avoided() {
        let g = grid(4, 1.0, |i, _| if i == 0 { 0.0 } else { 2.0 });
        let h = interpolate_grid(&g, 0.0, 1.5);
        assert!(h > 0.0);
        // fx is pushed to 0.01 and the border floored, so the value stays small
        let expected = ZERO_BORDER_FLOOR + (2.0 - ZERO_BORDER_FLOOR) * (1.0 - ZERO_BORDER_INSET);
        assert!((h - expected).abs() < 1e-4);
    }

    #[test]
    fn interior_zero_edges_are_left_alone() {
        let g = grid(4, 1.0, |i, _| if i == 2 { 0.0 } else { 1.0 });
        assert_eq!(interpolate_grid(&g, 2.0, 1.0), 0.0);
    }
}
