use serde::{Deserialize, Serialize};

/// Largest world-space magnitude on either horizontal axis that maps to a chunk.
pub const WORLD_COORD_LIMIT: f32 = 1.0e7;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk owning the world position `(wx, wz)`, by floor division.
    ///
    /// Returns `None` for non-finite input, positions beyond [`WORLD_COORD_LIMIT`], or
    /// when the chunk index does not fit in `i32`.
    pub fn containing(wx: f32, wz: f32, chunk_size: f32) -> Option<Self> {
        if !(wx.abs() <= WORLD_COORD_LIMIT && wz.abs() <= WORLD_COORD_LIMIT && chunk_size > 0.0) {
            return None;
        }
        let cx = (wx / chunk_size).floor();
        let cz = (wz / chunk_size).floor();
        let lo = i32::MIN as f32;
        let hi = i32::MAX as f32;
        if cx < lo || cx >= hi || cz < lo || cz >= hi {
            return None;
        }
        Some(Self::new(cx as i32, cz as i32))
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// World-space position of grid vertex `(i, j)` of this chunk.
    ///
    /// Computed from the global vertex index so adjacent chunks agree bit-for-bit on
    /// their shared border.
    #[inline]
    pub fn vertex_world(self, i: usize, j: usize, cells_per_axis: usize, step: f32) -> (f32, f32) {
        self.lattice_world(i as i64, j as i64, cells_per_axis, step)
    }

    /// As [`ChunkCoord::vertex_world`] but accepts indices outside `0..=cells`, for
    /// sampling one vertex past the chunk edge.
    #[inline]
    pub fn lattice_world(self, i: i64, j: i64, cells_per_axis: usize, step: f32) -> (f32, f32) {
        let cells = cells_per_axis as i64;
        let gx = i64::from(self.x) * cells + i;
        let gz = i64::from(self.z) * cells + j;
        (gx as f32 * step, gz as f32 * step)
    }

    #[inline]
    pub fn origin(self, cells_per_axis: usize, step: f32) -> (f32, f32) {
        self.vertex_world(0, 0, cells_per_axis, step)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.x, value.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_floors_negative_positions() {
        assert_eq!(ChunkCoord::containing(0.0, 0.0, 100.0), Some(ChunkCoord::new(0, 0)));
        assert_eq!(ChunkCoord::containing(99.5, 150.0, 100.0), Some(ChunkCoord::new(0, 1)));
        assert_eq!(ChunkCoord::containing(-0.5, -100.0, 100.0), Some(ChunkCoord::new(-1, -1)));
        assert_eq!(ChunkCoord::containing(-100.5, 0.0, 100.0), Some(ChunkCoord::new(-2, 0)));
    }

    #[test]
    fn containing_rejects_bad_input() {
        assert_eq!(ChunkCoord::containing(f32::NAN, 0.0, 100.0), None);
        assert_eq!(ChunkCoord::containing(0.0, f32::INFINITY, 100.0), None);
        assert_eq!(ChunkCoord::containing(0.0, 0.0, 0.0), None);
        assert_eq!(ChunkCoord::containing(f32::MAX, 0.0, 1.0), None);
    }

    #[test]
    fn containing_stops_at_world_limit() {
        let edge = WORLD_COORD_LIMIT;
        assert_eq!(ChunkCoord::containing(-edge, edge, 100.0), Some(ChunkCoord::new(-100_000, 100_000)));
        assert_eq!(ChunkCoord::containing(-2.0e11, -2.0e11, 100.0), None);
        assert_eq!(ChunkCoord::containing(0.0, edge * 2.0, 100.0), None);
        assert_eq!(ChunkCoord::containing(-1.0e30, 0.0, 1.0e30), None);
    }

    #[test]
    fn shared_border_vertices_match() {
        let a = ChunkCoord::new(3, -2);
        let b = a.offset(1, 0);
        for j in 0..=20 {
            assert_eq!(a.vertex_world(20, j, 20, 5.0), b.vertex_world(0, j, 20, 5.0));
        }
        let c = a.offset(0, 1);
        for i in 0..=20 {
            assert_eq!(a.vertex_world(i, 20, 20, 5.0), c.vertex_world(i, 0, 20, 5.0));
        }
    }

    #[test]
    fn lattice_past_edge_matches_neighbour_vertex() {
        let a = ChunkCoord::new(-4, 7);
        assert_eq!(a.lattice_world(-1, 3, 20, 5.0), a.offset(-1, 0).vertex_world(19, 3, 20, 5.0));
        assert_eq!(a.lattice_world(21, 3, 20, 5.0), a.offset(1, 0).vertex_world(1, 3, 20, 5.0));
    }

    #[test]
    fn origin_is_coord_times_chunk_size() {
        assert_eq!(ChunkCoord::new(-1, 2).origin(20, 5.0), (-100.0, 200.0));
    }
}
