use loam_mesh_cpu::QuadCorners;
use loam_world::ChunkCoord;

/// Raw height samples of one chunk, `(cells + 1)²` values row-major by z then x.
///
/// Sample `(i, j)` is taken at `coord.vertex_world(i, j, cells, step)`, the same lattice
/// the mesh vertices use.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightGrid {
    coord: ChunkCoord,
    cells: usize,
    step: f32,
    samples: Vec<f32>,
}

impl HeightGrid {
    /// Wraps pre-sampled heights; `None` if the length is not `(cells + 1)²`.
    pub fn from_samples(coord: ChunkCoord, cells: usize, step: f32, samples: Vec<f32>) -> Option<Self> {
        let side = cells + 1;
        if cells == 0 || samples.len() != side * side {
            return None;
        }
        Some(Self {
            coord,
            cells,
            step,
            samples,
        })
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.cells
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.cells + 1
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// World position of the `(0, 0)` sample.
    #[inline]
    pub fn origin(&self) -> (f32, f32) {
        self.coord.origin(self.cells, self.step)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        let side = self.side();
        if i >= side || j >= side {
            return None;
        }
        self.samples.get(j * side + i).copied()
    }

    /// Corner heights of quad `(i, j)`, for `i, j < cells`.
    pub fn quad(&self, i: usize, j: usize) -> Option<QuadCorners> {
        if i >= self.cells || j >= self.cells {
            return None;
        }
        Some(QuadCorners::new(
            self.get(i, j)?,
            self.get(i + 1, j)?,
            self.get(i, j + 1)?,
            self.get(i + 1, j + 1)?,
        ))
    }
}
