use loam_geom::{Aabb, Vec3};

/// Flat vertex arrays ready for upload by the renderer.
///
/// Per vertex: position (3), normal (3), uv (2), normalized height (1), water mask (1).
/// `idx` is a triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub height: Vec<f32>,
    pub water: Vec<f32>,
    pub idx: Vec<u32>,
    pub bounds: Aabb,
}

impl TerrainMesh {
    /// Empty mesh with room for `n_vertices` vertices and `n_quads` quads.
    pub fn with_capacity(n_vertices: usize, n_quads: usize) -> Self {
        Self {
            pos: Vec::with_capacity(n_vertices * 3),
            norm: Vec::with_capacity(n_vertices * 3),
            uv: Vec::with_capacity(n_vertices * 2),
            height: Vec::with_capacity(n_vertices),
            water: Vec::with_capacity(n_vertices),
            idx: Vec::with_capacity(n_quads * 6),
            bounds: Aabb::default(),
        }
    }

    /// Appends one vertex and returns its index.
    pub fn push_vertex(&mut self, p: Vec3, n: Vec3, uv: (f32, f32), height: f32, water: f32) -> u32 {
        let index = self.vertex_count() as u32;
        if index == 0 {
            self.bounds = Aabb::from_point(p);
        } else {
            self.bounds.include(p);
        }
        self.pos.extend_from_slice(&p.to_array());
        self.norm.extend_from_slice(&n.to_array());
        self.uv.push(uv.0);
        self.uv.push(uv.1);
        self.height.push(height);
        self.water.push(water);
        index
    }

    #[inline]
    pub fn push_indices(&mut self, tri: &[u32]) {
        self.idx.extend_from_slice(tri);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    /// A mesh without triangles draws nothing; the renderer skips it.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    #[inline]
    pub fn position(&self, i: usize) -> Option<Vec3> {
        let p = self.pos.get(i * 3..i * 3 + 3)?;
        Some(Vec3::new(p[0], p[1], p[2]))
    }

    #[inline]
    pub fn normal(&self, i: usize) -> Option<Vec3> {
        let n = self.norm.get(i * 3..i * 3 + 3)?;
        Some(Vec3::new(n[0], n[1], n[2]))
    }

    /// Iterates triangles as vertex-index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.idx.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_tracks_counts_and_bounds() {
        let mut m = TerrainMesh::with_capacity(3, 1);
        assert!(m.is_empty());
        let a = m.push_vertex(Vec3::new(0.0, 1.0, 0.0), Vec3::UP, (0.0, 0.0), 0.1, 0.0);
        let b = m.push_vertex(Vec3::new(5.0, -2.0, 0.0), Vec3::UP, (1.0, 0.0), 0.2, 0.0);
        let c = m.push_vertex(Vec3::new(0.0, 3.0, 5.0), Vec3::UP, (0.0, 1.0), 0.3, 1.0);
        m.push_indices(&[a, c, b]);
        assert_eq!(m.vertex_count(), 3);
        assert_eq!(m.triangle_count(), 1);
        assert!(!m.is_empty());
        assert_eq!(m.bounds.min, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(m.bounds.max, Vec3::new(5.0, 3.0, 5.0));
        assert_eq!(m.position(1), Some(Vec3::new(5.0, -2.0, 0.0)));
        assert_eq!(m.position(3), None);
        assert_eq!(m.triangles().collect::<Vec<_>>(), vec![[0, 2, 1]]);
    }
}
