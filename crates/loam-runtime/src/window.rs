use loam_world::ChunkCoord;

/// Inclusive square of chunk coordinates around the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkWindow {
    pub min: ChunkCoord,
    pub max: ChunkCoord,
}

impl ChunkWindow {
    pub fn around(center: ChunkCoord, radius: i32) -> Self {
        let r = radius.max(0);
        Self {
            min: ChunkCoord::new(center.x.saturating_sub(r), center.z.saturating_sub(r)),
            max: ChunkCoord::new(center.x.saturating_add(r), center.z.saturating_add(r)),
        }
    }

    #[inline]
    pub fn contains(&self, c: ChunkCoord) -> bool {
        c.x >= self.min.x && c.x <= self.max.x && c.z >= self.min.z && c.z <= self.max.z
    }

    /// Number of coordinates in the window.
    #[inline]
    pub fn len(&self) -> usize {
        let w = i64::from(self.max.x) - i64::from(self.min.x) + 1;
        let h = i64::from(self.max.z) - i64::from(self.min.z) + 1;
        (w * h) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Row-major walk over the window, z outer.
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + use<> {
        let (min, max) = (self.min, self.max);
        (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| ChunkCoord::new(x, z)))
    }
}
