//! Quad triangulation shared by the mesh builder and height queries.
//!
//! Each grid quad is split along the diagonal from `(1, 0)` to `(0, 1)`: the lower-left
//! triangle covers `fx + fz < 1`, the upper-right triangle the rest.

/// Heights at the four corners of a grid quad, indexed `h{x}{z}`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuadCorners {
    pub h00: f32,
    pub h10: f32,
    pub h01: f32,
    pub h11: f32,
}

impl QuadCorners {
    #[inline]
    pub const fn new(h00: f32, h10: f32, h01: f32, h11: f32) -> Self {
        Self { h00, h10, h01, h11 }
    }

    /// Height on the triangulated surface at fractional position `(fx, fz)` in `[0, 1]²`.
    #[inline]
    pub fn interpolate(&self, fx: f32, fz: f32) -> f32 {
        if fx + fz < 1.0 {
            self.h00 + (self.h10 - self.h00) * fx + (self.h01 - self.h00) * fz
        } else {
            self.h11 + (self.h01 - self.h11) * (1.0 - fx) + (self.h10 - self.h11) * (1.0 - fz)
        }
    }
}

/// Index list for one quad, counter-clockwise seen from above (+Y).
#[inline]
pub fn quad_indices(v00: u32, v10: u32, v01: u32, v11: u32) -> [u32; 6] {
    [v00, v01, v10, v10, v01, v11]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_reproduced() {
        let q = QuadCorners::new(1.0, 2.0, 3.0, 5.0);
        assert_eq!(q.interpolate(0.0, 0.0), 1.0);
        assert_eq!(q.interpolate(1.0, 0.0), 2.0);
        assert_eq!(q.interpolate(0.0, 1.0), 3.0);
        assert_eq!(q.interpolate(1.0, 1.0), 5.0);
    }

    #[test]
    fn triangles_agree_on_the_diagonal() {
        let q = QuadCorners::new(0.3, -1.2, 4.0, 2.5);
        for k in 0..=10 {
            let fx = k as f32 / 10.0;
            let fz = 1.0 - fx;
            let lower = q.h00 + (q.h10 - q.h00) * fx + (q.h01 - q.h00) * fz;
            assert!((lower - q.interpolate(fx, fz)).abs() < 1e-5);
        }
    }

    #[test]
    fn differs_from_bilinear_off_diagonal() {
        // Saddle: bilinear gives 0.5 at the centre, the split surface does not.
        let q = QuadCorners::new(0.0, 1.0, 1.0, 0.0);
        let centre = q.interpolate(0.5, 0.5);
        assert!((centre - 1.0).abs() < 1e-6);
    }

    #[test]
    fn indices_share_the_diagonal() {
        let idx = quad_indices(0, 1, 2, 3);
        assert_eq!(idx, [0, 2, 1, 1, 2, 3]);
    }
}
