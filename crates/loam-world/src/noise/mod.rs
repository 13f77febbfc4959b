//! Procedural height field: ridge/hill base terrain, lake basins and a masked mountain domain.

mod channel;

use std::sync::Arc;

pub use channel::NoiseChannel;

use crate::worldgen::WorldGenParams;

/// Frequency multipliers and blend weights of the three mountain ridge samples.
const MOUNTAIN_OCTAVE_FREQS: [f32; 3] = [1.0, 2.03, 4.11];
const MOUNTAIN_OCTAVE_WEIGHTS: [f32; 3] = [0.55, 0.30, 0.15];

#[inline]
fn channel_seed(seed: i32, salt: u32) -> i32 {
    ((seed as u32) ^ salt) as i32
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Height and water classification at one world position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TerrainSample {
    /// Raw, unscaled height.
    pub height: f32,
    /// Water strength in `[0, 1]`; non-zero only below sea level.
    pub water: f32,
}

/// Pure mapping from world `(x, z)` to terrain height and water mask.
///
/// Every query depends only on the coordinates and the immutable parameters, so two
/// chunks generated independently agree on their shared border.
pub struct NoiseField {
    params: Arc<WorldGenParams>,
    ridge: NoiseChannel,
    hill: NoiseChannel,
    lake: NoiseChannel,
    domain: NoiseChannel,
    mountain: NoiseChannel,
    slope: NoiseChannel,
    edge: NoiseChannel,
    water: NoiseChannel,
    vegetation: NoiseChannel,
}

impl NoiseField {
    pub fn new(params: Arc<WorldGenParams>) -> Self {
        let seed = params.seed;
        let n = &params.noise;
        Self {
            ridge: NoiseChannel::new(seed, &n.ridge),
            hill: NoiseChannel::new(channel_seed(seed, 0x1203_5F31), &n.hill),
            lake: NoiseChannel::new(channel_seed(seed, 0x92E3_A1B2), &n.lake),
            domain: NoiseChannel::new(channel_seed(seed, 0x5BD1_E995), &n.domain),
            mountain: NoiseChannel::new(channel_seed(seed, 0x27D4_EB2D), &n.mountain),
            slope: NoiseChannel::new(channel_seed(seed, 0x85EB_CA6B), &n.slope),
            edge: NoiseChannel::new(channel_seed(seed, 0xC2B2_AE35), &n.edge),
            water: NoiseChannel::new(channel_seed(seed, 0x7FEB_352D), &n.water),
            vegetation: NoiseChannel::new(channel_seed(seed, 0x846C_A68B), &n.vegetation),
            params,
        }
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    /// Raw sea level; heights below it are underwater.
    #[inline]
    pub fn sea_level(&self) -> f32 {
        self.params.sea_level
    }

    /// Raw terrain height at `(x, z)`. Non-finite input yields `0.0`.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        if !x.is_finite() || !z.is_finite() {
            return 0.0;
        }
        let base = self.base_height(x, z);
        let h = match self.mountain_height(x, z) {
            Some(m) => base.max(m),
            None => base,
        };
        finite_or_zero(h)
    }

    /// Water strength at `(x, z)`.
    pub fn water_mask(&self, x: f32, z: f32) -> f32 {
        let h = self.height(x, z);
        self.water_mask_with_height(x, z, h)
    }

    /// Water strength for a position whose height has already been sampled.
    pub fn water_mask_with_height(&self, x: f32, z: f32, height: f32) -> f32 {
        let p = &*self.params;
        if !x.is_finite() || !z.is_finite() || height >= p.sea_level {
            return 0.0;
        }
        let w = self.water.fbm(x, z);
        if w > p.water_threshold && p.sea_level - height > p.water_min_depth {
            1.0
        } else {
            0.0
        }
    }

    pub fn sample(&self, x: f32, z: f32) -> TerrainSample {
        let height = self.height(x, z);
        TerrainSample {
            height,
            water: self.water_mask_with_height(x, z, height),
        }
    }

    /// Low-frequency density channel driving vegetation placement, in `[0, 1]`.
    #[inline]
    pub fn vegetation_density(&self, x: f32, z: f32) -> f32 {
        finite_or_zero(self.vegetation.fbm(x, z))
    }

    fn lake_depression(&self, x: f32, z: f32) -> f32 {
        let p = &*self.params;
        let n = self.lake.fbm(x, z);
        if n > p.lake_threshold {
            (n - p.lake_threshold) * p.lake_depth
        } else {
            0.0
        }
    }

    fn base_height(&self, x: f32, z: f32) -> f32 {
        let p = &*self.params;
        let ridge = self.ridge.ridge(x, z);
        let hill = self.hill.fbm(x, z);
        p.sea_level + p.base_offset + (hill - 0.5) * p.hill_weight + ridge * p.ridge_detail
            - self.lake_depression(x, z)
    }

    /// Combined domain signal plus radial bias; mountains only form above the threshold.
    fn mountain_mask(&self, x: f32, z: f32) -> f32 {
        let p = &*self.params;
        let domain = self.domain.ridge(x, z);
        let (bx, bz) = p.mountain_bias;
        let dx = x - bx;
        let dz = z - bz;
        let dist = (dx * dx + dz * dz).sqrt();
        let radial = 1.0 - (dist / p.mountain_bias_radius).clamp(0.0, 1.0);
        domain * p.domain_weight + radial * p.radial_weight
    }

    fn mountain_height(&self, x: f32, z: f32) -> Option<f32> {
        let p = &*self.params;
        let mask = self.mountain_mask(x, z);
        if !(mask > p.mask_threshold) {
            return None;
        }

        let mut blend = 0.0;
        for (freq, weight) in MOUNTAIN_OCTAVE_FREQS.iter().zip(MOUNTAIN_OCTAVE_WEIGHTS) {
            blend += self.mountain.ridge_scaled(x, z, *freq) * weight;
        }
        let slope = self.slope.fbm(x, z).powf(p.slope_power);
        let shaped = blend.powf(1.0 + slope * p.cliff_sharpness);

        let span = p.domain_weight + p.radial_weight - p.mask_threshold;
        let edge = (self.edge.fbm(x, z) - 0.5) * p.edge_jitter;
        let s = ((mask - p.mask_threshold) / span + edge).clamp(0.0, 1.0);
        let strength = smoothstep(0.0, 1.0, s * p.strength_gain);
        if strength <= 0.0 {
            return None;
        }
        Some(shaped * p.mountain_height * strength)
    }
}
