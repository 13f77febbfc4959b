use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::worldgen::Fractal;

/// Scaled sample coordinates past this magnitude overflow the generator's lattice index.
const LATTICE_LIMIT: f32 = 5.0e8;

/// One seeded noise source with its own octave settings.
///
/// The underlying generator is single-octave OpenSimplex2; octaves are summed here so
/// both the fbm and ridge variants share one set of parameters.
pub struct NoiseChannel {
    noise: FastNoiseLite,
    frequency: f32,
    octaves: i32,
    lacunarity: f32,
    gain: f32,
    ridge_offset: f32,
    amplitude_sum: f32,
}

impl NoiseChannel {
    pub fn new(seed: i32, fractal: &Fractal) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(fractal.frequency));
        let octaves = fractal.octaves.max(1);
        let mut amplitude_sum = 0.0;
        let mut amp = 1.0;
        for _ in 0..octaves {
            amplitude_sum += amp;
            amp *= fractal.gain;
        }
        Self {
            noise,
            frequency: fractal.frequency,
            octaves,
            lacunarity: fractal.lacunarity,
            gain: fractal.gain,
            ridge_offset: fractal.ridge_offset,
            amplitude_sum,
        }
    }

    /// Fractal Brownian motion remapped to `[0, 1]`.
    #[inline]
    pub fn fbm(&self, x: f32, z: f32) -> f32 {
        self.fbm_scaled(x, z, 1.0)
    }

    /// As [`NoiseChannel::fbm`] with the base frequency multiplied by `freq_mul`.
    pub fn fbm_scaled(&self, x: f32, z: f32, freq_mul: f32) -> f32 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        let mut f = freq_mul;
        for _ in 0..self.octaves {
            sum += self.octave(x, z, f) * amp;
            amp *= self.gain;
            f *= self.lacunarity;
        }
        ((sum / self.amplitude_sum) * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Ridged multifractal remapped to `[0, 1]`; peaks sit where the base noise crosses zero.
    #[inline]
    pub fn ridge(&self, x: f32, z: f32) -> f32 {
        self.ridge_scaled(x, z, 1.0)
    }

    pub fn ridge_scaled(&self, x: f32, z: f32, freq_mul: f32) -> f32 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        let mut f = freq_mul;
        for _ in 0..self.octaves {
            let n = self.octave(x, z, f);
            let r = self.ridge_offset - n.abs();
            sum += r * r * amp;
            amp *= self.gain;
            f *= self.lacunarity;
        }
        let peak = self.ridge_offset * self.ridge_offset * self.amplitude_sum;
        (sum / peak).clamp(0.0, 1.0)
    }

    /// One raw octave in `[-1, 1]`; `0.0` where the scaled position leaves the lattice range.
    #[inline]
    fn octave(&self, x: f32, z: f32, f: f32) -> f32 {
        let s = f * self.frequency;
        if !((x * s).abs() < LATTICE_LIMIT && (z * s).abs() < LATTICE_LIMIT) {
            return 0.0;
        }
        self.noise.get_noise_2d(x * f, z * f)
    }
}
