use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub streaming: Streaming,
    #[serde(default)]
    pub base: Base,
    #[serde(default)]
    pub lake: Lake,
    #[serde(default)]
    pub mountain: Mountain,
    #[serde(default)]
    pub water: Water,
    #[serde(default)]
    pub vegetation: Vegetation,
    #[serde(default)]
    pub noise: NoiseChannels,
}

fn default_seed() -> i32 {
    1337
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            terrain: Terrain::default(),
            streaming: Streaming::default(),
            base: Base::default(),
            lake: Lake::default(),
            mountain: Mountain::default(),
            water: Water::default(),
            vegetation: Vegetation::default(),
            noise: NoiseChannels::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Terrain {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: f32,
    #[serde(default = "default_vertex_step")]
    pub vertex_step: f32,
    #[serde(default = "default_height_scale")]
    pub height_scale: f32,
    #[serde(default = "default_sea_level")]
    pub sea_level: f32,
}
fn default_chunk_size() -> f32 {
    100.0
}
fn default_vertex_step() -> f32 {
    5.0
}
fn default_height_scale() -> f32 {
    80.0
}
fn default_sea_level() -> f32 {
    0.3
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            vertex_step: default_vertex_step(),
            height_scale: default_height_scale(),
            sea_level: default_sea_level(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Streaming {
    #[serde(default = "default_render_distance")]
    pub render_distance: f32,
    #[serde(default = "default_update_threshold")]
    pub update_threshold: f32,
    #[serde(default = "default_gc_threshold")]
    pub gc_threshold: usize,
}
fn default_render_distance() -> f32 {
    300.0
}
fn default_update_threshold() -> f32 {
    10.0
}
fn default_gc_threshold() -> usize {
    160
}
impl Default for Streaming {
    fn default() -> Self {
        Self {
            render_distance: default_render_distance(),
            update_threshold: default_update_threshold(),
            gc_threshold: default_gc_threshold(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Base {
    #[serde(default = "default_base_offset")]
    pub offset: f32,
    #[serde(default = "default_hill_weight")]
    pub hill_weight: f32,
    #[serde(default = "default_ridge_detail")]
    pub ridge_detail: f32,
}
fn default_base_offset() -> f32 {
    0.06
}
fn default_hill_weight() -> f32 {
    0.25
}
fn default_ridge_detail() -> f32 {
    0.12
}
impl Default for Base {
    fn default() -> Self {
        Self {
            offset: default_base_offset(),
            hill_weight: default_hill_weight(),
            ridge_detail: default_ridge_detail(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Lake {
    #[serde(default = "default_lake_threshold")]
    pub threshold: f32,
    #[serde(default = "default_lake_depth")]
    pub depth: f32,
}
fn default_lake_threshold() -> f32 {
    0.58
}
fn default_lake_depth() -> f32 {
    1.6
}
impl Default for Lake {
    fn default() -> Self {
        Self {
            threshold: default_lake_threshold(),
            depth: default_lake_depth(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Mountain {
    #[serde(default)]
    pub bias_x: f32,
    #[serde(default)]
    pub bias_z: f32,
    #[serde(default = "default_bias_radius")]
    pub bias_radius: f32,
    #[serde(default = "default_domain_weight")]
    pub domain_weight: f32,
    #[serde(default = "default_radial_weight")]
    pub radial_weight: f32,
    #[serde(default = "default_mask_threshold")]
    pub mask_threshold: f32,
    #[serde(default = "default_mountain_height")]
    pub height: f32,
    #[serde(default = "default_slope_power")]
    pub slope_power: f32,
    #[serde(default = "default_cliff_sharpness")]
    pub cliff_sharpness: f32,
    #[serde(default = "default_edge_jitter")]
    pub edge_jitter: f32,
    #[serde(default = "default_strength_gain")]
    pub strength_gain: f32,
}
fn default_bias_radius() -> f32 {
    2400.0
}
fn default_domain_weight() -> f32 {
    0.6
}
fn default_radial_weight() -> f32 {
    0.6
}
fn default_mask_threshold() -> f32 {
    0.75
}
fn default_mountain_height() -> f32 {
    2.0
}
fn default_slope_power() -> f32 {
    2.0
}
fn default_cliff_sharpness() -> f32 {
    1.5
}
fn default_edge_jitter() -> f32 {
    0.3
}
fn default_strength_gain() -> f32 {
    2.5
}
impl Default for Mountain {
    fn default() -> Self {
        Self {
            bias_x: 0.0,
            bias_z: 0.0,
            bias_radius: default_bias_radius(),
            domain_weight: default_domain_weight(),
            radial_weight: default_radial_weight(),
            mask_threshold: default_mask_threshold(),
            height: default_mountain_height(),
            slope_power: default_slope_power(),
            cliff_sharpness: default_cliff_sharpness(),
            edge_jitter: default_edge_jitter(),
            strength_gain: default_strength_gain(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Water {
    #[serde(default = "default_water_threshold")]
    pub threshold: f32,
    #[serde(default = "default_water_min_depth")]
    pub min_depth: f32,
}
fn default_water_threshold() -> f32 {
    0.58
}
fn default_water_min_depth() -> f32 {
    0.02
}
impl Default for Water {
    fn default() -> Self {
        Self {
            threshold: default_water_threshold(),
            min_depth: default_water_min_depth(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Vegetation {
    #[serde(default = "default_vegetation_threshold")]
    pub threshold: f32,
}
fn default_vegetation_threshold() -> f32 {
    0.42
}
impl Default for Vegetation {
    fn default() -> Self {
        Self {
            threshold: default_vegetation_threshold(),
        }
    }
}

/// Octave settings for one noise channel.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Fractal {
    #[serde(default = "d_freq")]
    pub frequency: f32,
    #[serde(default = "d_oct")]
    pub octaves: i32,
    #[serde(default = "d_lac")]
    pub lacunarity: f32,
    #[serde(default = "d_gain")]
    pub gain: f32,
    #[serde(default = "d_ridge_offset")]
    pub ridge_offset: f32,
}
fn d_freq() -> f32 {
    0.004
}
fn d_oct() -> i32 {
    4
}
fn d_lac() -> f32 {
    2.0
}
fn d_gain() -> f32 {
    0.5
}
fn d_ridge_offset() -> f32 {
    1.0
}
impl Default for Fractal {
    fn default() -> Self {
        Self {
            frequency: d_freq(),
            octaves: d_oct(),
            lacunarity: d_lac(),
            gain: d_gain(),
            ridge_offset: d_ridge_offset(),
        }
    }
}

impl Fractal {
    const fn with(frequency: f32, octaves: i32, gain: f32) -> Self {
        Self {
            frequency,
            octaves,
            lacunarity: 2.0,
            gain,
            ridge_offset: 1.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NoiseChannels {
    #[serde(default = "d_ridge")]
    pub ridge: Fractal,
    #[serde(default = "d_hill")]
    pub hill: Fractal,
    #[serde(default = "d_lake")]
    pub lake: Fractal,
    #[serde(default = "d_domain")]
    pub domain: Fractal,
    #[serde(default = "d_mountain")]
    pub mountain: Fractal,
    #[serde(default = "d_slope")]
    pub slope: Fractal,
    #[serde(default = "d_edge")]
    pub edge: Fractal,
    #[serde(default = "d_water")]
    pub water: Fractal,
    #[serde(default = "d_vegetation")]
    pub vegetation: Fractal,
}
fn d_ridge() -> Fractal {
    Fractal::with(0.0035, 5, 0.5)
}
fn d_hill() -> Fractal {
    Fractal::with(0.002, 4, 0.5)
}
fn d_lake() -> Fractal {
    Fractal::with(0.0006, 3, 0.45)
}
fn d_domain() -> Fractal {
    Fractal::with(0.0008, 3, 0.5)
}
fn d_mountain() -> Fractal {
    Fractal::with(0.0025, 5, 0.55)
}
fn d_slope() -> Fractal {
    Fractal::with(0.0015, 2, 0.5)
}
fn d_edge() -> Fractal {
    Fractal::with(0.01, 2, 0.5)
}
fn d_water() -> Fractal {
    Fractal::with(0.0004, 2, 0.5)
}
fn d_vegetation() -> Fractal {
    Fractal::with(0.02, 2, 0.5)
}
impl Default for NoiseChannels {
    fn default() -> Self {
        Self {
            ridge: d_ridge(),
            hill: d_hill(),
            lake: d_lake(),
            domain: d_domain(),
            mountain: d_mountain(),
            slope: d_slope(),
            edge: d_edge(),
            water: d_water(),
            vegetation: d_vegetation(),
        }
    }
}

// Flattened params used in tight loops (snapshot of config)
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub seed: i32,
    pub chunk_size: f32,
    pub vertex_step: f32,
    pub cells_per_axis: usize,
    pub height_scale: f32,
    pub sea_level: f32,
    pub render_distance: f32,
    pub update_threshold: f32,
    pub gc_threshold: usize,
    pub base_offset: f32,
    pub hill_weight: f32,
    pub ridge_detail: f32,
    pub lake_threshold: f32,
    pub lake_depth: f32,
    pub mountain_bias: (f32, f32),
    pub mountain_bias_radius: f32,
    pub domain_weight: f32,
    pub radial_weight: f32,
    pub mask_threshold: f32,
    pub mountain_height: f32,
    pub slope_power: f32,
    pub cliff_sharpness: f32,
    pub edge_jitter: f32,
    pub strength_gain: f32,
    pub water_threshold: f32,
    pub water_min_depth: f32,
    pub vegetation_threshold: f32,
    pub noise: NoiseChannels,
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        let step = cfg.terrain.vertex_step;
        let cells = if step > 0.0 {
            (cfg.terrain.chunk_size / step).round().max(0.0) as usize
        } else {
            0
        };
        Self {
            seed: cfg.seed,
            chunk_size: cfg.terrain.chunk_size,
            vertex_step: step,
            cells_per_axis: cells,
            height_scale: cfg.terrain.height_scale,
            sea_level: cfg.terrain.sea_level,
            render_distance: cfg.streaming.render_distance,
            update_threshold: cfg.streaming.update_threshold,
            gc_threshold: cfg.streaming.gc_threshold,
            base_offset: cfg.base.offset,
            hill_weight: cfg.base.hill_weight,
            ridge_detail: cfg.base.ridge_detail,
            lake_threshold: cfg.lake.threshold,
            lake_depth: cfg.lake.depth,
            mountain_bias: (cfg.mountain.bias_x, cfg.mountain.bias_z),
            mountain_bias_radius: cfg.mountain.bias_radius,
            domain_weight: cfg.mountain.domain_weight,
            radial_weight: cfg.mountain.radial_weight,
            mask_threshold: cfg.mountain.mask_threshold,
            mountain_height: cfg.mountain.height,
            slope_power: cfg.mountain.slope_power,
            cliff_sharpness: cfg.mountain.cliff_sharpness,
            edge_jitter: cfg.mountain.edge_jitter,
            strength_gain: cfg.mountain.strength_gain,
            water_threshold: cfg.water.threshold,
            water_min_depth: cfg.water.min_depth,
            vegetation_threshold: cfg.vegetation.threshold,
            noise: cfg.noise.clone(),
        }
    }

    /// Checks the invariants the generator relies on (grid alignment, positive sizes,
    /// usable octave settings).
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be finite and > 0, got {v}")))
            }
        }
        fn finite(field: &'static str, v: f32) -> Result<(), ConfigError> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be finite, got {v}")))
            }
        }

        positive("terrain.chunk_size", self.chunk_size)?;
        positive("terrain.vertex_step", self.vertex_step)?;
        let cells = self.chunk_size / self.vertex_step;
        if self.cells_per_axis == 0 || (cells - self.cells_per_axis as f32).abs() > 1e-3 {
            return Err(ConfigError::invalid(
                "terrain.vertex_step",
                format!(
                    "chunk_size {} is not a whole multiple of vertex_step {}",
                    self.chunk_size, self.vertex_step
                ),
            ));
        }
        positive("terrain.height_scale", self.height_scale)?;
        finite("terrain.sea_level", self.sea_level)?;
        positive("streaming.render_distance", self.render_distance)?;
        if !(self.update_threshold.is_finite() && self.update_threshold >= 0.0) {
            return Err(ConfigError::invalid(
                "streaming.update_threshold",
                format!("must be finite and >= 0, got {}", self.update_threshold),
            ));
        }
        for (field, v) in [
            ("base.offset", self.base_offset),
            ("base.hill_weight", self.hill_weight),
            ("base.ridge_detail", self.ridge_detail),
            ("lake.threshold", self.lake_threshold),
            ("lake.depth", self.lake_depth),
            ("mountain.bias_x", self.mountain_bias.0),
            ("mountain.bias_z", self.mountain_bias.1),
            ("mountain.domain_weight", self.domain_weight),
            ("mountain.radial_weight", self.radial_weight),
            ("mountain.mask_threshold", self.mask_threshold),
            ("mountain.height", self.mountain_height),
            ("mountain.slope_power", self.slope_power),
            ("mountain.cliff_sharpness", self.cliff_sharpness),
            ("mountain.edge_jitter", self.edge_jitter),
            ("mountain.strength_gain", self.strength_gain),
            ("water.threshold", self.water_threshold),
            ("water.min_depth", self.water_min_depth),
            ("vegetation.threshold", self.vegetation_threshold),
        ] {
            finite(field, v)?;
        }
        positive("mountain.bias_radius", self.mountain_bias_radius)?;
        if self.domain_weight + self.radial_weight <= self.mask_threshold {
            return Err(ConfigError::invalid(
                "mountain.mask_threshold",
                "must be below domain_weight + radial_weight or no mountain can ever form".into(),
            ));
        }
        for (field, f) in [
            ("noise.ridge", &self.noise.ridge),
            ("noise.hill", &self.noise.hill),
            ("noise.lake", &self.noise.lake),
            ("noise.domain", &self.noise.domain),
            ("noise.mountain", &self.noise.mountain),
            ("noise.slope", &self.noise.slope),
            ("noise.edge", &self.noise.edge),
            ("noise.water", &self.noise.water),
            ("noise.vegetation", &self.noise.vegetation),
        ] {
            validate_fractal(field, f)?;
        }
        Ok(())
    }

    /// Radius of the active window, in chunks.
    #[inline]
    pub fn chunk_radius(&self) -> i32 {
        (self.render_distance / self.chunk_size).ceil() as i32
    }

    /// Upper bound of the raw height the generator can produce.
    pub fn max_raw_height(&self) -> f32 {
        let base = self.sea_level
            + self.base_offset
            + 0.5 * self.hill_weight.abs()
            + self.ridge_detail.max(0.0);
        base.max(self.mountain_height)
    }

    #[inline]
    pub fn sea_level_world(&self) -> f32 {
        self.sea_level * self.height_scale
    }
}

fn validate_fractal(field: &'static str, f: &Fractal) -> Result<(), ConfigError> {
    if !(1..=12).contains(&f.octaves) {
        return Err(ConfigError::invalid(field, format!("octaves must be in 1..=12, got {}", f.octaves)));
    }
    if !(f.frequency.is_finite() && f.frequency > 0.0) {
        return Err(ConfigError::invalid(field, format!("frequency must be > 0, got {}", f.frequency)));
    }
    if !(f.lacunarity.is_finite() && f.lacunarity > 0.0) {
        return Err(ConfigError::invalid(field, format!("lacunarity must be > 0, got {}", f.lacunarity)));
    }
    if !(f.gain.is_finite() && f.gain > 0.0) {
        return Err(ConfigError::invalid(field, format!("gain must be > 0, got {}", f.gain)));
    }
    if !(f.ridge_offset.is_finite() && f.ridge_offset > 0.0) {
        return Err(ConfigError::invalid(
            field,
            format!("ridge_offset must be > 0, got {}", f.ridge_offset),
        ));
    }
    Ok(())
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    let params = WorldGenParams::from_config(&cfg);
    params.validate()?;
    Ok(params)
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: String) -> Self {
        ConfigError::InvalidValue { field, reason }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid worldgen value `{}`: {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
