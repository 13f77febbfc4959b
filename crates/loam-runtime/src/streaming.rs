use std::sync::Arc;

use loam_chunk::{Chunk, ChunkStore, generate_chunk};
use loam_geom::Vec3;
use loam_mesh_cpu::{TerrainMesh, build_water_plane};
use loam_world::{ChunkCoord, ConfigError, NoiseField, WorldGenParams};

use crate::window::ChunkWindow;

/// What one [`StreamingController::update_chunks`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Observer position was not finite or outside the addressable chunk range.
    Rejected,
    /// Observer moved less than the update threshold since the last evaluation.
    Skipped,
    Evaluated(UpdateReport),
}

impl UpdateOutcome {
    #[inline]
    pub fn report(&self) -> Option<&UpdateReport> {
        match self {
            UpdateOutcome::Evaluated(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub center: ChunkCoord,
    pub window: Option<ChunkWindow>,
    pub generated: usize,
    pub failed: usize,
    pub activated: usize,
    pub deactivated: usize,
    pub evicted: usize,
}

impl UpdateReport {
    /// Whether any chunk entered or left the active set.
    #[inline]
    pub fn activation_changed(&self) -> bool {
        self.generated + self.activated + self.deactivated > 0
    }
}

/// Running counters over the controller's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    pub evaluations: u64,
    pub skipped: u64,
    pub rejected: u64,
    pub generated: u64,
    pub evicted: u64,
    pub on_demand_loads: u64,
    pub generation_failures: u64,
    /// Sum of per-chunk generation time, microseconds.
    pub generate_us: u64,
}

/// Keeps the chunks around an observer loaded and active.
///
/// Chunks inside the window of `chunk_radius()` around the observer's chunk are active.
/// Chunks that leave it stay cached until the store grows past `gc_threshold`, at which
/// point every inactive chunk is dropped.
pub struct StreamingController {
    field: NoiseField,
    store: ChunkStore,
    last_observer: Option<Vec3>,
    window: Option<ChunkWindow>,
    activation_changed: bool,
    active_revision: u64,
    stats: StreamingStats,
}

impl StreamingController {
    pub fn new(params: WorldGenParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self::with_field(NoiseField::new(Arc::new(params))))
    }

    /// Wraps an existing field. Parameters are assumed validated.
    pub fn with_field(field: NoiseField) -> Self {
        Self {
            field,
            store: ChunkStore::new(),
            last_observer: None,
            window: None,
            activation_changed: false,
            active_revision: 0,
            stats: StreamingStats::default(),
        }
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        self.field.params()
    }

    #[inline]
    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    #[inline]
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    #[inline]
    pub fn stats(&self) -> StreamingStats {
        self.stats
    }

    #[inline]
    pub(crate) fn stats_mut(&mut self) -> &mut StreamingStats {
        &mut self.stats
    }

    /// Window computed by the last evaluated update.
    #[inline]
    pub fn window(&self) -> Option<ChunkWindow> {
        self.window
    }

    /// Observer position at the last evaluated update.
    #[inline]
    pub fn last_observer(&self) -> Option<Vec3> {
        self.last_observer
    }

    /// Whether the most recent `update_chunks` call changed the active set.
    #[inline]
    pub fn activation_changed(&self) -> bool {
        self.activation_changed
    }

    /// Bumped every time the active set changes, including on-demand loads.
    #[inline]
    pub fn active_revision(&self) -> u64 {
        self.active_revision
    }

    pub fn active_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.store.active()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.store.active_count()
    }

    /// Re-evaluates the active window for `observer`.
    pub fn update_chunks(&mut self, observer: Vec3) -> UpdateOutcome {
        self.activation_changed = false;
        if !observer.is_finite() {
            log::warn!("ignoring non-finite observer position {:?}", observer.to_array());
            self.stats.rejected += 1;
            return UpdateOutcome::Rejected;
        }
        let p = self.field.params();
        if let Some(last) = self.last_observer {
            if observer.distance(last) < p.update_threshold {
                log::trace!("observer moved {:.2}, below threshold", observer.distance(last));
                self.stats.skipped += 1;
                return UpdateOutcome::Skipped;
            }
        }
        let Some(center) = ChunkCoord::containing(observer.x, observer.z, p.chunk_size) else {
            log::warn!(
                "observer ({}, {}) is outside the addressable chunk range",
                observer.x,
                observer.z
            );
            self.stats.rejected += 1;
            return UpdateOutcome::Rejected;
        };
        let window = ChunkWindow::around(center, p.chunk_radius());
        let gc_threshold = p.gc_threshold;
        if self.window != Some(window) {
            log::info!(
                "window moved to ({}, {})..=({}, {})",
                window.min.x,
                window.min.z,
                window.max.x,
                window.max.z
            );
        }

        let mut report = UpdateReport {
            center,
            window: Some(window),
            ..UpdateReport::default()
        };
        for coord in window.iter() {
            match self.store.get_mut(coord) {
                Some(chunk) => {
                    if chunk.set_active(true) {
                        report.activated += 1;
                    }
                }
                None => {
                    if self.generate_into_store(coord) {
                        report.generated += 1;
                    } else {
                        report.failed += 1;
                    }
                }
            }
        }
        for chunk in self.store.iter_mut() {
            if !window.contains(chunk.coord()) && chunk.set_active(false) {
                report.deactivated += 1;
            }
        }
        if self.store.len() > gc_threshold {
            report.evicted = self.store.evict_inactive();
            self.stats.evicted += report.evicted as u64;
            log::info!(
                "evicted {} inactive chunks, {} remain",
                report.evicted,
                self.store.len()
            );
        }

        self.activation_changed = report.activation_changed();
        if self.activation_changed {
            self.active_revision += 1;
        }
        self.window = Some(window);
        self.last_observer = Some(observer);
        self.stats.evaluations += 1;
        log::trace!("update {:?}", report);
        UpdateOutcome::Evaluated(report)
    }

    /// Generates `coord` and inserts it as active, bumping the revision.
    pub(crate) fn load_chunk(&mut self, coord: ChunkCoord) -> bool {
        let ok = self.generate_into_store(coord);
        if ok {
            self.active_revision += 1;
        }
        ok
    }

    fn generate_into_store(&mut self, coord: ChunkCoord) -> bool {
        match generate_chunk(&self.field, coord) {
            Ok(chunk) => {
                self.stats.generated += 1;
                self.stats.generate_us += u64::from(chunk.timing().total_us());
                self.store.insert(chunk);
                true
            }
            Err(e) => {
                log::warn!("{}", e);
                self.stats.generation_failures += 1;
                false
            }
        }
    }

    /// Sea plane covering the render distance around `center`.
    pub fn water_plane(&self, center: Vec3, subdivisions: usize) -> TerrainMesh {
        let p = self.field.params();
        build_water_plane(center, p.render_distance, subdivisions, p.sea_level_world())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_world::WorldGenConfig;

    fn small_params() -> WorldGenParams {
        let mut cfg = WorldGenConfig::default();
        cfg.terrain.chunk_size = 20.0;
        cfg.terrain.vertex_step = 5.0;
        cfg.streaming.render_distance = 20.0;
        cfg.streaming.update_threshold = 10.0;
        cfg.streaming.gc_threshold = 1000;
        WorldGenParams::from_config(&cfg)
    }

    #[test]
    fn first_update_generates_window() {
        let mut c = StreamingController::new(small_params()).unwrap();
        let out = c.update_chunks(Vec3::new(10.0, 0.0, 10.0));
        let r = out.report().copied().unwrap();
        assert_eq!(r.generated, 9);
        assert_eq!(c.active_count(), 9);
        assert!(c.activation_changed());
        assert_eq!(c.active_revision(), 1);
    }

    #[test]
    fn small_moves_are_skipped() {
        let mut c = StreamingController::new(small_params()).unwrap();
        c.update_chunks(Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(c.update_chunks(Vec3::new(15.0, 3.0, 12.0)), UpdateOutcome::Skipped);
        assert!(!c.activation_changed());
        assert_eq!(c.last_observer(), Some(Vec3::new(10.0, 0.0, 10.0)));
        assert_eq!(c.stats().skipped, 1);
    }

    #[test]
    fn non_finite_observer_is_rejected() {
        let mut c = StreamingController::new(small_params()).unwrap();
        assert_eq!(c.update_chunks(Vec3::new(f32::NAN, 0.0, 0.0)), UpdateOutcome::Rejected);
        assert!(c.store().is_empty());
        assert_eq!(c.last_observer(), None);
    }

    #[test]
    fn invalid_params_are_refused() {
        let mut p = small_params();
        p.vertex_step = 0.0;
        assert!(StreamingController::new(p).is_err());
    }
}
