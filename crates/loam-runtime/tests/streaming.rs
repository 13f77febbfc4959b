use loam_geom::Vec3;
use loam_runtime::{ChunkWindow, StreamingController, UpdateOutcome, VegetationLayer};
use std::sync::Arc;

use loam_world::{ChunkCoord, NoiseField, WorldGenConfig, WorldGenParams};
use proptest::prelude::*;

fn params(chunk: f32, step: f32, render: f32, threshold: f32, gc: usize) -> WorldGenParams {
    let mut cfg = WorldGenConfig::default();
    cfg.terrain.chunk_size = chunk;
    cfg.terrain.vertex_step = step;
    cfg.streaming.render_distance = render;
    cfg.streaming.update_threshold = threshold;
    cfg.streaming.gc_threshold = gc;
    WorldGenParams::from_config(&cfg)
}

fn active_coords(c: &StreamingController) -> Vec<ChunkCoord> {
    let mut v: Vec<_> = c.active_chunks().map(|ch| ch.coord()).collect();
    v.sort();
    v
}

fn window_coords(w: ChunkWindow) -> Vec<ChunkCoord> {
    let mut v: Vec<_> = w.iter().collect();
    v.sort();
    v
}

#[test]
fn origin_scenario() {
    let mut c = StreamingController::new(params(100.0, 5.0, 100.0, 10.0, 10_000)).unwrap();

    let out = c.update_chunks(Vec3::ZERO);
    let report = out.report().copied().expect("first update evaluates");
    assert_eq!(report.generated, 9);
    let expected = ChunkWindow {
        min: ChunkCoord::new(-1, -1),
        max: ChunkCoord::new(1, 1),
    };
    assert_eq!(active_coords(&c), window_coords(expected));

    let rev = c.active_revision();
    assert_eq!(c.update_chunks(Vec3::new(5.0, 0.0, 0.0)), UpdateOutcome::Skipped);
    assert_eq!(c.active_revision(), rev);
    assert_eq!(c.store().len(), 9);

    let out = c.update_chunks(Vec3::new(150.0, 0.0, 0.0));
    let report = out.report().copied().expect("large move evaluates");
    let expected = ChunkWindow {
        min: ChunkCoord::new(0, -1),
        max: ChunkCoord::new(2, 1),
    };
    assert_eq!(report.window, Some(expected));
    assert_eq!(report.generated, 3);
    assert_eq!(report.deactivated, 3);
    assert_eq!(active_coords(&c), window_coords(expected));
    // left column stays cached while under the gc threshold
    assert_eq!(c.store().len(), 12);
    assert!(c.store().get(ChunkCoord::new(-1, 0)).is_some_and(|ch| !ch.is_active()));
}

#[test]
fn returning_reactivates_cached_chunks() {
    let mut c = StreamingController::new(params(100.0, 5.0, 100.0, 10.0, 10_000)).unwrap();
    c.update_chunks(Vec3::ZERO);
    c.update_chunks(Vec3::new(150.0, 0.0, 0.0));
    let out = c.update_chunks(Vec3::new(50.0, 0.0, 0.0));
    let r = out.report().copied().unwrap();
    assert_eq!(r.generated, 0);
    assert_eq!(r.activated, 3);
    assert_eq!(r.deactivated, 3);
    assert_eq!(c.stats().generated, 12);
}

#[test]
fn eviction_keeps_only_the_window() {
    let mut c = StreamingController::new(params(20.0, 5.0, 20.0, 1.0, 10)).unwrap();
    c.update_chunks(Vec3::new(10.0, 0.0, 10.0));
    assert_eq!(c.store().len(), 9);
    let out = c.update_chunks(Vec3::new(210.0, 0.0, 10.0));
    let r = out.report().copied().unwrap();
    assert_eq!(r.evicted, 9);
    assert_eq!(c.store().len(), 9);
    let w = c.window().unwrap();
    assert!(c.store().coords().all(|cc| w.contains(cc)));
    assert_eq!(c.stats().evicted, 9);
}

#[test]
fn nan_observer_leaves_state_alone() {
    let mut c = StreamingController::new(params(20.0, 5.0, 20.0, 1.0, 100)).unwrap();
    c.update_chunks(Vec3::ZERO);
    let before = active_coords(&c);
    let rev = c.active_revision();
    assert_eq!(c.update_chunks(Vec3::new(0.0, f32::INFINITY, 0.0)), UpdateOutcome::Rejected);
    assert_eq!(active_coords(&c), before);
    assert_eq!(c.active_revision(), rev);
    assert_eq!(c.last_observer(), Some(Vec3::ZERO));
    assert!(!c.activation_changed());
}

#[test]
fn far_observer_is_rejected_without_loading() {
    let mut c = StreamingController::new(WorldGenParams::default()).unwrap();
    assert_eq!(c.update_chunks(Vec3::new(-2.0e11, 0.0, -2.0e11)), UpdateOutcome::Rejected);
    assert_eq!(c.height_at(-2.0e11, -2.0e11), 0.0);
    assert_eq!(c.height_at(3.0e9, 10.0), 0.0);
    assert!(c.store().is_empty());
    assert_eq!(c.stats().rejected, 1);
    assert_eq!(c.last_observer(), None);
}

#[test]
fn failed_generation_leaves_no_chunks() {
    let mut p = WorldGenParams::default();
    p.cells_per_axis = 0;
    let mut c = StreamingController::with_field(NoiseField::new(Arc::new(p)));

    assert_eq!(c.height_at(10.0, 10.0), 0.0);
    assert_eq!(c.stats().on_demand_loads, 1);
    assert_eq!(c.stats().generation_failures, 1);
    assert_eq!(c.active_revision(), 0);

    let out = c.update_chunks(Vec3::ZERO);
    let r = out.report().copied().unwrap();
    let window = r.window.unwrap();
    assert_eq!(r.failed, window.len());
    assert_eq!(r.generated, 0);
    assert!(c.store().is_empty());
    assert!(!c.activation_changed());
    assert_eq!(c.stats().generation_failures, 1 + window.len() as u64);
    assert_eq!(c.stats().generated, 0);
}

#[test]
fn vegetation_follows_active_set() {
    let mut c = StreamingController::new(params(20.0, 5.0, 20.0, 1.0, 100)).unwrap();
    let mut veg = VegetationLayer::new();
    c.update_chunks(Vec3::ZERO);
    assert!(veg.sync(&c));
    assert!(!veg.sync(&c));
    let expected: usize = c.active_chunks().map(|ch| ch.vegetation().len()).sum();
    assert_eq!(veg.len(), expected);

    // an on-demand load between updates must still reach the layer
    c.height_at(500.0, 500.0);
    assert!(veg.sync(&c));
    let expected: usize = c.active_chunks().map(|ch| ch.vegetation().len()).sum();
    assert_eq!(veg.len(), expected);
    assert_eq!(c.active_count(), 10);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn window_matches_observer(x in -2_000.0f32..2_000.0, z in -2_000.0f32..2_000.0) {
        let mut c = StreamingController::new(params(20.0, 10.0, 30.0, 1.0, 10_000)).unwrap();
        let out = c.update_chunks(Vec3::new(x, 0.0, z));
        let r = out.report().copied().unwrap();
        let center = ChunkCoord::containing(x, z, 20.0).unwrap();
        prop_assert_eq!(r.center, center);
        let w = ChunkWindow::around(center, 2);
        prop_assert_eq!(active_coords(&c), window_coords(w));
        prop_assert_eq!(c.store().len(), 25);
    }

    #[test]
    fn sub_threshold_moves_change_nothing(
        dx in -5.0f32..5.0, dy in -5.0f32..5.0, dz in -5.0f32..5.0,
    ) {
        let mut c = StreamingController::new(params(20.0, 10.0, 20.0, 10.0, 10_000)).unwrap();
        let start = Vec3::new(19.0, 0.0, 1.0);
        c.update_chunks(start);
        let rev = c.active_revision();
        let len = c.store().len();
        let moved = start + Vec3::new(dx, dy, dz);
        prop_assume!(moved.distance(start) < 10.0);
        prop_assert_eq!(c.update_chunks(moved), UpdateOutcome::Skipped);
        prop_assert_eq!(c.active_revision(), rev);
        prop_assert_eq!(c.store().len(), len);
        prop_assert_eq!(c.last_observer(), Some(start));
    }

    #[test]
    fn store_never_exceeds_threshold_plus_window(
        steps in prop::collection::vec((-300.0f32..300.0, -300.0f32..300.0), 1..8),
    ) {
        let gc = 12;
        let mut c = StreamingController::new(params(20.0, 10.0, 20.0, 0.0, gc)).unwrap();
        for (x, z) in steps {
            c.update_chunks(Vec3::new(x, 0.0, z));
            prop_assert!(c.store().len() <= gc);
            prop_assert_eq!(c.active_count(), 9);
        }
    }
}
