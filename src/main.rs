use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use loam_geom::Vec3;
use loam_runtime::{StreamingController, UpdateOutcome, VegetationLayer};
use loam_world::{WorldGenParams, load_params_from_path};

/// Eye height of the walking observer above the ground, world units.
const EYE_HEIGHT: f32 = 1.8;

#[derive(Parser, Debug)]
#[command(name = "loam")]
#[command(about = "Walk an observer across streamed procedural terrain")]
struct Args {
    /// World-gen config (TOML); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of walk steps
    #[arg(long, default_value = "200")]
    steps: u32,

    /// Distance travelled per step
    #[arg(long, default_value = "4.0")]
    speed: f32,

    /// Walk direction in degrees, 0 = +X, 90 = +Z
    #[arg(long, default_value = "30.0")]
    heading: f32,

    /// Print the terrain height at X Z and exit
    #[arg(long, num_args = 2, value_names = ["X", "Z"], allow_negative_numbers = true)]
    probe: Option<Vec<f32>>,

    /// Subdivisions of the water plane built at the end of the walk
    #[arg(long, default_value = "32")]
    water_subdivisions: usize,
}

fn load_params(args: &Args) -> Result<WorldGenParams, Box<dyn std::error::Error>> {
    match &args.config {
        Some(path) => {
            let params = load_params_from_path(path)?;
            log::info!("loaded world-gen config from {}", path.display());
            Ok(params)
        }
        None => {
            log::info!("using built-in world-gen defaults");
            Ok(WorldGenParams::default())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let params = match load_params(&args) {
        Ok(p) => p,
        Err(e) => {
            log::error!("config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut controller = match StreamingController::new(params) {
        Ok(c) => c,
        Err(e) => {
            log::error!("config: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(probe) = &args.probe {
        let (x, z) = (probe[0], probe[1]);
        println!("height({x}, {z}) = {:.3}", controller.height_at(x, z));
        return ExitCode::SUCCESS;
    }

    let heading = args.heading.to_radians();
    let dir = Vec3::new(heading.cos(), 0.0, heading.sin());
    let mut vegetation = VegetationLayer::new();
    let mut pos = Vec3::ZERO;
    pos.y = controller.height_at(pos.x, pos.z) + EYE_HEIGHT;
    for step in 0..args.steps {
        if let UpdateOutcome::Evaluated(r) = controller.update_chunks(pos) {
            if r.activation_changed() {
                log::debug!(
                    "step {step}: +{} generated, {} activated, {} deactivated, {} evicted",
                    r.generated,
                    r.activated,
                    r.deactivated,
                    r.evicted
                );
            }
        }
        vegetation.sync(&controller);
        pos += dir * args.speed;
        pos.y = controller.height_at(pos.x, pos.z) + EYE_HEIGHT;
    }

    let water = controller.water_plane(pos, args.water_subdivisions);
    let stats = controller.stats();
    let terrain_tris: usize = controller.active_chunks().map(|c| c.mesh().triangle_count()).sum();
    log::info!(
        "walk done at ({:.1}, {:.1}, {:.1}) after {} steps",
        pos.x,
        pos.y,
        pos.z,
        args.steps
    );
    log::info!(
        "chunks: {} loaded, {} active; {} terrain triangles, {} water triangles, {} vegetation instances",
        controller.store().len(),
        controller.active_count(),
        terrain_tris,
        water.triangle_count(),
        vegetation.len()
    );
    log::info!(
        "updates: {} evaluated, {} skipped, {} rejected; generated {} ({} on demand, {} failed) in {:.1} ms; evicted {}",
        stats.evaluations,
        stats.skipped,
        stats.rejected,
        stats.generated,
        stats.on_demand_loads,
        stats.generation_failures,
        stats.generate_us as f64 / 1000.0,
        stats.evicted
    );
    ExitCode::SUCCESS
}
