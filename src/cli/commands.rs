use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::engine::EngineConfig;
use crate::config::simulation::SimulationConfig;
use crate::config::worldgen::GenerationParams;
use crate::render::{self, PixelSurface};
use crate::simulation;
use crate::simulation::statistics::TickStatistics;
use crate::world::generation::{generate_world, print_world_summary};

/// Run the simulation: generate a world, then alternate paced ticks with
/// frame rendering until interrupted or the tick budget runs out.
pub async fn run_simulation(
    config: &SimulationConfig,
    params: &GenerationParams,
) -> Result<(), String> {
    let engine = EngineConfig::from_file(Path::new(&config.engine_config))
        .map_err(|e| format!("Failed to load engine config: {}", e))?;

    let mut world = generate_world(params, &engine);
    print_world_summary(&world);

    // Worldgen consumed the seed itself; offset it for the tick stream so
    // the two sequences stay independent but reproducible.
    let mut rng = ChaCha8Rng::seed_from_u64(world.generation_params.seed.wrapping_add(1));

    let frame_dir: Option<PathBuf> = match &config.frame_directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Cannot create frame directory {}: {}", dir, e))?;
            Some(PathBuf::from(dir))
        }
        None => None,
    };
    let mut surface = PixelSurface::for_world(&world, config.cell_size);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let tick_interval_ms = (1000.0 / config.tick_rate_hz) as u64;
    eprintln!(
        "Simulation running (tick rate: {}Hz, stats every {} ticks)",
        config.tick_rate_hz, config.stats_interval
    );

    loop {
        let tick_start = std::time::Instant::now();
        let stats = simulation::execute_tick(&mut world, &engine, &mut rng);

        if world.tick_count % config.stats_interval as u64 == 0 {
            print_tick_line(&stats);
        }

        if let Some(dir) = &frame_dir {
            if world.tick_count % config.frame_interval as u64 == 0 {
                render::draw(&world, &mut surface, config.cell_size);
                let path = dir.join(format!("tick-{:08}.ppm", world.tick_count));
                if let Err(e) = surface.write_ppm(&path) {
                    eprintln!("Warning: frame write failed: {}", e);
                }
            }
        }

        if stats.grazers + stats.predators == 0 {
            eprintln!("Ecosystem extinct at tick {}", world.tick_count);
            break;
        }
        if config.max_ticks > 0 && world.tick_count >= config.max_ticks {
            break;
        }

        // Rate limiting: sleep the remaining time to hit the target rate.
        let elapsed = tick_start.elapsed();
        let target = std::time::Duration::from_millis(tick_interval_ms);
        if elapsed < target {
            tokio::select! {
                _ = tokio::time::sleep(target - elapsed) => {}
                _ = &mut shutdown => {
                    eprintln!("\nShutdown signal received");
                    break;
                }
            }
        } else {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    eprintln!("\nShutdown signal received");
                    break;
                }
                else => {}
            }
        }
    }

    eprintln!("Simulation stopped at tick {}", world.tick_count);
    print_world_summary(&world);
    Ok(())
}

/// Generate a world, advance it quietly, and report its state.
pub fn inspect(
    config: &SimulationConfig,
    params: &GenerationParams,
    ticks: u64,
) -> Result<(), String> {
    let engine = EngineConfig::from_file(Path::new(&config.engine_config))
        .map_err(|e| format!("Failed to load engine config: {}", e))?;

    let mut world = generate_world(params, &engine);
    let mut rng = ChaCha8Rng::seed_from_u64(world.generation_params.seed.wrapping_add(1));

    let mut last_stats: Option<TickStatistics> = None;
    for _ in 0..ticks {
        last_stats = Some(simulation::execute_tick(&mut world, &engine, &mut rng));
    }

    print_world_summary(&world);
    if let Some(stats) = last_stats {
        println!("\nLast tick:");
        print_tick_line(&stats);
    }
    Ok(())
}

fn print_tick_line(stats: &TickStatistics) {
    eprintln!(
        "Tick {} | Grazers: {} | Predators: {} | Births: {} | Deaths: {} | Kills: {} | {:.1}ms",
        stats.tick,
        stats.grazers,
        stats.predators,
        stats.events.births,
        stats.events.deaths,
        stats.events.predations,
        stats.tick_duration_ms
    );
}
