pub mod statistics;

use std::time::Instant;

use rand::RngCore;
use tracing::{debug, warn};

use crate::config::engine::EngineConfig;
use crate::simulation::statistics::TickStatistics;
use crate::world::layer::TickEvents;
use crate::world::World;

/// Execute a single simulation tick on the world.
///
/// Layers update bottom to top, each receiving the layer beneath it in
/// its already-updated state. Resolution happens in place during the
/// pass, so ordering within and across layers is part of the behavior.
/// The returned statistics are purely observational.
pub fn execute_tick(
    world: &mut World,
    config: &EngineConfig,
    rng: &mut dyn RngCore,
) -> TickStatistics {
    let tick_start = Instant::now();

    // Organisms constructed before this call carry the previous tick as
    // their birth stamp; advancing the clock first gives them age >= 1
    // when visited. Only a cell born and visited inside the same pass
    // sees age 0.
    world.tick_count += 1;
    let now = world.tick_count;

    let mut events = TickEvents::default();
    for i in 0..world.layers.len() {
        let (updated, remaining) = world.layers.split_at_mut(i);
        remaining[0].update(updated.last(), now, config, rng, &mut events);
    }

    let tick_duration_ms = tick_start.elapsed().as_secs_f32() * 1000.0;
    let stats = statistics::compute_statistics(world, events, tick_duration_ms);

    if stats.grazers + stats.predators == 0 && events.deaths > 0 {
        warn!(tick = now, deaths = events.deaths, "ecosystem extinct");
    } else {
        debug!(
            tick = now,
            grazers = stats.grazers,
            predators = stats.predators,
            births = events.births,
            deaths = events.deaths,
            predations = events.predations,
            "tick resolved"
        );
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::worldgen::GenerationParams;
    use crate::world::cell::{Cell, OrganismCell, Species, TerrainCell};
    use crate::world::generation::generate_world;
    use crate::world::layer::Layer;
    use crate::world::World;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uuid::Uuid;

    fn small_params(seed: u64) -> GenerationParams {
        GenerationParams {
            seed,
            width: 24,
            height: 24,
            ..GenerationParams::default()
        }
    }

    #[test]
    fn tick_count_advances_by_one() {
        let config = EngineConfig::default();
        let mut world = generate_world(&small_params(11), &config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let stats = execute_tick(&mut world, &config, &mut rng);
        assert_eq!(world.tick_count, 1);
        assert_eq!(stats.tick, 1);
        execute_tick(&mut world, &config, &mut rng);
        assert_eq!(world.tick_count, 2);
    }

    #[test]
    fn initial_population_survives_its_first_tick() {
        // Worldgen stamps organisms with tick 0; the first pass runs at
        // tick 1, so nobody starts at the age-zero mortality spike.
        let config = EngineConfig::default();
        let mut world = generate_world(&small_params(11), &config);
        let before = statistics::compute_statistics(&world, TickEvents::default(), 0.0);
        assert!(before.grazers + before.predators > 0);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let stats = execute_tick(&mut world, &config, &mut rng);
        assert!(
            stats.grazers + stats.predators > 0,
            "first tick wiped out the whole population"
        );
    }

    #[test]
    fn strength_stays_within_bounds_over_many_ticks() {
        let config = EngineConfig::default();
        let mut world = generate_world(&small_params(23), &config);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            execute_tick(&mut world, &config, &mut rng);
        }
        for layer in &world.layers {
            for y in 0..layer.height() {
                for x in 0..layer.width() {
                    if let Some(Cell::Organism(org)) = layer.cell_at(x, y) {
                        assert!(
                            org.strength > 0.0 && org.strength <= config.max_strength,
                            "organism at ({x}, {y}) has strength {}",
                            org.strength
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn identical_seeds_replay_identically() {
        let config = EngineConfig::default();

        let mut world_a = generate_world(&small_params(42), &config);
        let mut rng_a = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..30 {
            execute_tick(&mut world_a, &config, &mut rng_a);
        }

        let mut world_b = generate_world(&small_params(42), &config);
        let mut rng_b = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..30 {
            execute_tick(&mut world_b, &config, &mut rng_b);
        }

        assert_eq!(world_a.tick_count, world_b.tick_count);
        assert_eq!(world_a.layers, world_b.layers);
    }

    #[test]
    fn upper_layer_sees_the_ground_updated_this_tick() {
        // A grazer over meadow pays no habitat penalty; the ground layer
        // below it was updated earlier in the same call.
        let config = EngineConfig {
            birth_cost: 5.0, // isolate the graze path
            ..EngineConfig::default()
        };
        let mut ground = Layer::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                ground.set_cell(x, y, Some(Cell::Terrain(TerrainCell::meadow())));
            }
        }
        let mut organisms = Layer::new(8, 8);
        let mut grazer = OrganismCell::grazer(
            crate::world::Color::primary(crate::world::Channel::Blue),
            0,
            &config,
        );
        grazer.strength = 0.4;
        organisms.set_cell(3, 3, Some(Cell::Organism(grazer)));

        let mut world = World {
            id: Uuid::nil(),
            name: "test".to_string(),
            tick_count: 4,
            generation_params: GenerationParams::default(),
            layers: vec![ground, organisms],
        };

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let stats = execute_tick(&mut world, &config, &mut rng);
        assert_eq!(stats.grazers, 1);
        match world.layers[1].cell_at(3, 3) {
            Some(Cell::Organism(org)) => {
                assert_eq!(org.species, Species::Grazer);
                // respiration out, graze return in, no habitat penalty
                assert!(org.strength > 0.4 - config.respiration_cost);
            }
            other => panic!("expected surviving grazer, found {other:?}"),
        }
    }
}
