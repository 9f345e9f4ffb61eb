use std::collections::HashMap;

use noise::{NoiseFn, Perlin};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::config::engine::EngineConfig;
use crate::config::worldgen::GenerationParams;
use crate::world::cell::{Cell, OrganismCell, Species, TerrainCell, TerrainKind};
use crate::world::color::{Channel, Color};
use crate::world::layer::Layer;
use crate::world::World;

/// Generate a new two-layer world: noise-shaped ground patches below,
/// seeded organisms above.
///
/// If `params.seed` is 0, a random seed is chosen. The actual seed used
/// is stored in the returned World's `generation_params` for
/// reproducibility.
pub fn generate_world(params: &GenerationParams, engine: &EngineConfig) -> World {
    let seed = if params.seed == 0 {
        rand::thread_rng().r#gen()
    } else {
        params.seed
    };
    let resolved_params = GenerationParams {
        seed,
        ..params.clone()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let ground = generate_ground(&resolved_params);
    let organisms = seed_organisms(&ground, &resolved_params, engine, &mut rng);

    let id = Uuid::from_bytes(rng.r#gen());

    World {
        id,
        name: format!("eco-{}", seed),
        tick_count: 0,
        generation_params: resolved_params,
        layers: vec![ground, organisms],
    }
}

/// Shape the ground layer with Perlin noise: the highest-noise fraction
/// of slots becomes meadow, which yields connected patches rather than
/// salt-and-pepper scatter.
fn generate_ground(params: &GenerationParams) -> Layer {
    let perlin = Perlin::new(params.seed as u32);
    let total = (params.width * params.height) as usize;

    let mut samples: Vec<(usize, f64)> = Vec::with_capacity(total);
    for y in 0..params.height {
        for x in 0..params.width {
            let value = perlin.get([
                x as f64 * params.patch_scale,
                y as f64 * params.patch_scale,
            ]);
            samples.push(((y * params.width + x) as usize, value));
        }
    }
    samples.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let meadow_slots = (params.meadow_coverage * total as f64).round() as usize;
    let mut is_meadow = vec![false; total];
    for &(idx, _) in samples.iter().take(meadow_slots) {
        is_meadow[idx] = true;
    }

    let mut layer = Layer::new(params.width, params.height);
    for y in 0..params.height {
        for x in 0..params.width {
            let terrain = if is_meadow[(y * params.width + x) as usize] {
                TerrainCell::meadow()
            } else {
                TerrainCell::bare()
            };
            layer.set_cell(x, y, Some(Cell::Terrain(terrain)));
        }
    }
    layer
}

/// Scatter the initial population, each organism on ground its species
/// can live on.
fn seed_organisms(
    ground: &Layer,
    params: &GenerationParams,
    engine: &EngineConfig,
    rng: &mut impl Rng,
) -> Layer {
    let mut layer = Layer::new(params.width, params.height);
    for y in 0..params.height {
        for x in 0..params.width {
            let organism = match ground.cell_at(x, y) {
                Some(Cell::Terrain(t)) if t.kind == TerrainKind::Meadow => {
                    (rng.r#gen::<f64>() < params.grazer_density)
                        .then(|| OrganismCell::grazer(Color::primary(Channel::Blue), 0, engine))
                }
                Some(Cell::Terrain(t)) if t.kind == TerrainKind::Bare => {
                    (rng.r#gen::<f64>() < params.predator_density)
                        .then(|| OrganismCell::predator(0, engine))
                }
                _ => None,
            };
            layer.set_cell(x, y, organism.map(Cell::Organism));
        }
    }
    layer
}

/// Print a summary of the world's terrain and population.
pub fn print_world_summary(world: &World) {
    println!("=== World Summary ===");
    println!("Name: {}", world.name);
    println!("Seed: {}", world.generation_params.seed);
    println!("Grid: {}x{} cells", world.width(), world.height());
    println!("Tick: {}", world.tick_count);

    let mut terrain_counts: HashMap<&str, u32> = HashMap::new();
    let mut population: HashMap<&str, u32> = HashMap::new();
    let mut total_slots = 0u32;

    for layer in &world.layers {
        for y in 0..layer.height() {
            for x in 0..layer.width() {
                match layer.cell_at(x, y) {
                    Some(Cell::Terrain(t)) => {
                        total_slots += 1;
                        let name = match t.kind {
                            TerrainKind::Meadow => "Meadow",
                            TerrainKind::Bare => "Bare",
                        };
                        *terrain_counts.entry(name).or_insert(0) += 1;
                    }
                    Some(Cell::Organism(o)) => {
                        let name = match o.species {
                            Species::Grazer => "Grazers",
                            Species::Predator => "Predators",
                        };
                        *population.entry(name).or_insert(0) += 1;
                    }
                    None => {}
                }
            }
        }
    }

    let mut terrain_sorted: Vec<_> = terrain_counts.into_iter().collect();
    terrain_sorted.sort_by_key(|&(name, _)| name);
    println!("\nTerrain:");
    for (name, count) in &terrain_sorted {
        let pct = *count as f32 / total_slots.max(1) as f32 * 100.0;
        println!("  {:<12} {:>6} ({:.1}%)", name, count, pct);
    }

    let mut population_sorted: Vec<_> = population.into_iter().collect();
    population_sorted.sort_by_key(|&(name, _)| name);
    println!("\nPopulation:");
    if population_sorted.is_empty() {
        println!("  (none)");
    }
    for (name, count) in &population_sorted {
        println!("  {:<12} {:>6}", name, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(seed: u64) -> GenerationParams {
        GenerationParams {
            seed,
            width: 32,
            height: 32,
            ..GenerationParams::default()
        }
    }

    #[test]
    fn ground_coverage_matches_requested_fraction() {
        let p = params(42);
        let world = generate_world(&p, &EngineConfig::default());
        let ground = &world.layers[0];

        let mut meadow = 0usize;
        for y in 0..ground.height() {
            for x in 0..ground.width() {
                if let Some(Cell::Terrain(t)) = ground.cell_at(x, y) {
                    if t.kind == TerrainKind::Meadow {
                        meadow += 1;
                    }
                } else {
                    panic!("ground layer must be fully occupied by terrain");
                }
            }
        }
        let expected = (p.meadow_coverage * 1024.0).round() as usize;
        assert_eq!(meadow, expected);
    }

    #[test]
    fn organisms_spawn_on_habitable_ground_only() {
        let world = generate_world(&params(42), &EngineConfig::default());
        let ground = &world.layers[0];
        let organisms = &world.layers[1];

        let mut seeded = 0;
        for y in 0..organisms.height() {
            for x in 0..organisms.width() {
                if let Some(cell) = organisms.cell_at(x, y) {
                    assert!(
                        cell.is_compatible_with(ground.cell_at(x, y)),
                        "organism at ({x}, {y}) seeded on hostile ground"
                    );
                    seeded += 1;
                }
            }
        }
        assert!(seeded > 0, "default densities should seed some organisms");
    }

    #[test]
    fn same_seed_generates_identical_worlds() {
        let engine = EngineConfig::default();
        let a = generate_world(&params(7), &engine);
        let b = generate_world(&params(7), &engine);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let engine = EngineConfig::default();
        let a = generate_world(&params(7), &engine);
        let b = generate_world(&params(8), &engine);
        assert_ne!(a.layers, b.layers);
    }

    #[test]
    fn explicit_seed_is_preserved() {
        let world = generate_world(&params(99), &EngineConfig::default());
        assert_eq!(world.generation_params.seed, 99);
        assert_eq!(world.tick_count, 0);
        assert_eq!(world.layers.len(), 2);
    }
}
