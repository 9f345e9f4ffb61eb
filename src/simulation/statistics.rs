use crate::world::cell::{Cell, Species, TerrainKind};
use crate::world::layer::TickEvents;
use crate::world::World;

/// Per-tick aggregate metrics for introspection and degenerate state
/// detection. Computed from the world after resolution; the engine never
/// reads these back.
#[derive(Debug, Clone, PartialEq)]
pub struct TickStatistics {
    pub tick: u64,
    pub grazers: u32,
    pub predators: u32,
    pub meadow_cells: u32,
    pub bare_cells: u32,
    pub avg_grazer_strength: f32,
    pub avg_predator_strength: f32,
    pub events: TickEvents,
    pub tick_duration_ms: f32,
}

/// Compute statistics for the current world state after a tick.
pub fn compute_statistics(world: &World, events: TickEvents, tick_duration_ms: f32) -> TickStatistics {
    let mut grazers = 0u32;
    let mut predators = 0u32;
    let mut meadow_cells = 0u32;
    let mut bare_cells = 0u32;
    let mut grazer_strength = 0.0_f64;
    let mut predator_strength = 0.0_f64;

    for layer in &world.layers {
        for y in 0..layer.height() {
            for x in 0..layer.width() {
                match layer.cell_at(x, y) {
                    Some(Cell::Terrain(t)) => match t.kind {
                        TerrainKind::Meadow => meadow_cells += 1,
                        TerrainKind::Bare => bare_cells += 1,
                    },
                    Some(Cell::Organism(o)) => match o.species {
                        Species::Grazer => {
                            grazers += 1;
                            grazer_strength += o.strength;
                        }
                        Species::Predator => {
                            predators += 1;
                            predator_strength += o.strength;
                        }
                    },
                    None => {}
                }
            }
        }
    }

    let avg = |total: f64, count: u32| {
        if count == 0 {
            0.0
        } else {
            (total / count as f64) as f32
        }
    };

    TickStatistics {
        tick: world.tick_count,
        grazers,
        predators,
        meadow_cells,
        bare_cells,
        avg_grazer_strength: avg(grazer_strength, grazers),
        avg_predator_strength: avg(predator_strength, predators),
        events,
        tick_duration_ms,
    }
}
