use glam::DVec2;
use rand::{Rng, RngCore};

use crate::config::engine::EngineConfig;
use crate::world::color::{Channel, Color};
use crate::world::layer::Layer;
use crate::world::vector;

/// Ground variants. They carry no behavior of their own; organisms in the
/// layer above consult the kind as a habitat marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainKind {
    /// Vegetated ground, habitable by grazers.
    Meadow,
    /// Open ground, habitable by predators.
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Grazer,
    Predator,
}

/// One decision produced per occupied slot per tick. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Nothing,
    Move { to: (i32, i32) },
    Graze,
    Predate { at: (i32, i32) },
    Birth { cell: Cell, at: (i32, i32) },
    Death,
}

/// Immortal, inert ground occupant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainCell {
    pub kind: TerrainKind,
    color: Color,
}

impl TerrainCell {
    pub fn meadow() -> Self {
        TerrainCell {
            kind: TerrainKind::Meadow,
            color: Color::fixed(0.0, 139.0, 0.0),
        }
    }

    pub fn bare() -> Self {
        TerrainCell {
            kind: TerrainKind::Bare,
            color: Color::fixed(189.0, 139.0, 20.0),
        }
    }
}

/// Mortal, energy-bearing occupant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrganismCell {
    pub species: Species,
    pub strength: f64,
    pub color: Color,
    pub created_at: u64,
}

impl OrganismCell {
    pub fn new(species: Species, strength: f64, color: Color, created_at: u64) -> Self {
        OrganismCell {
            species,
            strength,
            color,
            created_at,
        }
    }

    /// Spawn a grazer with its configured starting energy.
    pub fn grazer(color: Color, created_at: u64, config: &EngineConfig) -> Self {
        Self::new(
            Species::Grazer,
            config.grazer_initial_strength,
            color,
            created_at,
        )
    }

    /// Spawn a predator with its configured starting energy.
    pub fn predator(created_at: u64, config: &EngineConfig) -> Self {
        Self::new(
            Species::Predator,
            config.predator_initial_strength,
            Color::primary(Channel::Red),
            created_at,
        )
    }

    /// All-or-nothing energy deduction. Returns whether the cost was paid;
    /// on failure the strength is untouched.
    pub fn try_deduct(&mut self, cost: f64) -> bool {
        if self.strength - cost <= 0.0 {
            return false;
        }
        self.strength -= cost;
        true
    }

    /// Add energy, saturating at the configured ceiling.
    pub fn add_strength(&mut self, gain: f64, max_strength: f64) {
        self.strength = (self.strength + gain).min(max_strength);
    }

    /// Pick this organism's action for the tick. May mutate the organism
    /// itself (color drift, overcrowding penalty) as a side effect.
    pub fn decide(
        &mut self,
        layer: &Layer,
        below: Option<&Layer>,
        x: i32,
        y: i32,
        now: u64,
        config: &EngineConfig,
        rng: &mut dyn RngCore,
    ) -> Action {
        match self.species {
            Species::Grazer => self.decide_grazer(layer, x, y, now, config, rng),
            Species::Predator => self.decide_predator(layer, below, x, y, now, config, rng),
        }
    }

    fn decide_grazer(
        &mut self,
        layer: &Layer,
        x: i32,
        y: i32,
        now: u64,
        config: &EngineConfig,
        rng: &mut dyn RngCore,
    ) -> Action {
        if self.strength > config.birth_cost {
            let my_color = self.color;
            let mut partner_color: Option<Color> = None;
            let mut birth_slot: Option<(i32, i32)> = None;
            let mut neighbors = 0u32;

            layer.for_each_in_radius(x, y, config.scan_radius, rng, |sx, sy, occupant, rng| {
                match occupant {
                    None => birth_slot = Some((sx, sy)),
                    Some(cell) => {
                        if let Cell::Organism(other) = cell {
                            if other.species == Species::Grazer
                                && other.color.distance(&my_color) < config.mate_color_distance
                            {
                                partner_color = Some(other.color);
                            }
                        }
                        neighbors += 1;
                    }
                }
                birth_slot.is_some()
                    && partner_color.is_some()
                    && rng.r#gen::<f64>() < config.scan_stop_prob
            });

            if is_overcrowded(neighbors, config, rng) {
                let _ = self.try_deduct(config.overcrowding_cost);
            }

            self.color.perturb(config.color_drift_max, rng);
            if rng.r#gen::<f64>() < config.speciation_prob && y > config.speciation_min_y {
                self.color.switch_channel(Channel::Green);
            }

            if let (Some(partner), Some(at)) = (partner_color, birth_slot) {
                let mut child_color = self.color;
                if partner.channel() == Channel::Green && x > config.partner_color_min_x {
                    child_color = partner;
                }
                return Action::Birth {
                    cell: Cell::Organism(OrganismCell::grazer(child_color, now, config)),
                    at,
                };
            }
        }
        Action::Graze
    }

    fn decide_predator(
        &mut self,
        layer: &Layer,
        below: Option<&Layer>,
        x: i32,
        y: i32,
        now: u64,
        config: &EngineConfig,
        rng: &mut dyn RngCore,
    ) -> Action {
        let mut prey: Option<(i32, i32)> = None;
        let mut move_to: Option<(i32, i32)> = None;
        let mut birth_slot: Option<(i32, i32)> = None;
        let mut has_partner = false;
        let mut neighbors = 0u32;
        let origin = vector::slot_vec(x, y);
        let max = layer.max_slot_vec();

        layer.for_each_in_radius(x, y, config.scan_radius, rng, |sx, sy, occupant, rng| {
            match occupant {
                None => birth_slot = Some((sx, sy)),
                Some(Cell::Organism(other)) if other.species == Species::Predator => {
                    has_partner = true;
                    neighbors += 1;
                }
                Some(_) => {
                    neighbors += 1;
                    if vector::grid_distance((x, y), (sx, sy)) < config.max_move_distance {
                        prey = Some((sx, sy));
                    } else {
                        // Too far to strike this tick; close the gap instead.
                        let step = vector::with_magnitude(
                            vector::slot_vec(sx, sy) - origin,
                            config.max_move_distance,
                        );
                        let target =
                            vector::truncate_to_slot((origin + step).clamp(DVec2::ZERO, max));
                        move_to = Some(target);
                        if let Some(ground) = below {
                            if !terrain_supports(
                                Species::Predator,
                                ground.cell_at(target.0, target.1),
                            ) {
                                move_to = None;
                            }
                        }
                    }
                }
            }
            prey.is_some()
                && move_to.is_some()
                && has_partner
                && rng.r#gen::<f64>() < config.scan_stop_prob
        });

        if is_overcrowded(neighbors, config, rng) {
            let _ = self.try_deduct(config.overcrowding_cost);
        }

        if let Some(at) = prey {
            return Action::Predate { at };
        }
        if let Some(to) = move_to {
            return Action::Move { to };
        }
        if has_partner {
            if let Some(at) = birth_slot {
                return Action::Birth {
                    cell: Cell::Organism(OrganismCell::predator(now, config)),
                    at,
                };
            }
        }

        let wander = vector::with_magnitude(
            DVec2::new(rng.r#gen::<f64>(), rng.r#gen::<f64>()),
            config.max_move_distance,
        );
        let to = vector::truncate_to_slot((origin + wander).clamp(DVec2::ZERO, max));
        Action::Move { to }
    }
}

/// Any grid occupant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Terrain(TerrainCell),
    Organism(OrganismCell),
}

impl Cell {
    pub fn color(&self) -> Color {
        match self {
            Cell::Terrain(t) => t.color,
            Cell::Organism(o) => o.color,
        }
    }

    /// Energy level. Terrain reports infinite energy and can pay any cost.
    pub fn strength(&self) -> f64 {
        match self {
            Cell::Terrain(_) => f64::INFINITY,
            Cell::Organism(o) => o.strength,
        }
    }

    /// Value compared during combat. Grazers always lose; everything else
    /// fights at its raw strength.
    pub fn fighting_strength(&self) -> f64 {
        match self {
            Cell::Terrain(_) => f64::INFINITY,
            Cell::Organism(o) => match o.species {
                Species::Grazer => 0.0,
                Species::Predator => o.strength,
            },
        }
    }

    /// All-or-nothing energy deduction; see [`OrganismCell::try_deduct`].
    pub fn try_deduct(&mut self, cost: f64) -> bool {
        match self {
            Cell::Terrain(_) => true,
            Cell::Organism(o) => o.try_deduct(cost),
        }
    }

    /// Whether this cell tolerates the ground directly beneath it.
    pub fn is_compatible_with(&self, ground: Option<&Cell>) -> bool {
        match self {
            Cell::Terrain(_) => true,
            Cell::Organism(o) => terrain_supports(o.species, ground),
        }
    }

    /// Probability of dying of old age this tick.
    ///
    /// The exponent collapses to 3 for any age >= 1 and scales down
    /// linearly below that, which makes the curve near-zero through most
    /// of the horizon and steep at the end. At age 0 the expression is
    /// 0^0 = 1: a cell visited in the very pass that created it does not
    /// survive it. Both endpoints are load-bearing; keep the arithmetic
    /// exactly as written.
    pub fn death_probability(&self, now: u64, config: &EngineConfig) -> f64 {
        match self {
            Cell::Terrain(_) => 0.0,
            Cell::Organism(o) => {
                let age = now.saturating_sub(o.created_at) as f64;
                let exponent = 3.0 * age - 3.0 * (age - 1.0).max(0.0);
                (age / config.mortality_horizon).powf(exponent)
            }
        }
    }
}

/// Habitat predicate: which ground kind a species can live on.
pub(crate) fn terrain_supports(species: Species, ground: Option<&Cell>) -> bool {
    let needed = match species {
        Species::Grazer => TerrainKind::Meadow,
        Species::Predator => TerrainKind::Bare,
    };
    matches!(ground, Some(Cell::Terrain(t)) if t.kind == needed)
}

/// Density check shared by both species. The random gate only rolls once
/// the density threshold is met.
fn is_overcrowded(neighbors: u32, config: &EngineConfig, rng: &mut dyn RngCore) -> bool {
    let density = neighbors as f64 / (config.scan_radius as f64).powi(2);
    density >= config.overcrowding_density && rng.r#gen::<f64>() < config.overcrowding_prob
}
