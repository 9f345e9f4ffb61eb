use rand::{Rng, RngCore};

use crate::config::engine::EngineConfig;
use crate::world::cell::{Action, Cell};
use crate::world::vector;

/// Counters accumulated while resolving one tick. Purely observational;
/// the engine never reads them back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickEvents {
    pub births: u32,
    pub deaths: u32,
    pub predations: u32,
    pub moves: u32,
    pub grazes: u32,
}

/// A fixed-size grid of optional occupants. Each slot holds at most one
/// cell and no cell is ever referenced from two slots.
///
/// The layer owns the per-tick update algorithm. Updates mutate the grid
/// in place while it is being traversed: a slot resolved later in the
/// pass observes every mutation made earlier in the same pass. That
/// visibility is part of the contract, not an artifact; double buffering
/// would change observed behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    width: i32,
    height: i32,
    cells: Vec<Option<Cell>>,
}

impl Layer {
    /// Create an empty layer.
    ///
    /// # Panics
    /// Panics unless both dimensions are positive.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0, "layer width must be positive, got {width}");
        assert!(height > 0, "layer height must be positive, got {height}");
        Layer {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Largest valid slot as a vector, for clamping movement targets.
    pub fn max_slot_vec(&self) -> glam::DVec2 {
        glam::DVec2::new((self.width - 1) as f64, (self.height - 1) as f64)
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Cell> {
        let idx = self.index(x, y);
        self.cells[idx].as_ref()
    }

    pub fn set_cell(&mut self, x: i32, y: i32, cell: Option<Cell>) {
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    /// Visit every in-bounds slot of the square `[cx-radius, cx+radius] x
    /// [cy-radius, cy+radius]`, including the center, in raster order.
    /// An upfront coin flip decides between forward (top-left first) and
    /// reverse (bottom-right first) traversal. The visitor receives the
    /// random source and stops the scan by returning true.
    ///
    /// Callers use this as a last-candidate-wins scan: later slots
    /// overwrite remembered candidates, and the visitor keeps the scan
    /// alive past the first match unless a low-probability stop roll
    /// lands. Selection is therefore order- and draw-dependent by design;
    /// do not replace with a nearest-match search.
    pub fn for_each_in_radius(
        &self,
        cx: i32,
        cy: i32,
        radius: i32,
        rng: &mut dyn RngCore,
        mut visit: impl FnMut(i32, i32, Option<&Cell>, &mut dyn RngCore) -> bool,
    ) {
        assert!(
            self.in_bounds(cx, cy),
            "scan center ({cx}, {cy}) outside {}x{} grid",
            self.width,
            self.height
        );
        let x0 = (cx - radius).max(0);
        let x1 = (cx + radius).min(self.width - 1);
        let y0 = (cy - radius).max(0);
        let y1 = (cy + radius).min(self.height - 1);

        let forward = rng.r#gen::<f64>() < 0.5;
        if forward {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    if visit(x, y, self.cell_at(x, y), rng) {
                        return;
                    }
                }
            }
        } else {
            for y in (y0..=y1).rev() {
                for x in (x0..=x1).rev() {
                    if visit(x, y, self.cell_at(x, y), rng) {
                        return;
                    }
                }
            }
        }
    }

    /// Advance every occupant one tick.
    ///
    /// Slots are visited in raster order. For each occupant: pay
    /// respiration, decide an action, pay the habitat penalty when the
    /// ground below does not support it, roll age mortality (which can
    /// override the action with death), then resolve the action against
    /// the shared grid. Failed deductions are all-or-nothing: the cost
    /// does not apply, the cell is marked for death instead.
    pub fn update(
        &mut self,
        below: Option<&Layer>,
        now: u64,
        config: &EngineConfig,
        rng: &mut dyn RngCore,
        events: &mut TickEvents,
    ) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = (y * self.width + x) as usize;
                let Some(mut cell) = self.cells[idx].clone() else {
                    continue;
                };

                let mut alive = cell.try_deduct(config.respiration_cost);

                let mut action = match &mut cell {
                    Cell::Terrain(_) => Action::Nothing,
                    Cell::Organism(org) => org.decide(&*self, below, x, y, now, config, rng),
                };

                if let Some(ground) = below {
                    if !cell.is_compatible_with(ground.cell_at(x, y))
                        && !cell.try_deduct(config.incompatibility_cost)
                    {
                        alive = false;
                    }
                }

                let p = cell.death_probability(now, config);
                let doomed = rng.r#gen::<f64>() < p;
                if doomed || (!alive && p > 0.0) {
                    action = Action::Death;
                }

                self.cells[idx] = Some(cell);
                self.resolve(x, y, action, config, rng, events);
            }
        }
    }

    fn resolve(
        &mut self,
        x: i32,
        y: i32,
        action: Action,
        config: &EngineConfig,
        rng: &mut dyn RngCore,
        events: &mut TickEvents,
    ) {
        match action {
            Action::Nothing => {}

            Action::Death => {
                let idx = self.index(x, y);
                self.cells[idx] = None;
                events.deaths += 1;
            }

            Action::Graze => {
                let gain = config.graze_return + jitter(rng, config.graze_jitter);
                let idx = self.index(x, y);
                if let Some(Cell::Organism(org)) = &mut self.cells[idx] {
                    org.add_strength(gain, config.max_strength);
                }
                events.grazes += 1;
            }

            Action::Birth { cell: child, at } => {
                let idx = self.index(x, y);
                let paid = match &mut self.cells[idx] {
                    Some(Cell::Organism(org)) => org.try_deduct(config.birth_cost),
                    _ => false,
                };
                if paid {
                    // The target is claimed unconditionally, occupied or not.
                    let child_idx = self.index(at.0, at.1);
                    self.cells[child_idx] = Some(child);
                    events.births += 1;
                }
            }

            Action::Move { to } => {
                let to_idx = self.index(to.0, to.1);
                if self.cells[to_idx].is_some() {
                    return;
                }
                if vector::grid_distance((x, y), to) > config.max_move_distance {
                    return;
                }
                let src = self.index(x, y);
                let paid = match &mut self.cells[src] {
                    Some(Cell::Organism(org)) => org.try_deduct(config.move_cost),
                    _ => false,
                };
                if !paid {
                    return;
                }
                self.cells[to_idx] = self.cells[src].take();
                events.moves += 1;
            }

            Action::Predate { at } => {
                let prey_idx = self.index(at.0, at.1);
                let Some(prey) = &self.cells[prey_idx] else {
                    return;
                };
                let prey_fighting = prey.fighting_strength();
                let prey_strength = prey.strength();

                let src = self.index(x, y);
                let paid = match &mut self.cells[src] {
                    Some(Cell::Organism(org)) => org.try_deduct(config.predate_cost),
                    _ => false,
                };
                if !paid {
                    return;
                }

                let attacker_fighting = self.cells[src]
                    .as_ref()
                    .map(|c| c.fighting_strength())
                    .unwrap_or(0.0);
                if combat_success(attacker_fighting, prey_fighting, config, rng) {
                    let ret = config.predate_return + jitter(rng, config.predate_jitter);
                    if let Some(Cell::Organism(org)) = &mut self.cells[src] {
                        org.add_strength(prey_strength * ret, config.max_strength);
                    }
                    // The prey is consumed outright; the attacker takes its slot.
                    self.cells[prey_idx] = self.cells[src].take();
                    events.predations += 1;
                }
            }
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.in_bounds(x, y),
            "slot ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        (y * self.width + x) as usize
    }
}

/// Exactly one branch applies per resolution. The stronger-attacker
/// constant is a failure band; the other two are success probabilities.
/// The asymmetry is intentional.
fn combat_success(attacker: f64, prey: f64, config: &EngineConfig, rng: &mut dyn RngCore) -> bool {
    if attacker > prey {
        rng.r#gen::<f64>() >= config.combat_stronger_fail_prob
    } else if attacker == prey {
        rng.r#gen::<f64>() < config.combat_equal_win_prob
    } else {
        rng.r#gen::<f64>() < config.combat_weaker_win_prob
    }
}

fn jitter(rng: &mut dyn RngCore, max: f64) -> f64 {
    if max > 0.0 {
        rng.gen_range(-max..max)
    } else {
        0.0
    }
}
