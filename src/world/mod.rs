pub mod cell;
pub mod color;
pub mod generation;
pub mod layer;
pub mod vector;

use uuid::Uuid;

use crate::config::worldgen::GenerationParams;
pub use cell::{Action, Cell, OrganismCell, Species, TerrainCell, TerrainKind};
pub use color::{Channel, Color};
pub use layer::{Layer, TickEvents};

/// The full simulation state: an ordered stack of layers, bottom first.
/// Each layer consults the one directly beneath it during a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub id: Uuid,
    pub name: String,
    pub tick_count: u64,
    pub generation_params: GenerationParams,
    pub layers: Vec<Layer>,
}

impl World {
    /// Grid width in cells. Panics on a world with no layers.
    pub fn width(&self) -> i32 {
        self.layers[0].width()
    }

    /// Grid height in cells. Panics on a world with no layers.
    pub fn height(&self) -> i32 {
        self.layers[0].height()
    }
}
