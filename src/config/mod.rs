pub mod engine;
pub mod simulation;
pub mod worldgen;
