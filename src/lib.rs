//! Deterministic fantasy-world terrain generation library
//!
//! Generates a seed-reproducible terrain dataset - elevation, climate,
//! biomes, rivers, flora and settlement-site candidates - for consumption
//! by a surrounding world simulation. The whole pipeline is a pure function
//! of (config, seed).

pub mod ascii;
pub mod biome;
pub mod climate;
pub mod config;
pub mod export;
pub mod flora;
pub mod heightmap;
pub mod plates;
pub mod rivers;
pub mod rng;
pub mod tilemap;
pub mod worldmap;
