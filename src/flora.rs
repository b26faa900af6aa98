//! Flora distribution
//!
//! Vegetation is placed per tile from that biome's static species pool,
//! using a sub-stream forked under a fixed label so flora never perturbs
//! (and is never perturbed by) the plate or river draws. Absence of an
//! entry is the valid "barren" state, not an error.

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::rng::WorldRng;
use crate::tilemap::Tilemap;
use crate::worldmap::WorldMap;

/// Base density assumed for biomes without an explicit table entry.
const DEFAULT_BASE_DENSITY: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloraSpecies {
    Oak,
    Birch,
    Pine,
    Spruce,
    Willow,
    Mangrove,
    Kapok,
    Liana,
    Palm,
    Cactus,
    Thornbush,
    Grass,
    Wildflower,
    Reed,
    Moss,
    Lichen,
}

/// Vegetation on a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloraEntry {
    pub species: FloraSpecies,
    /// Coverage density in [0.01, 1].
    pub density: f32,
    /// Growth-rate multiplier; denser stands grow slightly slower.
    pub growth_rate: f32,
    /// Harvestable yield multiplier.
    pub resource_yield: f32,
}

/// Grid of optional flora entries, parallel to the tile grid.
pub type FloraMap = Tilemap<Option<FloraEntry>>;

/// Species pool with weights, and base density, for a biome.
///
/// Returns `None` for biomes that are always barren.
fn biome_pool(biome: Biome) -> Option<(&'static [(FloraSpecies, f32)], f32)> {
    use FloraSpecies::*;

    const FOREST: &[(FloraSpecies, f32)] = &[(Oak, 5.0), (Birch, 3.0), (Pine, 2.0)];
    const DENSE_FOREST: &[(FloraSpecies, f32)] =
        &[(Oak, 4.0), (Birch, 2.0), (Willow, 2.0), (Pine, 1.0)];
    const JUNGLE: &[(FloraSpecies, f32)] = &[(Kapok, 4.0), (Liana, 3.0), (Palm, 2.0)];
    const TAIGA: &[(FloraSpecies, f32)] = &[(Spruce, 5.0), (Pine, 3.0), (Lichen, 1.0)];
    const PLAINS: &[(FloraSpecies, f32)] = &[(Grass, 6.0), (Wildflower, 2.0), (Oak, 1.0)];
    const SAVANNA: &[(FloraSpecies, f32)] = &[(Grass, 5.0), (Thornbush, 3.0)];
    const SWAMP: &[(FloraSpecies, f32)] = &[(Reed, 4.0), (Willow, 3.0), (Mangrove, 2.0)];
    const COAST: &[(FloraSpecies, f32)] = &[(Grass, 3.0), (Palm, 2.0), (Reed, 2.0)];
    const DESERT: &[(FloraSpecies, f32)] = &[(Cactus, 4.0), (Thornbush, 1.0)];
    const TUNDRA: &[(FloraSpecies, f32)] = &[(Lichen, 4.0), (Moss, 3.0)];
    const MOUNTAIN: &[(FloraSpecies, f32)] = &[(Pine, 3.0), (Moss, 2.0), (Lichen, 2.0)];
    const WASTELAND: &[(FloraSpecies, f32)] = &[(Thornbush, 2.0), (Moss, 1.0)];

    match biome {
        // Always barren.
        Biome::Ocean | Biome::DeepOcean | Biome::HighMountain | Biome::IceCap | Biome::Volcanic => {
            None
        }
        Biome::Forest => Some((FOREST, 0.6)),
        Biome::DenseForest => Some((DENSE_FOREST, 0.75)),
        Biome::Jungle => Some((JUNGLE, 0.85)),
        Biome::Taiga => Some((TAIGA, 0.5)),
        Biome::Plains => Some((PLAINS, 0.55)),
        Biome::Savanna => Some((SAVANNA, 0.4)),
        Biome::Swamp => Some((SWAMP, 0.6)),
        Biome::Coast => Some((COAST, 0.35)),
        Biome::Desert => Some((DESERT, 0.08)),
        Biome::Tundra => Some((TUNDRA, 0.2)),
        Biome::Mountain => Some((MOUNTAIN, 0.25)),
        Biome::MagicWasteland => Some((WASTELAND, 0.1)),
    }
}

/// Species legal for a biome (test and inspection helper).
pub fn species_pool(biome: Biome) -> &'static [(FloraSpecies, f32)] {
    biome_pool(biome).map_or(&[], |(pool, _)| pool)
}

/// Distribute flora across a generated world.
///
/// Row-major over tiles, one fork for the whole pass; per tile either zero
/// draws (excluded biome) or a fixed draw pattern, so the layout is stable
/// under any change to other stages.
pub fn distribute(world: &WorldMap, rng: &WorldRng) -> FloraMap {
    let mut rng = rng.fork("flora");
    let mut flora = FloraMap::new_with(world.width(), world.height(), None);

    for y in 0..world.height() {
        for x in 0..world.width() {
            let tile = world
                .get_tile(x, y)
                .expect("flora distribution requires a generated world");

            let Some((pool, base_density)) = biome_pool(tile.biome) else {
                continue;
            };

            // One gate draw: sparse biomes stay mostly bare.
            if rng.next() as f32 > base_density + 0.2 {
                continue;
            }

            let species: Vec<FloraSpecies> = pool.iter().map(|(s, _)| *s).collect();
            let weights: Vec<f32> = pool.iter().map(|(_, w)| *w).collect();
            let Some(&picked) = rng.weighted_pick(&species, &weights) else {
                continue;
            };

            let density = (base_density + rng.next_float(-0.15, 0.15)).clamp(0.01, 1.0);
            let growth_rate = tile.biome.growth_base() * (1.0 - density * 0.2);
            let resource_yield = density * growth_rate;

            flora.set(
                x,
                y,
                Some(FloraEntry {
                    species: picked,
                    density,
                    growth_rate,
                    resource_yield,
                }),
            );
        }
    }

    flora
}

/// Fallback density path for biomes added without a table entry.
///
/// Kept separate so `biome_pool` stays the single source of truth; currently
/// every biome is listed, but classification growth should not silently break
/// flora.
pub fn base_density(biome: Biome) -> f32 {
    biome_pool(biome).map_or(DEFAULT_BASE_DENSITY, |(_, d)| d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeologicalActivity, WorldConfig, WorldSizeClass};

    fn small_world(seed: u64) -> WorldMap {
        let config = WorldConfig {
            seed,
            size: WorldSizeClass::Custom {
                width: 64,
                height: 64,
            },
            activity: GeologicalActivity::Standard,
            desired_rivers: 8,
        };
        let mut world = WorldMap::new(config);
        world.generate();
        world
    }

    #[test]
    fn test_excluded_biomes_always_barren() {
        let world = small_world(42);
        let rng = WorldRng::from_seed(42);
        let flora = distribute(&world, &rng);

        for (x, y, entry) in flora.iter() {
            let biome = world.get_tile(x, y).unwrap().biome;
            let excluded = matches!(
                biome,
                Biome::Ocean
                    | Biome::DeepOcean
                    | Biome::HighMountain
                    | Biome::IceCap
                    | Biome::Volcanic
            );
            if excluded {
                assert!(entry.is_none(), "{biome:?} at ({x},{y}) must be barren");
            }
        }
    }

    #[test]
    fn test_species_drawn_from_biome_pool() {
        let world = small_world(7);
        let rng = WorldRng::from_seed(7);
        let flora = distribute(&world, &rng);

        for (x, y, entry) in flora.iter() {
            if let Some(entry) = entry {
                let biome = world.get_tile(x, y).unwrap().biome;
                let legal = species_pool(biome).iter().any(|(s, _)| *s == entry.species);
                assert!(legal, "{:?} not in {biome:?} pool", entry.species);
            }
        }
    }

    #[test]
    fn test_entry_fields_within_contract() {
        let world = small_world(9);
        let rng = WorldRng::from_seed(9);
        let flora = distribute(&world, &rng);

        let mut populated = 0;
        for (x, y, entry) in flora.iter() {
            if let Some(entry) = entry {
                populated += 1;
                let biome = world.get_tile(x, y).unwrap().biome;
                assert!((0.01..=1.0).contains(&entry.density));

                let expected_growth = biome.growth_base() * (1.0 - entry.density * 0.2);
                assert!((entry.growth_rate - expected_growth).abs() < 1e-6);
                assert!((entry.resource_yield - entry.density * entry.growth_rate).abs() < 1e-6);
            }
        }
        assert!(populated > 0, "a 64x64 world should grow something");
    }

    #[test]
    fn test_distribution_deterministic() {
        let world = small_world(5);
        let rng_a = WorldRng::from_seed(5);
        let rng_b = WorldRng::from_seed(5);
        assert_eq!(distribute(&world, &rng_a), distribute(&world, &rng_b));
    }

    #[test]
    fn test_default_density_constant_for_unlisted() {
        // All current biomes are listed or excluded; the default only applies
        // to future additions, but the constant itself is part of the contract.
        assert_eq!(DEFAULT_BASE_DENSITY, 0.3);
        assert_eq!(base_density(Biome::Forest), 0.6);
    }
}
