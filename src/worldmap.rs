//! World map orchestrator
//!
//! Owns the tile grid and river list and runs the generation pipeline in a
//! fixed order: plates → elevation → climate → volcanic/wasteland masks →
//! biome classification → rivers and river-id tagging → valley carving →
//! ley-line and resource seeding → tile assembly. Each stage draws from its
//! own labelled RNG fork, so the whole world is a pure function of
//! (config, seed). Biomes are classified from pre-carve elevation; carving
//! reshapes valleys without reclassifying them.

use serde::{Deserialize, Serialize};

use crate::biome::{self, Biome};
use crate::climate;
use crate::config::{GeologicalActivity, WorldConfig};
use crate::heightmap;
use crate::plates::{self, PlateId};
use crate::rivers::{self, River, RiverId};
use crate::rng::WorldRng;
use crate::tilemap::Tilemap;

/// Per-tile chance of carrying a ley line.
const LEY_LINE_CHANCE: f64 = 0.004;

/// Resource tags a tile can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Wood,
    Stone,
    Ore,
    Fish,
    Game,
    FertileSoil,
    Crystal,
}

/// One grid cell's full terrain record. Immutable once generation completes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainTile {
    /// Metres; negative is submerged, 0 is the coastline.
    pub elevation: f32,
    /// Celsius.
    pub temperature: f32,
    /// Rainfall on the 0-300 classifier scale.
    pub rainfall: f32,
    pub biome: Biome,
    pub resources: Vec<Resource>,
    pub plate_id: PlateId,
    /// Latent magical significance, independent of biome.
    pub ley_line: bool,
    pub river_id: Option<RiverId>,
}

/// A candidate settlement location with its suitability score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementSite {
    pub x: usize,
    pub y: usize,
    pub score: f32,
}

/// The generated world: tile grid plus river list.
///
/// Created once per (config, seed) pair, mutated only inside `generate`,
/// read-only afterwards.
pub struct WorldMap {
    config: WorldConfig,
    width: usize,
    height: usize,
    tiles: Vec<TerrainTile>,
    rivers: Vec<River>,
    generated: bool,
}

impl WorldMap {
    pub fn new(config: WorldConfig) -> Self {
        let (width, height) = config.dimensions();
        Self {
            config,
            width,
            height,
            tiles: Vec::new(),
            rivers: Vec::new(),
            generated: false,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Tile at (x, y), or `None` out of bounds (or before generation).
    pub fn get_tile(&self, x: usize, y: usize) -> Option<&TerrainTile> {
        if !self.generated || x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y * self.width + x)
    }

    pub fn rivers(&self) -> &[River] {
        &self.rivers
    }

    /// Run the full generation pipeline.
    pub fn generate(&mut self) {
        let rng = WorldRng::from_seed(self.config.seed);
        let activity = self.config.activity;
        let (width, height) = (self.width, self.height);

        log::info!(
            "generating {width}x{height} world, seed {}, activity {activity}",
            self.config.seed
        );

        // 1. Tectonic plates and base elevation.
        let (plate_map, plate_list) =
            plates::grow_plates(width, height, activity, &mut rng.fork("plates"));
        let mut elevation =
            heightmap::synthesize(&plate_map, &plate_list, activity, &mut rng.fork("heightmap"));

        // 2. Climate fields.
        let mut climate_rng = rng.fork("climate");
        let temperature = climate::generate_temperature(&elevation, &mut climate_rng);
        let rainfall = climate::generate_rainfall(&elevation, &mut climate_rng);

        // 3. Volcanism at active boundaries, magic wastelands on land.
        let volcanic = seed_volcanism(&elevation, &plate_map, activity, &mut rng.fork("volcanism"));
        let wasteland = seed_wastelands(&elevation, &mut rng.fork("wastelands"));

        // 4. Biome classification (pre-carve elevation).
        let mut biomes = Tilemap::new_with(width, height, Biome::Plains);
        for y in 0..height {
            for x in 0..width {
                let b = biome::classify(
                    *temperature.get(x, y),
                    *rainfall.get(x, y),
                    *elevation.get(x, y),
                    *volcanic.get(x, y),
                    *wasteland.get(x, y),
                );
                biomes.set(x, y, b);
            }
        }

        // 5. Rivers, then the carving pass over the now-final paths.
        self.rivers = rivers::generate_rivers(
            &elevation,
            &mut rng.fork("rivers"),
            self.config.desired_rivers,
        );
        let mut river_ids: Tilemap<Option<RiverId>> = Tilemap::new_with(width, height, None);
        for river in &self.rivers {
            for &(x, y) in &river.path {
                // Confluences keep the id of the river traced first.
                if river_ids.get(x, y).is_none() {
                    river_ids.set(x, y, Some(river.id));
                }
            }
        }
        rivers::carve_valleys(&mut elevation, &self.rivers);

        // 6. Ley lines, then resources (crystal seeding reads the ley flag).
        let ley = seed_ley_lines(width, height, &mut rng.fork("leylines"));

        let mut resource_rng = rng.fork("resources");
        self.tiles = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let biome = *biomes.get(x, y);
                let ley_line = *ley.get(x, y);
                let river_id = *river_ids.get(x, y);
                let resources =
                    seed_resources(biome, ley_line, river_id.is_some(), &mut resource_rng);

                self.tiles.push(TerrainTile {
                    elevation: *elevation.get(x, y),
                    temperature: *temperature.get(x, y),
                    rainfall: *rainfall.get(x, y),
                    biome,
                    resources,
                    plate_id: *plate_map.get(x, y),
                    ley_line,
                    river_id,
                });
            }
        }

        self.generated = true;
        log::info!("generation complete: {} rivers", self.rivers.len());
    }

    /// Rank land tiles by settlement suitability.
    ///
    /// Panics if called before `generate` completes - that is a call-ordering
    /// bug in the caller, not a runtime condition.
    pub fn find_suitable_settlement_sites(&self, count: usize) -> Vec<SettlementSite> {
        assert!(
            self.generated,
            "find_suitable_settlement_sites called before world generation"
        );

        let mut sites: Vec<SettlementSite> = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let tile = &self.tiles[y * self.width + x];
                if tile.elevation <= 0.0 {
                    continue;
                }

                let score = self.site_score(x, y, tile);
                if score > 0.0 {
                    sites.push(SettlementSite { x, y, score });
                }
            }
        }

        // Descending by score, coordinate tie-break for a stable order.
        sites.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (a.y, a.x).cmp(&(b.y, b.x)))
        });
        sites.truncate(count);
        sites
    }

    /// Weighted combination of resources, flatness, water access and
    /// fertility.
    fn site_score(&self, x: usize, y: usize, tile: &TerrainTile) -> f32 {
        let resource_score = tile.resources.len() as f32 * 1.2;

        // Flatness: mean elevation difference to the 8-neighbourhood.
        let mut drop_sum = 0.0f32;
        let mut neighbors = 0;
        let mut river_adjacent = false;
        let mut coast_adjacent = false;
        for (nx, ny) in neighbor_coords(x, y, self.width, self.height) {
            let n = &self.tiles[ny * self.width + nx];
            drop_sum += (n.elevation - tile.elevation).abs();
            neighbors += 1;
            river_adjacent |= n.river_id.is_some();
            coast_adjacent |= n.elevation < 0.0;
        }
        let mean_drop = if neighbors > 0 {
            drop_sum / neighbors as f32
        } else {
            0.0
        };
        let flatness = (1.0 - (mean_drop / 400.0).min(1.0)) * 2.0;

        let mut water = 0.0;
        if tile.river_id.is_some() {
            water += 2.5;
        } else if river_adjacent {
            water += 1.5;
        }
        if coast_adjacent {
            water += 1.0;
        }

        let fertility = tile.biome.fertility() * 2.0;

        resource_score + flatness + water + fertility
    }
}

/// 8-neighbour coordinates in the crate-wide fixed scan order.
fn neighbor_coords(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = (usize, usize)> {
    crate::tilemap::DIR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height {
            Some((nx as usize, ny as usize))
        } else {
            None
        }
    })
}

/// Mark volcanic cells: high terrain on an active plate boundary.
fn seed_volcanism(
    elevation: &Tilemap<f32>,
    plate_map: &Tilemap<PlateId>,
    activity: GeologicalActivity,
    rng: &mut WorldRng,
) -> Tilemap<bool> {
    let chance = activity.volcanism_chance();
    let mut volcanic = Tilemap::new_with(elevation.width, elevation.height, false);

    for y in 0..elevation.height {
        for x in 0..elevation.width {
            if *elevation.get(x, y) <= biome::VOLCANIC_ELEVATION {
                continue;
            }
            let my_id = *plate_map.get(x, y);
            let on_boundary = plate_map
                .neighbors_8(x, y)
                .any(|(nx, ny)| *plate_map.get(nx, ny) != my_id);
            if on_boundary && rng.chance(chance) {
                volcanic.set(x, y, true);
            }
        }
    }

    volcanic
}

/// Scatter a few magic-wasteland blotches across the land.
fn seed_wastelands(elevation: &Tilemap<f32>, rng: &mut WorldRng) -> Tilemap<bool> {
    let (width, height) = (elevation.width, elevation.height);
    let mut wasteland = Tilemap::new_with(width, height, false);

    let blotches = ((width * height) / 15_000).max(1);
    for _ in 0..blotches {
        // Up to 20 attempts to land the blotch centre on dry ground.
        let mut center = None;
        for _ in 0..20 {
            let x = rng.next_index(width);
            let y = rng.next_index(height);
            if *elevation.get(x, y) > 0.0 {
                center = Some((x, y));
                break;
            }
        }
        let Some((cx, cy)) = center else {
            continue;
        };

        let radius = rng.next_range(3, 7) as i32;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let tx = cx as i32 + dx;
                let ty = cy as i32 + dy;
                if !wasteland.in_bounds(tx, ty) {
                    continue;
                }
                if dx * dx + dy * dy <= radius * radius {
                    wasteland.set(tx as usize, ty as usize, true);
                }
            }
        }
    }

    wasteland
}

/// Independent sparse per-tile ley-line flags.
fn seed_ley_lines(width: usize, height: usize, rng: &mut WorldRng) -> Tilemap<bool> {
    let mut ley = Tilemap::new_with(width, height, false);
    for y in 0..height {
        for x in 0..width {
            if rng.chance(LEY_LINE_CHANCE) {
                ley.set(x, y, true);
            }
        }
    }
    ley
}

/// Biome-driven resource tags for one tile. The draw pattern per biome is
/// fixed, so resource layout is reproducible.
fn seed_resources(
    biome: Biome,
    ley_line: bool,
    on_river: bool,
    rng: &mut WorldRng,
) -> Vec<Resource> {
    let mut resources = Vec::new();

    match biome {
        Biome::Mountain | Biome::HighMountain => {
            if rng.chance(0.5) {
                resources.push(Resource::Stone);
            }
            if rng.chance(0.25) {
                resources.push(Resource::Ore);
            }
        }
        Biome::Volcanic => {
            if rng.chance(0.4) {
                resources.push(Resource::Ore);
            }
            if rng.chance(0.2) {
                resources.push(Resource::Crystal);
            }
        }
        Biome::Forest | Biome::DenseForest | Biome::Taiga => {
            if rng.chance(0.6) {
                resources.push(Resource::Wood);
            }
            if rng.chance(0.3) {
                resources.push(Resource::Game);
            }
        }
        Biome::Jungle => {
            if rng.chance(0.5) {
                resources.push(Resource::Wood);
            }
            if rng.chance(0.35) {
                resources.push(Resource::Game);
            }
        }
        Biome::Plains | Biome::Savanna => {
            if rng.chance(0.5) {
                resources.push(Resource::FertileSoil);
            }
            if rng.chance(0.2) {
                resources.push(Resource::Game);
            }
        }
        Biome::Coast => {
            if rng.chance(0.5) {
                resources.push(Resource::Fish);
            }
        }
        Biome::Ocean | Biome::DeepOcean => {
            if rng.chance(0.3) {
                resources.push(Resource::Fish);
            }
        }
        _ => {}
    }

    if on_river && biome.fertility() > 0.0 && rng.chance(0.4) {
        resources.push(Resource::Fish);
    }
    if ley_line && rng.chance(0.5) {
        resources.push(Resource::Crystal);
    }

    resources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeologicalActivity, WorldSizeClass};

    fn generated(seed: u64, width: usize, height: usize) -> WorldMap {
        let config = WorldConfig {
            seed,
            size: WorldSizeClass::Custom { width, height },
            activity: GeologicalActivity::Standard,
            desired_rivers: 16,
        };
        let mut world = WorldMap::new(config);
        world.generate();
        world
    }

    #[test]
    fn test_out_of_bounds_is_none_not_panic() {
        let world = generated(1, 32, 32);
        assert!(world.get_tile(31, 31).is_some());
        assert!(world.get_tile(32, 0).is_none());
        assert!(world.get_tile(0, 32).is_none());
        assert!(world.get_tile(usize::MAX, usize::MAX).is_none());
    }

    #[test]
    fn test_ungenerated_world_has_no_tiles() {
        let world = WorldMap::new(WorldConfig::new(1));
        assert!(!world.is_generated());
        assert!(world.get_tile(0, 0).is_none());
        assert!(world.rivers().is_empty());
    }

    #[test]
    #[should_panic(expected = "before world generation")]
    fn test_sites_before_generation_panics() {
        let world = WorldMap::new(WorldConfig::new(1));
        world.find_suitable_settlement_sites(5);
    }

    #[test]
    fn test_determinism_across_runs() {
        let a = generated(42, 96, 96);
        let b = generated(42, 96, 96);

        assert_eq!(a.rivers(), b.rivers());
        for y in 0..96 {
            for x in 0..96 {
                let ta = a.get_tile(x, y).unwrap();
                let tb = b.get_tile(x, y).unwrap();
                assert_eq!(ta.elevation.to_bits(), tb.elevation.to_bits());
                assert_eq!(ta.biome, tb.biome);
                assert_eq!(ta.resources, tb.resources);
                assert_eq!(ta.river_id, tb.river_id);
                assert_eq!(ta.ley_line, tb.ley_line);
            }
        }
    }

    #[test]
    fn test_settlement_sites_contract() {
        let world = generated(42, 96, 96);
        let sites = world.find_suitable_settlement_sites(10);

        assert!(sites.len() <= 10);
        for site in &sites {
            let tile = world.get_tile(site.x, site.y).unwrap();
            assert!(tile.elevation > 0.0, "sites must be on land");
            assert!(site.score > 0.0);
        }
        for pair in sites.windows(2) {
            assert!(pair[0].score >= pair[1].score, "sites must sort descending");
        }
    }

    #[test]
    fn test_river_ids_tagged_on_tiles() {
        let world = generated(42, 128, 128);
        for river in world.rivers() {
            let &(x, y) = &river.path[0];
            let tile = world.get_tile(x, y).unwrap();
            assert!(tile.river_id.is_some(), "river source must carry an id");
        }
    }

    #[test]
    fn test_geological_monotonicity() {
        for seed in [1u64, 42, 777] {
            let mut dormant = WorldMap::new(WorldConfig {
                seed,
                size: WorldSizeClass::Custom { width: 64, height: 64 },
                activity: GeologicalActivity::Dormant,
                desired_rivers: 8,
            });
            dormant.generate();
            let mut volatile = WorldMap::new(WorldConfig {
                seed,
                size: WorldSizeClass::Custom { width: 64, height: 64 },
                activity: GeologicalActivity::Volatile,
                desired_rivers: 8,
            });
            volatile.generate();

            let distinct = |w: &WorldMap| {
                let mut ids = std::collections::HashSet::new();
                for y in 0..w.height() {
                    for x in 0..w.width() {
                        ids.insert(w.get_tile(x, y).unwrap().plate_id);
                    }
                }
                ids.len()
            };
            assert!(distinct(&volatile) > distinct(&dormant), "seed {seed}");
        }
    }

    #[test]
    fn test_scenario_seed_42() {
        // Reference scenario: seed 42, 200x200 grid.
        let config = WorldConfig {
            seed: 42,
            size: WorldSizeClass::Medium,
            activity: GeologicalActivity::Standard,
            desired_rivers: 24,
        };
        let mut world = WorldMap::new(config);
        world.generate();

        assert_eq!(world.width(), 200);
        assert_eq!(world.height(), 200);
        for y in 0..200 {
            for x in 0..200 {
                assert!(world.get_tile(x, y).is_some());
            }
        }

        let mut biomes = std::collections::HashSet::new();
        let mut river_tagged_tiles = 0;
        for y in 0..200 {
            for x in 0..200 {
                let tile = world.get_tile(x, y).unwrap();
                biomes.insert(tile.biome);
                if tile.river_id.is_some() {
                    river_tagged_tiles += 1;
                }
            }
        }
        assert!(biomes.len() >= 5, "only {} biomes", biomes.len());
        assert!(!world.rivers().is_empty(), "expected at least one river");
        assert!(river_tagged_tiles >= 1);

        let sites = world.find_suitable_settlement_sites(10);
        assert!(sites.len() <= 10);
        assert!(!sites.is_empty());
        for pair in sites.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for site in &sites {
            assert!(world.get_tile(site.x, site.y).unwrap().elevation > 0.0);
        }
    }
}
