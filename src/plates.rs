//! Tectonic plate synthesis
//!
//! Plates are grown as contiguous regions via frontier-based territory
//! expansion: plate origins are seeded on distinct cells, then a single
//! frontier of claimed cells is expanded by repeatedly picking a random
//! frontier entry and claiming its unclaimed neighbours, until the grid is
//! fully partitioned. The frontier is a plain `Vec` indexed by the RNG, so
//! growth never depends on hash-map iteration order.

use serde::{Deserialize, Serialize};

use crate::config::GeologicalActivity;
use crate::rng::WorldRng;
use crate::tilemap::Tilemap;

/// Unique identifier for a tectonic plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlateId(pub u8);

impl PlateId {
    pub const NONE: PlateId = PlateId(255);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Type of tectonic plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateKind {
    /// Oceanic plates are denser and sit below sea level.
    Oceanic,
    /// Continental plates sit above sea level.
    Continental,
}

/// A tectonic plate with its elevation bias.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plate {
    pub id: PlateId,
    pub kind: PlateKind,
    /// Base elevation in metres contributed to every cell of the plate.
    pub base_elevation: f32,
}

impl Plate {
    fn random(id: PlateId, rng: &mut WorldRng) -> Self {
        // ~60% oceanic, ~40% continental.
        let kind = if rng.next() < 0.6 {
            PlateKind::Oceanic
        } else {
            PlateKind::Continental
        };

        let base_elevation = match kind {
            PlateKind::Oceanic => rng.next_float(-2800.0, -600.0),
            PlateKind::Continental => rng.next_float(150.0, 900.0),
        };

        Self {
            id,
            kind,
            base_elevation,
        }
    }
}

/// Grow tectonic plates until the grid is fully partitioned.
///
/// The plate count is drawn from the activity level's range; since the ranges
/// are disjoint, a volatile world always carries strictly more plates than a
/// dormant one. Every plate keeps at least its origin cell, so every id in the
/// returned list appears in the map.
pub fn grow_plates(
    width: usize,
    height: usize,
    activity: GeologicalActivity,
    rng: &mut WorldRng,
) -> (Tilemap<PlateId>, Vec<Plate>) {
    let (min_plates, max_plates) = activity.plate_count_range();
    let num_plates = rng.next_range(min_plates, max_plates);
    // Tiny grids cannot host more origins than cells.
    let num_plates = num_plates.min(width * height);

    let mut plate_map = Tilemap::new_with(width, height, PlateId::NONE);
    let mut frontier: Vec<(usize, usize, PlateId)> = Vec::new();

    // Seed origins on distinct unclaimed cells.
    for i in 0..num_plates {
        let id = PlateId(i as u8);
        loop {
            let x = rng.next_index(width);
            let y = rng.next_index(height);
            if plate_map.get(x, y).is_none() {
                plate_map.set(x, y, id);
                frontier.push((x, y, id));
                break;
            }
        }
    }

    // Random-frontier growth: expand one claimed cell at a time.
    while !frontier.is_empty() {
        let pick = rng.next_index(frontier.len());
        let (x, y, id) = frontier[pick];

        let mut expanded = false;
        let unclaimed: Vec<(usize, usize)> = plate_map
            .neighbors_8(x, y)
            .filter(|&(nx, ny)| plate_map.get(nx, ny).is_none())
            .collect();
        for (nx, ny) in unclaimed {
            plate_map.set(nx, ny, id);
            frontier.push((nx, ny, id));
            expanded = true;
        }

        if !expanded {
            // Cell is fully surrounded; retire it from the frontier.
            frontier.swap_remove(pick);
        }
    }

    let plates: Vec<Plate> = (0..num_plates)
        .map(|i| Plate::random(PlateId(i as u8), rng))
        .collect();

    log::debug!(
        "grew {} plates ({} continental)",
        plates.len(),
        plates
            .iter()
            .filter(|p| p.kind == PlateKind::Continental)
            .count()
    );

    (plate_map, plates)
}

/// Count distinct plate ids present in a plate map.
pub fn distinct_plate_count(plate_map: &Tilemap<PlateId>) -> usize {
    let mut seen = [false; 256];
    for (_, _, id) in plate_map.iter() {
        if !id.is_none() {
            seen[id.0 as usize] = true;
        }
    }
    seen.iter().filter(|&&s| s).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_fully_partitioned() {
        let mut rng = WorldRng::from_seed(17);
        let (map, plates) = grow_plates(64, 48, GeologicalActivity::Standard, &mut rng);

        assert!(map.iter().all(|(_, _, id)| !id.is_none()));
        assert_eq!(distinct_plate_count(&map), plates.len());
    }

    #[test]
    fn test_plate_count_in_activity_range() {
        let mut rng = WorldRng::from_seed(23);
        let (_, plates) = grow_plates(40, 40, GeologicalActivity::Dormant, &mut rng);
        let (min, max) = GeologicalActivity::Dormant.plate_count_range();
        assert!(plates.len() >= min && plates.len() <= max);
    }

    #[test]
    fn test_volatile_has_more_plates_than_dormant() {
        for seed in [1u64, 2, 3, 42, 1000] {
            let mut dormant_rng = WorldRng::from_seed(seed);
            let mut volatile_rng = WorldRng::from_seed(seed);

            let (dormant_map, _) =
                grow_plates(60, 60, GeologicalActivity::Dormant, &mut dormant_rng);
            let (volatile_map, _) =
                grow_plates(60, 60, GeologicalActivity::Volatile, &mut volatile_rng);

            assert!(
                distinct_plate_count(&volatile_map) > distinct_plate_count(&dormant_map),
                "seed {seed}: volatile should fragment more than dormant"
            );
        }
    }

    #[test]
    fn test_growth_deterministic() {
        let mut a = WorldRng::from_seed(5);
        let mut b = WorldRng::from_seed(5);

        let (map_a, _) = grow_plates(32, 32, GeologicalActivity::Standard, &mut a);
        let (map_b, _) = grow_plates(32, 32, GeologicalActivity::Standard, &mut b);

        assert_eq!(map_a, map_b);
    }

    #[test]
    fn test_plates_are_contiguous() {
        // Flood-fill each plate from its first cell; region growth must never
        // produce disconnected territory.
        let mut rng = WorldRng::from_seed(9);
        let (map, plates) = grow_plates(48, 48, GeologicalActivity::Standard, &mut rng);

        for plate in &plates {
            let total = map.iter().filter(|(_, _, &id)| id == plate.id).count();
            let start = map
                .iter()
                .find(|(_, _, &id)| id == plate.id)
                .map(|(x, y, _)| (x, y))
                .unwrap();

            let mut visited = Tilemap::new_with(map.width, map.height, false);
            let mut stack = vec![start];
            visited.set(start.0, start.1, true);
            let mut reached = 0;
            while let Some((x, y)) = stack.pop() {
                reached += 1;
                for (nx, ny) in map.neighbors_8(x, y) {
                    if *map.get(nx, ny) == plate.id && !*visited.get(nx, ny) {
                        visited.set(nx, ny, true);
                        stack.push((nx, ny));
                    }
                }
            }
            assert_eq!(reached, total, "plate {:?} is fragmented", plate.id);
        }
    }
}
