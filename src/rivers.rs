//! River tracing and valley carving
//!
//! Rivers are traced with a steepest-descent walk: from a high-ground source,
//! each step moves to the lowest strictly-lower unvisited 8-neighbour,
//! scanning offsets in the crate-wide fixed order so tie-breaking is
//! deterministic. A walk ends when it reaches the ocean, bottoms out in a
//! local basin, or hits the safety step cap. Valley carving is a separate,
//! exclusive mutation pass run after all paths are finalized.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::rng::WorldRng;
use crate::tilemap::{Tilemap, DIR_OFFSETS};

/// Minimum elevation (metres) for a river source candidate.
const SOURCE_MIN_ELEVATION: f32 = 1500.0;

/// Shortest river worth keeping.
const MIN_RIVER_LEN: usize = 5;

/// Safety cap on walk length.
const MAX_RIVER_STEPS: usize = 10_000;

/// Maximum depth (metres) removed at a river cell by valley carving.
const CARVE_DEPTH: f32 = 140.0;

/// Radius (cells) over which carving tapers to zero.
const CARVE_RADIUS: i32 = 2;

/// Carved terrain never drops below this floor.
const CARVE_FLOOR: f32 = 0.0;

/// Unique identifier for a river.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiverId(pub u32);

/// A traced river: an ordered path from source to terminus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct River {
    pub id: RiverId,
    pub path: Vec<(usize, usize)>,
}

impl River {
    pub fn source(&self) -> (usize, usize) {
        self.path[0]
    }

    pub fn terminus(&self) -> (usize, usize) {
        *self.path.last().expect("river path is never empty")
    }
}

/// Trace up to `desired` rivers on the heightmap.
///
/// Source candidates are land cells above `SOURCE_MIN_ELEVATION`, collected
/// row-major; sources are drawn from that pool without replacement. Walks
/// shorter than `MIN_RIVER_LEN` are discarded, so fewer than `desired` rivers
/// is a normal outcome, not an error.
pub fn generate_rivers(
    heightmap: &Tilemap<f32>,
    rng: &mut WorldRng,
    desired: usize,
) -> Vec<River> {
    let mut candidates: Vec<(usize, usize)> = heightmap
        .iter()
        .filter(|(_, _, &e)| e > SOURCE_MIN_ELEVATION)
        .map(|(x, y, _)| (x, y))
        .collect();

    let mut rivers = Vec::new();
    let mut next_id = 0u32;

    while !candidates.is_empty() && rivers.len() < desired {
        let pick = rng.next_index(candidates.len());
        let source = candidates.swap_remove(pick);

        let path = descend(heightmap, source);
        if path.len() < MIN_RIVER_LEN {
            continue;
        }

        rivers.push(River {
            id: RiverId(next_id),
            path,
        });
        next_id += 1;
    }

    log::debug!("traced {} rivers (wanted {desired})", rivers.len());
    rivers
}

/// Steepest-descent walk from `source`.
///
/// Moves only to strictly lower cells, so elevation decreases monotonically
/// along the path and the terminus is either submerged or a local minimum of
/// its 8-neighbourhood.
fn descend(heightmap: &Tilemap<f32>, source: (usize, usize)) -> Vec<(usize, usize)> {
    let (mut x, mut y) = source;
    let mut path = vec![(x, y)];
    let mut visited: HashSet<(usize, usize)> = HashSet::new();
    visited.insert((x, y));

    for _ in 0..MAX_RIVER_STEPS {
        let current = *heightmap.get(x, y);
        if current <= 0.0 {
            break; // reached the ocean
        }

        // Fixed scan order keeps tie-breaking deterministic.
        let mut best: Option<(usize, usize, f32)> = None;
        for &(dx, dy) in &DIR_OFFSETS {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if !heightmap.in_bounds(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if visited.contains(&(nx, ny)) {
                continue;
            }
            let elev = *heightmap.get(nx, ny);
            if elev >= current {
                continue;
            }
            match best {
                Some((_, _, best_elev)) if elev >= best_elev => {}
                _ => best = Some((nx, ny, elev)),
            }
        }

        let Some((nx, ny, _)) = best else {
            break; // local basin
        };

        x = nx;
        y = ny;
        visited.insert((x, y));
        path.push((x, y));
    }

    path
}

/// Lower terrain along river paths, in place.
///
/// Each land path cell loses up to `CARVE_DEPTH` metres, tapering linearly
/// with distance out to `CARVE_RADIUS`. Submerged cells are never touched and
/// no cell is pushed below `CARVE_FLOOR`. This is the only pass allowed to
/// mutate elevation after synthesis.
pub fn carve_valleys(heightmap: &mut Tilemap<f32>, rivers: &[River]) {
    for river in rivers {
        for &(x, y) in &river.path {
            if *heightmap.get(x, y) <= 0.0 {
                continue;
            }

            for dy in -CARVE_RADIUS..=CARVE_RADIUS {
                for dx in -CARVE_RADIUS..=CARVE_RADIUS {
                    let tx = x as i32 + dx;
                    let ty = y as i32 + dy;
                    if !heightmap.in_bounds(tx, ty) {
                        continue;
                    }
                    let (tx, ty) = (tx as usize, ty as usize);

                    let elev = *heightmap.get(tx, ty);
                    if elev <= 0.0 {
                        continue;
                    }

                    let dist = ((dx * dx + dy * dy) as f32).sqrt();
                    let falloff = 1.0 - dist / (CARVE_RADIUS as f32 + 1.0);
                    if falloff <= 0.0 {
                        continue;
                    }

                    let carved = (elev - CARVE_DEPTH * falloff).max(CARVE_FLOOR);
                    heightmap.set(tx, ty, carved);
                }
            }
        }
    }
}
