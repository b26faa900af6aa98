//! Elevation synthesis
//!
//! The heightmap is built in three layers: each plate contributes its base
//! elevation bias, plate boundaries contribute mountain-building uplift with
//! gaussian falloff, and two octave bands of Perlin fBm add local relief.
//! Elevations are metres: below −500 is deep ocean, below 0 ocean, above
//! 5000 mountain, above 8000 high mountain.

use noise::{NoiseFn, Perlin};

use crate::config::GeologicalActivity;
use crate::plates::{Plate, PlateId, PlateKind};
use crate::rng::WorldRng;
use crate::tilemap::Tilemap;

/// Radius (cells) over which boundary uplift tapers off.
const UPLIFT_RADIUS: i32 = 6;

/// Fractional Brownian Motion - layers multiple octaves of noise for
/// self-similar detail.
fn fbm(noise: &Perlin, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    total / max_value
}

/// Uplift strength for a pair of colliding plates, in metres.
///
/// Continental collisions build the tallest ranges; oceanic boundaries mostly
/// produce ridges and trenches of modest relief.
fn pair_uplift(a: &Plate, b: &Plate, rng: &mut WorldRng) -> f32 {
    match (a.kind, b.kind) {
        (PlateKind::Continental, PlateKind::Continental) => rng.next_float(3500.0, 7000.0),
        (PlateKind::Oceanic, PlateKind::Oceanic) => rng.next_float(400.0, 1600.0),
        _ => rng.next_float(1500.0, 4000.0),
    }
}

/// Synthesize the elevation grid from a finished plate partition.
pub fn synthesize(
    plate_map: &Tilemap<PlateId>,
    plates: &[Plate],
    activity: GeologicalActivity,
    rng: &mut WorldRng,
) -> Tilemap<f32> {
    let width = plate_map.width;
    let height = plate_map.height;
    let num_plates = plates.len();

    // Per-pair uplift magnitudes, drawn in a fixed (i, j) order.
    let mut uplift_table = vec![0.0f32; num_plates * num_plates];
    for i in 0..num_plates {
        for j in (i + 1)..num_plates {
            let uplift = pair_uplift(&plates[i], &plates[j], rng) * activity.uplift_factor();
            uplift_table[i * num_plates + j] = uplift;
            uplift_table[j * num_plates + i] = uplift;
        }
    }

    // Base layer: plate elevation bias.
    let mut elevation = Tilemap::new_with(width, height, 0.0f32);
    for y in 0..height {
        for x in 0..width {
            let id = *plate_map.get(x, y);
            elevation.set(x, y, plates[id.0 as usize].base_elevation);
        }
    }

    // Boundary uplift: spread each boundary cell's uplift with gaussian
    // falloff, keeping the max contribution per cell so overlapping
    // boundaries do not stack into spikes.
    let mut uplift_map = Tilemap::new_with(width, height, 0.0f32);
    for y in 0..height {
        for x in 0..width {
            let my_id = *plate_map.get(x, y);

            let mut cell_uplift = 0.0f32;
            for (nx, ny) in plate_map.neighbors_8(x, y) {
                let other = *plate_map.get(nx, ny);
                if other != my_id {
                    let table_idx = my_id.0 as usize * num_plates + other.0 as usize;
                    cell_uplift = cell_uplift.max(uplift_table[table_idx]);
                }
            }
            if cell_uplift <= 0.0 {
                continue;
            }

            for dy in -UPLIFT_RADIUS..=UPLIFT_RADIUS {
                for dx in -UPLIFT_RADIUS..=UPLIFT_RADIUS {
                    let tx = x as i32 + dx;
                    let ty = y as i32 + dy;
                    if !uplift_map.in_bounds(tx, ty) {
                        continue;
                    }
                    let dist2 = (dx * dx + dy * dy) as f32;
                    let t = dist2.sqrt() / UPLIFT_RADIUS as f32;
                    if t > 1.0 {
                        continue;
                    }
                    // Gaussian falloff: sharp ridge crest, smooth flanks.
                    let contribution = cell_uplift * (-3.0 * t * t).exp();
                    let current = *uplift_map.get(tx as usize, ty as usize);
                    if contribution > current {
                        uplift_map.set(tx as usize, ty as usize, contribution);
                    }
                }
            }
        }
    }

    // Noise layer: coarse continental undulation plus fine local relief.
    let coarse = Perlin::new(rng.next_index(u32::MAX as usize) as u32);
    let fine = Perlin::new(rng.next_index(u32::MAX as usize) as u32);
    let inv_w = 1.0 / width as f64;
    let inv_h = 1.0 / height as f64;

    for y in 0..height {
        for x in 0..width {
            let fx = x as f64 * inv_w;
            let fy = y as f64 * inv_h;

            let coarse_relief = fbm(&coarse, fx * 4.0, fy * 4.0, 4, 0.5, 2.0) as f32 * 850.0;
            let fine_relief = fbm(&fine, fx * 16.0, fy * 16.0, 3, 0.5, 2.0) as f32 * 240.0;

            let base = *elevation.get(x, y);
            let uplift = *uplift_map.get(x, y);
            elevation.set(x, y, base + uplift + coarse_relief + fine_relief);
        }
    }

    elevation
}
