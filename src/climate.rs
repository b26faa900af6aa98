//! Climate fields: temperature and rainfall
//!
//! Not algorithmically novel; this stage exists to feed the biome classifier
//! with per-tile temperature (°C) and rainfall (0–300 scale). Temperature
//! follows a pole-to-equator gradient with an elevation lapse rate; rainfall
//! follows latitude belts (wet equator, dry subtropics) modulated by noise.

use noise::{NoiseFn, Perlin};

use crate::rng::WorldRng;
use crate::tilemap::Tilemap;

/// Temperature at the equator at sea level (Celsius).
const EQUATOR_TEMP: f32 = 32.0;

/// Temperature at the poles at sea level (Celsius).
const POLE_TEMP: f32 = -30.0;

/// Temperature drop per 1000 m elevation (lapse rate).
const LAPSE_RATE: f32 = 6.5;

/// Generate the temperature field from latitude and elevation.
pub fn generate_temperature(heightmap: &Tilemap<f32>, rng: &mut WorldRng) -> Tilemap<f32> {
    let width = heightmap.width;
    let height = heightmap.height;
    let noise = Perlin::new(rng.next_index(u32::MAX as usize) as u32);

    let mut temperature = Tilemap::new_with(width, height, 0.0f32);
    for y in 0..height {
        // Latitude: 0.0 at the poles (top/bottom edge), 1.0 at the equator.
        let latitude = 1.0 - ((y as f32 / (height - 1).max(1) as f32) - 0.5).abs() * 2.0;
        let base = POLE_TEMP + (EQUATOR_TEMP - POLE_TEMP) * latitude;

        for x in 0..width {
            let elevation = *heightmap.get(x, y);
            let lapse = if elevation > 0.0 {
                elevation / 1000.0 * LAPSE_RATE
            } else {
                0.0
            };

            let jitter = noise.get([x as f64 * 0.05, y as f64 * 0.05]) as f32 * 3.0;
            temperature.set(x, y, base - lapse + jitter);
        }
    }

    temperature
}

/// Rainfall belt strength for a latitude in [0, 1] (0 = pole, 1 = equator).
///
/// Piecewise model of the global circulation cells: wet equatorial belt,
/// dry subtropics, moderate temperate band, dry poles.
fn rainfall_belt(latitude: f32) -> f32 {
    if latitude > 0.85 {
        230.0 // equatorial wet belt
    } else if latitude > 0.6 {
        60.0 // subtropical dry belt
    } else if latitude > 0.25 {
        120.0 // temperate westerlies
    } else {
        35.0 // polar dry
    }
}

/// Generate the rainfall field from latitude belts plus noise modulation.
pub fn generate_rainfall(heightmap: &Tilemap<f32>, rng: &mut WorldRng) -> Tilemap<f32> {
    let width = heightmap.width;
    let height = heightmap.height;
    let noise = Perlin::new(rng.next_index(u32::MAX as usize) as u32);

    let mut rainfall = Tilemap::new_with(width, height, 0.0f32);
    for y in 0..height {
        let latitude = 1.0 - ((y as f32 / (height - 1).max(1) as f32) - 0.5).abs() * 2.0;
        let belt = rainfall_belt(latitude);

        for x in 0..width {
            // Smooth the belt edges and add regional wet/dry patches.
            let blend = noise.get([x as f64 * 0.02, y as f64 * 0.02]) as f32;
            let patch = noise.get([x as f64 * 0.08 + 500.0, y as f64 * 0.08 + 500.0]) as f32;

            let value = belt * (1.0 + blend * 0.45) + patch * 45.0;
            rainfall.set(x, y, value.clamp(0.0, 320.0));
        }
    }

    rainfall
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map(width: usize, height: usize, elevation: f32) -> Tilemap<f32> {
        Tilemap::new_with(width, height, elevation)
    }

    #[test]
    fn test_equator_warmer_than_poles() {
        let heightmap = flat_map(10, 101, 100.0);
        let mut rng = WorldRng::from_seed(1);
        let temp = generate_temperature(&heightmap, &mut rng);

        let pole = *temp.get(5, 0);
        let equator = *temp.get(5, 50);
        assert!(equator > pole + 30.0, "equator {equator} vs pole {pole}");
    }

    #[test]
    fn test_lapse_rate_cools_mountains() {
        let lowland = flat_map(4, 41, 100.0);
        let highland = flat_map(4, 41, 6000.0);
        let mut rng_a = WorldRng::from_seed(2);
        let mut rng_b = WorldRng::from_seed(2);

        let low_t = generate_temperature(&lowland, &mut rng_a);
        let high_t = generate_temperature(&highland, &mut rng_b);
        assert!(*high_t.get(2, 20) < *low_t.get(2, 20) - 30.0);
    }

    #[test]
    fn test_rainfall_in_range_and_varied() {
        let heightmap = flat_map(60, 120, 50.0);
        let mut rng = WorldRng::from_seed(3);
        let rain = generate_rainfall(&heightmap, &mut rng);

        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for (_, _, &r) in rain.iter() {
            assert!((0.0..=320.0).contains(&r));
            min = min.min(r);
            max = max.max(r);
        }
        assert!(max - min > 100.0, "rainfall field should span wet and dry");
    }

    #[test]
    fn test_climate_deterministic() {
        let heightmap = flat_map(30, 30, 200.0);
        let mut rng_a = WorldRng::from_seed(9);
        let mut rng_b = WorldRng::from_seed(9);

        assert_eq!(
            generate_temperature(&heightmap, &mut rng_a),
            generate_temperature(&heightmap, &mut rng_b)
        );
    }
}
