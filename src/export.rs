//! PNG export of world layers
//!
//! Debug/visualization output for generated worlds. Like the ASCII renderer,
//! this sits outside the generation pipeline and only reads the query surface.

use image::{ImageBuffer, Rgb, RgbImage};

use crate::worldmap::WorldMap;

/// Export the elevation layer using a spectral colormap.
pub fn export_elevation(world: &WorldMap, path: &str) -> Result<(), image::ImageError> {
    // Normalize against the observed range so every world uses the full ramp.
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for y in 0..world.height() {
        for x in 0..world.width() {
            let e = world.get_tile(x, y).map_or(0.0, |t| t.elevation);
            min = min.min(e);
            max = max.max(e);
        }
    }
    let range = (max - min).max(1.0);

    let mut img: RgbImage = ImageBuffer::new(world.width() as u32, world.height() as u32);
    for y in 0..world.height() {
        for x in 0..world.width() {
            let e = world.get_tile(x, y).map_or(0.0, |t| t.elevation);
            let t = (e - min) / range;
            img.put_pixel(x as u32, y as u32, Rgb(spectral_colormap(t)));
        }
    }
    img.save(path)
}

/// Export the biome layer with per-biome colours. River tiles are overdrawn
/// in blue so drainage is visible at a glance.
pub fn export_biomes(world: &WorldMap, path: &str) -> Result<(), image::ImageError> {
    let mut img: RgbImage = ImageBuffer::new(world.width() as u32, world.height() as u32);
    for y in 0..world.height() {
        for x in 0..world.width() {
            let color = match world.get_tile(x, y) {
                Some(tile) if tile.river_id.is_some() && tile.elevation > 0.0 => [50, 110, 200],
                Some(tile) => tile.biome.rgb(),
                None => [0, 0, 0],
            };
            img.put_pixel(x as u32, y as u32, Rgb(color));
        }
    }
    img.save(path)
}

/// Spectral colormap: dark blue -> teal -> green -> yellow -> red.
fn spectral_colormap(t: f32) -> [u8; 3] {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.67, 0.87, 0.64],
        [0.90, 0.96, 0.60],
        [1.00, 1.00, 0.75],
        [1.00, 0.88, 0.55],
        [0.99, 0.68, 0.38],
        [0.96, 0.43, 0.26],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],
    ];

    let t_scaled = t.clamp(0.0, 1.0) * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}
