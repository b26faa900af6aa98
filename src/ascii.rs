//! ASCII rendering of finished world maps
//!
//! Read-only debug inspection: converts a generated world plus a layer
//! selector into a plain-text grid. External consumer of the query surface,
//! not part of the generation contract.

use crate::worldmap::WorldMap;

/// Which layer of the world to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiLayer {
    Biome,
    Elevation,
    Resources,
}

impl AsciiLayer {
    /// Parse from string (for CLI).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "biome" | "biomes" => Some(Self::Biome),
            "elevation" | "height" => Some(Self::Elevation),
            "resources" | "res" => Some(Self::Resources),
            _ => None,
        }
    }
}

/// Character ramp for the elevation layer, deep ocean to high mountain.
fn elevation_char(elevation: f32) -> char {
    if elevation < -500.0 {
        '~'
    } else if elevation < 0.0 {
        '.'
    } else if elevation < 500.0 {
        '_'
    } else if elevation < 1500.0 {
        '-'
    } else if elevation < 3000.0 {
        '='
    } else if elevation < 5000.0 {
        '+'
    } else if elevation < 8000.0 {
        '^'
    } else {
        'A'
    }
}

/// Render one layer of a generated world as a text grid, one row per line.
pub fn render(world: &WorldMap, layer: AsciiLayer) -> String {
    let mut out = String::with_capacity((world.width() + 1) * world.height());

    for y in 0..world.height() {
        for x in 0..world.width() {
            let tile = world
                .get_tile(x, y)
                .expect("render is only called on generated worlds");
            let c = match layer {
                AsciiLayer::Biome => tile.biome.char(),
                AsciiLayer::Elevation => elevation_char(tile.elevation),
                AsciiLayer::Resources => match tile.resources.len() {
                    0 => {
                        if tile.elevation < 0.0 {
                            '~'
                        } else {
                            '.'
                        }
                    }
                    1 => '1',
                    2 => '2',
                    _ => '3',
                },
            };
            out.push(c);
        }
        out.push('\n');
    }

    out
}
