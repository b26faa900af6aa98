//! Biome classification
//!
//! `classify` is a pure, total decision function implemented as an ordered
//! guard chain: the first matching rule wins, and later rules intentionally
//! act as fallbacks for ranges earlier rules only partially cover. The order
//! is semantically significant - do not reorder during refactors.

use serde::{Deserialize, Serialize};

/// Elevation (metres) above which volcanic terrain reads as a volcanic biome.
pub const VOLCANIC_ELEVATION: f32 = 3000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    MagicWasteland,
    Volcanic,
    DeepOcean,
    Ocean,
    HighMountain,
    Mountain,
    IceCap,
    Tundra,
    Desert,
    Jungle,
    Taiga,
    Swamp,
    Savanna,
    DenseForest,
    Forest,
    Coast,
    Plains,
}

/// Classify a tile. Total: every input yields exactly one biome.
pub fn classify(
    temperature: f32,
    rainfall: f32,
    elevation: f32,
    is_volcanic: bool,
    is_magic_wasteland: bool,
) -> Biome {
    // 1. Magical corruption overrides everything else.
    if is_magic_wasteland {
        return Biome::MagicWasteland;
    }
    // 2. Volcanic terrain, but only at altitude.
    if is_volcanic && elevation > VOLCANIC_ELEVATION {
        return Biome::Volcanic;
    }
    // 3. Submerged terrain.
    if elevation < -500.0 {
        return Biome::DeepOcean;
    }
    if elevation < 0.0 {
        return Biome::Ocean;
    }
    // 4. Extreme altitude.
    if elevation > 8000.0 {
        return Biome::HighMountain;
    }
    if elevation > 5000.0 {
        return Biome::Mountain;
    }
    // 5. Extreme cold.
    if temperature < -20.0 {
        return Biome::IceCap;
    }
    if temperature < -10.0 {
        return Biome::Tundra;
    }
    // 6. Hot and bone dry.
    if temperature > 30.0 && rainfall < 20.0 {
        return Biome::Desert;
    }
    // 7. Hot and drenched.
    if temperature > 25.0 && rainfall > 200.0 {
        return Biome::Jungle;
    }
    // 8. Cold but wet enough for conifers.
    if (-10.0..5.0).contains(&temperature) && rainfall > 40.0 {
        return Biome::Taiga;
    }
    // 9. Low, wet, warm lowlands.
    if elevation < 100.0 && rainfall > 150.0 && temperature > 5.0 {
        return Biome::Swamp;
    }
    // 10. Warm grassland with seasonal rain.
    if temperature > 20.0 && (20.0..=80.0).contains(&rainfall) {
        return Biome::Savanna;
    }
    // 11-12. Forest density by rainfall.
    if rainfall > 150.0 && temperature > 10.0 {
        return Biome::DenseForest;
    }
    if rainfall > 80.0 && temperature > 5.0 {
        return Biome::Forest;
    }
    // 13. Low-lying land that matched nothing wetter.
    if elevation < 50.0 {
        return Biome::Coast;
    }
    // 14. Dry fallback desert.
    if rainfall < 20.0 && temperature > 10.0 {
        return Biome::Desert;
    }
    // 15-17. Remaining moderate terrain.
    if rainfall > 40.0 {
        return Biome::Plains;
    }
    if temperature < 5.0 {
        return Biome::Tundra;
    }
    Biome::Plains
}

impl Biome {
    /// Display character for ASCII rendering.
    pub fn char(&self) -> char {
        match self {
            Biome::MagicWasteland => '!',
            Biome::Volcanic => 'V',
            Biome::DeepOcean => '~',
            Biome::Ocean => '.',
            Biome::HighMountain => 'A',
            Biome::Mountain => '^',
            Biome::IceCap => '#',
            Biome::Tundra => ':',
            Biome::Desert => 'd',
            Biome::Jungle => 'j',
            Biome::Taiga => 'Y',
            Biome::Swamp => 's',
            Biome::Savanna => ';',
            Biome::DenseForest => 'F',
            Biome::Forest => 'f',
            Biome::Coast => ',',
            Biome::Plains => '"',
        }
    }

    /// RGB colour for PNG export.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Biome::MagicWasteland => [150, 60, 170],
            Biome::Volcanic => [120, 40, 30],
            Biome::DeepOcean => [10, 30, 90],
            Biome::Ocean => [30, 70, 140],
            Biome::HighMountain => [235, 235, 240],
            Biome::Mountain => [140, 135, 130],
            Biome::IceCap => [220, 230, 250],
            Biome::Tundra => [170, 180, 160],
            Biome::Desert => [210, 190, 120],
            Biome::Jungle => [20, 90, 30],
            Biome::Taiga => [70, 110, 90],
            Biome::Swamp => [80, 100, 60],
            Biome::Savanna => [190, 180, 90],
            Biome::DenseForest => [35, 100, 40],
            Biome::Forest => [60, 130, 60],
            Biome::Coast => [220, 210, 170],
            Biome::Plains => [130, 180, 90],
        }
    }

    /// Agricultural fertility used in settlement scoring.
    pub fn fertility(&self) -> f32 {
        match self {
            Biome::Plains => 1.0,
            Biome::Forest => 0.9,
            Biome::Coast => 0.8,
            Biome::Savanna => 0.7,
            Biome::DenseForest => 0.65,
            Biome::Jungle => 0.55,
            Biome::Taiga => 0.45,
            Biome::Swamp => 0.35,
            Biome::Mountain => 0.25,
            Biome::Tundra => 0.15,
            Biome::Desert => 0.1,
            _ => 0.0,
        }
    }

    /// Base vegetation growth multiplier; jungles and dense forests rank
    /// highest, deserts and tundra lowest.
    pub fn growth_base(&self) -> f32 {
        match self {
            Biome::Jungle => 1.4,
            Biome::DenseForest => 1.3,
            Biome::Forest => 1.1,
            Biome::Swamp => 1.0,
            Biome::Plains => 0.9,
            Biome::Savanna => 0.85,
            Biome::Coast => 0.8,
            Biome::Taiga => 0.75,
            Biome::Mountain => 0.6,
            Biome::MagicWasteland => 0.5,
            Biome::Tundra => 0.45,
            Biome::Desert => 0.4,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_wasteland_overrides_everything() {
        assert_eq!(classify(25.0, 100.0, -2000.0, true, true), Biome::MagicWasteland);
    }

    #[test]
    fn test_volcanic_needs_altitude() {
        assert_eq!(classify(10.0, 100.0, 4000.0, true, false), Biome::Volcanic);
        // Low volcanic terrain falls through to the normal rules.
        assert_ne!(classify(10.0, 100.0, 200.0, true, false), Biome::Volcanic);
    }

    #[test]
    fn test_ocean_bands() {
        assert_eq!(classify(10.0, 100.0, -600.0, false, false), Biome::DeepOcean);
        assert_eq!(classify(10.0, 100.0, -100.0, false, false), Biome::Ocean);
    }

    #[test]
    fn test_mountain_bands() {
        assert_eq!(classify(10.0, 100.0, 8500.0, false, false), Biome::HighMountain);
        assert_eq!(classify(10.0, 100.0, 6000.0, false, false), Biome::Mountain);
    }

    #[test]
    fn test_cold_bands() {
        assert_eq!(classify(-25.0, 100.0, 500.0, false, false), Biome::IceCap);
        assert_eq!(classify(-15.0, 100.0, 500.0, false, false), Biome::Tundra);
    }

    #[test]
    fn test_hot_extremes() {
        assert_eq!(classify(35.0, 10.0, 500.0, false, false), Biome::Desert);
        assert_eq!(classify(28.0, 250.0, 500.0, false, false), Biome::Jungle);
    }

    #[test]
    fn test_taiga_band() {
        assert_eq!(classify(0.0, 60.0, 500.0, false, false), Biome::Taiga);
    }

    #[test]
    fn test_swamp_is_low_wet_warm() {
        assert_eq!(classify(15.0, 180.0, 50.0, false, false), Biome::Swamp);
        // Same climate higher up is dense forest instead.
        assert_eq!(classify(15.0, 180.0, 500.0, false, false), Biome::DenseForest);
    }

    #[test]
    fn test_savanna_before_forest() {
        assert_eq!(classify(24.0, 60.0, 500.0, false, false), Biome::Savanna);
    }

    #[test]
    fn test_forest_bands() {
        assert_eq!(classify(12.0, 160.0, 500.0, false, false), Biome::DenseForest);
        assert_eq!(classify(12.0, 100.0, 500.0, false, false), Biome::Forest);
    }

    #[test]
    fn test_coast_fallback() {
        assert_eq!(classify(12.0, 30.0, 20.0, false, false), Biome::Coast);
    }

    #[test]
    fn test_dry_fallback_desert() {
        assert_eq!(classify(15.0, 10.0, 500.0, false, false), Biome::Desert);
    }

    #[test]
    fn test_tail_fallbacks() {
        assert_eq!(classify(12.0, 60.0, 500.0, false, false), Biome::Plains);
        assert_eq!(classify(2.0, 30.0, 500.0, false, false), Biome::Tundra);
        assert_eq!(classify(12.0, 30.0, 500.0, false, false), Biome::Plains);
    }

    #[test]
    fn test_purity() {
        for _ in 0..3 {
            assert_eq!(
                classify(18.5, 77.0, 312.0, false, false),
                classify(18.5, 77.0, 312.0, false, false)
            );
        }
    }

    #[test]
    fn test_totality_over_input_grid() {
        // Sweep the documented ranges; every combination must classify.
        let mut temp = -40.0f32;
        while temp <= 45.0 {
            let mut rain = 0.0f32;
            while rain <= 320.0 {
                let mut elev = -2000.0f32;
                while elev <= 10000.0 {
                    for volcanic in [false, true] {
                        for wasteland in [false, true] {
                            // A panic or non-exhaustive match would fail here.
                            let _ = classify(temp, rain, elev, volcanic, wasteland);
                        }
                    }
                    elev += 475.0;
                }
                rain += 17.0;
            }
            temp += 4.5;
        }
    }
}
