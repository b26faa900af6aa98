//! World generation configuration
//!
//! A `WorldConfig` plus a seed fully determines a generated world: the whole
//! pipeline is a pure function of (config, seed).

use serde::{Deserialize, Serialize};

/// Preset grid dimensions for generated worlds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorldSizeClass {
    /// 128×128
    Small,
    /// 200×200
    #[default]
    Medium,
    /// 320×320
    Large,
    /// 512×512
    Huge,
    /// Explicit dimensions
    Custom { width: usize, height: usize },
}

impl WorldSizeClass {
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Self::Small => (128, 128),
            Self::Medium => (200, 200),
            Self::Large => (320, 320),
            Self::Huge => (512, 512),
            Self::Custom { width, height } => (*width, *height),
        }
    }

    /// Parse from string (for CLI).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(Self::Small),
            "medium" | "default" => Some(Self::Medium),
            "large" => Some(Self::Large),
            "huge" => Some(Self::Huge),
            _ => None,
        }
    }
}

/// How geologically active the world is.
///
/// Activity drives the tectonic plate count and the strength of boundary
/// uplift, so volatile worlds are more fragmented and more mountainous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GeologicalActivity {
    Dormant,
    #[default]
    Standard,
    Volatile,
}

impl GeologicalActivity {
    /// Plate count range (min, max) for this activity level.
    ///
    /// Ranges are disjoint and strictly increasing, so any volatile world
    /// has more plates than any standard world, which has more than any
    /// dormant world of the same dimensions.
    pub fn plate_count_range(&self) -> (usize, usize) {
        match self {
            Self::Dormant => (3, 5),
            Self::Standard => (7, 11),
            Self::Volatile => (14, 20),
        }
    }

    /// Multiplier on mountain-building uplift at plate boundaries.
    pub fn uplift_factor(&self) -> f32 {
        match self {
            Self::Dormant => 0.6,
            Self::Standard => 1.0,
            Self::Volatile => 1.5,
        }
    }

    /// Per-candidate probability that a high boundary cell turns volcanic.
    pub fn volcanism_chance(&self) -> f64 {
        match self {
            Self::Dormant => 0.02,
            Self::Standard => 0.08,
            Self::Volatile => 0.22,
        }
    }

    /// Parse from string (for CLI).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dormant" => Some(Self::Dormant),
            "standard" | "default" => Some(Self::Standard),
            "volatile" => Some(Self::Volatile),
            _ => None,
        }
    }
}

impl std::fmt::Display for GeologicalActivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dormant => write!(f, "dormant"),
            Self::Standard => write!(f, "standard"),
            Self::Volatile => write!(f, "volatile"),
        }
    }
}

/// Full configuration for one world.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WorldConfig {
    pub seed: u64,
    pub size: WorldSizeClass,
    pub activity: GeologicalActivity,
    /// Upper bound on traced rivers; fewer may be produced if the terrain
    /// lacks valid sources.
    pub desired_rivers: usize,
}

impl WorldConfig {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            size: WorldSizeClass::default(),
            activity: GeologicalActivity::default(),
            desired_rivers: 24,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.size.dimensions()
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
