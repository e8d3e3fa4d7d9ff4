use serde::{Deserialize, Serialize};

/// Coarse geographic bucket used only for price multipliers.
///
/// `Default` is reserved for an absent or empty location; text that matches no
/// keyword resolves to `Central`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionBucket {
    North,
    South,
    East,
    West,
    Central,
    Default,
}

impl RegionBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionBucket::North => "North",
            RegionBucket::South => "South",
            RegionBucket::East => "East",
            RegionBucket::West => "West",
            RegionBucket::Central => "Central",
            RegionBucket::Default => "Default",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "north" => Some(RegionBucket::North),
            "south" => Some(RegionBucket::South),
            "east" => Some(RegionBucket::East),
            "west" => Some(RegionBucket::West),
            "central" => Some(RegionBucket::Central),
            "default" => Some(RegionBucket::Default),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegionBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
