use serde::{Deserialize, Serialize};

/// Auto-play skill level, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct SkillLevel(u8);

impl SkillLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const COUNT: usize = 5;

    /// Build a level, clamping out-of-range values into `1..=5`.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based row index into a level parameter table.
    pub fn index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    pub fn all() -> impl Iterator<Item = SkillLevel> {
        (Self::MIN..=Self::MAX).map(SkillLevel)
    }
}

impl Default for SkillLevel {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl From<u8> for SkillLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

impl From<SkillLevel> for u8 {
    fn from(level: SkillLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.0)
    }
}
