use std::fmt;

use crate::direction::Direction;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;
pub const NUM_LEVELS: usize = (MAX_LEVEL - MIN_LEVEL + 1) as usize;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("level {0} is outside of {min}..={max}", min = MIN_LEVEL, max = MAX_LEVEL)]
    OutOfRange(String),
    #[error("level {0:?} is not a number")]
    NotANumber(String),
}

/// A building level, always within `MIN_LEVEL..=MAX_LEVEL`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(MIN_LEVEL);
    pub const MAX: Level = Level(MAX_LEVEL);

    pub fn new(num: u8) -> Result<Self, LevelError> {
        if (MIN_LEVEL..=MAX_LEVEL).contains(&num) {
            Ok(Level(num))
        } else {
            Err(LevelError::OutOfRange(num.to_string()))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Position of this level's row on the status board.
    pub fn index(self) -> usize {
        (self.0 - MIN_LEVEL) as usize
    }

    /// Signed number of levels to travel from `self` to `target`.
    pub fn distance_to(self, target: Level) -> i32 {
        target.0 as i32 - self.0 as i32
    }

    /// The neighbouring level in `direction`, or `None` at the top/bottom of the building.
    pub fn step(self, direction: Direction) -> Option<Level> {
        match direction {
            Direction::Up if self.0 < MAX_LEVEL => Some(Level(self.0 + 1)),
            Direction::Down if self.0 > MIN_LEVEL => Some(Level(self.0 - 1)),
            Direction::Stop => Some(self),
            _ => None,
        }
    }

    pub fn iter() -> impl Iterator<Item = Level> {
        (MIN_LEVEL..=MAX_LEVEL).map(Level)
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(num: u8) -> Result<Self, Self::Error> {
        Level::new(num)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl std::str::FromStr for Level {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LevelError::NotANumber(s.to_string()))
        }
        // any integer token that does not fit in a u8 is outside the building
        s.parse::<u8>()
            .map_err(|_| LevelError::OutOfRange(s.to_string()))
            .and_then(Level::new)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
