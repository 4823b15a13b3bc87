use std::fmt;

use crate::direction::Direction;

/// What a cabin is doing right now. Durations are looked up in `config::Timing`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinState {
    MovingUp,
    MovingDown,
    OpeningDoors,
    ClosingDoors,
    IdleOpen,
    IdleClosed,
}

impl CabinState {
    /// Steps appended to every itinerary once the cabin has reached its target level.
    pub const SERVICE_SUFFIX: [CabinState; 3] = [
        CabinState::OpeningDoors,
        CabinState::IdleOpen,
        CabinState::ClosingDoors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CabinState::MovingUp => "MOVING_UP",
            CabinState::MovingDown => "MOVING_DOWN",
            CabinState::OpeningDoors => "OPENING_DOORS",
            CabinState::ClosingDoors => "CLOSING_DOORS",
            CabinState::IdleOpen => "IDLE_OPEN",
            CabinState::IdleClosed => "IDLE_CLOSED",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            CabinState::MovingUp => Direction::Up,
            CabinState::MovingDown => Direction::Down,
            _ => Direction::Stop,
        }
    }
}

impl fmt::Display for CabinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
