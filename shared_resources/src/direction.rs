use crate::cabin_state::CabinState;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Down,
    #[default]
    Stop,
    Up,
}

impl Direction {
    /// Direction that moves a cabin by `distance` levels (see `Level::distance_to`).
    pub fn towards(distance: i32) -> Self {
        match distance {
            d if d > 0 => Direction::Up,
            d if d < 0 => Direction::Down,
            _ => Direction::Stop,
        }
    }

    pub fn to_state(self) -> Option<CabinState> {
        match self {
            Direction::Up => Some(CabinState::MovingUp),
            Direction::Down => Some(CabinState::MovingDown),
            Direction::Stop => None,
        }
    }
}
