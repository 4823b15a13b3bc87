use shared_resources::cabin_state::CabinState;
use shared_resources::direction::Direction;
use shared_resources::level::Level;

use crate::utilities::itinerary::Itinerary;

/// Outcome of a door button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorResponse {
    Opening,
    Reopening,
    HeldOpen,
    AlreadyOpening,
    Closing,
    NotApplicable(CabinState),
}

/// Everything about a cabin that the dispatcher and the cabin's own loop
/// both touch. Lives behind the building's shared lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cabin {
    pub current_level: Level,
    pub state: CabinState,
    pub last_direction: Direction,
    pub task_queue: Itinerary,
    pub pending_buttons: Vec<Level>,
}

impl Cabin {
    pub fn new(current_level: Level) -> Self {
        Cabin {
            current_level,
            state: CabinState::IdleClosed,
            last_direction: Direction::Stop,
            task_queue: Itinerary::new(),
            pending_buttons: Vec::new(),
        }
    }

    /// A cabin takes new calls only while it has nothing queued.
    pub fn is_free(&self) -> bool {
        self.task_queue.is_empty()
    }

    pub fn distance_to(&self, level: Level) -> u32 {
        self.current_level.distance_to(level).unsigned_abs()
    }

    pub fn plan_trip(&mut self, target: Level) {
        self.task_queue.append(Itinerary::trip(self.current_level, target));
    }

    /// Returns false when the level was already pending.
    pub fn press_level_button(&mut self, level: Level) -> bool {
        if self.pending_buttons.contains(&level) {
            return false
        }
        self.pending_buttons.push(level);
        true
    }

    /// Picks the next interior request. Going down, the lowest level at or
    /// below the cabin wins; going up, the highest level at or above it; with
    /// no direction yet, the lowest level at or above it. When nothing is
    /// left on that side the cabin reverses to the far end of the list.
    pub fn take_pending_target(&mut self) -> Option<Level> {
        if self.pending_buttons.is_empty() {
            return None
        }
        let going_down = self.last_direction == Direction::Down;
        if going_down || self.last_direction == Direction::Stop {
            self.pending_buttons.sort_unstable();
        } else {
            self.pending_buttons.sort_unstable_by(|a, b| b.cmp(a));
        }
        let current = self.current_level;
        let index = self.pending_buttons
            .iter()
            .position(|&level| if going_down { level <= current } else { level >= current })
            .unwrap_or(self.pending_buttons.len() - 1);
        Some(self.pending_buttons.remove(index))
    }

    /// Applies the effect of a step whose pacing delay has elapsed.
    pub fn complete_step(&mut self, step: CabinState) {
        let direction = step.direction();
        if direction == Direction::Stop {
            return
        }
        match self.current_level.step(direction) {
            Some(next) => {
                self.current_level = next;
                self.last_direction = direction;
            },
            None => log::warn!("Cabin at level {} cannot move {:?}, staying put", self.current_level, direction),
        }
    }

    pub fn press_door_open(&mut self) -> DoorResponse {
        let response = match self.state {
            CabinState::ClosingDoors => {
                self.task_queue.reopen_doors();
                DoorResponse::Reopening
            },
            CabinState::IdleClosed => {
                self.task_queue.reopen_doors();
                DoorResponse::Opening
            },
            CabinState::IdleOpen => {
                self.task_queue.hold_doors_open();
                DoorResponse::HeldOpen
            },
            CabinState::OpeningDoors => DoorResponse::AlreadyOpening,
            CabinState::MovingUp | CabinState::MovingDown => DoorResponse::NotApplicable(self.state),
        };
        debug_assert!(self.task_queue.ends_closed());
        response
    }

    /// Only an idle-open cabin can be told to close early; the caller is
    /// responsible for cutting the running idle-open wait short.
    pub fn press_door_close(&mut self) -> DoorResponse {
        match self.state {
            CabinState::IdleOpen => {
                self.task_queue.release_door_holds();
                DoorResponse::Closing
            },
            state => DoorResponse::NotApplicable(state),
        }
    }
}
