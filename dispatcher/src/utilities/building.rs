/// ----- BUILDING -----
/// The coordinator handed to the dispatcher and to every cabin loop. It
/// owns the state guarded by the single dispatch lock (both cabins and the
/// wait list), the status board, and the step timing.

use parking_lot::Mutex;

use shared_resources::config::{DispatcherConfig, Timing, NUM_CABINS};
use shared_resources::cabin_state::CabinState;
use shared_resources::level::Level;

use crate::utilities::cabin_status::Cabin;
use crate::utilities::status_board::StatusBoard;
use crate::utilities::wait_list::WaitList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Cabin(usize),
    /// `position` is 1-based within the wait list.
    Deferred { position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    Chained(Level),
    Idle,
}

#[derive(Debug, Clone)]
pub struct SharedState {
    pub cabins: [Cabin; NUM_CABINS],
    pub wait_list: WaitList,
}

impl SharedState {
    pub fn new(initial_level: Level) -> Self {
        SharedState {
            cabins: std::array::from_fn(|_| Cabin::new(initial_level)),
            wait_list: WaitList::new(),
        }
    }

    /// Gives the call to the nearest free cabin (lowest id on a tie), or
    /// defers it. Once anything is deferred, later calls queue behind it.
    pub fn assign(&mut self, level: Level) -> Assignment {
        if !self.wait_list.is_empty() {
            return Assignment::Deferred { position: self.wait_list.push(level) }
        }

        let nearest_free = self.cabins
            .iter()
            .enumerate()
            .filter(|(_, cabin)| cabin.is_free())
            .min_by_key(|(id, cabin)| (cabin.distance_to(level), *id))
            .map(|(id, _)| id);

        match nearest_free {
            Some(id) => {
                self.cabins[id].plan_trip(level);
                Assignment::Cabin(id)
            },
            None => Assignment::Deferred { position: self.wait_list.push(level) },
        }
    }

    /// Interior buttons first, then the oldest deferred call.
    pub fn next_target(&mut self, id: usize) -> Option<Level> {
        self.cabins[id]
            .take_pending_target()
            .or_else(|| self.wait_list.take_next())
    }

    /// Queues a trip to the next target for an empty-handed cabin.
    pub fn plan_next_trip(&mut self, id: usize) -> Option<Level> {
        let target = self.next_target(id)?;
        self.cabins[id].plan_trip(target);
        Some(target)
    }

    /// Called when a cabin has run out of steps after closing its doors.
    pub fn finish_itinerary(&mut self, id: usize) -> Finish {
        match self.plan_next_trip(id) {
            Some(target) => Finish::Chained(target),
            None => {
                self.cabins[id].state = CabinState::IdleClosed;
                Finish::Idle
            },
        }
    }
}

#[derive(Debug)]
pub struct Building {
    pub shared: Mutex<SharedState>,
    pub board: StatusBoard,
    pub timing: Timing,
}

impl Building {
    pub fn new(config: &DispatcherConfig) -> Self {
        let initial_level = config.building.initial_level;
        Building {
            shared: Mutex::new(SharedState::new(initial_level)),
            board: StatusBoard::new(initial_level),
            timing: config.timing,
        }
    }

    pub fn publish(&self, id: usize, cabin: &Cabin) {
        self.board.publish(id, cabin.current_level, cabin.state);
    }
}
