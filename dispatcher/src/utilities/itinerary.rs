/// ----- ITINERARY -----
/// Ordered steps a cabin still has to execute. Every trip ends with the
/// door service suffix, so a non-empty itinerary always ends in
/// `ClosingDoors`. Door buttons rewrite the head of the itinerary through
/// the operations below instead of splicing the queue directly.

use std::collections::VecDeque;

use shared_resources::cabin_state::CabinState;
use shared_resources::direction::Direction;
use shared_resources::level::Level;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Itinerary {
    steps: VecDeque<CabinState>,
}

impl Itinerary {
    pub fn new() -> Self {
        Itinerary { steps: VecDeque::new() }
    }

    /// One movement step per level between `from` and `to`, then the door suffix.
    pub fn trip(from: Level, to: Level) -> Self {
        let distance = from.distance_to(to);
        let mut steps: VecDeque<CabinState> = Direction::towards(distance)
            .to_state()
            .map(|movement| std::iter::repeat(movement).take(distance.unsigned_abs() as usize).collect())
            .unwrap_or_default();
        steps.extend(CabinState::SERVICE_SUFFIX);
        Itinerary { steps }
    }

    pub fn append(&mut self, other: Itinerary) {
        self.steps.extend(other.steps);
    }

    pub fn pop_front(&mut self) -> Option<CabinState> {
        self.steps.pop_front()
    }

    pub fn front(&self) -> Option<CabinState> {
        self.steps.front().copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> impl Iterator<Item = CabinState> + '_ {
        self.steps.iter().copied()
    }

    pub fn ends_closed(&self) -> bool {
        matches!(self.steps.back(), None | Some(CabinState::ClosingDoors))
    }

    /// Open the doors again before anything else queued.
    pub fn reopen_doors(&mut self) {
        for step in CabinState::SERVICE_SUFFIX.iter().rev() {
            self.steps.push_front(*step);
        }
    }

    /// Keep the doors open for one more idle period before the pending close.
    pub fn hold_doors_open(&mut self) {
        self.steps.push_front(CabinState::IdleOpen);
    }

    /// Drops the open-door holds at the head so the next step closes the doors.
    pub fn release_door_holds(&mut self) -> usize {
        let mut released = 0;
        while self.front() == Some(CabinState::IdleOpen) {
            self.steps.pop_front();
            released += 1;
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CabinState::*;

    fn level(num: u8) -> Level {
        Level::new(num).unwrap()
    }

    fn steps(itinerary: &Itinerary) -> Vec<CabinState> {
        itinerary.steps().collect()
    }

    #[test]
    fn trip_up_moves_once_per_level_then_serves_doors() {
        let itinerary = Itinerary::trip(level(1), level(3));
        assert_eq!(steps(&itinerary), vec![MovingUp, MovingUp, OpeningDoors, IdleOpen, ClosingDoors]);
        assert!(itinerary.ends_closed());
    }

    #[test]
    fn trip_down_uses_downward_steps() {
        let itinerary = Itinerary::trip(level(5), level(3));
        assert_eq!(steps(&itinerary), vec![MovingDown, MovingDown, OpeningDoors, IdleOpen, ClosingDoors]);
    }

    #[test]
    fn zero_distance_trip_still_serves_doors() {
        assert_eq!(steps(&Itinerary::trip(level(7), level(7))), CabinState::SERVICE_SUFFIX.to_vec());
    }

    #[test]
    fn appended_trips_keep_order() {
        let mut itinerary = Itinerary::trip(level(1), level(2));
        itinerary.append(Itinerary::trip(level(2), level(1)));
        assert_eq!(
            steps(&itinerary),
            vec![MovingUp, OpeningDoors, IdleOpen, ClosingDoors, MovingDown, OpeningDoors, IdleOpen, ClosingDoors],
        );
    }

    #[test]
    fn reopening_keeps_itinerary_ending_closed() {
        let mut itinerary = Itinerary::new();
        itinerary.reopen_doors();
        assert_eq!(steps(&itinerary), CabinState::SERVICE_SUFFIX.to_vec());

        let mut itinerary = Itinerary::trip(level(2), level(4));
        itinerary.reopen_doors();
        assert_eq!(itinerary.front(), Some(OpeningDoors));
        assert_eq!(itinerary.len(), 8);
        assert!(itinerary.ends_closed());
    }

    #[test]
    fn released_holds_leave_closing_next() {
        let mut itinerary = Itinerary::new();
        itinerary.append(Itinerary::trip(level(3), level(3)));
        itinerary.pop_front();
        itinerary.pop_front();
        itinerary.hold_doors_open();
        itinerary.hold_doors_open();
        assert_eq!(steps(&itinerary), vec![IdleOpen, IdleOpen, ClosingDoors]);
        assert_eq!(itinerary.release_door_holds(), 2);
        assert_eq!(steps(&itinerary), vec![ClosingDoors]);
        assert_eq!(itinerary.release_door_holds(), 0);
    }
}
