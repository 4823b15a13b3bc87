/// ----- CABIN MODULE -----
/// Run loop of a single cabin. It drains the cabin's itinerary one step at
/// a time, releasing the building lock while a step's pacing delay runs,
/// and looks for new work (interior buttons, then the wait list) whenever
/// the itinerary runs out. The loop stops when its stop channel closes.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{select, Receiver, RecvTimeoutError, TryRecvError};
use log::{debug, info};
use parking_lot::MutexGuard;

use shared_resources::cabin_state::CabinState;
use shared_resources::config::Timing;

use crate::utilities::building::{Building, Finish};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Signals the dispatcher sends to a running cabin loop.
#[derive(Debug)]
pub struct CabinSignals {
    /// Closed by the dispatcher to stop the loop.
    pub stop_rx: Receiver<()>,
    /// Cuts a running idle-open period short (door close button).
    pub hurry_rx: Receiver<()>,
}

impl CabinSignals {
    fn stopped(&self) -> bool {
        matches!(self.stop_rx.try_recv(), Ok(()) | Err(TryRecvError::Disconnected))
    }

    fn wait(&self, duration: Duration) -> Flow {
        match self.stop_rx.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => Flow::Continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => Flow::Stop,
        }
    }

    fn pace(&self, step: CabinState, timing: &Timing) -> Flow {
        let duration = match timing.duration(step) {
            Some(duration) => duration,
            None => return Flow::Continue,
        };
        if step != CabinState::IdleOpen {
            return self.wait(duration)
        }
        select! {
            recv(self.stop_rx) -> _ => Flow::Stop,
            // select! picks at random when both are ready
            recv(self.hurry_rx) -> _ => {
                if self.stopped() { Flow::Stop } else { Flow::Continue }
            },
            default(duration) => Flow::Continue,
        }
    }

    fn forget_hurry(&self) {
        self.hurry_rx.try_iter().for_each(drop);
    }
}

pub fn main(id: usize, building: Arc<Building>, signals: CabinSignals) {
    info!("Cabin {} started", id);

    loop {
        if signals.stopped() {
            break
        }

        let mut shared = building.shared.lock();
        if shared.cabins[id].task_queue.is_empty() {
            if let Some(target) = shared.plan_next_trip(id) {
                info!("Cabin {} leaves level {} for level {}", id, shared.cabins[id].current_level, target);
                continue
            }
            drop(shared);
            if signals.wait(building.timing.idle_poll) == Flow::Stop {
                break
            }
            continue
        }

        let mut last_step = None;
        while let Some(step) = shared.cabins[id].task_queue.pop_front() {
            let cabin = &mut shared.cabins[id];
            cabin.state = step;
            debug!("Cabin {} (currently on level {}) was assigned state {}", id, cabin.current_level, step);
            building.publish(id, cabin);
            // a close request only counts once this idle-open step has begun
            signals.forget_hurry();

            if MutexGuard::unlocked(&mut shared, || signals.pace(step, &building.timing)) == Flow::Stop {
                info!("Cabin {} stopped during {}", id, step);
                return
            }

            let cabin = &mut shared.cabins[id];
            cabin.complete_step(step);
            building.publish(id, cabin);
            last_step = Some(step);
        }

        if last_step == Some(CabinState::ClosingDoors) {
            match shared.finish_itinerary(id) {
                Finish::Chained(target) => {
                    info!("Cabin {} continues from level {} to level {}", id, shared.cabins[id].current_level, target);
                },
                Finish::Idle => {
                    info!("Cabin {} is idle on level {}", id, shared.cabins[id].current_level);
                    building.publish(id, &shared.cabins[id]);
                },
            }
        }
    }

    info!("Cabin {} stopped", id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    use crossbeam_channel::unbounded;
    use shared_resources::config::{BuildingConfig, DispatcherConfig};
    use shared_resources::level::Level;

    fn building(step: Duration) -> Arc<Building> {
        Arc::new(Building::new(&DispatcherConfig {
            building: BuildingConfig { initial_level: Level::MIN },
            timing: Timing::uniform(step, Duration::from_millis(2)),
        }))
    }

    fn wait_for(condition: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn stop_wins_over_a_pending_hurry() {
        let (stop_tx, stop_rx) = unbounded();
        let (hurry_tx, hurry_rx) = unbounded();
        let signals = CabinSignals { stop_rx, hurry_rx };
        let timing = Timing::uniform(Duration::from_secs(30), Duration::from_millis(2));

        for _ in 0..32 {
            hurry_tx.send(()).unwrap();
        }
        drop(stop_tx);
        for _ in 0..32 {
            assert_eq!(signals.pace(CabinState::IdleOpen, &timing), Flow::Stop);
        }
    }

    #[test]
    fn runs_an_itinerary_and_goes_idle() {
        let building = building(Duration::from_millis(5));
        let (stop_tx, stop_rx) = unbounded();
        let (_hurry_tx, hurry_rx) = unbounded();
        building.shared.lock().assign(Level::new(4).unwrap());

        let handle = {
            let building = Arc::clone(&building);
            thread::spawn(move || main(0, building, CabinSignals { stop_rx, hurry_rx }))
        };

        assert!(wait_for(|| {
            let shared = building.shared.lock();
            shared.cabins[0].state == CabinState::IdleClosed && shared.cabins[0].current_level.get() == 4
        }));
        let row = building.board.row(Level::new(9).unwrap());
        assert_eq!(row.cabins[0].level.get(), 4);
        assert_eq!(row.cabins[0].state, CabinState::IdleClosed);

        drop(stop_tx);
        handle.join().unwrap();
    }

    #[test]
    fn closing_the_stop_channel_ends_a_long_step() {
        let building = building(Duration::from_secs(60));
        let (stop_tx, stop_rx) = unbounded();
        let (_hurry_tx, hurry_rx) = unbounded();
        building.shared.lock().assign(Level::new(2).unwrap());

        let handle = {
            let building = Arc::clone(&building);
            thread::spawn(move || main(0, building, CabinSignals { stop_rx, hurry_rx }))
        };
        assert!(wait_for(|| building.shared.lock().cabins[0].state == CabinState::MovingUp));

        let started = Instant::now();
        drop(stop_tx);
        handle.join().unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(building.shared.lock().cabins[0].current_level, Level::MIN);
    }
}
