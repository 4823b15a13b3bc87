/// ----- DISPATCHER MODULE -----
/// Single entry point for every external command. Owns the building
/// coordinator and one worker thread per cabin, runs the assignment policy
/// under the building lock and turns command lines into calls on the
/// typed API below.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};
use log::{error, info, warn};

use shared_resources::config::{DispatcherConfig, NUM_CABINS};
use shared_resources::level::Level;

use crate::modules::cabin::{self, CabinSignals};
use crate::modules::debug;
use crate::utilities::building::{Assignment, Building};
use crate::utilities::cabin_status::{Cabin, DoorResponse};
use crate::utilities::command::{BoardFormat, CabinButton, Command, LevelAction, HELP_TEXT};
use crate::utilities::status_board::StatusRow;

struct Worker {
    stop_tx: Option<Sender<()>>,
    hurry_tx: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

pub struct Dispatcher {
    building: Arc<Building>,
    workers: Vec<Worker>,
}

impl Dispatcher {
    /// Creates the building and starts one run loop per cabin.
    pub fn start(config: DispatcherConfig) -> io::Result<Self> {
        let building = Arc::new(Building::new(&config));
        let mut dispatcher = Dispatcher { building, workers: Vec::with_capacity(NUM_CABINS) };

        for id in 0..NUM_CABINS {
            let (stop_tx, stop_rx) = unbounded();
            let (hurry_tx, hurry_rx) = unbounded();
            let building = Arc::clone(&dispatcher.building);
            let handle = thread::Builder::new()
                .name(format!("cabin_{}", id))
                .spawn(move || cabin::main(id, building, CabinSignals { stop_rx, hurry_rx }))?;
            dispatcher.workers.push(Worker { stop_tx: Some(stop_tx), hurry_tx, handle: Some(handle) });
        }

        info!(
            "Dispatcher started with {} cabins on level {}",
            NUM_CABINS,
            config.building.initial_level,
        );
        Ok(dispatcher)
    }

    pub fn assign(&self, level: Level) -> Assignment {
        let assignment = self.building.shared.lock().assign(level);
        match assignment {
            Assignment::Cabin(id) => info!("Call from level {} assigned to cabin {}", level, id),
            Assignment::Deferred { position } => {
                info!("Both cabins busy, call from level {} waits at position {}", level, position)
            },
        }
        assignment
    }

    pub fn press_level_button(&self, cabin: usize, level: Level) -> bool {
        self.building.shared.lock().cabins[cabin].press_level_button(level)
    }

    pub fn press_door_open(&self, cabin: usize) -> DoorResponse {
        self.building.shared.lock().cabins[cabin].press_door_open()
    }

    pub fn press_door_close(&self, cabin: usize) -> DoorResponse {
        let mut shared = self.building.shared.lock();
        let response = shared.cabins[cabin].press_door_close();
        if response == DoorResponse::Closing {
            // sent under the lock so the cabin is still in its idle-open step
            if self.workers[cabin].hurry_tx.send(()).is_err() {
                warn!("Cabin {} is not running, doors close on schedule", cabin);
            }
        }
        response
    }

    pub fn status(&self, level: Level) -> StatusRow {
        self.building.board.row(level)
    }

    pub fn board(&self) -> Vec<StatusRow> {
        self.building.board.rows()
    }

    pub fn cabin(&self, id: usize) -> Cabin {
        self.building.shared.lock().cabins[id].clone()
    }

    pub fn deferred(&self) -> Vec<Level> {
        self.building.shared.lock().wait_list.to_vec()
    }

    /// Runs one command line, writing any feedback to `out`.
    /// Returns false once the dispatcher has been told to quit.
    pub fn exec_command<W: Write>(&mut self, line: &str, out: &mut W) -> bool {
        let result = match Command::parse(line) {
            Ok(command) => self.execute(command, out),
            Err(err) => {
                warn!("Rejected command {:?}: {}", line, err);
                writeln!(out, "{}", err).map(|_| true)
            },
        };
        result.unwrap_or_else(|err| {
            error!("Could not write command output: {}", err);
            true
        })
    }

    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<bool> {
        match command {
            Command::Level { level, action: LevelAction::Call } => {
                writeln!(out, "Elevator was called from level {}", level)?;
                match self.assign(level) {
                    Assignment::Cabin(id) => writeln!(out, "Cabin {} is on its way", id)?,
                    Assignment::Deferred { position } => {
                        writeln!(out, "All cabins are busy, the call is number {} in the wait list", position)?
                    },
                }
            },
            Command::Level { level, action: LevelAction::Status } => {
                writeln!(out, "{}", self.status(level))?;
            },
            Command::Cabin { cabin, button } => self.press_button(cabin, button, out)?,
            Command::Board(BoardFormat::Table) => debug::print_board(out, &self.board())?,
            Command::Board(BoardFormat::Json) => {
                let json = serde_json::to_string_pretty(&self.board())
                    .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
                writeln!(out, "{}", json)?;
            },
            Command::Help => write!(out, "{}", HELP_TEXT)?,
            Command::Quit => {
                self.shutdown();
                writeln!(out, "Both cabins stopped")?;
                return Ok(false)
            },
        }
        Ok(true)
    }

    fn press_button<W: Write>(&self, cabin: usize, button: CabinButton, out: &mut W) -> io::Result<()> {
        match button {
            CabinButton::Level(level) => {
                if self.press_level_button(cabin, level) {
                    writeln!(out, "Cabin {}: level {} pressed", cabin, level)
                } else {
                    writeln!(out, "Cabin {}: level {} is already pressed", cabin, level)
                }
            },
            CabinButton::Open => match self.press_door_open(cabin) {
                DoorResponse::NotApplicable(state) => {
                    writeln!(out, "Cabin {}: doors cannot open while {}", cabin, state)
                },
                response => writeln!(out, "Cabin {}: doors {}", cabin, describe(response)),
            },
            CabinButton::Close => match self.press_door_close(cabin) {
                DoorResponse::NotApplicable(state) => {
                    writeln!(out, "Cabin {}: doors can only be closed early while IDLE_OPEN, not {}", cabin, state)
                },
                response => writeln!(out, "Cabin {}: doors {}", cabin, describe(response)),
            },
            CabinButton::CallDispatcher => {
                info!("Cabin {} called the dispatcher", cabin);
                writeln!(out, "Congrats! You can now talk to the dispatcher!")
            },
        }
    }

    /// Closes every stop channel and waits for the cabin loops to finish.
    /// Calling it again is a no-op.
    pub fn shutdown(&mut self) {
        for worker in self.workers.iter_mut() {
            worker.stop_tx.take();
        }
        for (id, worker) in self.workers.iter_mut().enumerate() {
            if let Some(handle) = worker.handle.take() {
                match handle.join() {
                    Ok(()) => info!("Cabin {} joined", id),
                    Err(_) => error!("Cabin {} panicked", id),
                }
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn describe(response: DoorResponse) -> &'static str {
    match response {
        DoorResponse::Opening => "opening",
        DoorResponse::Reopening => "reopening",
        DoorResponse::HeldOpen => "held open",
        DoorResponse::AlreadyOpening => "already opening",
        DoorResponse::Closing => "closing",
        DoorResponse::NotApplicable(_) => "unchanged",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use shared_resources::config::{BuildingConfig, Timing};

    fn slow_dispatcher() -> Dispatcher {
        Dispatcher::start(DispatcherConfig {
            building: BuildingConfig { initial_level: Level::MIN },
            timing: Timing::uniform(Duration::from_secs(30), Duration::from_millis(5)),
        })
        .unwrap()
    }

    fn run(dispatcher: &mut Dispatcher, line: &str) -> (bool, String) {
        let mut out = Vec::new();
        let keep_running = dispatcher.exec_command(line, &mut out);
        (keep_running, String::from_utf8(out).unwrap())
    }

    #[test]
    fn malformed_input_is_reported_and_loop_continues() {
        let mut dispatcher = slow_dispatcher();
        assert_eq!(run(&mut dispatcher, "lift 3"), (true, "Unknown caller: lift\n".to_string()));
        let (keep_running, output) = run(&mut dispatcher, "level 99 --call");
        assert!(keep_running);
        assert!(output.starts_with("Incorrect level parameter: 99"));
        assert!(dispatcher.deferred().is_empty());
        assert!(dispatcher.cabin(0).task_queue.is_empty() && dispatcher.cabin(1).task_queue.is_empty());
    }

    #[test]
    fn call_reports_assignment_and_deferral() {
        let mut dispatcher = slow_dispatcher();
        let (_, first) = run(&mut dispatcher, "level 3 --call");
        assert_eq!(first, "Elevator was called from level 3\nCabin 0 is on its way\n");
        let (_, second) = run(&mut dispatcher, "level 2 --call");
        assert!(second.ends_with("Cabin 1 is on its way\n"));
        let (_, third) = run(&mut dispatcher, "level 4 --call");
        assert!(third.ends_with("the call is number 1 in the wait list\n"));
        assert_eq!(dispatcher.deferred(), vec![Level::new(4).unwrap()]);
    }

    #[test]
    fn level_buttons_are_recorded_once() {
        let mut dispatcher = slow_dispatcher();
        // keep both cabins busy so the buttons stay pending
        run(&mut dispatcher, "level 3 --call");
        run(&mut dispatcher, "level 2 --call");
        let (_, output) = run(&mut dispatcher, "cabin 1 --press-button 3");
        assert_eq!(output, "Cabin 1: level 3 pressed\n");
        let (_, output) = run(&mut dispatcher, "cabin 1 --press-button 3");
        assert_eq!(output, "Cabin 1: level 3 is already pressed\n");
        run(&mut dispatcher, "cabin 1 --press-button 4");
        let levels: Vec<Level> = [3, 4].iter().map(|n| Level::new(*n).unwrap()).collect();
        assert_eq!(dispatcher.cabin(1).pending_buttons, levels);
    }

    #[test]
    fn door_close_is_rejected_unless_doors_are_open() {
        let mut dispatcher = slow_dispatcher();
        let (_, output) = run(&mut dispatcher, "cabin 0 --press-button close");
        assert_eq!(output, "Cabin 0: doors can only be closed early while IDLE_OPEN, not IDLE_CLOSED\n");
    }

    #[test]
    fn call_dispatcher_is_informational() {
        let mut dispatcher = slow_dispatcher();
        let (keep_running, output) = run(&mut dispatcher, "cabin 0 --press-button call-dispatcher");
        assert!(keep_running);
        assert_eq!(output, "Congrats! You can now talk to the dispatcher!\n");
        assert!(dispatcher.cabin(0).task_queue.is_empty());
    }

    #[test]
    fn help_prints_the_static_text() {
        let mut dispatcher = slow_dispatcher();
        assert_eq!(run(&mut dispatcher, "help"), (true, HELP_TEXT.to_string()));
    }

    #[test]
    fn quit_stops_cabins_even_mid_step() {
        let mut dispatcher = slow_dispatcher();
        run(&mut dispatcher, "level 5 --call");
        let (keep_running, output) = run(&mut dispatcher, "quit");
        assert!(!keep_running);
        assert_eq!(output, "Both cabins stopped\n");
        assert!(dispatcher.workers.iter().all(|worker| worker.handle.is_none()));
    }
}
