use std::error::Error;
use std::io::{self, BufRead};

use shared_resources::config::DispatcherConfig;

pub mod cabin;
pub mod debug;
pub mod dispatcher;

use dispatcher::Dispatcher;

/// Reads commands from stdin until `quit` or end of input.
pub fn run() -> Result<(), Box<dyn Error>> {
    // READ CONFIGURATION
    let config = DispatcherConfig::get()?;

    // START CABIN LOOPS
    let mut dispatcher = Dispatcher::start(config)?;
    println!("Dispatcher started, type `help` for the list of commands");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue
        }
        if !dispatcher.exec_command(&line, &mut stdout) {
            return Ok(())
        }
    }

    println!("End of input, stopping cabins...");
    dispatcher.shutdown();
    Ok(())
}
