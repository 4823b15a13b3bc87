use std::process;

use env_logger::Env;
use log::error;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(err) = dispatcher::modules::run() {
        error!("Dispatcher failed: {}", err);
        process::exit(1);
    }
}
