pub mod cabin_state;
pub mod config;
pub mod direction;
pub mod level;
