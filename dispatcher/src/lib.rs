pub mod modules;
pub mod utilities;
