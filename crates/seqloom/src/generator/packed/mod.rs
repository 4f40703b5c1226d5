mod config;
mod generator;

pub use config::*;
pub use generator::*;
