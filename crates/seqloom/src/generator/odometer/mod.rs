mod config;
mod generator;
mod seq;
#[cfg(test)]
mod tests;

pub use config::*;
pub use generator::*;
pub use seq::*;
