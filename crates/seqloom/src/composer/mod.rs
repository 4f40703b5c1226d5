mod compose;
mod slot;
#[cfg(test)]
mod tests;

pub use compose::*;
pub use slot::*;
