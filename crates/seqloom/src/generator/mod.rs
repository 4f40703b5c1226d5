mod lock;
mod odometer;
mod packed;
mod reconstructor;

pub(crate) use lock::*;
pub use odometer::*;
pub use packed::*;
pub use reconstructor::*;
