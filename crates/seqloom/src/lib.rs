//! Coordination-free sequence generation.
//!
//! - [`BitPackedGenerator`] packs a millisecond timestamp, two site
//!   identifiers and a per-millisecond counter into one `u64`.
//! - [`OdometerGenerator`] counts through fixed-width codes over a custom
//!   alphabet, restarting every millisecond.
//! - [`SequenceComposer`] joins the values of several [`SequenceSource`]s
//!   with a separator, filling [`Slot::Placeholder`] entries at call time.
//!
//! Both generators can be reconfigured while in use through a
//! [`Reconstructor`].

mod composer;
mod error;
mod generator;
#[cfg(test)]
mod mock;
mod mono_clock;
mod source;
mod status;
mod time;

pub use crate::composer::*;
pub use crate::error::*;
pub use crate::generator::{
    BitPackedGenerator, MAX_LAYOUT_BITS, OdometerConfig, OdometerGenerator, PackedConfig,
    PackedLayout, PackedParts, Reconfigurable, Reconstructor, Seq,
};
pub use crate::mono_clock::*;
pub use crate::source::*;
pub use crate::status::*;
pub use crate::time::*;
