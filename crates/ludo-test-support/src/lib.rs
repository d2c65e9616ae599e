//! Shared test doubles for the Ludo room server.

mod clock;
mod rng;

pub use clock::FixedClock;
pub use rng::{MockRng, SequenceRng};
