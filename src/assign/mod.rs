//! Assigning piece identities to the clusters of a shape

pub mod clock;
pub mod parity;
pub mod solver;

pub use clock::{Clock, MonotonicClock, SteppingClock};
pub use parity::{ParityMode, ParityReport};
pub use solver::{AssignError, Assignment, PieceAssigner, DEFAULT_BUDGET};
