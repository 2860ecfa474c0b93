//! Puzzle shapes: which slots hold corners and which hold edges
//!
//! This module owns the precomputed shape table, the slot-to-cluster
//! decomposition, random completion of partial shapes, and the rotation
//! admissibility rule derived from a shape.

pub mod cluster;
pub mod completer;
pub mod error;
pub mod rotation;
pub mod slot;
pub mod table;

pub use cluster::{Cluster, ClusterKind, ClusterSet};
pub use completer::{resolve_shape, ResolvedShape};
pub use error::ShapeError;
pub use rotation::admissible_rotations;
pub use slot::{Layer, Occupancy, SlotKind};
pub use table::ShapeTable;
