//! Errors raised while resolving a shape

use thiserror::Error;

use super::slot::Occupancy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// Occupancy does not split into 8 corners and 8 edges
    #[error("occupancy {occupancy} splits into {corners} corners and {edges} edges, expected 8 and 8")]
    Cluster {
        occupancy: Occupancy,
        corners: usize,
        edges: usize,
    },

    /// Fully specified occupancy that is not a known shape
    #[error("occupancy {occupancy} is not a valid shape")]
    UnknownShape { occupancy: Occupancy },

    /// No table shape agrees with the partial occupancy and locked labels
    #[error("no shape matches {occupancy}{}", format_locked(.locked))]
    NoMatchingShape {
        occupancy: Occupancy,
        locked: Vec<String>,
    },
}

fn format_locked(locked: &[String]) -> String {
    if locked.is_empty() {
        String::new()
    } else {
        format!(" with corners locked at {}", locked.join(", "))
    }
}

impl ShapeError {
    /// The occupancy the error refers to
    pub fn occupancy(&self) -> &Occupancy {
        match self {
            Self::Cluster { occupancy, .. }
            | Self::UnknownShape { occupancy }
            | Self::NoMatchingShape { occupancy, .. } => occupancy,
        }
    }
}
