//! Square-1 scramble states from partial layer descriptions
//!
//! Each layer is described by twelve placeholders: hex digits pin a piece
//! identity and the letters `R`, `E`, `C`, `W`, `X`, `Y`, `Z` leave a slot
//! open to a family of pieces. The generator completes the shape, assigns
//! identities under a parity requirement, and applies the requested
//! equator, face relabel and layer rotation.
//!
//! # Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use square1_scrambler::{generate, GeneratorConfig};
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let scramble = generate(&GeneratorConfig::default(), &mut rng).unwrap();
//! assert_eq!(scramble.state.len(), 25);
//! assert_eq!(&scramble.state[12..13], "/");
//! ```

pub mod assign;
pub mod config;
pub mod error;
pub mod parser;
pub mod piece;
pub mod shape;
pub mod state;
pub mod transform;

pub use assign::{AssignError, Clock, MonotonicClock, ParityMode, ParityReport};
pub use config::{ConfigError, GeneratorConfig};
pub use error::ParseError;
pub use piece::{ConstraintMap, Piece, PieceSet};
pub use shape::{ShapeError, ShapeTable};
pub use state::{ScrambleState, StateError};
pub use transform::{FaceTurn, TransformError};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use assign::PieceAssigner;
use parser::parse_layers;
use shape::cluster::merge_constraints;
use shape::{resolve_shape, ClusterSet, Layer};

/// Errors that can occur during generation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("assignment error: {0}")]
    Assign(#[from] AssignError),

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl GenerateError {
    /// Render the error for a terminal. Parse errors point at the offending
    /// placeholder in `top` + `bottom`.
    pub fn format(&self, top: &str, bottom: &str) -> String {
        match self {
            GenerateError::Parse(e) => e.format(&format!("{}{}", top, bottom), "layers"),
            other => format!("Error: {}", other),
        }
    }
}

/// One generated scramble with the choices that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scramble {
    /// Final 25-character state
    pub state: String,
    /// State after piece assignment, before any transform
    pub base_state: String,
    pub equator: char,
    pub auf: String,
    pub adf: String,
    pub rul: i8,
    pub rdl: i8,
    /// Index of the final shape in the [`ShapeTable`]
    pub shape_index: usize,
    /// Parity mode the assignment satisfied
    pub parity: ParityMode,
}

/// Generate one scramble, timing the solver with the system monotonic clock
pub fn generate<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Scramble, GenerateError> {
    generate_with_clock(config, rng, &MonotonicClock::default())
}

/// Generate one scramble, timing the solver with `clock`
pub fn generate_with_clock<R, C>(
    config: &GeneratorConfig,
    rng: &mut R,
    clock: &C,
) -> Result<Scramble, GenerateError>
where
    R: Rng + ?Sized,
    C: Clock + ?Sized,
{
    // Malformed layer text is reported before anything else
    let parsed = parse_layers(&config.top_layer, &config.bottom_layer)?;
    config.validate()?;
    log::debug!("parsed occupancy {}", parsed.occupancy);

    let constraints = merge_constraints(parsed.constraints, &config.constraints);

    let shape = resolve_shape(&parsed.occupancy, &constraints, ShapeTable::global(), rng)?;
    log::debug!("using shape {} ({})", shape.index, shape.occupancy);

    let clusters = ClusterSet::build(&shape.occupancy)?;
    let assigner = PieceAssigner::new(
        &clusters,
        &constraints,
        &parsed.placeholders,
        config.budget,
        clock,
    );
    let assignment = assigner.assign(&config.parity, rng)?;

    let mut state = ScrambleState::from_assignment(&clusters, &assignment.pieces)?;
    let base_state = state.to_string();

    let applied = config.pipeline().apply(&mut state, &shape.occupancy, rng)?;

    Ok(Scramble {
        state: state.to_string(),
        base_state,
        equator: applied.equator,
        auf: applied.auf.code(Layer::Top),
        adf: applied.adf.code(Layer::Bottom),
        rul: applied.rul,
        rdl: applied.rdl,
        shape_index: shape.index,
        parity: assignment.mode,
    })
}

/// Generate `count` scrambles in parallel.
///
/// Scramble `i` is drawn from a ChaCha8 generator seeded with
/// `seed.wrapping_add(i)`, so the batch does not depend on thread scheduling.
/// Results keep index order; the first failure fails the batch.
pub fn generate_batch(
    config: &GeneratorConfig,
    count: usize,
    seed: u64,
) -> Result<Vec<Scramble>, GenerateError> {
    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
            generate(config, &mut rng)
        })
        .collect()
}
