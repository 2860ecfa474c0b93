//! Post-assignment transforms that keep the state physically reachable.
//!
//! Three steps run in a fixed order on the assigned state:
//! 1. **Equator**: pick the divider character written between the layers
//! 2. **Face relabel**: shift the `0`-`7` group by an up-face turn code and
//!    the `8`-`f` group by a down-face turn code. The groups are disjoint, so
//!    the two shifts never interact
//! 3. **Layer rotation**: rotate each layer by an amount drawn from the
//!    requested candidates that are admissible for the final shape
//!
//! ## Turn codes
//!
//! | Up  | Down | Shift |
//! |-----|------|-------|
//! | U0  | D0   | 0     |
//! | U   | D    | 2     |
//! | U2  | D2   | 4     |
//! | U'  | D'   | 6     |

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::piece::Piece;
use crate::shape::rotation::{admissible_rotations, normalize_rotation};
use crate::shape::{Layer, Occupancy};
use crate::state::{ScrambleState, DEFAULT_DIVIDER};

/// A face relabel amount, in quarter turns of a piece group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceTurn {
    Zero,
    Quarter,
    Half,
    Inverse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {layer} turn code '{code}'")]
pub struct UnknownTurn {
    pub layer: Layer,
    pub code: String,
}

impl FaceTurn {
    pub const ALL: [FaceTurn; 4] = [
        FaceTurn::Zero,
        FaceTurn::Quarter,
        FaceTurn::Half,
        FaceTurn::Inverse,
    ];

    /// Amount added to each identity of the group, modulo 8
    pub fn shift(self) -> u8 {
        match self {
            FaceTurn::Zero => 0,
            FaceTurn::Quarter => 2,
            FaceTurn::Half => 4,
            FaceTurn::Inverse => 6,
        }
    }

    /// Code for this turn on a layer, e.g. `U2` or `D'`
    pub fn code(self, layer: Layer) -> String {
        let face = match layer {
            Layer::Top => 'U',
            Layer::Bottom => 'D',
        };
        let suffix = match self {
            FaceTurn::Zero => "0",
            FaceTurn::Quarter => "",
            FaceTurn::Half => "2",
            FaceTurn::Inverse => "'",
        };
        format!("{}{}", face, suffix)
    }

    /// Parse a code for the given layer (`U*` for top, `D*` for bottom)
    pub fn parse(layer: Layer, code: &str) -> Result<Self, UnknownTurn> {
        FaceTurn::ALL
            .into_iter()
            .find(|turn| turn.code(layer) == code)
            .ok_or_else(|| UnknownTurn {
                layer,
                code: code.to_string(),
            })
    }
}

/// Relabel one piece by the up and down group shifts
pub fn relabel_piece(piece: Piece, up: FaceTurn, down: FaceTurn) -> Piece {
    let value = piece.value();
    let shifted = if piece.is_top_group() {
        (value + up.shift()) % 8
    } else {
        (value - 8 + down.shift()) % 8 + 8
    };
    Piece::new(shifted).unwrap_or(piece)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("no admissible {layer} rotation among {requested:?} (admissible: {admissible:?})")]
    NoValidRotation {
        layer: Layer,
        requested: Vec<i8>,
        admissible: Vec<i8>,
    },
}

/// Choices made by one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedTransforms {
    pub equator: char,
    pub auf: FaceTurn,
    pub adf: FaceTurn,
    pub rul: i8,
    pub rdl: i8,
}

impl fmt::Display for AppliedTransforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "equator {} {} {} RUL {} RDL {}",
            self.equator,
            self.auf.code(Layer::Top),
            self.adf.code(Layer::Bottom),
            self.rul,
            self.rdl
        )
    }
}

/// Candidate lists the pipeline draws from. Empty lists mean the identity choice.
#[derive(Debug, Clone, Copy)]
pub struct TransformPipeline<'a> {
    pub equators: &'a [char],
    pub auf: &'a [FaceTurn],
    pub adf: &'a [FaceTurn],
    pub rul: &'a [i8],
    pub rdl: &'a [i8],
}

impl<'a> TransformPipeline<'a> {
    /// Run equator, relabel and rotation in order. `shape` is the final shape of `state`.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        state: &mut ScrambleState,
        shape: &Occupancy,
        rng: &mut R,
    ) -> Result<AppliedTransforms, TransformError> {
        let equator = self.equators.choose(rng).copied().unwrap_or(DEFAULT_DIVIDER);
        state.set_divider(equator);

        let auf = self.auf.choose(rng).copied().unwrap_or(FaceTurn::Zero);
        let adf = self.adf.choose(rng).copied().unwrap_or(FaceTurn::Zero);
        state.map_pieces(|piece| relabel_piece(piece, auf, adf));

        let rul = choose_rotation(self.rul, shape, Layer::Top, rng)?;
        let rdl = choose_rotation(self.rdl, shape, Layer::Bottom, rng)?;
        state.rotate_layers(normalize_rotation(rul), normalize_rotation(rdl));

        let applied = AppliedTransforms {
            equator,
            auf,
            adf,
            rul,
            rdl,
        };
        log::debug!("applied {}", applied);
        Ok(applied)
    }
}

fn choose_rotation<R: Rng + ?Sized>(
    requested: &[i8],
    shape: &Occupancy,
    layer: Layer,
    rng: &mut R,
) -> Result<i8, TransformError> {
    let requested = if requested.is_empty() { &[0][..] } else { requested };
    let admissible = admissible_rotations(shape, layer);
    let allowed: Vec<i8> = requested
        .iter()
        .copied()
        .filter(|r| admissible.contains(r))
        .collect();
    allowed.choose(rng).copied().ok_or_else(|| TransformError::NoValidRotation {
        layer,
        requested: requested.to_vec(),
        admissible,
    })
}
