//! The 25-character puzzle state string
//!
//! Twelve top-layer digits, one divider, twelve bottom-layer digits. A corner
//! fills two adjacent slots, so each odd digit appears twice and each even
//! digit once.

use std::fmt;

use thiserror::Error;

use crate::assign::ParityReport;
use crate::piece::{Piece, PieceSet};
use crate::shape::slot::{Layer, Occupancy, SlotKind, LAYER_SLOTS, SLOT_COUNT};
use crate::shape::ClusterSet;

/// Length of a state string
pub const STATE_LEN: usize = SLOT_COUNT + 1;

/// Divider used before an equator is chosen
pub const DEFAULT_DIVIDER: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state must have {STATE_LEN} characters, found {0}")]
    Length(usize),

    #[error("invalid piece '{ch}' at position {position}")]
    InvalidPiece { ch: char, position: usize },

    #[error("piece '{piece}' appears {count} times, expected {expected}")]
    PieceCount {
        piece: Piece,
        count: usize,
        expected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrambleState {
    slots: [Piece; SLOT_COUNT],
    divider: char,
}

impl ScrambleState {
    /// Lay an assignment (one piece per cluster) out over the slots
    pub fn from_assignment(clusters: &ClusterSet, pieces: &[Piece]) -> Result<Self, StateError> {
        let slots: Vec<Piece> = clusters
            .iter()
            .zip(pieces)
            .flat_map(|(cluster, piece)| cluster.slots().map(move |_| *piece))
            .collect();
        Self::from_slots(&slots, DEFAULT_DIVIDER)
    }

    fn from_slots(slots: &[Piece], divider: char) -> Result<Self, StateError> {
        let slots: [Piece; SLOT_COUNT] = slots
            .try_into()
            .map_err(|_| StateError::Length(slots.len() + 1))?;
        let state = Self { slots, divider };
        state.check_counts()?;
        Ok(state)
    }

    /// Parse and validate a state string
    pub fn parse(text: &str) -> Result<Self, StateError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != STATE_LEN {
            return Err(StateError::Length(chars.len()));
        }
        let slots = chars
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != LAYER_SLOTS)
            .map(|(position, ch)| {
                Piece::from_char(*ch).ok_or(StateError::InvalidPiece { ch: *ch, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_slots(&slots, chars[LAYER_SLOTS])
    }

    fn check_counts(&self) -> Result<(), StateError> {
        for piece in PieceSet::ALL.iter() {
            let count = self.slots.iter().filter(|p| **p == piece).count();
            let expected = if piece.is_corner() { 2 } else { 1 };
            if count != expected {
                return Err(StateError::PieceCount {
                    piece,
                    count,
                    expected,
                });
            }
        }
        Ok(())
    }

    pub fn divider(&self) -> char {
        self.divider
    }

    pub fn set_divider(&mut self, divider: char) {
        self.divider = divider;
    }

    /// Pieces of one layer, slot by slot
    pub fn layer(&self, layer: Layer) -> &[Piece] {
        &self.slots[layer.slots()]
    }

    /// All 24 slots, top layer first
    pub fn slots(&self) -> &[Piece; SLOT_COUNT] {
        &self.slots
    }

    /// Identities in the order they first appear
    pub fn identity_order(&self) -> Vec<Piece> {
        let mut seen = PieceSet::EMPTY;
        let mut order = Vec::with_capacity(16);
        for piece in self.slots {
            if !seen.contains(piece) {
                seen = seen.with(piece);
                order.push(piece);
            }
        }
        order
    }

    pub fn parity(&self) -> ParityReport {
        ParityReport::of(&self.identity_order())
    }

    /// Shape implied by the digits: odd digits are corner halves
    pub fn occupancy(&self) -> Occupancy {
        let mut occupancy = Occupancy::unknown();
        for (slot, piece) in self.slots.iter().enumerate() {
            let kind = if piece.is_corner() {
                SlotKind::CornerHalf
            } else {
                SlotKind::Edge
            };
            occupancy.set(slot, kind);
        }
        occupancy
    }

    /// Replace every piece through `relabel`
    pub fn map_pieces(&mut self, relabel: impl Fn(Piece) -> Piece) {
        for piece in self.slots.iter_mut() {
            *piece = relabel(*piece);
        }
    }

    /// Rotate each layer left by the given number of slots
    pub fn rotate_layers(&mut self, top: usize, bottom: usize) {
        self.slots[Layer::Top.slots()].rotate_left(top % LAYER_SLOTS);
        self.slots[Layer::Bottom.slots()].rotate_left(bottom % LAYER_SLOTS);
    }
}

impl fmt::Display for ScrambleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in self.layer(Layer::Top) {
            write!(f, "{}", piece)?;
        }
        write!(f, "{}", self.divider)?;
        for piece in self.layer(Layer::Bottom) {
            write!(f, "{}", piece)?;
        }
        Ok(())
    }
}
