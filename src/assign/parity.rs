//! Permutation parity of a piece assignment
//!
//! Parity is read from the order in which identities first appear, scanning
//! the top layer then the bottom layer. Each group is compared against its
//! canonical order (`0,2,4,6`, `1,3,5,7`, `8,a,c,e`, `9,b,d,f`, and `0`-`f`
//! for the whole puzzle).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::piece::{Piece, PieceSet, PIECE_COUNT};

/// Requested evenness of the scrambled permutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ParityMode {
    /// Top even, bottom even
    Tnbn,
    /// Top odd, bottom even
    Tpbn,
    /// Top even, bottom odd
    Tnbp,
    /// Top odd, bottom odd
    Tpbp,
    /// Whole permutation even
    On,
    /// Whole permutation odd
    Op,
}

impl ParityMode {
    pub const ALL: [ParityMode; 6] = [
        ParityMode::Tnbn,
        ParityMode::Tpbn,
        ParityMode::Tnbp,
        ParityMode::Tpbp,
        ParityMode::On,
        ParityMode::Op,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParityMode::Tnbn => "tnbn",
            ParityMode::Tpbn => "tpbn",
            ParityMode::Tnbp => "tnbp",
            ParityMode::Tpbp => "tpbp",
            ParityMode::On => "on",
            ParityMode::Op => "op",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parity mode '{0}' (expected one of tnbn, tpbn, tnbp, tpbp, on, op)")]
pub struct UnknownParityMode(pub String);

impl FromStr for ParityMode {
    type Err = UnknownParityMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParityMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| UnknownParityMode(s.to_string()))
    }
}

impl TryFrom<String> for ParityMode {
    type Error = UnknownParityMode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ParityMode> for String {
    fn from(mode: ParityMode) -> Self {
        mode.name().to_string()
    }
}

impl fmt::Display for ParityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parity classification of one assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParityReport {
    pub top_odd: bool,
    pub bottom_odd: bool,
    pub overall_odd: bool,
}

impl ParityReport {
    /// Classify identities given in first-appearance order
    pub fn of(order: &[Piece]) -> Self {
        let group = |set: PieceSet| {
            let observed: Vec<Piece> = order.iter().copied().filter(|p| set.contains(*p)).collect();
            let canonical: Vec<Piece> = set.iter().collect();
            is_odd(&observed, &canonical)
        };
        let all: Vec<Piece> = (0..PIECE_COUNT).filter_map(Piece::new).collect();

        Self {
            top_odd: group(PieceSet::BLACK_EDGES) ^ group(PieceSet::BLACK_CORNERS),
            bottom_odd: group(PieceSet::WHITE_EDGES) ^ group(PieceSet::WHITE_CORNERS),
            overall_odd: is_odd(order, &all),
        }
    }

    pub fn satisfies(&self, mode: ParityMode) -> bool {
        match mode {
            ParityMode::Tnbn => !self.top_odd && !self.bottom_odd,
            ParityMode::Tpbn => self.top_odd && !self.bottom_odd,
            ParityMode::Tnbp => !self.top_odd && self.bottom_odd,
            ParityMode::Tpbp => self.top_odd && self.bottom_odd,
            ParityMode::On => !self.overall_odd,
            ParityMode::Op => self.overall_odd,
        }
    }

    /// Every mode this report satisfies
    pub fn modes(&self) -> Vec<ParityMode> {
        ParityMode::ALL
            .into_iter()
            .filter(|mode| self.satisfies(*mode))
            .collect()
    }
}

/// Whether sorting `observed` into `canonical` order takes an odd number of swaps.
///
/// Pieces missing from `observed` are ignored.
fn is_odd(observed: &[Piece], canonical: &[Piece]) -> bool {
    let positions: Vec<usize> = observed
        .iter()
        .filter_map(|p| canonical.iter().position(|c| c == p))
        .collect();

    // rank within the observed subset, so missing pieces do not leave gaps
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    let perm: Vec<usize> = positions
        .iter()
        .filter_map(|p| sorted.binary_search(p).ok())
        .collect();

    let mut visited = vec![false; perm.len()];
    let mut cycles = 0;
    for start in 0..perm.len() {
        if visited[start] {
            continue;
        }
        cycles += 1;
        let mut i = start;
        while !visited[i] {
            visited[i] = true;
            i = perm[i];
        }
    }
    (perm.len() - cycles) % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(digits: &str) -> Vec<Piece> {
        digits.chars().filter_map(Piece::from_char).collect()
    }

    #[test]
    fn test_solved_order_is_even() {
        let report = ParityReport::of(&pieces("0123456789abcdef"));
        assert!(!report.top_odd);
        assert!(!report.bottom_odd);
        assert!(!report.overall_odd);
        assert_eq!(report.modes(), vec![ParityMode::Tnbn, ParityMode::On]);
    }

    #[test]
    fn test_single_top_swap() {
        let report = ParityReport::of(&pieces("2103456789abcdef"));
        assert!(report.top_odd);
        assert!(!report.bottom_odd);
        assert!(report.overall_odd);
        assert!(report.satisfies(ParityMode::Tpbn));
        assert!(report.satisfies(ParityMode::Op));
    }

    #[test]
    fn test_cross_group_swap_only_changes_overall() {
        let report = ParityReport::of(&pieces("0123456798abcdef"));
        assert!(!report.top_odd);
        assert!(!report.bottom_odd);
        assert!(report.overall_odd);
    }

    #[test]
    fn test_bottom_corner_swap() {
        let report = ParityReport::of(&pieces("0123456789adcbef"));
        assert!(!report.top_odd);
        assert!(report.bottom_odd);
        assert!(report.overall_odd);
        assert_eq!(report.modes(), vec![ParityMode::Tnbp, ParityMode::Op]);
    }

    #[test]
    fn test_three_cycle_is_even() {
        assert!(!is_odd(&pieces("1203"), &pieces("0123")));
        assert!(is_odd(&pieces("1023"), &pieces("0123")));
    }

    #[test]
    fn test_mode_names_round_trip() {
        for mode in ParityMode::ALL {
            assert_eq!(mode.name().parse::<ParityMode>(), Ok(mode));
        }
        assert!("even".parse::<ParityMode>().is_err());
    }
}
