//! Lexer for layer placeholder text using logos

use std::fmt;

use logos::Logos;

use crate::piece::{Piece, PieceSet};
use crate::shape::SlotKind;

/// One placeholder character
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Explicit identity. `C` and `E` are wildcards, so only lowercase `c`/`e` name pieces.
    #[regex("[0-9a-fABDF]", |lex| Piece::from_char(lex.slice().chars().next()?))]
    Piece(Piece),

    /// Anything may go here
    #[token("R")]
    Free,
    #[token("E")]
    FreeEdge,
    #[token("C")]
    FreeCorner,

    /// Edge from the `0,2,4,6` group
    #[token("W")]
    BlackEdge,
    /// Corner from the `1,3,5,7` group
    #[token("X")]
    BlackCorner,
    /// Edge from the `8,a,c,e` group
    #[token("Y")]
    WhiteEdge,
    /// Corner from the `9,b,d,f` group
    #[token("Z")]
    WhiteCorner,
}

impl Placeholder {
    /// What the placeholder says about its slot
    pub fn slot_kind(self) -> SlotKind {
        match self {
            Placeholder::Piece(piece) if piece.is_corner() => SlotKind::CornerHalf,
            Placeholder::Piece(_) => SlotKind::Edge,
            Placeholder::Free => SlotKind::Unknown,
            Placeholder::FreeEdge | Placeholder::BlackEdge | Placeholder::WhiteEdge => {
                SlotKind::Edge
            }
            Placeholder::FreeCorner | Placeholder::BlackCorner | Placeholder::WhiteCorner => {
                SlotKind::CornerHalf
            }
        }
    }

    /// Identities the placeholder restricts its position to, if any
    pub fn allowed(self) -> Option<PieceSet> {
        match self {
            Placeholder::Piece(piece) => Some(PieceSet::single(piece)),
            Placeholder::BlackEdge => Some(PieceSet::BLACK_EDGES),
            Placeholder::BlackCorner => Some(PieceSet::BLACK_CORNERS),
            Placeholder::WhiteEdge => Some(PieceSet::WHITE_EDGES),
            Placeholder::WhiteCorner => Some(PieceSet::WHITE_CORNERS),
            Placeholder::Free | Placeholder::FreeEdge | Placeholder::FreeCorner => None,
        }
    }

    /// Whether two positions may trade pieces during parity repair
    pub fn is_swappable_with(self, other: Placeholder) -> bool {
        self == other || self == Placeholder::Free || other == Placeholder::Free
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Placeholder::Piece(piece) => piece.to_char(),
            Placeholder::Free => 'R',
            Placeholder::FreeEdge => 'E',
            Placeholder::FreeCorner => 'C',
            Placeholder::BlackEdge => 'W',
            Placeholder::BlackCorner => 'X',
            Placeholder::WhiteEdge => 'Y',
            Placeholder::WhiteCorner => 'Z',
        };
        write!(f, "{}", ch)
    }
}
