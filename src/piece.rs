//! Piece identities and sets of identities
//!
//! Every piece is named by one hex digit. Odd digits are corners, even digits
//! are edges. Digits `0`-`7` form the top group and `8`-`f` the bottom group.

use std::collections::BTreeMap;
use std::fmt;

/// Allowed identities keyed by position label (`"A"`, `"MN"`, ...)
pub type ConstraintMap = BTreeMap<String, PieceSet>;

/// Number of distinct piece identities in a full puzzle
pub const PIECE_COUNT: u8 = 16;

/// A single piece identity (one hex digit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Piece(u8);

impl Piece {
    /// Create a piece from its numeric value (0-15)
    pub fn new(value: u8) -> Option<Self> {
        (value < PIECE_COUNT).then_some(Self(value))
    }

    /// Parse a hex digit, case-insensitive
    pub fn from_char(ch: char) -> Option<Self> {
        ch.to_digit(16).map(|v| Self(v as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Lowercase hex digit for this piece
    pub fn to_char(self) -> char {
        char::from_digit(self.0 as u32, 16).unwrap_or('?')
    }

    pub fn is_corner(self) -> bool {
        self.0 % 2 == 1
    }

    /// True for the `0`-`7` group
    pub fn is_top_group(self) -> bool {
        self.0 < 8
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A set of piece identities stored as a 16-bit mask
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PieceSet(u16);

impl PieceSet {
    pub const EMPTY: PieceSet = PieceSet(0);
    pub const ALL: PieceSet = PieceSet(0xffff);
    pub const EDGES: PieceSet = PieceSet(0x5555);
    pub const CORNERS: PieceSet = PieceSet(0xaaaa);
    /// Edges `0,2,4,6`
    pub const BLACK_EDGES: PieceSet = PieceSet(0x0055);
    /// Corners `1,3,5,7`
    pub const BLACK_CORNERS: PieceSet = PieceSet(0x00aa);
    /// Edges `8,a,c,e`
    pub const WHITE_EDGES: PieceSet = PieceSet(0x5500);
    /// Corners `9,b,d,f`
    pub const WHITE_CORNERS: PieceSet = PieceSet(0xaa00);

    pub fn single(piece: Piece) -> Self {
        Self(1 << piece.0)
    }

    /// Parse a string of hex digits into a set.
    ///
    /// Returns the first character that is not a hex digit on failure.
    pub fn from_hex_str(digits: &str) -> Result<Self, char> {
        digits.chars().try_fold(Self::EMPTY, |set, ch| {
            Piece::from_char(ch).map(|p| set.with(p)).ok_or(ch)
        })
    }

    pub fn contains(self, piece: Piece) -> bool {
        self.0 & (1 << piece.0) != 0
    }

    pub fn with(self, piece: Piece) -> Self {
        Self(self.0 | (1 << piece.0))
    }

    pub fn intersection(self, other: PieceSet) -> Self {
        Self(self.0 & other.0)
    }

    pub fn difference(self, other: PieceSet) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if any member is a corner identity
    pub fn has_corner(self) -> bool {
        !self.intersection(Self::CORNERS).is_empty()
    }

    /// Members in ascending order
    pub fn iter(self) -> impl Iterator<Item = Piece> {
        (0..PIECE_COUNT)
            .filter(move |v| self.0 & (1 << v) != 0)
            .map(Piece)
    }
}

impl fmt::Debug for PieceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self)
    }
}

impl fmt::Display for PieceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in self.iter() {
            write!(f, "{}", piece)?;
        }
        Ok(())
    }
}

impl FromIterator<Piece> for PieceSet {
    fn from_iter<I: IntoIterator<Item = Piece>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, PieceSet::with)
    }
}
