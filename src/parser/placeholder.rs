//! Turning layer placeholder text into a partial occupancy and constraints

use logos::Logos;

use crate::error::ParseError;
use crate::piece::ConstraintMap;
use crate::shape::slot::{slot_letter, Layer, Occupancy, SlotKind, LAYER_SLOTS, SLOT_COUNT};

use super::lexer::Placeholder;

/// Result of parsing both layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLayers {
    /// Known corner/edge slots; `R` leaves a slot unknown
    pub occupancy: Occupancy,
    /// Constraints implied by explicit digits and colored wildcards
    pub constraints: ConstraintMap,
    /// Placeholder written for each slot
    pub placeholders: [Placeholder; SLOT_COUNT],
}

/// Parse a top and bottom layer of 12 placeholders each.
///
/// Fails on the first character outside the placeholder alphabet, before any
/// shape work is done.
pub fn parse_layers(top: &str, bottom: &str) -> Result<ParsedLayers, ParseError> {
    for (layer, text) in [(Layer::Top, top), (Layer::Bottom, bottom)] {
        let len = text.chars().count();
        if len != LAYER_SLOTS {
            return Err(ParseError::InvalidLength { layer, len });
        }
    }

    let source = format!("{}{}", top, bottom);
    let placeholders = lex_placeholders(&source)?;
    let (occupancy, constraints) = scan(&placeholders);
    log::debug!("parsed layers {} with {} constraints", occupancy, constraints.len());

    Ok(ParsedLayers {
        occupancy,
        constraints,
        placeholders,
    })
}

fn lex_placeholders(source: &str) -> Result<[Placeholder; SLOT_COUNT], ParseError> {
    let mut placeholders = [Placeholder::Free; SLOT_COUNT];
    for (slot, (token, span)) in Placeholder::lexer(source).spanned().enumerate() {
        match token {
            Ok(placeholder) if slot < SLOT_COUNT => placeholders[slot] = placeholder,
            _ => {
                let position = source[..span.start].chars().count();
                let ch = source[span].chars().next().unwrap_or('?');
                return Err(ParseError::InvalidCharacter {
                    ch,
                    position,
                    layer: Layer::of_slot(position),
                });
            }
        }
    }
    Ok(placeholders)
}

/// Left-to-right scan assigning slot kinds and constraint labels.
///
/// Colored corner wildcards and odd digits claim the following slot as the
/// second half of their corner when it is compatible, producing a two-letter
/// label. Corners never pair across the layer boundary.
fn scan(placeholders: &[Placeholder; SLOT_COUNT]) -> (Occupancy, ConstraintMap) {
    let mut occupancy = Occupancy::unknown();
    let mut constraints = ConstraintMap::new();

    let mut slot = 0;
    while slot < SLOT_COUNT {
        let current = placeholders[slot];
        occupancy.set(slot, current.slot_kind());

        let next = (slot % LAYER_SLOTS != LAYER_SLOTS - 1).then(|| placeholders[slot + 1]);
        let pairs = match (current, next) {
            (Placeholder::BlackCorner | Placeholder::WhiteCorner, Some(next)) => {
                next == Placeholder::Free || next == current
            }
            (Placeholder::Piece(piece), Some(next)) if piece.is_corner() => {
                matches!(next, Placeholder::Free | Placeholder::FreeCorner) || next == current
            }
            _ => false,
        };

        let width = if pairs { 2 } else { 1 };
        if pairs {
            occupancy.set(slot + 1, SlotKind::CornerHalf);
        }
        if let Some(allowed) = current.allowed() {
            let label: String = (slot..slot + width).map(slot_letter).collect();
            constraints.insert(label, allowed);
        }
        slot += width;
    }

    (occupancy, constraints)
}
