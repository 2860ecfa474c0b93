//! Resolving a parsed occupancy to one concrete table shape

use rand::seq::SliceRandom;
use rand::Rng;

use crate::piece::ConstraintMap;

use super::cluster::{locked_labels, locked_positions_hold};
use super::error::ShapeError;
use super::slot::Occupancy;
use super::table::ShapeTable;

/// A shape chosen from the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedShape {
    pub index: usize,
    pub occupancy: Occupancy,
}

/// Look up a fully specified occupancy. Never substitutes a different shape.
pub fn lookup_shape(
    occupancy: &Occupancy,
    table: &ShapeTable,
) -> Result<ResolvedShape, ShapeError> {
    occupancy
        .to_bits()
        .and_then(|bits| table.index_of(bits))
        .map(|index| ResolvedShape {
            index,
            occupancy: *occupancy,
        })
        .ok_or(ShapeError::UnknownShape {
            occupancy: *occupancy,
        })
}

/// All table shapes that agree with the known slots and keep locked corners whole
pub fn matching_shapes(
    occupancy: &Occupancy,
    constraints: &ConstraintMap,
    table: &ShapeTable,
) -> Vec<ResolvedShape> {
    let (mask, bits) = occupancy.known_bits();
    let check_locks = constraints.values().any(|allowed| allowed.has_corner());
    table
        .iter()
        .filter(|(_, shape)| shape & mask == bits)
        .map(|(index, shape)| ResolvedShape {
            index,
            occupancy: Occupancy::from_bits(shape),
        })
        .filter(|candidate| {
            !check_locks || locked_positions_hold(&candidate.occupancy, constraints)
        })
        .collect()
}

/// Pick a uniformly random shape matching a partial occupancy
pub fn complete_shape<R: Rng + ?Sized>(
    occupancy: &Occupancy,
    constraints: &ConstraintMap,
    table: &ShapeTable,
    rng: &mut R,
) -> Result<ResolvedShape, ShapeError> {
    let candidates = matching_shapes(occupancy, constraints, table);
    log::debug!("{} shapes match {}", candidates.len(), occupancy);
    candidates
        .choose(rng)
        .copied()
        .ok_or_else(|| ShapeError::NoMatchingShape {
            occupancy: *occupancy,
            locked: locked_labels(constraints),
        })
}

/// Resolve an occupancy: direct lookup when fully specified, random completion otherwise
pub fn resolve_shape<R: Rng + ?Sized>(
    occupancy: &Occupancy,
    constraints: &ConstraintMap,
    table: &ShapeTable,
    rng: &mut R,
) -> Result<ResolvedShape, ShapeError> {
    if occupancy.is_fully_specified() {
        lookup_shape(occupancy, table)
    } else {
        complete_shape(occupancy, constraints, table, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceSet;
    use crate::shape::slot::SlotKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_lookup_known_shape() {
        let table = ShapeTable::global();
        let occupancy = table.occupancy(42).unwrap();
        let resolved = lookup_shape(&occupancy, table).unwrap();
        assert_eq!(resolved.index, 42);
        assert_eq!(resolved.occupancy, occupancy);
    }

    #[test]
    fn test_lookup_unknown_shape() {
        // 16 corner bits, but a corner straddles the half-layer seam
        let occupancy = Occupancy::from_bits(0b000001100011_111111111111);
        let err = lookup_shape(&occupancy, ShapeTable::global()).unwrap_err();
        assert_eq!(err, ShapeError::UnknownShape { occupancy });
    }

    #[test]
    fn test_unknown_occupancy_matches_every_shape() {
        let table = ShapeTable::global();
        let all = matching_shapes(&Occupancy::unknown(), &ConstraintMap::new(), table);
        assert_eq!(all.len(), table.len());
    }

    #[test]
    fn test_completion_respects_known_slots() {
        let mut occupancy = Occupancy::unknown();
        for slot in 0..12 {
            occupancy.set(slot, SlotKind::CornerHalf);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let constraints = ConstraintMap::new();
        let resolved =
            complete_shape(&occupancy, &constraints, ShapeTable::global(), &mut rng).unwrap();
        assert!(resolved.occupancy.slots()[..12].iter().all(|k| *k == SlotKind::CornerHalf));
        assert_eq!(resolved.occupancy.count(SlotKind::Edge), 8);
    }

    #[test]
    fn test_locked_corner_filters_candidates() {
        let table = ShapeTable::global();
        let mut constraints = ConstraintMap::new();
        constraints.insert("BC".to_string(), PieceSet::BLACK_CORNERS);
        let shapes = matching_shapes(&Occupancy::unknown(), &constraints, table);
        assert!(!shapes.is_empty());
        assert!(shapes.len() < table.len());
        for shape in &shapes {
            assert_eq!(shape.occupancy.get(1), SlotKind::CornerHalf);
            assert_eq!(shape.occupancy.get(2), SlotKind::CornerHalf);
            assert_eq!(shape.occupancy.get(0), SlotKind::Edge);
        }
    }

    #[test]
    fn test_no_matching_shape() {
        // nine corner halves on top cannot pair up
        let mut occupancy = Occupancy::unknown();
        for slot in 0..12 {
            let kind = if slot < 9 { SlotKind::CornerHalf } else { SlotKind::Edge };
            occupancy.set(slot, kind);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let constraints = ConstraintMap::new();
        let err =
            complete_shape(&occupancy, &constraints, ShapeTable::global(), &mut rng).unwrap_err();
        assert!(matches!(err, ShapeError::NoMatchingShape { .. }));
    }
}
