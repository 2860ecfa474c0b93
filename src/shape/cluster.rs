//! Grouping slots into addressable piece positions
//!
//! A cluster is one edge slot or two adjacent corner slots in the same layer.
//! Clusters are named after their slots: the edge on slot `C` is `"C"`, the
//! corner on slots `M` and `N` is `"MN"`.

use std::ops::Range;

use crate::piece::{ConstraintMap, PieceSet};

use super::error::ShapeError;
use super::slot::{letter_slot, slot_letter, Occupancy, SlotKind, LAYER_SLOTS, SLOT_COUNT};

/// Corners (and edges) in a complete shape
pub const CLUSTERS_PER_KIND: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterKind {
    Corner,
    /// A lone corner slot without a partner
    HalfCorner,
    Edge,
}

impl ClusterKind {
    pub fn is_corner(self) -> bool {
        matches!(self, ClusterKind::Corner | ClusterKind::HalfCorner)
    }

    /// Identities this kind of position can hold
    pub fn pool(self) -> PieceSet {
        if self.is_corner() {
            PieceSet::CORNERS
        } else {
            PieceSet::EDGES
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub label: String,
    pub kind: ClusterKind,
    /// First slot covered
    pub start: usize,
}

impl Cluster {
    fn new(kind: ClusterKind, start: usize) -> Self {
        let slots = match kind {
            ClusterKind::Corner => start..start + 2,
            _ => start..start + 1,
        };
        Self {
            label: slots.map(slot_letter).collect(),
            kind,
            start,
        }
    }

    pub fn slots(&self) -> Range<usize> {
        match self.kind {
            ClusterKind::Corner => self.start..self.start + 2,
            _ => self.start..self.start + 1,
        }
    }
}

/// Clusters of one occupancy, in slot order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    /// Split a complete occupancy into exactly 8 corner and 8 edge clusters
    pub fn build(occupancy: &Occupancy) -> Result<Self, ShapeError> {
        let set = Self::decompose(occupancy);
        let corners = set.iter().filter(|c| c.kind.is_corner()).count();
        let edges = set.len() - corners;
        let incomplete = occupancy.count(SlotKind::Unknown) > 0;
        if incomplete || corners != CLUSTERS_PER_KIND || edges != CLUSTERS_PER_KIND {
            return Err(ShapeError::Cluster {
                occupancy: *occupancy,
                corners,
                edges,
            });
        }
        Ok(set)
    }

    /// Scan left to right without checking the totals. Unknown slots are skipped.
    pub fn decompose(occupancy: &Occupancy) -> Self {
        let mut clusters = Vec::with_capacity(2 * CLUSTERS_PER_KIND);
        let mut slot = 0;
        while slot < SLOT_COUNT {
            match occupancy.get(slot) {
                SlotKind::Unknown => slot += 1,
                SlotKind::Edge => {
                    clusters.push(Cluster::new(ClusterKind::Edge, slot));
                    slot += 1;
                }
                SlotKind::CornerHalf => {
                    let paired = slot % LAYER_SLOTS != LAYER_SLOTS - 1
                        && occupancy.get(slot + 1) == SlotKind::CornerHalf;
                    if paired {
                        clusters.push(Cluster::new(ClusterKind::Corner, slot));
                        slot += 2;
                    } else {
                        clusters.push(Cluster::new(ClusterKind::HalfCorner, slot));
                        slot += 1;
                    }
                }
            }
        }
        Self { clusters }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    /// Resolve a constraint label.
    ///
    /// A two-letter label must match a corner exactly. A one-letter label
    /// matches the cluster with that name, or the corner covering that slot.
    pub fn find(&self, label: &str) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.label == label).or_else(|| {
            let mut chars = label.chars();
            let slot = letter_slot(chars.next()?)?;
            if chars.next().is_some() {
                return None;
            }
            self.clusters
                .iter()
                .find(|c| c.kind == ClusterKind::Corner && c.slots().contains(&slot))
        })
    }

    /// Allowed identities for a cluster, combining every label that names it
    pub fn constraint_for(
        &self,
        cluster: &Cluster,
        constraints: &ConstraintMap,
    ) -> Option<PieceSet> {
        let mut allowed: Option<PieceSet> = None;
        for (label, set) in constraints {
            let names_cluster = self
                .find(label)
                .is_some_and(|found| found.start == cluster.start);
            if names_cluster {
                allowed = Some(allowed.map_or(*set, |a| a.intersection(*set)));
            }
        }
        allowed
    }
}

/// Check that every corner constraint still lands on a whole corner.
///
/// Used when completing a partial occupancy: the candidate's own labelling must
/// agree with the labels the constraints were written against.
pub fn locked_positions_hold(occupancy: &Occupancy, constraints: &ConstraintMap) -> bool {
    let clusters = ClusterSet::decompose(occupancy);
    constraints
        .iter()
        .filter(|(_, allowed)| allowed.has_corner())
        .all(|(label, _)| match clusters.find(label) {
            Some(cluster) if cluster.kind.is_corner() => {
                let before = occupancy.slots()[..cluster.start]
                    .iter()
                    .filter(|k| **k == SlotKind::CornerHalf)
                    .count();
                before % 2 == 0
            }
            _ => false,
        })
}

/// Lay `overrides` over `base`. An override replaces every base entry whose
/// slots overlap its own, so `"A"` replaces `"AB"` and the other way round.
pub fn merge_constraints(base: ConstraintMap, overrides: &ConstraintMap) -> ConstraintMap {
    let overridden: Vec<usize> = overrides.keys().flat_map(|label| label_slots(label)).collect();

    let mut merged: ConstraintMap = base
        .into_iter()
        .filter(|(label, _)| !label_slots(label).iter().any(|s| overridden.contains(s)))
        .collect();
    merged.extend(overrides.iter().map(|(label, set)| (label.clone(), *set)));
    merged
}

fn label_slots(label: &str) -> Vec<usize> {
    label.chars().filter_map(letter_slot).collect()
}

/// Labels of constraints that lock a corner position
pub fn locked_labels(constraints: &ConstraintMap) -> Vec<String> {
    constraints
        .iter()
        .filter(|(_, allowed)| allowed.has_corner())
        .map(|(label, _)| label.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(set: &ClusterSet) -> Vec<&str> {
        set.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_build_first_table_shape() {
        let occupancy = Occupancy::from_bits(0b000000001111_111111111111);
        let set = ClusterSet::build(&occupancy).unwrap();
        assert_eq!(
            labels(&set),
            vec![
                "A", "B", "C", "D", "E", "F", "G", "H", "IJ", "KL", "MN", "OP", "QR", "ST", "UV",
                "WX"
            ]
        );
    }

    #[test]
    fn test_corners_do_not_cross_layers() {
        // slot 11 and slot 12 are both corner halves
        let occupancy = Occupancy::from_bits(0b011000000001_100000000000);
        let set = ClusterSet::decompose(&occupancy);
        let kinds: Vec<_> = set
            .iter()
            .filter(|c| c.kind.is_corner())
            .map(|c| c.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![ClusterKind::Corner, ClusterKind::HalfCorner, ClusterKind::HalfCorner]
        );
    }

    #[test]
    fn test_build_rejects_wrong_totals() {
        let occupancy = Occupancy::from_bits(0b110000000000_110000000000);
        let err = ClusterSet::build(&occupancy).unwrap_err();
        assert!(matches!(err, ShapeError::Cluster { corners: 2, edges: 20, .. }));
    }

    #[test]
    fn test_find_by_start_letter() {
        let occupancy = Occupancy::from_bits(0b000000001111_111111111111);
        let set = ClusterSet::decompose(&occupancy);
        assert_eq!(set.find("IJ").map(|c| c.start), Some(8));
        assert_eq!(set.find("I").map(|c| c.start), Some(8));
        assert_eq!(set.find("J").map(|c| c.start), Some(8));
        assert_eq!(set.find("C").map(|c| c.kind), Some(ClusterKind::Edge));
        assert_eq!(set.find("JK"), None);
    }

    #[test]
    fn test_constraint_for_intersects_aliases() {
        let occupancy = Occupancy::from_bits(0b000000001111_111111111111);
        let set = ClusterSet::decompose(&occupancy);
        let mut constraints = ConstraintMap::new();
        constraints.insert("IJ".to_string(), PieceSet::BLACK_CORNERS);
        constraints.insert("I".to_string(), PieceSet::from_hex_str("19").unwrap());
        let corner = set.find("IJ").unwrap();
        assert_eq!(
            set.constraint_for(corner, &constraints),
            Some(PieceSet::from_hex_str("1").unwrap())
        );
        let edge = set.find("A").unwrap();
        assert_eq!(set.constraint_for(edge, &constraints), None);
    }

    #[test]
    fn test_locked_positions() {
        let occupancy = Occupancy::from_bits(0b000000001111_111111111111);
        let mut constraints = ConstraintMap::new();
        constraints.insert("KL".to_string(), PieceSet::WHITE_CORNERS);
        assert!(locked_positions_hold(&occupancy, &constraints));

        constraints.insert("JK".to_string(), PieceSet::WHITE_CORNERS);
        assert!(!locked_positions_hold(&occupancy, &constraints));
    }

    #[test]
    fn test_edge_constraints_are_not_locked() {
        let occupancy = Occupancy::from_bits(0b000000001111_111111111111);
        let mut constraints = ConstraintMap::new();
        constraints.insert("M".to_string(), PieceSet::WHITE_EDGES);
        assert!(locked_positions_hold(&occupancy, &constraints));
        assert!(locked_labels(&constraints).is_empty());
    }

    #[test]
    fn test_single_letter_resolves_to_covering_corner() {
        // a lone odd digit on slot L, completed as a corner on K and L
        let occupancy = Occupancy::from_bits(0b000000001111_111111111111);
        let mut constraints = ConstraintMap::new();
        constraints.insert("L".to_string(), PieceSet::from_hex_str("1").unwrap());
        assert!(locked_positions_hold(&occupancy, &constraints));

        let set = ClusterSet::decompose(&occupancy);
        let corner = set.find("KL").unwrap();
        assert_eq!(
            set.constraint_for(corner, &constraints),
            Some(PieceSet::from_hex_str("1").unwrap())
        );
    }

    #[test]
    fn test_merge_replaces_overlapping_labels() {
        let mut parsed = ConstraintMap::new();
        parsed.insert("AB".to_string(), PieceSet::BLACK_CORNERS);
        parsed.insert("D".to_string(), PieceSet::BLACK_EDGES);
        parsed.insert("M".to_string(), PieceSet::WHITE_EDGES);
        let mut overrides = ConstraintMap::new();
        overrides.insert("A".to_string(), PieceSet::from_hex_str("9").unwrap());
        overrides.insert("MN".to_string(), PieceSet::from_hex_str("b").unwrap());

        let merged = merge_constraints(parsed, &overrides);
        let expected: Vec<(String, PieceSet)> = vec![
            ("A".to_string(), PieceSet::from_hex_str("9").unwrap()),
            ("D".to_string(), PieceSet::BLACK_EDGES),
            ("MN".to_string(), PieceSet::from_hex_str("b").unwrap()),
        ];
        assert_eq!(merged.into_iter().collect::<Vec<_>>(), expected);
    }
}
