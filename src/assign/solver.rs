//! Randomized backtracking assignment of pieces to clusters
//!
//! Each attempt walks the clusters depth first, trying the allowed identities
//! in shuffled order. A finished assignment whose parity is wrong gets one
//! chance at repair by swapping two interchangeable positions; otherwise the
//! attempt is thrown away and a new one starts, until the per-mode time
//! budget runs out.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::parser::Placeholder;
use crate::piece::{ConstraintMap, Piece, PieceSet};
use crate::shape::slot::SLOT_COUNT;
use crate::shape::ClusterSet;

use super::clock::Clock;
use super::parity::{ParityMode, ParityReport};

/// Time each parity mode gets before moving on to the next
pub const DEFAULT_BUDGET: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("no piece assignment satisfies the constraints with parity {} within {budget:?} per mode", format_modes(.modes))]
    NoSolution {
        /// Modes in the order they were tried
        modes: Vec<ParityMode>,
        budget: Duration,
    },
}

fn format_modes(modes: &[ParityMode]) -> String {
    modes
        .iter()
        .map(|m| m.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A complete assignment, one identity per cluster in slot order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub pieces: Vec<Piece>,
    pub mode: ParityMode,
    pub parity: ParityReport,
}

pub struct PieceAssigner<'a, C: Clock + ?Sized> {
    /// Allowed identities per cluster, already narrowed to the cluster's kind
    candidates: Vec<PieceSet>,
    corner: Vec<bool>,
    placeholders: Vec<Placeholder>,
    /// Cluster indices, most constrained first
    search_order: Vec<usize>,
    budget: Duration,
    clock: &'a C,
}

impl<'a, C: Clock + ?Sized> PieceAssigner<'a, C> {
    pub fn new(
        clusters: &ClusterSet,
        constraints: &ConstraintMap,
        placeholders: &[Placeholder; SLOT_COUNT],
        budget: Duration,
        clock: &'a C,
    ) -> Self {
        let candidates: Vec<PieceSet> = clusters
            .iter()
            .map(|cluster| {
                let pool = cluster.kind.pool();
                clusters
                    .constraint_for(cluster, constraints)
                    .map_or(pool, |allowed| allowed.intersection(pool))
            })
            .collect();

        // fewest candidates first; ties keep slot order
        let mut search_order: Vec<usize> = (0..candidates.len()).collect();
        search_order.sort_by_key(|i| candidates[*i].len());

        Self {
            corner: clusters.iter().map(|c| c.kind.is_corner()).collect(),
            placeholders: clusters.iter().map(|c| placeholders[c.start]).collect(),
            candidates,
            search_order,
            budget,
            clock,
        }
    }

    /// Allowed identities per cluster
    pub fn candidates(&self) -> &[PieceSet] {
        &self.candidates
    }

    /// Find an assignment matching one of `modes` (default `on`), trying modes in random order
    pub fn assign<R: Rng + ?Sized>(
        &self,
        modes: &[ParityMode],
        rng: &mut R,
    ) -> Result<Assignment, AssignError> {
        let mut order = if modes.is_empty() {
            vec![ParityMode::On]
        } else {
            modes.to_vec()
        };
        order.shuffle(rng);

        // a position with nothing left to hold can never be filled
        if self.candidates.iter().all(|c| !c.is_empty()) {
            for mode in &order {
                if let Some(pieces) = self.solve_mode(*mode, rng) {
                    let parity = ParityReport::of(&pieces);
                    log::debug!("assigned pieces with parity {}", mode);
                    return Ok(Assignment {
                        pieces,
                        mode: *mode,
                        parity,
                    });
                }
                log::debug!("parity {} ran out of time", mode);
            }
        }

        Err(AssignError::NoSolution {
            modes: order,
            budget: self.budget,
        })
    }

    fn solve_mode<R: Rng + ?Sized>(&self, mode: ParityMode, rng: &mut R) -> Option<Vec<Piece>> {
        let deadline = self.clock.now() + self.budget;
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            if let Some(mut pieces) = self.search(deadline, rng) {
                if ParityReport::of(&pieces).satisfies(mode) {
                    return Some(pieces);
                }
                if self.repair(&mut pieces, mode) {
                    log::trace!("attempt {} repaired to parity {}", attempt, mode);
                    return Some(pieces);
                }
                log::trace!("attempt {} could not reach parity {}", attempt, mode);
            }
            if self.clock.now() >= deadline {
                return None;
            }
        }
    }

    fn search<R: Rng + ?Sized>(&self, deadline: Duration, rng: &mut R) -> Option<Vec<Piece>> {
        let mut chosen = vec![None; self.candidates.len()];
        if self.extend(0, PieceSet::EMPTY, &mut chosen, deadline, rng) {
            chosen.into_iter().collect()
        } else {
            None
        }
    }

    fn extend<R: Rng + ?Sized>(
        &self,
        depth: usize,
        used: PieceSet,
        chosen: &mut [Option<Piece>],
        deadline: Duration,
        rng: &mut R,
    ) -> bool {
        let Some(&cluster) = self.search_order.get(depth) else {
            return true;
        };
        if self.clock.now() >= deadline {
            return false;
        }

        let mut options: Vec<Piece> = self.candidates[cluster].difference(used).iter().collect();
        options.shuffle(rng);
        for piece in options {
            chosen[cluster] = Some(piece);
            if self.extend(depth + 1, used.with(piece), chosen, deadline, rng) {
                return true;
            }
        }
        chosen[cluster] = None;
        false
    }

    /// Try single swaps between interchangeable positions, corners before edges
    fn repair(&self, pieces: &mut [Piece], mode: ParityMode) -> bool {
        for corners in [true, false] {
            let group: Vec<usize> = (0..pieces.len())
                .filter(|i| self.corner[*i] == corners)
                .collect();
            for (n, &i) in group.iter().enumerate() {
                for &j in &group[n + 1..] {
                    if !self.placeholders[i].is_swappable_with(self.placeholders[j])
                        || !self.candidates[i].contains(pieces[j])
                        || !self.candidates[j].contains(pieces[i])
                    {
                        continue;
                    }
                    pieces.swap(i, j);
                    if ParityReport::of(pieces).satisfies(mode) {
                        return true;
                    }
                    pieces.swap(i, j);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::clock::{MonotonicClock, SteppingClock};
    use crate::parser::parse_layers;
    use crate::shape::{Occupancy, ShapeTable};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn first_shape() -> ClusterSet {
        let occupancy: Occupancy = ShapeTable::global().occupancy(0).unwrap();
        ClusterSet::build(&occupancy).unwrap()
    }

    fn free() -> [Placeholder; SLOT_COUNT] {
        [Placeholder::Free; SLOT_COUNT]
    }

    #[test]
    fn test_unconstrained_assignment_uses_every_piece() {
        let clusters = first_shape();
        let clock = MonotonicClock::new();
        let constraints = ConstraintMap::new();
        let assigner = PieceAssigner::new(&clusters, &constraints, &free(), DEFAULT_BUDGET, &clock);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let assignment = assigner.assign(&[], &mut rng).unwrap();

        assert_eq!(assignment.mode, ParityMode::On);
        assert!(!assignment.parity.overall_odd);
        let used: PieceSet = assignment.pieces.iter().copied().collect();
        assert_eq!(used, PieceSet::ALL);
        for (cluster, piece) in clusters.iter().zip(&assignment.pieces) {
            assert_eq!(cluster.kind.is_corner(), piece.is_corner());
        }
    }

    #[test]
    fn test_every_parity_mode_is_reachable() {
        let clusters = first_shape();
        let clock = MonotonicClock::new();
        let constraints = ConstraintMap::new();
        let assigner = PieceAssigner::new(&clusters, &constraints, &free(), DEFAULT_BUDGET, &clock);
        for (seed, mode) in ParityMode::ALL.into_iter().enumerate() {
            let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
            let assignment = assigner.assign(&[mode], &mut rng).unwrap();
            assert_eq!(assignment.mode, mode);
            assert!(ParityReport::of(&assignment.pieces).satisfies(mode));
        }
    }

    #[test]
    fn test_constraints_are_honoured() {
        let clusters = first_shape();
        let mut constraints = ConstraintMap::new();
        constraints.insert("IJ".to_string(), PieceSet::from_hex_str("b").unwrap());
        constraints.insert("A".to_string(), PieceSet::BLACK_EDGES);
        let clock = MonotonicClock::new();
        let assigner = PieceAssigner::new(&clusters, &constraints, &free(), DEFAULT_BUDGET, &clock);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let assignment = assigner.assign(&[ParityMode::Op], &mut rng).unwrap();

        let corner = clusters.iter().position(|c| c.label == "IJ").unwrap();
        assert_eq!(assignment.pieces[corner].to_char(), 'b');
        assert!(PieceSet::BLACK_EDGES.contains(assignment.pieces[0]));
    }

    #[test]
    fn test_explicit_pieces_are_kept() {
        let parsed = parse_layers("011233455677", "899abbcddeff").unwrap();
        let clusters = ClusterSet::build(&parsed.occupancy).unwrap();
        let clock = MonotonicClock::new();
        let assigner = PieceAssigner::new(
            &clusters,
            &parsed.constraints,
            &parsed.placeholders,
            DEFAULT_BUDGET,
            &clock,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let assignment = assigner.assign(&[ParityMode::On, ParityMode::Op], &mut rng).unwrap();
        let order: String = assignment.pieces.iter().map(|p| p.to_char()).collect();
        assert_eq!(order, "0123456789abcdef");
        assert_eq!(assignment.mode, ParityMode::On);
    }

    #[test]
    fn test_contradictory_constraints_fail_fast() {
        let clusters = first_shape();
        let mut constraints = ConstraintMap::new();
        // an edge position restricted to corner identities
        constraints.insert("A".to_string(), PieceSet::BLACK_CORNERS);
        let clock = SteppingClock::new(Duration::from_millis(1));
        let assigner = PieceAssigner::new(&clusters, &constraints, &free(), DEFAULT_BUDGET, &clock);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = assigner.assign(&[ParityMode::Tnbn, ParityMode::On], &mut rng).unwrap_err();
        let AssignError::NoSolution { modes, budget } = err;
        assert_eq!(modes.len(), 2);
        assert_eq!(budget, DEFAULT_BUDGET);
    }

    #[test]
    fn test_budget_exhaustion_moves_through_modes() {
        // every piece is fixed in solved order, so odd parity is unreachable
        let parsed = parse_layers("011233455677", "899abbcddeff").unwrap();
        let clusters = ClusterSet::build(&parsed.occupancy).unwrap();
        let clock = SteppingClock::new(Duration::from_millis(5));
        let assigner = PieceAssigner::new(
            &clusters,
            &parsed.constraints,
            &parsed.placeholders,
            DEFAULT_BUDGET,
            &clock,
        );
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let err = assigner.assign(&[ParityMode::Op], &mut rng).unwrap_err();
        assert_eq!(
            err,
            AssignError::NoSolution {
                modes: vec![ParityMode::Op],
                budget: DEFAULT_BUDGET
            }
        );
    }

    fn pieces(digits: &str) -> Vec<Piece> {
        digits.chars().filter_map(Piece::from_char).collect()
    }

    /// Edges `E` on slots A-H, corners `C` on slots I-X
    fn family_wildcards() -> [Placeholder; SLOT_COUNT] {
        let mut placeholders = [Placeholder::FreeCorner; SLOT_COUNT];
        placeholders[..8].fill(Placeholder::FreeEdge);
        placeholders
    }

    // clusters of the first shape: edges A-H, then corners IJ, KL, ... WX
    const SOLVED: &str = "02468ace13579bdf";

    #[test]
    fn test_repair_tries_corners_before_edges() {
        let clusters = first_shape();
        let clock = MonotonicClock::new();
        let constraints = ConstraintMap::new();
        let assigner = PieceAssigner::new(&clusters, &constraints, &free(), DEFAULT_BUDGET, &clock);
        let mut assigned = pieces(SOLVED);
        assert!(!ParityReport::of(&assigned).satisfies(ParityMode::Tpbn));

        assert!(assigner.repair(&mut assigned, ParityMode::Tpbn));
        // swapping edges A and B would also work, but IJ and KL come first
        assert_eq!(assigned, pieces("02468ace31579bdf"));
        assert!(ParityReport::of(&assigned).satisfies(ParityMode::Tpbn));
    }

    #[test]
    fn test_repair_skips_incompatible_placeholders() {
        let clusters = first_shape();
        let mut placeholders = family_wildcards();
        placeholders[8] = Placeholder::BlackCorner;
        placeholders[10] = Placeholder::WhiteCorner;
        let clock = MonotonicClock::new();
        let constraints = ConstraintMap::new();
        let assigner =
            PieceAssigner::new(&clusters, &constraints, &placeholders, DEFAULT_BUDGET, &clock);
        let mut assigned = pieces(SOLVED);

        assert!(assigner.repair(&mut assigned, ParityMode::Tpbn));
        // IJ (X) and KL (Z) trade with nothing; MN and OP are both C
        assert_eq!(assigned, pieces("02468ace13759bdf"));
    }

    #[test]
    fn test_repair_respects_constraints() {
        let clusters = first_shape();
        let mut constraints = ConstraintMap::new();
        constraints.insert("KL".to_string(), PieceSet::from_hex_str("3").unwrap());
        let clock = MonotonicClock::new();
        let assigner = PieceAssigner::new(&clusters, &constraints, &free(), DEFAULT_BUDGET, &clock);
        let mut assigned = pieces(SOLVED);

        assert!(assigner.repair(&mut assigned, ParityMode::Tpbn));
        // KL may only hold 3, so IJ trades with MN instead
        assert_eq!(assigned, pieces("02468ace53179bdf"));
    }

    #[test]
    fn test_repair_without_swappable_pair() {
        let parsed = parse_layers("011233455677", "899abbcddeff").unwrap();
        let clusters = ClusterSet::build(&parsed.occupancy).unwrap();
        let clock = MonotonicClock::new();
        let assigner = PieceAssigner::new(
            &clusters,
            &parsed.constraints,
            &parsed.placeholders,
            DEFAULT_BUDGET,
            &clock,
        );
        let mut assigned = pieces("0123456789abcdef");
        assert!(!assigner.repair(&mut assigned, ParityMode::Tpbn));
        assert_eq!(assigned, pieces("0123456789abcdef"));
    }

    #[test]
    fn test_error_message() {
        let err = AssignError::NoSolution {
            modes: vec![ParityMode::Tpbn, ParityMode::On],
            budget: Duration::from_millis(100),
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"no piece assignment satisfies the constraints with parity tpbn, on within 100ms per mode"
        );
    }
}
