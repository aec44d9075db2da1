//! Sequence reconstruction from the solver's selected edges.
//!
//! Stage 7 of the pipeline. The solver returns directed edges in no
//! particular order; honored degree and anti-symmetry constraints mean they
//! form vertex-disjoint simple paths — possibly several. This module
//! linearizes them into one slide ordering, concatenating disjoint chains
//! back-to-back in a deterministic order.
//!
//! ## Algorithm
//!
//! Iterative convergence over a pending queue, driven by a small state
//! machine, because edges arrive out of adjacency order:
//!
//! - The first edge seeds the active chain.
//! - Each popped edge either extends the active chain at its tail, grows it
//!   backwards at its head, or — when a full pass over the queue placed
//!   nothing (`Scanning` misses reach the queue length) — triggers
//!   `ForcedNewChain`: the active chain is maximal, so the next edge popped
//!   starts a fresh chain. The last pending edge starts a fresh chain
//!   directly when it matches nothing.
//!
//! Growing at the head matters: a forced chain may start from the middle of
//! its true path, and the edges leading into it can only attach backwards.
//! Without it, those edges would be replayed forever or emitted as a bogus
//! extra chain repeating a slide.
//!
//! ## Defensive Checks
//!
//! A solver that violates its own model — duplicate out- or in-degree, a
//! 2-cycle, a self-loop, or a directed cycle surfacing as a repeated slide —
//! is a programming-error-class failure. The reconstructor returns a
//! [`ChainError`] instead of emitting a malformed sequence, and a strict
//! pass bound turns any unforeseen non-termination into an error as well.

use crate::slides::SlideId;
use std::collections::{BTreeSet, VecDeque};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChainError {
    #[error("edge from slide {0} to itself")]
    SelfLoop(SlideId),
    #[error("slide {0} has two outgoing edges")]
    DuplicateTail(SlideId),
    #[error("slide {0} has two incoming edges")]
    DuplicateHead(SlideId),
    #[error("edges {0}->{1} and {1}->{0} both selected")]
    TwoCycle(SlideId, SlideId),
    #[error("slide {0} appears twice in the reconstructed sequence")]
    RepeatedSlide(SlideId),
    #[error("reconstruction exceeded its pass bound without placing every edge")]
    Stalled,
}

/// What the last dequeue did, deciding how the next edge is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// A slide was just placed; the scan starts fresh.
    Placing,
    /// Mid-pass: `misses` edges re-queued since the last placement.
    Scanning { misses: usize },
    /// A full pass placed nothing; the next edge starts a new chain.
    ForcedNewChain,
}

/// Linearize a selected edge set into one ordering of slide indices.
///
/// Every slide touched by an edge appears exactly once; consecutive slides
/// within a chain correspond to selected edges. Disjoint chains are
/// concatenated in the deterministic order the queue discipline produces.
pub fn linearize(edges: &[(SlideId, SlideId)]) -> Result<Vec<SlideId>, ChainError> {
    verify_path_shape(edges)?;

    let mut queue: VecDeque<(SlideId, SlideId)> = edges.iter().copied().collect();
    let Some((seed_start, seed_end)) = queue.pop_front() else {
        return Ok(Vec::new());
    };

    let mut order = vec![seed_start, seed_end];
    // Index where the active chain begins; earlier chains are frozen.
    let mut chain_start = 0;
    let mut state = State::Placing;

    // Each placement consumes an edge, and between placements the queue
    // cycles at most once fully plus the forced restart. Exceeding this is
    // a logic defect, not slow progress.
    let mut budget = (edges.len() + 1) * (edges.len() + 2);

    while let Some((start, end)) = queue.pop_front() {
        if budget == 0 {
            return Err(ChainError::Stalled);
        }
        budget -= 1;

        let tail = order[order.len() - 1];
        let head = order[chain_start];

        state = match state {
            State::ForcedNewChain => {
                chain_start = order.len();
                order.push(start);
                order.push(end);
                State::Placing
            }
            _ if start == tail => {
                order.push(end);
                State::Placing
            }
            _ if end == head => {
                order.insert(chain_start, start);
                State::Placing
            }
            _ if queue.is_empty() => {
                // Last pending edge and it matches nothing: new chain.
                chain_start = order.len();
                order.push(start);
                order.push(end);
                State::Placing
            }
            State::Scanning { misses } if misses == queue.len() => {
                queue.push_back((start, end));
                State::ForcedNewChain
            }
            State::Placing | State::Scanning { .. } => {
                let misses = match state {
                    State::Scanning { misses } => misses,
                    _ => 0,
                };
                queue.push_back((start, end));
                State::Scanning { misses: misses + 1 }
            }
        };
    }

    verify_each_once(&order)?;
    Ok(order)
}

/// Reject edge sets that cannot be a set of vertex-disjoint simple paths.
fn verify_path_shape(edges: &[(SlideId, SlideId)]) -> Result<(), ChainError> {
    let mut tails = BTreeSet::new();
    let mut heads = BTreeSet::new();
    let mut seen = BTreeSet::new();

    for &(start, end) in edges {
        if start == end {
            return Err(ChainError::SelfLoop(start));
        }
        if !tails.insert(start) {
            return Err(ChainError::DuplicateTail(start));
        }
        if !heads.insert(end) {
            return Err(ChainError::DuplicateHead(end));
        }
        if seen.contains(&(end, start)) {
            return Err(ChainError::TwoCycle(start.min(end), start.max(end)));
        }
        seen.insert((start, end));
    }
    Ok(())
}

/// Directed cycles pass the degree checks but surface here: walking a cycle
/// revisits its entry slide.
fn verify_each_once(order: &[SlideId]) -> Result<(), ChainError> {
    let mut seen = BTreeSet::new();
    for &slide in order {
        if !seen.insert(slide) {
            return Err(ChainError::RepeatedSlide(slide));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_edge_set_yields_empty_sequence() {
        assert_eq!(linearize(&[]).unwrap(), Vec::<SlideId>::new());
    }

    #[test]
    fn single_edge_yields_both_endpoints() {
        assert_eq!(linearize(&[(7, 3)]).unwrap(), vec![7, 3]);
    }

    #[test]
    fn in_order_chain_is_a_straight_walk() {
        assert_eq!(linearize(&[(0, 1), (1, 2), (2, 3)]).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn out_of_order_chain_converges() {
        assert_eq!(linearize(&[(2, 3), (0, 1), (1, 2)]).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn scrambled_disjoint_chains_round_trip() {
        // Chains 0->1->2 and 3->4, scrambled arrival.
        let order = linearize(&[(3, 4), (1, 2), (0, 1)]).unwrap();

        let unique: BTreeSet<_> = order.iter().copied().collect();
        assert_eq!(unique, BTreeSet::from([0, 1, 2, 3, 4]));
        assert_eq!(order.len(), 5);

        let follows = |a: SlideId, b: SlideId| {
            let i = order.iter().position(|&s| s == a).unwrap();
            order.get(i + 1) == Some(&b)
        };
        assert!(follows(0, 1));
        assert!(follows(1, 2));
        assert!(follows(3, 4));
    }

    #[test]
    fn edge_into_a_forced_chain_head_attaches_backwards() {
        // (5,6) seeds; (1,2) gets force-started mid-path; (0,1) must then
        // grow that chain at its head.
        let order = linearize(&[(5, 6), (1, 2), (0, 1)]).unwrap();
        assert_eq!(order, vec![5, 6, 0, 1, 2]);
    }

    #[test]
    fn three_chains_all_survive() {
        let order = linearize(&[(8, 9), (0, 1), (4, 5), (1, 2), (5, 6)]).unwrap();
        assert_eq!(order.len(), 8);
        let unique: BTreeSet<_> = order.iter().copied().collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn duplicate_out_degree_is_rejected() {
        assert_eq!(
            linearize(&[(0, 1), (0, 2)]),
            Err(ChainError::DuplicateTail(0))
        );
    }

    #[test]
    fn duplicate_in_degree_is_rejected() {
        assert_eq!(
            linearize(&[(0, 2), (1, 2)]),
            Err(ChainError::DuplicateHead(2))
        );
    }

    #[test]
    fn two_cycle_is_rejected() {
        assert_eq!(
            linearize(&[(0, 1), (1, 0)]),
            Err(ChainError::TwoCycle(0, 1))
        );
    }

    #[test]
    fn self_loop_is_rejected() {
        assert_eq!(linearize(&[(3, 3)]), Err(ChainError::SelfLoop(3)));
    }

    #[test]
    fn directed_cycle_surfaces_as_repeated_slide() {
        // Passes the degree checks but is a cycle, not a path.
        assert_eq!(
            linearize(&[(0, 1), (1, 2), (2, 0)]),
            Err(ChainError::RepeatedSlide(0))
        );
    }

    #[test]
    fn deterministic_for_identical_input() {
        let edges = [(3, 4), (1, 2), (0, 1), (6, 7)];
        assert_eq!(linearize(&edges).unwrap(), linearize(&edges).unwrap());
    }
}
