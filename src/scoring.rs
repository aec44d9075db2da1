//! Pairwise transition-interest scoring.
//!
//! Stage 3 of the pipeline. For every unordered pair of candidate slides,
//! the transition interest is
//!
//! ```text
//! min(|Ta ∩ Tb|, |Ta \ Tb|, |Tb \ Ta|)
//! ```
//!
//! where `Ta`, `Tb` are the slides' derived tag sets. The minimum rewards
//! transitions that are neither too similar nor too dissimilar: a pair with
//! no common tags scores zero, and so does a pair where one slide's tags
//! swallow the other's.
//!
//! Scores live in a dense flattened `N*N` matrix rather than a map keyed by
//! pair: candidate counts are small enough for O(N²) storage, and the solver
//! and reconstructor both do exhaustive pairwise scans that want plain
//! indexed reads. Rows are computed in parallel with rayon — no pair's score
//! depends on another's, so the only coordination is the row split itself.

use crate::instance::Instance;
use crate::slides::{SlideDeck, SlideId};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Dense symmetric matrix of transition-interest weights.
///
/// The diagonal is unused and kept at zero; [`ScoreMatrix::get`] is only
/// meaningful for distinct slide indices.
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    n: usize,
    weights: Vec<u32>,
}

impl ScoreMatrix {
    pub fn compute(deck: &SlideDeck, instance: &Instance) -> ScoreMatrix {
        let n = deck.len();

        // Materialize each slide's tag union once; the pairwise loop below
        // reads them N times each.
        let tags: Vec<BTreeSet<&str>> = deck.slides.iter().map(|s| s.tags(instance)).collect();

        let mut weights = vec![0u32; n * n];
        weights
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(i, row)| {
                for (j, cell) in row.iter_mut().enumerate() {
                    if i != j {
                        *cell = transition_interest(&tags[i], &tags[j]);
                    }
                }
            });

        ScoreMatrix { n, weights }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Weight of the unordered pair `{a, b}`. Symmetric by construction.
    pub fn get(&self, a: SlideId, b: SlideId) -> u32 {
        debug_assert_ne!(a, b, "transition weight of a slide with itself");
        self.weights[a * self.n + b]
    }

    /// Sum of weights over consecutive pairs of an ordering.
    ///
    /// Counts every adjacency, including the seam where two disjoint chains
    /// were concatenated. The emitted objective therefore comes from the
    /// solver's selected edges; this helper exists for tests and the
    /// validator cross-check.
    pub fn sequence_score(&self, order: &[SlideId]) -> u64 {
        order
            .windows(2)
            .map(|w| u64::from(self.get(w[0], w[1])))
            .sum()
    }
}

/// `min(common, only-a, only-b)` over two tag sets.
pub fn transition_interest(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> u32 {
    let common = a.intersection(b).count();
    let only_a = a.len() - common;
    let only_b = b.len() - common;
    common.min(only_a).min(only_b) as u32
}
