//! Backend-agnostic edge-selection model.
//!
//! Stage 5 of the pipeline. Assembles the weighted directed-graph decision
//! problem the external solver consumes: one boolean per ordered slide pair,
//! three constraint families, and a maximize objective. No search happens
//! here — the model is a description, handed opaquely to [`crate::solver`].
//!
//! ## Constraint Families
//!
//! - **Degree**: each slide has at most one selected outgoing edge and at
//!   most one selected incoming edge, for every slide in `[0, N)`. This
//!   decomposes a solution into vertex-disjoint simple paths and simple
//!   cycles; the solver's lazy cuts rule the cycles out.
//! - **Anti-symmetry**: of `(i, j)` and `(j, i)` at most one may be
//!   selected, killing the degenerate 2-cycle.
//! - **Conflict exclusion**: for a conflicting pair `{i, j}` neither
//!   direction between them may be selected — slides sharing a photo can
//!   never sit adjacent.
//!
//! The objective is the sum of selected edges' transition weights.
//!
//! An earlier formulation of this model carried an extra "used in at most
//! one transition" constraint scoped to horizontal slides only. The degree
//! family above already bounds every slide uniformly, so that constraint is
//! not reproduced here.

use crate::conflicts::ConflictSet;
use crate::scoring::ScoreMatrix;
use crate::slides::{SlideDeck, SlideId};

/// The assembled decision model. Immutable once built.
#[derive(Debug, Clone)]
pub struct EdgeModel {
    n: usize,
    weights: ScoreMatrix,
    conflicts: ConflictSet,
}

impl EdgeModel {
    /// Assemble the model from the pipeline's immutable stage outputs.
    ///
    /// An empty or single-slide deck yields a model with no edges — valid,
    /// with a zero objective — rather than degenerate constraints.
    pub fn build(deck: &SlideDeck, weights: ScoreMatrix, conflicts: ConflictSet) -> EdgeModel {
        debug_assert_eq!(deck.len(), weights.n());
        EdgeModel {
            n: deck.len(),
            weights,
            conflicts,
        }
    }

    /// Number of nodes (candidate slides).
    pub fn n(&self) -> usize {
        self.n
    }

    /// All ordered pairs `(i, j)`, `i != j` — the decision variables.
    pub fn edges(&self) -> impl Iterator<Item = (SlideId, SlideId)> + '_ {
        let n = self.n;
        (0..n).flat_map(move |i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
    }

    /// Objective coefficient of the directed edge `(i, j)`.
    pub fn weight(&self, i: SlideId, j: SlideId) -> u32 {
        self.weights.get(i, j)
    }

    pub fn conflicts(&self) -> &ConflictSet {
        &self.conflicts
    }

    pub fn scores(&self) -> &ScoreMatrix {
        &self.weights
    }

    /// True when the model has no decision variables at all (N < 2).
    pub fn is_trivial(&self) -> bool {
        self.n < 2
    }

    /// Total objective of a selected edge set, from the model's own weights.
    ///
    /// Computed in exact integer arithmetic so callers never depend on a
    /// backend's floating-point objective report.
    pub fn objective_of(&self, edges: &[(SlideId, SlideId)]) -> u64 {
        edges.iter().map(|&(i, j)| u64::from(self.weight(i, j))).sum()
    }
}
