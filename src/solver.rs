//! The external solving collaborator.
//!
//! Stage 6 of the pipeline, and the only blocking call in it. The core never
//! searches: it hands the [`EdgeModel`] to an [`EdgeSolver`] and interprets
//! whatever comes back. All four outcomes — optimal, feasible-but-
//! suboptimal, infeasible, timed out — are first-class and handled
//! explicitly by the caller; nothing here assumes optimality.
//!
//! ## Backend
//!
//! [`MilpSolver`] translates the model into a mixed-integer program via
//! [good_lp](https://docs.rs/good_lp) with the pure-Rust `microlp` backend,
//! so the binary stays self-contained — no system CBC or SCIP install.
//!
//! ## Lazy Cuts
//!
//! The model's three constraint families admit two solution shapes the
//! slideshow itself cannot use: directed cycles (degree and anti-symmetry
//! bound every node but never forbid a closed tour), and two conflicting
//! slides placed non-adjacently (conflict exclusion only bans the edge
//! *between* them, yet both appearing anywhere reuses a photo). Neither can
//! be excluded up front without enumerating exponentially many subsets, so
//! the translation solves iteratively: after each solve it scans the
//! selected edges, adds a subtour-elimination cut for every cycle and a
//! joint-usage cut for every conflicting pair both touched by selection,
//! and re-solves. Each cut eliminates the current optimum and the solution
//! space is finite, so the loop terminates — in practice after a handful of
//! rounds. The returned edge set is always path-shaped and photo-disjoint.
//!
//! ## Time Budget
//!
//! microlp exposes no deadline or cancellation hook, so the wall-clock
//! budget is enforced around the opaque call: the solve runs on a worker
//! thread and the caller waits on a channel with `recv_timeout`. On
//! overrun the worker is abandoned (it finishes and its result is dropped)
//! and the outcome is [`SolveOutcome::TimedOut`]. A backend that can stop
//! early with an incumbent would report [`SolveOutcome::Feasible`] instead;
//! `TimedOut` always means "budget spent, nothing usable".

use crate::model::EdgeModel;
use crate::slides::SlideId;
use good_lp::{
    Expression, ResolutionError, Solution, SolverModel, Variable, constraint, default_solver,
    variable, variables,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("solver backend failure: {0}")]
    Backend(String),
    #[error("solver worker thread exited without reporting a result")]
    WorkerExit,
}

/// What the solver found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Proven-optimal edge set.
    Optimal {
        edges: Vec<(SlideId, SlideId)>,
        objective: u64,
    },
    /// A feasible incumbent the backend could not prove optimal.
    Feasible {
        edges: Vec<(SlideId, SlideId)>,
        objective: u64,
    },
    /// No edge set satisfies the constraints.
    Infeasible,
    /// The wall-clock budget elapsed with no usable incumbent.
    TimedOut,
}

/// Narrow interface to the external combinatorial engine: given the model
/// and nothing else, return a maximum-weight feasible edge subset.
pub trait EdgeSolver {
    fn solve(&self, model: &EdgeModel) -> Result<SolveOutcome, SolveError>;
}

/// MILP formulation of the edge model, solved by good_lp's default backend.
#[derive(Debug, Clone, Default)]
pub struct MilpSolver {
    /// Optional wall-clock budget for one solve call.
    pub time_limit: Option<Duration>,
}

impl MilpSolver {
    pub fn new(time_limit: Option<Duration>) -> MilpSolver {
        MilpSolver { time_limit }
    }
}

impl EdgeSolver for MilpSolver {
    fn solve(&self, model: &EdgeModel) -> Result<SolveOutcome, SolveError> {
        if model.is_trivial() {
            // No decision variables; the empty selection is trivially optimal.
            return Ok(SolveOutcome::Optimal {
                edges: Vec::new(),
                objective: 0,
            });
        }

        match self.time_limit {
            None => solve_milp(model),
            Some(budget) => {
                let owned = model.clone();
                let (tx, rx) = mpsc::channel();
                thread::spawn(move || {
                    // Receiver may be gone after a timeout; ignore the send error.
                    let _ = tx.send(solve_milp(&owned));
                });
                match rx.recv_timeout(budget) {
                    Ok(result) => result,
                    Err(mpsc::RecvTimeoutError::Timeout) => Ok(SolveOutcome::TimedOut),
                    Err(mpsc::RecvTimeoutError::Disconnected) => Err(SolveError::WorkerExit),
                }
            }
        }
    }
}

/// A lazily discovered constraint: at most `cap` of the listed edges may
/// be selected together.
struct Cut {
    edges: Vec<(SlideId, SlideId)>,
    cap: usize,
}

/// Solve-and-cut loop: transcribe the model, solve, and keep re-solving
/// with cuts until the selected edges form photo-disjoint paths.
fn solve_milp(model: &EdgeModel) -> Result<SolveOutcome, SolveError> {
    let mut cuts: Vec<Cut> = Vec::new();
    loop {
        let outcome = solve_with_cuts(model, &cuts)?;
        let SolveOutcome::Optimal { ref edges, .. } = outcome else {
            return Ok(outcome);
        };
        let mut found = cycle_cuts(edges);
        found.extend(conflict_cuts(model, edges));
        if found.is_empty() {
            return Ok(outcome);
        }
        cuts.extend(found);
    }
}

/// One boolean per ordered slide pair, the three constraint families, any
/// accumulated cuts, and the weighted objective — a direct transcription
/// of [`EdgeModel`].
fn solve_with_cuts(model: &EdgeModel, cuts: &[Cut]) -> Result<SolveOutcome, SolveError> {
    let n = model.n();
    let mut vars = variables!();

    // Dense variable table indexed i*n + j; the diagonal stays None.
    let mut table: Vec<Option<Variable>> = vec![None; n * n];
    for (i, j) in model.edges() {
        table[i * n + j] = Some(vars.add(variable().binary()));
    }
    let z = |i: usize, j: usize| table[i * n + j].expect("off-diagonal variable exists");

    let objective = model.edges().fold(Expression::from(0.0), |acc, (i, j)| {
        acc + f64::from(model.weight(i, j)) * z(i, j)
    });

    let mut problem = vars.maximise(objective).using(default_solver);

    // Degree: at most one successor and one predecessor per slide.
    for i in 0..n {
        let outgoing = (0..n)
            .filter(|&j| j != i)
            .fold(Expression::from(0.0), |acc, j| acc + z(i, j));
        problem = problem.with(constraint!(outgoing <= 1.0));

        let incoming = (0..n)
            .filter(|&j| j != i)
            .fold(Expression::from(0.0), |acc, j| acc + z(j, i));
        problem = problem.with(constraint!(incoming <= 1.0));
    }

    // Anti-symmetry: a transition is used in one direction only.
    for i in 0..n {
        for j in i + 1..n {
            problem = problem.with(constraint!(z(i, j) + z(j, i) <= 1.0));
        }
    }

    // Conflict exclusion: slides sharing a photo are never adjacent.
    for (a, b) in model.conflicts().iter() {
        problem = problem.with(constraint!(z(a, b) + z(b, a) <= 0.0));
    }

    for cut in cuts {
        let used = cut
            .edges
            .iter()
            .fold(Expression::from(0.0), |acc, &(i, j)| acc + z(i, j));
        problem = problem.with(constraint!(used <= cut.cap as f64));
    }

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => return Ok(SolveOutcome::Infeasible),
        Err(other) => return Err(SolveError::Backend(other.to_string())),
    };

    let edges: Vec<(SlideId, SlideId)> = model
        .edges()
        .filter(|&(i, j)| solution.value(z(i, j)) > 0.5)
        .collect();

    // Integer objective from the model's own weights, not the backend's
    // floating-point report.
    let objective = model.objective_of(&edges);
    Ok(SolveOutcome::Optimal { edges, objective })
}

/// Subtour elimination: one cut per directed cycle in the selection,
/// allowing at most `len - 1` of its edges in any later solution.
///
/// The degree constraints cap every node at one successor and one
/// predecessor, so the selection decomposes into simple paths and simple
/// cycles; walking the paths first leaves exactly the cycle nodes
/// unvisited.
fn cycle_cuts(edges: &[(SlideId, SlideId)]) -> Vec<Cut> {
    let succ: BTreeMap<SlideId, SlideId> = edges.iter().copied().collect();
    let heads: BTreeSet<SlideId> = edges.iter().map(|&(_, j)| j).collect();

    let mut visited: BTreeSet<SlideId> = BTreeSet::new();
    for &start in succ.keys().filter(|tail| !heads.contains(*tail)) {
        let mut node = start;
        while visited.insert(node) {
            match succ.get(&node) {
                Some(&next) => node = next,
                None => break,
            }
        }
    }

    let mut cuts = Vec::new();
    for &start in succ.keys() {
        if visited.contains(&start) {
            continue;
        }
        let mut cycle = Vec::new();
        let mut node = start;
        loop {
            visited.insert(node);
            let next = succ[&node];
            cycle.push((node, next));
            node = next;
            if node == start {
                break;
            }
        }
        let cap = cycle.len() - 1;
        cuts.push(Cut { edges: cycle, cap });
    }
    cuts
}

/// Joint-usage exclusion: when both slides of a conflicting pair are
/// touched by the selection, any edge reaching one is incompatible with
/// any edge reaching the other, wherever they sit in the sequence.
fn conflict_cuts(model: &EdgeModel, edges: &[(SlideId, SlideId)]) -> Vec<Cut> {
    let mut incident: BTreeMap<SlideId, Vec<(SlideId, SlideId)>> = BTreeMap::new();
    for &(i, j) in edges {
        incident.entry(i).or_default().push((i, j));
        incident.entry(j).or_default().push((i, j));
    }

    let mut cuts = Vec::new();
    for (a, b) in model.conflicts().iter() {
        let (Some(near_a), Some(near_b)) = (incident.get(&a), incident.get(&b)) else {
            continue;
        };
        for &e in near_a {
            for &f in near_b {
                if e != f {
                    cuts.push(Cut {
                        edges: vec![e, f],
                        cap: 1,
                    });
                }
            }
        }
    }
    cuts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{instance_from, model_for};

    fn solve(model: &EdgeModel) -> SolveOutcome {
        MilpSolver::default().solve(model).unwrap()
    }

    #[test]
    fn trivial_model_is_optimal_and_empty() {
        let model = model_for(&instance_from(&["H 1 a"]));
        assert_eq!(
            solve(&model),
            SolveOutcome::Optimal {
                edges: vec![],
                objective: 0
            }
        );
    }

    #[test]
    fn two_slides_select_the_single_worthwhile_edge() {
        let model = model_for(&instance_from(&["H 2 a b", "H 2 b c"]));
        match solve(&model) {
            SolveOutcome::Optimal { edges, objective } => {
                assert_eq!(objective, 1);
                assert_eq!(edges.len(), 1);
                let (i, j) = edges[0];
                assert_eq!((i.min(j), i.max(j)), (0, 1));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn degree_constraints_hold_on_a_chainable_instance() {
        let model = model_for(&instance_from(&[
            "H 2 a b", "H 2 b c", "H 2 c d", "H 2 d e",
        ]));
        let SolveOutcome::Optimal { edges, objective } = solve(&model) else {
            panic!("expected optimal");
        };
        // Each consecutive pair scores 1; a full chain collects 3.
        assert_eq!(objective, 3);
        for node in 0..model.n() {
            assert!(edges.iter().filter(|&&(i, _)| i == node).count() <= 1);
            assert!(edges.iter().filter(|&&(_, j)| j == node).count() <= 1);
        }
        for &(i, j) in &edges {
            assert!(!edges.contains(&(j, i)), "2-cycle {i}<->{j}");
        }
    }

    #[test]
    fn conflicting_slides_are_never_adjacent() {
        // Three vertical photos sharing tags: every pair-slide conflicts
        // with every other, so at most... no edge may be selected at all.
        let model = model_for(&instance_from(&["V 2 a b", "V 2 b c", "V 2 c a"]));
        let SolveOutcome::Optimal { edges, objective } = solve(&model) else {
            panic!("expected optimal");
        };
        assert!(edges.is_empty());
        assert_eq!(objective, 0);
    }

    #[test]
    fn cyclic_optimum_is_cut_back_to_a_path() {
        // Pairwise every transition scores 1, so a 3-cycle would collect 3
        // while the best open path collects 2. The returned edges must be
        // the path, and they must linearize without repeating a slide.
        let model = model_for(&instance_from(&["H 2 a b", "H 2 b c", "H 2 c a"]));
        let SolveOutcome::Optimal { edges, objective } = solve(&model) else {
            panic!("expected optimal");
        };
        assert_eq!(objective, 2);
        assert_eq!(edges.len(), 2);
        let order = crate::sequence::linearize(&edges).unwrap();
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn photo_sharing_slides_are_never_jointly_selected() {
        // Three vertical photos form three pair-slides that each share a
        // photo with the other two. Using them all, even far apart in the
        // sequence, would show a photo twice; only one may survive.
        let model = model_for(&instance_from(&[
            "H 3 a b p",
            "H 3 c d q",
            "V 2 p q",
            "V 2 r s",
            "V 2 p t",
        ]));
        let SolveOutcome::Optimal { edges, objective } = solve(&model) else {
            panic!("expected optimal");
        };
        let touched: std::collections::BTreeSet<SlideId> =
            edges.iter().flat_map(|&(i, j)| [i, j]).collect();
        for (a, b) in model.conflicts().iter() {
            assert!(
                !(touched.contains(&a) && touched.contains(&b)),
                "slides {a} and {b} share a photo but were both selected"
            );
        }
        // Two horizontal slides plus at most one pair-slide: a 3-node
        // chain of weight-1 transitions.
        assert_eq!(objective, 2);
    }

    #[test]
    fn generous_time_budget_still_reaches_optimality() {
        let model = model_for(&instance_from(&["H 2 a b", "H 2 b c"]));
        let solver = MilpSolver::new(Some(Duration::from_secs(60)));
        match solver.solve(&model).unwrap() {
            SolveOutcome::Optimal { objective, .. } => assert_eq!(objective, 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
