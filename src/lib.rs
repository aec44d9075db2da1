//! # slidereel
//!
//! Orders a photo slideshow to maximize "transition interest" — the reward
//! for consecutive slides that share some tags but not too many — by
//! formulating slide sequencing as a maximum-weight edge-selection problem
//! and handing it to an exact MILP solver.
//!
//! A slide is one horizontal photo, or a pair of vertical photos shown
//! together. Selecting edges between slides under degree, anti-symmetry,
//! and photo-sharing constraints yields vertex-disjoint directed paths; the
//! reconstructor linearizes them into the final show.
//!
//! # Architecture: Staged Pipeline
//!
//! Each stage is a pure function from its predecessor's immutable output —
//! unit tests exercise any stage without files or a solver in the loop:
//!
//! ```text
//! instance file → Instance → SlideDeck → ScoreMatrix ┐
//!                                      → ConflictSet ┴→ EdgeModel
//! EdgeModel → [external MILP solver] → selected edges
//! selected edges → linearize → slide ordering → solution file
//! ```
//!
//! The solver is a collaborator behind a narrow trait
//! ([`solver::EdgeSolver`]), not part of the core: the crate's real content
//! is the problem-to-model transformation and the solution-to-sequence
//! reconstruction on either side of that call.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`instance`] | Instance-file parsing into the immutable photo catalog |
//! | [`slides`] | Candidate-slide universe: horizontal slides, vertical pairs |
//! | [`scoring`] | Dense pairwise transition-interest matrix (rayon-parallel) |
//! | [`conflicts`] | Slide pairs sharing a photo, at most one may be shown |
//! | [`model`] | Backend-agnostic binary edge-selection model |
//! | [`solver`] | `EdgeSolver` trait + good_lp MILP backend with time budget |
//! | [`sequence`] | Edge-set linearization with defensive consistency checks |
//! | [`emit`] | Solution-file writing/parsing and the JSON run summary |
//! | [`validate`] | Independent score recomputation and constraint checking |
//! | [`output`] | CLI display: pure `format_*` functions, `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## Dense Matrix Over Pair Map
//!
//! Transition scores live in a flattened `N*N` matrix rather than a map
//! keyed by slide pair. Candidate counts are small (every horizontal photo
//! plus every vertical pair), pairwise scans are exhaustive anyway, and
//! indexed reads keep the solver translation and the reconstructor free of
//! hashing.
//!
//! ## Pure-Rust Solving
//!
//! The MILP backend is good_lp over `microlp` — no system CBC, SCIP, or
//! Gurobi install. The binary is fully self-contained, and swapping in a
//! stronger backend is a `Cargo.toml` feature choice, not a code change,
//! because the model never leaves its backend-agnostic form outside
//! [`solver`].
//!
//! ## Independent Validation
//!
//! [`validate`] shares no pipeline code: it recomputes the score from raw
//! photo records by a different derivation and re-checks every hard
//! constraint from scratch. A bug in the core cannot hide from a checker
//! that does not import it.

pub mod conflicts;
pub mod emit;
pub mod instance;
pub mod model;
pub mod output;
pub mod scoring;
pub mod sequence;
pub mod slides;
pub mod solver;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
