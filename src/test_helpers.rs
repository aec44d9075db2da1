//! Shared test utilities for the slidereel test suite.
//!
//! Builds tiny instances and pipeline stages from photo-record literals so
//! tests state their catalog inline instead of shipping fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let inst = instance_from(&["H 2 a b", "V 1 c"]);
//! let model = model_for(&inst);
//! ```

use crate::conflicts::ConflictSet;
use crate::instance::Instance;
use crate::model::EdgeModel;
use crate::scoring::ScoreMatrix;
use crate::slides::SlideDeck;

/// Build an [`Instance`] from photo-record lines, prepending the count.
pub fn instance_from(records: &[&str]) -> Instance {
    let mut text = format!("{}\n", records.len());
    for record in records {
        text.push_str(record);
        text.push('\n');
    }
    Instance::parse(&text).expect("test instance parses")
}

/// Run the model-building half of the pipeline on an instance.
pub fn model_for(instance: &Instance) -> EdgeModel {
    let deck = SlideDeck::build(instance);
    let scores = ScoreMatrix::compute(&deck, instance);
    let conflicts = ConflictSet::detect(&deck);
    EdgeModel::build(&deck, scores, conflicts)
}
