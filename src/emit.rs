//! Solution persistence.
//!
//! Stage 8 of the pipeline. Renders a final slide ordering into the solution
//! file format and writes it next to a machine-readable JSON run summary.
//! Also parses solution files back — the validator reads them through the
//! same code that defines the format.
//!
//! ## Solution Format
//!
//! ```text
//! 3        # slide count S
//! 2        # horizontal slide: one photo index
//! 0 3      # vertical pair: two photo indices
//! 1
//! ```
//!
//! ## Naming
//!
//! Solutions are named `<instance-file-name>_solution_<objective>.txt` in
//! the chosen output directory. The instance path is threaded in as an
//! explicit parameter; nothing here reads global state.

use crate::slides::{Slide, SlideDeck, SlideId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("solution file: missing slide count on first line")]
    MissingCount,
    #[error("solution file line 1: slide count is not a number: {0:?}")]
    BadCount(String),
    #[error("solution file line {line}: expected one or two photo indices, found {found}")]
    BadRow { line: usize, found: usize },
    #[error("solution file line {line}: photo index is not a number")]
    BadIndex { line: usize },
    #[error("solution file declares {declared} slides but contains {actual}")]
    RowCountMismatch { declared: usize, actual: usize },
}

/// One row of a solution file: a placed slide, by photo indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolutionSlide {
    Single(usize),
    Pair(usize, usize),
}

/// Machine-readable record of one run, written beside the solution file.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub instance: String,
    pub photos: usize,
    pub candidate_slides: usize,
    pub placed_slides: usize,
    pub objective: u64,
    /// False when the solver stopped at a feasible incumbent.
    pub proven_optimal: bool,
    pub sequence: Vec<SlideId>,
}

/// `<instance-file-name>_solution_<objective>.txt`
pub fn solution_file_name(instance_path: &Path, objective: u64) -> String {
    let stem = instance_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "instance".to_string());
    format!("{stem}_solution_{objective}.txt")
}

/// Render an ordering into the solution format.
pub fn render_solution(deck: &SlideDeck, order: &[SlideId]) -> String {
    let mut text = format!("{}\n", order.len());
    for &id in order {
        match deck.slides[id] {
            Slide::Horizontal(p) => text.push_str(&format!("{p}\n")),
            Slide::VerticalPair(a, b) => text.push_str(&format!("{a} {b}\n")),
        }
    }
    text
}

/// Write the solution file; returns its path.
pub fn write_solution(
    out_dir: &Path,
    instance_path: &Path,
    deck: &SlideDeck,
    order: &[SlideId],
    objective: u64,
) -> Result<PathBuf, EmitError> {
    let path = out_dir.join(solution_file_name(instance_path, objective));
    let text = render_solution(deck, order);
    fs::write(&path, text).map_err(|source| EmitError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Write the JSON run summary; returns its path.
pub fn write_summary(out_dir: &Path, summary: &RunSummary) -> Result<PathBuf, EmitError> {
    let path = out_dir.join(format!("{}_run.json", summary.instance));
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(&path, json).map_err(|source| EmitError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

pub fn read_solution(path: &Path) -> Result<Vec<SolutionSlide>, EmitError> {
    let text = fs::read_to_string(path).map_err(|source| EmitError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_solution(&text)
}

pub fn parse_solution(text: &str) -> Result<Vec<SolutionSlide>, EmitError> {
    let mut lines = text.lines();
    let count_line = lines.next().ok_or(EmitError::MissingCount)?;
    let declared: usize = count_line
        .trim()
        .parse()
        .map_err(|_| EmitError::BadCount(count_line.trim().to_string()))?;

    let mut rows = Vec::with_capacity(declared);
    for (i, raw) in lines.enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let line = i + 2;
        let indices: Vec<usize> = raw
            .split_whitespace()
            .map(|t| t.parse().map_err(|_| EmitError::BadIndex { line }))
            .collect::<Result<_, _>>()?;
        match indices[..] {
            [p] => rows.push(SolutionSlide::Single(p)),
            [a, b] => rows.push(SolutionSlide::Pair(a, b)),
            _ => {
                return Err(EmitError::BadRow {
                    line,
                    found: indices.len(),
                });
            }
        }
    }

    if rows.len() != declared {
        return Err(EmitError::RowCountMismatch {
            declared,
            actual: rows.len(),
        });
    }
    Ok(rows)
}
