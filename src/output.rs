//! CLI output formatting.
//!
//! Each surface has a `format_*` function returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout. Format functions are pure — no
//! I/O, no side effects — so tests assert on lines instead of capturing
//! stdout.
//!
//! Display is information-first: counts and scores lead, file paths follow
//! as indented context.

use crate::instance::Instance;
use crate::slides::SlideDeck;
use crate::solver::SolveOutcome;
use crate::validate::ValidationReport;
use std::path::Path;

pub fn format_instance_summary(instance: &Instance, deck: &SlideDeck) -> Vec<String> {
    let horizontal = instance.horizontal_ids().len();
    let vertical = instance.vertical_ids().len();
    let pairs = deck.len() - deck.horizontal_count;
    vec![
        format!(
            "Photos: {} ({} horizontal, {} vertical)",
            instance.len(),
            horizontal,
            vertical
        ),
        format!(
            "Candidate slides: {} ({} horizontal, {} vertical pairs)",
            deck.len(),
            deck.horizontal_count,
            pairs
        ),
    ]
}

pub fn print_instance_summary(instance: &Instance, deck: &SlideDeck) {
    for line in format_instance_summary(instance, deck) {
        println!("{line}");
    }
}

/// Render a solve outcome. The solution path is only present when a usable
/// edge set came back and was written out.
pub fn format_outcome(
    outcome: &SolveOutcome,
    placed: usize,
    solution_path: Option<&Path>,
) -> Vec<String> {
    let mut lines = Vec::new();
    match outcome {
        SolveOutcome::Optimal { objective, .. } => {
            lines.push(format!("Objective: {objective} (proven optimal)"));
            lines.push(format!("Slides placed: {placed}"));
        }
        SolveOutcome::Feasible { objective, .. } => {
            lines.push(format!(
                "Objective: {objective} (feasible, NOT proven optimal)"
            ));
            lines.push(format!("Slides placed: {placed}"));
        }
        SolveOutcome::Infeasible => {
            lines.push("No feasible slide ordering exists for this model".to_string());
        }
        SolveOutcome::TimedOut => {
            lines.push("Time budget elapsed before the solver found any ordering".to_string());
        }
    }
    if let Some(path) = solution_path {
        lines.push(format!("    Solution: {}", path.display()));
    }
    lines
}

pub fn print_outcome(outcome: &SolveOutcome, placed: usize, solution_path: Option<&Path>) {
    for line in format_outcome(outcome, placed, solution_path) {
        println!("{line}");
    }
}

pub fn format_validation_report(report: &ValidationReport) -> Vec<String> {
    let mut lines = vec![format!("Score: {}", report.score)];
    if report.is_valid() {
        lines.push("Solution is valid".to_string());
    } else {
        lines.push(format!("{} violation(s):", report.violations.len()));
        for violation in &report.violations {
            lines.push(format!("    {violation}"));
        }
    }
    lines
}

pub fn print_validation_report(report: &ValidationReport) {
    for line in format_validation_report(report) {
        println!("{line}");
    }
}
