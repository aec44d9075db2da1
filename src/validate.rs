//! Independent solution checking.
//!
//! Deliberately not built on the pipeline's deck or score matrix: the
//! checker re-derives everything from the raw photo catalog and the solution
//! rows, so it can cross-check the core instead of inheriting its bugs. The
//! score recomputation counts common tags by subtraction
//! (`|Ta| - |Ta \ Tb|`) rather than intersecting, a second route to the
//! same number.
//!
//! Violations are typed values collected into a report, never printed and
//! swallowed — the CLI decides how to render them and exits non-zero when
//! any are present.

use crate::emit::SolutionSlide;
use crate::instance::{Instance, Orientation};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// A hard-constraint violation, located by 0-based solution row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("row {row}: photo {photo} does not exist in the instance")]
    PhotoOutOfRange { row: usize, photo: usize },
    #[error("row {row}: photo {photo} is not horizontal but stands alone")]
    NotHorizontal { row: usize, photo: usize },
    #[error("row {row}: photo {photo} is not vertical but is paired")]
    NotVertical { row: usize, photo: usize },
    #[error("row {row}: photo {photo} paired with itself")]
    SelfPaired { row: usize, photo: usize },
    #[error("photo {photo} is used by {count} slides")]
    PhotoReused { photo: usize, count: usize },
}

/// Outcome of validating one solution against one instance.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Independently recomputed total transition interest.
    pub score: u64,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

pub fn validate(instance: &Instance, rows: &[SolutionSlide]) -> ValidationReport {
    let mut violations = Vec::new();
    let mut usage: BTreeMap<usize, usize> = BTreeMap::new();

    for (row, slide) in rows.iter().enumerate() {
        match *slide {
            SolutionSlide::Single(p) => {
                if let Some(photo) = check_range(instance, row, p, &mut violations) {
                    usage.entry(p).and_modify(|c| *c += 1).or_insert(1);
                    if photo != Orientation::Horizontal {
                        violations.push(Violation::NotHorizontal { row, photo: p });
                    }
                }
            }
            SolutionSlide::Pair(a, b) => {
                if a == b {
                    violations.push(Violation::SelfPaired { row, photo: a });
                }
                for p in [a, b] {
                    if let Some(photo) = check_range(instance, row, p, &mut violations) {
                        usage.entry(p).and_modify(|c| *c += 1).or_insert(1);
                        if photo != Orientation::Vertical {
                            violations.push(Violation::NotVertical { row, photo: p });
                        }
                    }
                }
            }
        }
    }

    for (&photo, &count) in &usage {
        if count > 1 {
            violations.push(Violation::PhotoReused { photo, count });
        }
    }

    ValidationReport {
        score: recompute_score(instance, rows),
        violations,
    }
}

fn check_range(
    instance: &Instance,
    row: usize,
    photo: usize,
    violations: &mut Vec<Violation>,
) -> Option<Orientation> {
    match instance.photos.get(photo) {
        Some(p) => Some(p.orientation),
        None => {
            violations.push(Violation::PhotoOutOfRange { row, photo });
            None
        }
    }
}

/// Total transition interest over consecutive rows. Rows referencing
/// nonexistent photos contribute no transitions.
fn recompute_score(instance: &Instance, rows: &[SolutionSlide]) -> u64 {
    let tags: Vec<Option<BTreeSet<&str>>> = rows.iter().map(|s| row_tags(instance, s)).collect();
    tags.windows(2)
        .map(|w| match (&w[0], &w[1]) {
            (Some(a), Some(b)) => interest(a, b),
            _ => 0,
        })
        .sum()
}

fn row_tags<'a>(instance: &'a Instance, slide: &SolutionSlide) -> Option<BTreeSet<&'a str>> {
    let (first, second) = match *slide {
        SolutionSlide::Single(p) => (p, None),
        SolutionSlide::Pair(a, b) => (a, Some(b)),
    };
    let mut tags = BTreeSet::new();
    for p in std::iter::once(first).chain(second) {
        let photo = instance.photos.get(p)?;
        tags.extend(photo.tags.iter().map(String::as_str));
    }
    Some(tags)
}

fn interest(a: &BTreeSet<&str>, b: &BTreeSet<&str>) -> u64 {
    let only_a = a.difference(b).count();
    let only_b = b.difference(a).count();
    let common = a.len() - only_a;
    only_a.min(only_b).min(common) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoreMatrix;
    use crate::slides::SlideDeck;
    use crate::test_helpers::instance_from;

    fn demo() -> Instance {
        instance_from(&["H 2 a b", "H 2 b c", "V 1 a", "V 1 c"])
    }

    #[test]
    fn valid_solution_has_no_violations() {
        let report = validate(
            &demo(),
            &[
                SolutionSlide::Single(0),
                SolutionSlide::Single(1),
                SolutionSlide::Pair(2, 3),
            ],
        );
        assert!(report.is_valid());
    }

    #[test]
    fn score_matches_hand_computation() {
        // {a,b} -> {b,c}: min(1,1,1)=1; {b,c} -> {a,c}: min(1,1,1)=1
        let report = validate(
            &demo(),
            &[
                SolutionSlide::Single(0),
                SolutionSlide::Single(1),
                SolutionSlide::Pair(2, 3),
            ],
        );
        assert_eq!(report.score, 2);
    }

    #[test]
    fn score_agrees_with_core_score_matrix() {
        let inst = demo();
        let deck = SlideDeck::build(&inst);
        let scores = ScoreMatrix::compute(&deck, &inst);

        // Deck order 0,1,2 corresponds to rows Single(0), Single(1), Pair(2,3).
        let order = [0, 1, 2];
        let rows = [
            SolutionSlide::Single(0),
            SolutionSlide::Single(1),
            SolutionSlide::Pair(2, 3),
        ];
        assert_eq!(validate(&inst, &rows).score, scores.sequence_score(&order));
    }

    #[test]
    fn vertical_photo_standing_alone_is_flagged() {
        let report = validate(&demo(), &[SolutionSlide::Single(2)]);
        assert_eq!(
            report.violations,
            vec![Violation::NotHorizontal { row: 0, photo: 2 }]
        );
    }

    #[test]
    fn horizontal_photo_in_a_pair_is_flagged() {
        let report = validate(&demo(), &[SolutionSlide::Pair(0, 3)]);
        assert_eq!(
            report.violations,
            vec![Violation::NotVertical { row: 0, photo: 0 }]
        );
    }

    #[test]
    fn photo_reuse_across_slides_is_flagged() {
        let report = validate(
            &demo(),
            &[SolutionSlide::Single(0), SolutionSlide::Single(0)],
        );
        assert_eq!(
            report.violations,
            vec![Violation::PhotoReused { photo: 0, count: 2 }]
        );
    }

    #[test]
    fn self_paired_photo_is_flagged() {
        let report = validate(&demo(), &[SolutionSlide::Pair(2, 2)]);
        assert!(
            report
                .violations
                .contains(&Violation::SelfPaired { row: 0, photo: 2 })
        );
        assert!(
            report
                .violations
                .contains(&Violation::PhotoReused { photo: 2, count: 2 })
        );
    }

    #[test]
    fn out_of_range_photo_is_flagged_not_fatal() {
        let report = validate(&demo(), &[SolutionSlide::Single(0), SolutionSlide::Single(99)]);
        assert_eq!(
            report.violations,
            vec![Violation::PhotoOutOfRange { row: 1, photo: 99 }]
        );
        assert_eq!(report.score, 0);
    }

    #[test]
    fn empty_solution_is_valid_with_zero_score() {
        let report = validate(&demo(), &[]);
        assert!(report.is_valid());
        assert_eq!(report.score, 0);
    }
}
