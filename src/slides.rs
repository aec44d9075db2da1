//! Candidate slide generation.
//!
//! Stage 2 of the pipeline. Expands the photo catalog into the universe of
//! candidate slides the optimizer chooses from: every horizontal photo is a
//! slide on its own, and every unordered pair of vertical photos is a
//! candidate slide (the optimizer decides which pairings survive).
//!
//! ## Index Layout
//!
//! Slide indices are contiguous and stable across re-runs on the same
//! instance:
//!
//! ```text
//! [0, H)      horizontal slides, in photo-load order
//! [H, H + C)  vertical pairs, lexicographic (i, j) with i < j over the
//!             vertical photos' enumeration order; C = V*(V-1)/2
//! ```
//!
//! Everything downstream — the score matrix, the conflict set, the solver's
//! edge variables, the final sequence — is keyed by these indices, so the
//! enumeration order here is a contract, not an implementation detail.

use crate::instance::Instance;
use serde::Serialize;
use std::collections::BTreeSet;

/// Index into the candidate-slide universe.
pub type SlideId = usize;

/// One candidate slide: a horizontal photo, or an unordered vertical pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Slide {
    Horizontal(usize),
    /// Two distinct vertical photo ids, stored with the lower id first.
    VerticalPair(usize, usize),
}

impl Slide {
    /// Constituent photo ids (one or two).
    pub fn photos(&self) -> impl Iterator<Item = usize> + '_ {
        let (first, second) = match *self {
            Slide::Horizontal(p) => (p, None),
            Slide::VerticalPair(a, b) => (a, Some(b)),
        };
        std::iter::once(first).chain(second)
    }

    /// Derived tag set: union of the constituent photos' tags.
    pub fn tags<'a>(&self, instance: &'a Instance) -> BTreeSet<&'a str> {
        self.photos()
            .flat_map(|p| instance.photos[p].tags.iter().map(String::as_str))
            .collect()
    }

    pub fn shares_photo(&self, other: &Slide) -> bool {
        self.photos().any(|p| other.photos().any(|q| p == q))
    }
}

/// The full candidate-slide universe for one instance.
#[derive(Debug, Clone, Serialize)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
    /// H — slides below this index are horizontal, at or above are pairs.
    pub horizontal_count: usize,
}

impl SlideDeck {
    pub fn build(instance: &Instance) -> SlideDeck {
        let horizontal = instance.horizontal_ids();
        let vertical = instance.vertical_ids();

        let pair_count = vertical.len() * vertical.len().saturating_sub(1) / 2;
        let mut slides = Vec::with_capacity(horizontal.len() + pair_count);

        slides.extend(horizontal.iter().map(|&p| Slide::Horizontal(p)));
        for (i, &a) in vertical.iter().enumerate() {
            for &b in &vertical[i + 1..] {
                slides.push(Slide::VerticalPair(a, b));
            }
        }

        SlideDeck {
            slides,
            horizontal_count: horizontal.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Indices of the vertical-pair slides, `[H, N)`.
    pub fn vertical_pair_range(&self) -> std::ops::Range<SlideId> {
        self.horizontal_count..self.slides.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::instance_from;

    #[test]
    fn horizontal_slides_come_first_in_load_order() {
        let inst = instance_from(&["V 1 a", "H 1 b", "H 1 c", "V 1 d"]);
        let deck = SlideDeck::build(&inst);
        assert_eq!(deck.horizontal_count, 2);
        assert_eq!(deck.slides[0], Slide::Horizontal(1));
        assert_eq!(deck.slides[1], Slide::Horizontal(2));
    }

    #[test]
    fn vertical_pairs_are_lexicographic_and_unique() {
        let inst = instance_from(&["V 1 a", "V 1 b", "V 1 c"]);
        let deck = SlideDeck::build(&inst);
        assert_eq!(
            deck.slides,
            vec![
                Slide::VerticalPair(0, 1),
                Slide::VerticalPair(0, 2),
                Slide::VerticalPair(1, 2),
            ]
        );

        let mut seen = std::collections::BTreeSet::new();
        for s in &deck.slides {
            match *s {
                Slide::VerticalPair(a, b) => {
                    assert!(a < b);
                    assert!(seen.insert((a, b)), "pair generated twice");
                }
                Slide::Horizontal(_) => unreachable!(),
            }
        }
    }

    #[test]
    fn deck_size_is_h_plus_pairs() {
        let inst = instance_from(&["H 1 a", "H 1 b", "V 1 c", "V 1 d", "V 1 e"]);
        let deck = SlideDeck::build(&inst);
        assert_eq!(deck.len(), 2 + 3);
        assert_eq!(deck.vertical_pair_range(), 2..5);
    }

    #[test]
    fn all_horizontal_or_all_vertical_is_valid() {
        let only_h = SlideDeck::build(&instance_from(&["H 1 a", "H 1 b"]));
        assert_eq!(only_h.len(), 2);
        assert!(only_h.vertical_pair_range().is_empty());

        let only_v = SlideDeck::build(&instance_from(&["V 1 a", "V 1 b"]));
        assert_eq!(only_v.len(), 1);
        assert_eq!(only_v.horizontal_count, 0);
    }

    #[test]
    fn single_vertical_photo_yields_no_pair() {
        let deck = SlideDeck::build(&instance_from(&["V 1 a"]));
        assert!(deck.is_empty());
    }

    #[test]
    fn slide_tags_are_union_of_photo_tags() {
        let inst = instance_from(&["V 2 a b", "V 2 b c"]);
        let deck = SlideDeck::build(&inst);
        let tags = deck.slides[0].tags(&inst);
        assert_eq!(tags, ["a", "b", "c"].into_iter().collect());
    }

    #[test]
    fn rebuild_is_deterministic() {
        let inst = instance_from(&["H 1 a", "V 1 b", "V 1 c", "H 1 d"]);
        assert_eq!(SlideDeck::build(&inst).slides, SlideDeck::build(&inst).slides);
    }
}
