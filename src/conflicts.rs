//! Photo-sharing conflict detection.
//!
//! Stage 4 of the pipeline. Two candidate slides conflict when they
//! reference a common photo — at most one of them can ever be placed, so
//! the model forbids their mutual adjacency outright.
//!
//! Only vertical-pair slides are scanned: two distinct horizontal slides
//! hold distinct photos by construction of the deck, and a horizontal slide
//! never shares a photo with a vertical pair. The scan is the plain O(C²)
//! pairwise intersection test over the pair slides.

use crate::slides::{SlideDeck, SlideId};
use std::collections::BTreeSet;

/// Unordered slide-index pairs whose photo sets intersect.
///
/// Symmetric and irreflexive; pairs are stored `(a, b)` with `a < b`.
#[derive(Debug, Clone, Default)]
pub struct ConflictSet {
    pairs: BTreeSet<(SlideId, SlideId)>,
}

impl ConflictSet {
    pub fn detect(deck: &SlideDeck) -> ConflictSet {
        let mut pairs = BTreeSet::new();
        let range = deck.vertical_pair_range();
        for a in range.clone() {
            for b in a + 1..range.end {
                if deck.slides[a].shares_photo(&deck.slides[b]) {
                    pairs.insert((a, b));
                }
            }
        }
        ConflictSet { pairs }
    }

    pub fn contains(&self, a: SlideId, b: SlideId) -> bool {
        self.pairs.contains(&(a.min(b), a.max(b)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlideId, SlideId)> + '_ {
        self.pairs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
