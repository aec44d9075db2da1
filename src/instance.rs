//! Instance file parsing and the photo catalog.
//!
//! Stage 1 of the slidereel pipeline. Reads a plain-text instance file into
//! an immutable [`Instance`] that every later stage consumes.
//!
//! ## Instance Format
//!
//! ```text
//! 4                  # photo count P
//! H 2 beach sunset   # orientation, tag count, tags
//! V 1 cat
//! V 1 dog
//! H 3 beach cat dog
//! ```
//!
//! Photo identity is the 0-based line order and never changes afterwards —
//! slide indices, solution files, and the validator all refer back to it.
//!
//! ## Validation
//!
//! Parsing is fail-fast: a malformed line aborts with a typed error carrying
//! the 1-based line number, and no partial catalog is ever produced. Checked
//! per line: orientation letter is `H` or `V`, the tag count is present and
//! numeric, and the declared tag count matches the tags actually listed.
//! The photo count must account for the whole file: too few records is
//! [`InstanceError::Truncated`], non-blank content past the last declared
//! record is [`InstanceError::TrailingContent`].

use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("missing photo count on first line")]
    MissingCount,
    #[error("line 1: photo count is not a number: {0:?}")]
    BadCount(String),
    #[error("line {line}: empty photo record")]
    EmptyRecord { line: usize },
    #[error("line {line}: unknown orientation {token:?} (expected H or V)")]
    UnknownOrientation { line: usize, token: String },
    #[error("line {line}: missing or non-numeric tag count")]
    BadTagCount { line: usize },
    #[error("line {line}: declared {declared} tags but found {actual}")]
    TagCountMismatch {
        line: usize,
        declared: usize,
        actual: usize,
    },
    #[error("instance declares {declared} photos but only {actual} records follow")]
    Truncated { declared: usize, actual: usize },
    #[error("line {line}: unexpected content after the declared photo records")]
    TrailingContent { line: usize },
}

/// Photo orientation, as written in the instance file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A single photo record. Read-only after load.
#[derive(Debug, Clone, Serialize)]
pub struct Photo {
    /// 0-based index in instance-file order.
    pub id: usize,
    pub orientation: Orientation,
    pub tags: BTreeSet<String>,
}

/// The full photo catalog for one run.
#[derive(Debug, Clone, Serialize)]
pub struct Instance {
    pub photos: Vec<Photo>,
}

impl Instance {
    pub fn from_file(path: &Path) -> Result<Self, InstanceError> {
        let text = fs::read_to_string(path).map_err(|source| InstanceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, InstanceError> {
        let mut lines = text.lines();

        let count_line = lines.next().ok_or(InstanceError::MissingCount)?;
        let declared: usize = count_line
            .trim()
            .parse()
            .map_err(|_| InstanceError::BadCount(count_line.trim().to_string()))?;

        let mut photos = Vec::with_capacity(declared);
        for id in 0..declared {
            let raw = lines.next().ok_or(InstanceError::Truncated {
                declared,
                actual: photos.len(),
            })?;
            // 1-based, counting the header line
            photos.push(parse_photo(id, id + 2, raw)?);
        }

        // The declared count is the whole file; anything non-blank after the
        // last record is a malformed instance, not padding.
        for (offset, raw) in lines.enumerate() {
            if !raw.trim().is_empty() {
                return Err(InstanceError::TrailingContent {
                    line: declared + 2 + offset,
                });
            }
        }

        Ok(Instance { photos })
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Horizontal photo ids in load order.
    pub fn horizontal_ids(&self) -> Vec<usize> {
        self.ids_with(Orientation::Horizontal)
    }

    /// Vertical photo ids in load order.
    pub fn vertical_ids(&self) -> Vec<usize> {
        self.ids_with(Orientation::Vertical)
    }

    fn ids_with(&self, orientation: Orientation) -> Vec<usize> {
        self.photos
            .iter()
            .filter(|p| p.orientation == orientation)
            .map(|p| p.id)
            .collect()
    }
}

fn parse_photo(id: usize, line: usize, raw: &str) -> Result<Photo, InstanceError> {
    let mut tokens = raw.split_whitespace();

    let orientation = match tokens.next() {
        None => return Err(InstanceError::EmptyRecord { line }),
        Some("H") => Orientation::Horizontal,
        Some("V") => Orientation::Vertical,
        Some(other) => {
            return Err(InstanceError::UnknownOrientation {
                line,
                token: other.to_string(),
            });
        }
    };

    let declared: usize = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or(InstanceError::BadTagCount { line })?;

    let tags: BTreeSet<String> = tokens.map(str::to_string).collect();
    // Duplicate tags on one photo collapse in the set; count against the
    // original token count so a genuine mismatch still surfaces.
    let actual = raw.split_whitespace().count() - 2;
    if actual != declared {
        return Err(InstanceError::TagCountMismatch {
            line,
            declared,
            actual,
        });
    }

    Ok(Photo {
        id,
        orientation,
        tags,
    })
}
