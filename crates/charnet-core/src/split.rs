//! Decomposition of multi-perspective books into sub-documents.
//!
//! # Overview
//!
//! A multi-perspective text annotates each narrated passage with a pair of
//! markers:
//!
//! ```text
//! [START_<book>_<character>_<label>] ... [END_<book>_<character>_<label>]
//! ```
//!
//! The label is `pers3` for a third-person passage. Any other label marks a
//! first-person passage, and is normally the narrator's name.
//!
//! # Algorithm
//!
//! 1. Find the next START marker.
//! 2. The body runs up to the first `[END` after it, across line breaks.
//! 3. The END marker must repeat the START fields exactly.
//!
//! A START without a well-formed END is not a region and is skipped.
//! Regions become sub-documents numbered from 1 in reading order.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, ErrorCode, Result};
use crate::model::{Book, CharacterId, Perspective};

/// Perspective label of a third-person passage.
pub const THIRD_PERSON_LABEL: &str = "pers3";

const END_PREFIX: &str = "[END";

static START_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[START_(\d+)_(\d+)_([^\]]+)\]").expect("start marker pattern")
});

static END_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A\[END_(\d+)_(\d+)_([^\]]+)\]").expect("end marker pattern")
});

/// Fields of a START or END marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerFields {
    pub book: String,
    pub character: String,
    pub label: String,
}

impl MarkerFields {
    fn from_captures(caps: &regex::Captures<'_>) -> Self {
        let field = |i| caps.get(i).map_or("", |m| m.as_str()).to_string();
        Self {
            book: field(1),
            character: field(2),
            label: field(3),
        }
    }

    /// Perspective of a passage with this label.
    #[must_use]
    pub fn perspective(&self) -> Perspective {
        if self.label == THIRD_PERSON_LABEL {
            Perspective::ThirdPerson
        } else {
            Perspective::FirstPerson
        }
    }
}

/// One annotated passage, before START/END agreement is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerspectiveRegion<'a> {
    pub start: MarkerFields,
    pub end: MarkerFields,
    pub body: &'a str,
}

impl PerspectiveRegion<'_> {
    fn mismatch(&self) -> Option<String> {
        let (s, e) = (&self.start, &self.end);
        if s.book != e.book {
            Some(format!("start book id {} does not equal end book id {}", s.book, e.book))
        } else if s.character != e.character {
            Some(format!(
                "start character id {} does not equal end character id {}",
                s.character, e.character
            ))
        } else if s.label != e.label {
            Some(format!(
                "start perspective {} does not equal end perspective {}",
                s.label, e.label
            ))
        } else {
            None
        }
    }
}

/// All START/END regions of `text` in reading order.
#[must_use]
pub fn find_regions(text: &str) -> Vec<PerspectiveRegion<'_>> {
    let mut regions = Vec::new();
    let mut cursor = 0;
    while let Some(start) = START_MARKER.captures_at(text, cursor) {
        let Some(whole) = start.get(0) else { break };
        let body_start = whole.end();
        let Some(offset) = text[body_start..].find(END_PREFIX) else {
            warn!(marker = whole.as_str(), "START marker without END marker");
            break;
        };
        let end_at = body_start + offset;
        match END_MARKER.captures(&text[end_at..]) {
            Some(end) => {
                let end_len = end.get(0).map_or(0, |m| m.len());
                regions.push(PerspectiveRegion {
                    start: MarkerFields::from_captures(&start),
                    end: MarkerFields::from_captures(&end),
                    body: &text[body_start..end_at],
                });
                cursor = end_at + end_len;
            }
            None => {
                warn!(marker = whole.as_str(), "malformed END marker, skipping region");
                cursor = body_start;
            }
        }
    }
    regions
}

/// Split a multi-perspective book into its sub-documents.
///
/// Sub-documents share the parent's characters. A first-person passage is
/// narrated by the character named by its label or, failing that, by the
/// character whose id the marker carries.
///
/// # Errors
///
/// Returns a data consistency error naming the parent book when START and
/// END markers disagree, or when a first-person passage has no narrator.
pub fn split_multi_perspective(book: &Book) -> Result<Vec<Book>> {
    let regions = find_regions(book.text());
    let mut subs = Vec::with_capacity(regions.len());
    for (region, part) in regions.iter().zip(1u32..) {
        if let Some(detail) = region.mismatch() {
            return Err(Error::consistency(
                book.id,
                ErrorCode::PerspectiveMarkerMismatch,
                detail,
            ));
        }
        let perspective = region.start.perspective();
        let narrator = match perspective {
            Perspective::FirstPerson => Some(resolve_narrator(book, &region.start)?),
            _ => None,
        };
        let sub = book.sub_document(part, perspective, region.body.to_string(), narrator);
        debug!(
            book_id = %sub.id,
            %perspective,
            narrator = ?narrator.map(CharacterId::get),
            words = sub.word_count(),
            "split sub-document"
        );
        subs.push(sub);
    }
    Ok(subs)
}

fn resolve_narrator(book: &Book, marker: &MarkerFields) -> Result<CharacterId> {
    if let Some(character) = book.characters().find(|c| c.name == marker.label) {
        return Ok(character.id);
    }
    marker
        .character
        .parse::<CharacterId>()
        .ok()
        .filter(|id| book.character(*id).is_some())
        .ok_or_else(|| {
            Error::consistency(
                book.id,
                ErrorCode::NarratorNotFound,
                format!(
                    "first-person passage {:?} of character {} matches no character",
                    marker.label, marker.character
                ),
            )
        })
}
