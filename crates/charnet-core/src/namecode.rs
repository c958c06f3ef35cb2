//! Collision-safe markers for character names.
//!
//! # Overview
//!
//! Before the text is segmented, every name variant of every character is
//! replaced by a marker:
//!
//! ```text
//! <book_id>_<character_id>_<n|a|m|e>_<v|a|r|i|a|n|t>
//! ```
//!
//! Every character of the canonical name and of the variant is separated by
//! [`CHAR_SEPARATOR`], and spaces become [`SPACE_TOKEN`]. The [`NameCode`]
//! prefix (`<book>_<char>_<name>`) identifies exactly one character when
//! counting occurrences.
//!
//! Substitution only touches prose between markers. Interleaving already
//! keeps multi-letter variants out of a marker, but a single-letter variant
//! would otherwise rewrite the letters of markers placed before it.
//!
//! # Cross-character precedence
//!
//! Characters are processed in catalogue order (ascending id), each with its
//! own variants longest first. When a variant of one character is a
//! substring of another character's variant, the earlier character wins
//! where they overlap. Catalogues are expected not to rely on this.

use std::cmp::Reverse;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::model::Character;

/// Inserted between every character of a name or variant.
pub const CHAR_SEPARATOR: char = '|';
/// Joins the fields of a marker.
pub const FIELD_DELIMITER: char = '_';
/// Stands in for a space inside a name.
pub const SPACE_TOKEN: &str = "+++";

/// A complete marker; a unit is one name character or [`SPACE_TOKEN`].
static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    let unit = r"(?:\+\+\+|[^|_\s])";
    Regex::new(&format!(r"\d+_\d+_{unit}(?:\|{unit})*_{unit}(?:\|{unit})*")).expect("marker pattern")
});

/// Interleave [`CHAR_SEPARATOR`] between the characters of `s` and replace
/// spaces with [`SPACE_TOKEN`].
#[must_use]
pub fn interleave(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for (i, c) in s.chars().enumerate() {
        if i > 0 {
            out.push(CHAR_SEPARATOR);
        }
        if c == ' ' {
            out.push_str(SPACE_TOKEN);
        } else {
            out.push(c);
        }
    }
    out
}

/// The marker prefix shared by every occurrence of one character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameCode(String);

impl NameCode {
    #[must_use]
    pub fn for_character(character: &Character) -> Self {
        Self(format!(
            "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
            character.book_id.root(),
            character.id,
            interleave(&character.name)
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full marker substituted for `variant`.
    #[must_use]
    pub fn marker(&self, variant: &str) -> String {
        format!("{}{FIELD_DELIMITER}{}", self.0, interleave(variant))
    }

    /// Non-overlapping occurrences of this code in `text`.
    #[must_use]
    pub fn count_in(&self, text: &str) -> u64 {
        text.matches(self.0.as_str()).count() as u64
    }

    #[must_use]
    pub fn is_in(&self, text: &str) -> bool {
        text.contains(self.0.as_str())
    }
}

impl fmt::Display for NameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace every variant of `character` in `text`, longest variant first.
#[must_use]
pub fn substitute_variants(text: &str, character: &Character) -> String {
    let code = character.name_code();
    let mut variants: Vec<&str> = character.name_variants().iter().map(String::as_str).collect();
    variants.sort_by_key(|v| Reverse(v.chars().count()));

    let mut marked = text.to_string();
    for variant in variants {
        trace!(character_id = %character.id, variant, "substituting name variant");
        marked = replace_outside_markers(&marked, variant, &code.marker(variant));
    }
    marked
}

/// Replace `variant` by `marker` in the prose between existing markers.
fn replace_outside_markers(text: &str, variant: &str, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prose_start = 0;
    for found in MARKER.find_iter(text) {
        out.push_str(&text[prose_start..found.start()].replace(variant, marker));
        out.push_str(found.as_str());
        prose_start = found.end();
    }
    out.push_str(&text[prose_start..].replace(variant, marker));
    out
}

/// Rewrite the name variants of all `characters`, in the given order.
#[must_use]
pub fn mark_text<'a>(text: &str, characters: impl IntoIterator<Item = &'a Character>) -> String {
    characters
        .into_iter()
        .fold(text.to_string(), |marked, character| {
            substitute_variants(&marked, character)
        })
}
