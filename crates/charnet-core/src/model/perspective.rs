use std::fmt;

use serde::{Deserialize, Serialize};

/// Narrative situation of a book, as coded in the book catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Perspective {
    /// Code `1`: a single first-person narrator.
    FirstPerson,
    /// Code `2`: third-person narration.
    ThirdPerson,
    /// Code `3`: several annotated perspectives in one text.
    Multi,
    /// Code `4`: anything else (second person, epistolary, ...).
    Other,
}

impl Perspective {
    /// Parse a catalogue perspective code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::FirstPerson),
            "2" => Some(Self::ThirdPerson),
            "3" => Some(Self::Multi),
            "4" => Some(Self::Other),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::FirstPerson => "1",
            Self::ThirdPerson => "2",
            Self::Multi => "3",
            Self::Other => "4",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::FirstPerson => "first-person",
            Self::ThirdPerson => "third-person",
            Self::Multi => "multi",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}
