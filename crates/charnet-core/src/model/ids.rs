use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Separator between a book number and a sub-document number (`10+2`).
pub const PART_SEPARATOR: char = '+';

/// Raised when a catalogue identifier is not a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {0:?}")]
pub struct ParseIdError(pub String);

/// Identifier of a character, unique within its book.
///
/// Ordering is numeric, so `2 < 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(u32);

impl CharacterId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CharacterId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

/// Identifier of a book or of one sub-document of a multi-perspective book.
///
/// Top-level books carry only their catalogue number. Sub-documents carry
/// the parent number plus a 1-based part number and display as `10+2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookId {
    number: u32,
    part: Option<u32>,
}

impl BookId {
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self { number, part: None }
    }

    /// The id of the `part`-th sub-document of this book.
    #[must_use]
    pub const fn sub_document(self, part: u32) -> Self {
        Self {
            number: self.number,
            part: Some(part),
        }
    }

    /// Catalogue number of the book (the parent's number for sub-documents).
    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    #[must_use]
    pub const fn part(self) -> Option<u32> {
        self.part
    }

    /// The top-level book this id belongs to.
    #[must_use]
    pub const fn root(self) -> Self {
        Self::new(self.number)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.part {
            Some(part) => write!(f, "{}{PART_SEPARATOR}{part}", self.number),
            None => write!(f, "{}", self.number),
        }
    }
}

impl FromStr for BookId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseIdError(s.to_string());
        let trimmed = s.trim();
        match trimmed.split_once(PART_SEPARATOR) {
            Some((number, part)) => Ok(Self {
                number: number.parse().map_err(|_| err())?,
                part: Some(part.parse().map_err(|_| err())?),
            }),
            None => Ok(Self::new(trimmed.parse().map_err(|_| err())?)),
        }
    }
}
