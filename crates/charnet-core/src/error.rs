use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    CatalogueMismatch,
    UnknownReference,
    PerspectiveMarkerMismatch,
    NarratorNotFound,
    ZeroWordCount,
    UnsupportedPerspective,
    UnknownPerspective,
    InvalidIdentifier,
    TextReadFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::CatalogueMismatch => "E2001",
            Self::UnknownReference => "E2002",
            Self::PerspectiveMarkerMismatch => "E2003",
            Self::NarratorNotFound => "E2004",
            Self::ZeroWordCount => "E3001",
            Self::UnsupportedPerspective => "E3002",
            Self::UnknownPerspective => "E3003",
            Self::InvalidIdentifier => "E3004",
            Self::TextReadFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::CatalogueMismatch => "Name variant table disagrees with character table",
            Self::UnknownReference => "Catalogue row references an unknown book or character",
            Self::PerspectiveMarkerMismatch => "START and END perspective markers disagree",
            Self::NarratorNotFound => "First-person narrator not found",
            Self::ZeroWordCount => "Book has no words",
            Self::UnsupportedPerspective => "Perspective has no weighting rule",
            Self::UnknownPerspective => "Unrecognized perspective code",
            Self::InvalidIdentifier => "Identifier is not a number",
            Self::TextReadFailed => "Book text could not be read",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix the TOML syntax in the config file and retry."),
            Self::CatalogueMismatch => {
                Some("Make the name column of the variant table match the character table.")
            }
            Self::UnknownReference => Some("Add the missing book or character row first."),
            Self::PerspectiveMarkerMismatch => {
                Some("Every [START_b_c_p] must be closed by the identical [END_b_c_p].")
            }
            Self::NarratorNotFound => {
                Some("Name the narrator in the marker or use a valid character id.")
            }
            Self::ZeroWordCount => Some("Check that the text file exists and is not empty."),
            Self::UnsupportedPerspective => {
                Some("Recode the book as first-person, third-person or multi.")
            }
            Self::UnknownPerspective => Some("Use perspective code 1, 2, 3 or 4."),
            Self::InvalidIdentifier => None,
            Self::TextReadFailed => Some("Check the corpus path and file permissions."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while assembling books or computing their networks.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Catalogue rows or annotations contradict each other.
    #[error("data consistency error in book {book_id}: {detail}")]
    DataConsistency {
        book_id: String,
        code: ErrorCode,
        detail: String,
    },

    /// An input violates a precondition of the pipeline.
    #[error("precondition failed for book {book_id}: {detail}")]
    Precondition {
        book_id: String,
        code: ErrorCode,
        detail: String,
    },

    /// A perspective code outside the known set.
    #[error("unknown perspective code {code:?} for book {book_id}")]
    UnknownPerspective { book_id: String, code: String },

    /// Reading a book text failed.
    #[error("failed to read text of book {book_id} at {}: {source}", .path.display())]
    Io {
        book_id: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file could not be read or parsed.
    #[error("config error in {}: {detail}", .path.display())]
    Config { path: PathBuf, detail: String },
}

impl Error {
    pub(crate) fn consistency(
        book_id: impl fmt::Display,
        code: ErrorCode,
        detail: impl Into<String>,
    ) -> Self {
        Self::DataConsistency {
            book_id: book_id.to_string(),
            code,
            detail: detail.into(),
        }
    }

    pub(crate) fn precondition(
        book_id: impl fmt::Display,
        code: ErrorCode,
        detail: impl Into<String>,
    ) -> Self {
        Self::Precondition {
            book_id: book_id.to_string(),
            code,
            detail: detail.into(),
        }
    }

    /// The stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DataConsistency { code, .. } | Self::Precondition { code, .. } => *code,
            Self::UnknownPerspective { .. } => ErrorCode::UnknownPerspective,
            Self::Io { .. } => ErrorCode::TextReadFailed,
            Self::Config { .. } => ErrorCode::ConfigParseError,
        }
    }

    /// The book this error concerns, when there is one.
    #[must_use]
    pub fn book_id(&self) -> Option<&str> {
        match self {
            Self::DataConsistency { book_id, .. }
            | Self::Precondition { book_id, .. }
            | Self::UnknownPerspective { book_id, .. }
            | Self::Io { book_id, .. } => Some(book_id),
            Self::Config { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::{Error, ErrorCode};
    use std::collections::HashSet;

    const ALL: [ErrorCode; 10] = [
        ErrorCode::ConfigParseError,
        ErrorCode::CatalogueMismatch,
        ErrorCode::UnknownReference,
        ErrorCode::PerspectiveMarkerMismatch,
        ErrorCode::NarratorNotFound,
        ErrorCode::ZeroWordCount,
        ErrorCode::UnsupportedPerspective,
        ErrorCode::UnknownPerspective,
        ErrorCode::InvalidIdentifier,
        ErrorCode::TextReadFailed,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let s = code.code();
            assert_eq!(s.len(), 5);
            assert!(s.starts_with('E'));
            assert!(s.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn consistency_error_names_the_book() {
        let err = Error::consistency("10", ErrorCode::PerspectiveMarkerMismatch, "book ids differ");
        assert_eq!(err.book_id(), Some("10"));
        assert_eq!(err.code(), ErrorCode::PerspectiveMarkerMismatch);
        assert!(err.to_string().contains("book 10"));
    }
}
