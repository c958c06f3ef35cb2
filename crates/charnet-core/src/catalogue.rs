//! Assembly of books from the corpus catalogues.
//!
//! The catalogues arrive as parsed rows. Rows whose book id is not a number
//! (header rows, comments) are skipped. Everything else must be consistent:
//! characters belong to known books, name variants to known characters with
//! the same canonical name.

use std::collections::BTreeMap;
use std::ops::Range;

use tracing::{debug, info};

use crate::error::{Error, ErrorCode, Result};
use crate::model::{Author, Book, BookId, CharacterId, Demographics, Perspective, recode_descent};

/// `book_id, title, author, author_gender, author_nationality, publisher,
/// perspective, filename`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookRow {
    pub book_id: String,
    pub title: String,
    pub author_name: String,
    pub author_gender: String,
    pub author_nationality: String,
    pub publisher: String,
    pub perspective: String,
    pub filename: String,
}

impl BookRow {
    pub const COLUMNS: usize = 8;

    /// Build a row from positional fields; `None` when columns are missing.
    #[must_use]
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        let [book_id, title, author_name, author_gender, author_nationality, publisher, perspective, filename, ..] =
            fields
        else {
            return None;
        };
        Some(Self {
            book_id: book_id.clone(),
            title: title.clone(),
            author_name: author_name.clone(),
            author_gender: author_gender.clone(),
            author_nationality: author_nationality.clone(),
            publisher: publisher.clone(),
            perspective: perspective.clone(),
            filename: filename.clone(),
        })
    }
}

/// `book_id, character_id, name, gender[, country_of_birth, age, education,
/// profession]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterRow {
    pub book_id: String,
    pub character_id: String,
    pub name: String,
    pub gender: String,
    pub country_of_birth: Option<String>,
    pub age: Option<String>,
    pub education: Option<String>,
    pub profession: Option<String>,
}

impl CharacterRow {
    pub const COLUMNS: usize = 4;

    #[must_use]
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        let [book_id, character_id, name, gender, rest @ ..] = fields else {
            return None;
        };
        let optional = |i: usize| {
            rest.get(i)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Some(Self {
            book_id: book_id.clone(),
            character_id: character_id.clone(),
            name: name.clone(),
            gender: gender.clone(),
            country_of_birth: optional(0),
            age: optional(1),
            education: optional(2),
            profession: optional(3),
        })
    }

    fn demographics(&self) -> Demographics {
        Demographics {
            descent: self
                .country_of_birth
                .as_deref()
                .and_then(recode_descent)
                .map(str::to_string),
            age: self.age.clone(),
            education: self.education.clone(),
            profession: self.profession.clone(),
        }
    }
}

/// `book_id, character_id, name, name_variant`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameVariantRow {
    pub book_id: String,
    pub character_id: String,
    pub name: String,
    pub variant: String,
}

impl NameVariantRow {
    pub const COLUMNS: usize = 4;

    #[must_use]
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        let [book_id, character_id, name, variant, ..] = fields else {
            return None;
        };
        Some(Self {
            book_id: book_id.clone(),
            character_id: character_id.clone(),
            name: name.clone(),
            variant: variant.clone(),
        })
    }
}

/// `book_id, source, target, relation_type`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationRow {
    pub book_id: String,
    pub source: String,
    pub target: String,
    pub relation_type: String,
}

impl RelationRow {
    pub const COLUMNS: usize = 4;

    #[must_use]
    pub fn from_fields(fields: &[String]) -> Option<Self> {
        let [book_id, source, target, relation_type, ..] = fields else {
            return None;
        };
        Some(Self {
            book_id: book_id.clone(),
            source: source.clone(),
            target: target.clone(),
            relation_type: relation_type.clone(),
        })
    }
}

/// Parse a catalogue book id; `None` for header and other non-numeric rows.
fn book_number(raw: &str) -> Option<BookId> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

fn character_id(book_id: BookId, raw: &str) -> Result<CharacterId> {
    raw.parse().map_err(|_| {
        Error::precondition(
            book_id,
            ErrorCode::InvalidIdentifier,
            format!("character id {raw:?} is not a number"),
        )
    })
}

/// All books of a corpus, keyed and ordered by numeric book id.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    books: BTreeMap<BookId, Book>,
}

impl Corpus {
    /// Build books from the three catalogues.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownPerspective`] for a perspective code outside 1-4;
    /// - a data consistency error for a row referencing an unknown book or
    ///   character, or a variant whose name disagrees with the character
    ///   table;
    /// - a precondition error for a non-numeric character id.
    pub fn from_rows(
        books: impl IntoIterator<Item = BookRow>,
        characters: impl IntoIterator<Item = CharacterRow>,
        names: impl IntoIterator<Item = NameVariantRow>,
    ) -> Result<Self> {
        let mut corpus = Self::default();

        for row in books {
            let Some(id) = book_number(&row.book_id) else {
                debug!(book_id = %row.book_id, "skipping non-numeric book row");
                continue;
            };
            let perspective =
                Perspective::from_code(&row.perspective).ok_or_else(|| Error::UnknownPerspective {
                    book_id: id.to_string(),
                    code: row.perspective.clone(),
                })?;
            let author = Author {
                name: row.author_name,
                gender: row.author_gender,
                nationality: row.author_nationality,
            };
            let book = Book::new(id, row.title, author, row.publisher, perspective, row.filename);
            corpus.books.insert(id, book);
        }

        for row in characters {
            let Some(id) = book_number(&row.book_id) else {
                continue;
            };
            let book = corpus.book_entry(id, "character")?;
            let character = character_id(id, &row.character_id)?;
            let demographics = row.demographics();
            book.add_character(character, row.name, row.gender, demographics);
        }

        for row in names {
            let Some(id) = book_number(&row.book_id) else {
                continue;
            };
            let book = corpus.book_entry(id, "name variant")?;
            let character = character_id(id, &row.character_id)?;
            book.add_name_variant(character, &row.name, &row.variant)?;
        }

        info!(
            books = corpus.books.len(),
            characters = corpus.books.values().map(Book::character_count).sum::<usize>(),
            "assembled corpus"
        );
        Ok(corpus)
    }

    /// Attach annotated relation types to the books' networks.
    ///
    /// # Errors
    ///
    /// Returns a data consistency error for a row naming an unknown book or
    /// character.
    pub fn add_relations(&mut self, rows: impl IntoIterator<Item = RelationRow>) -> Result<()> {
        for row in rows {
            let Some(id) = book_number(&row.book_id) else {
                continue;
            };
            let book = self.book_entry(id, "relation")?;
            let source = character_id(id, &row.source)?;
            let target = character_id(id, &row.target)?;
            for endpoint in [source, target] {
                if book.character(endpoint).is_none() {
                    return Err(Error::consistency(
                        id,
                        ErrorCode::UnknownReference,
                        format!("relation refers to unknown character {endpoint}"),
                    ));
                }
            }
            book.network_mut().set_relation(source, target, row.relation_type);
        }
        Ok(())
    }

    fn book_entry(&mut self, id: BookId, what: &str) -> Result<&mut Book> {
        self.books.get_mut(&id).ok_or_else(|| {
            Error::consistency(
                id,
                ErrorCode::UnknownReference,
                format!("{what} row refers to book {id}, which is not in the book catalogue"),
            )
        })
    }

    /// Book ids in numeric order.
    #[must_use]
    pub fn book_ids(&self) -> Vec<BookId> {
        self.books.keys().copied().collect()
    }

    #[must_use]
    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    pub fn book_mut(&mut self, id: BookId) -> Option<&mut Book> {
        self.books.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Index range of the books handled by `task` (1-based) out of `total`.
///
/// Task `k` covers `[(k-1)·n/total, k·n/total)`. `None` when `task` is 0 or
/// exceeds `total`.
#[must_use]
pub const fn task_range(len: usize, task: usize, total: usize) -> Option<Range<usize>> {
    if task == 0 || total == 0 || task > total {
        return None;
    }
    Some((task - 1) * len / total..task * len / total)
}
