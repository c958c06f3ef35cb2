use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::character::{Character, Demographics};
use super::ids::{BookId, CharacterId};
use super::perspective::Perspective;
use crate::error::{Error, ErrorCode, Result};
use crate::network::NetworkModel;

/// Author metadata copied from the book catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    /// Same scalar on every node of the book's graph.
    pub gender: String,
    pub nationality: String,
}

/// A novel (or one perspective of a multi-perspective novel) and its network.
#[derive(Debug, Clone)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: Author,
    pub publisher: String,
    pub perspective: Perspective,
    pub filename: String,
    pub(crate) characters: BTreeMap<CharacterId, Arc<Character>>,
    pub(crate) narrator: Option<CharacterId>,
    pub(crate) text: String,
    pub(crate) marked_text: String,
    pub(crate) sentences: Vec<String>,
    pub(crate) name_counts: BTreeMap<CharacterId, u64>,
    pub(crate) word_count: usize,
    pub(crate) network: NetworkModel,
    pub(crate) network_computed: bool,
}

impl Book {
    #[must_use]
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: Author,
        publisher: impl Into<String>,
        perspective: Perspective,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author,
            publisher: publisher.into(),
            perspective,
            filename: filename.into(),
            characters: BTreeMap::new(),
            narrator: None,
            text: String::new(),
            marked_text: String::new(),
            sentences: Vec::new(),
            name_counts: BTreeMap::new(),
            word_count: 0,
            network: NetworkModel::new(id),
            network_computed: false,
        }
    }

    /// Add a character from the character catalogue.
    ///
    /// In a first-person book, character `1` is the narrator.
    pub fn add_character(
        &mut self,
        id: CharacterId,
        name: impl Into<String>,
        gender: impl Into<String>,
        demographics: Demographics,
    ) -> &Character {
        let narrates = self.perspective == Perspective::FirstPerson && id == CharacterId::new(1);
        if narrates {
            self.narrator = Some(id);
        }
        let character =
            Character::new(self.id, id, name, gender, narrates).with_demographics(demographics);
        self.characters.insert(id, Arc::new(character));
        &self.characters[&id]
    }

    /// Attach a name variant, checking that `name` matches the catalogue.
    ///
    /// # Errors
    ///
    /// Returns a data consistency error if the character does not exist or
    /// its canonical name differs from `name`.
    pub fn add_name_variant(
        &mut self,
        character_id: CharacterId,
        name: &str,
        variant: &str,
    ) -> Result<()> {
        let book_id = self.id;
        let Some(character) = self.characters.get_mut(&character_id) else {
            return Err(Error::consistency(
                book_id,
                ErrorCode::UnknownReference,
                format!("name variant {variant:?} refers to unknown character {character_id}"),
            ));
        };
        if character.name != name {
            return Err(Error::consistency(
                book_id,
                ErrorCode::CatalogueMismatch,
                format!(
                    "character {character_id} is {:?} in the character table but {name:?} in the name table",
                    character.name
                ),
            ));
        }
        Arc::make_mut(character).add_name_variant(variant);
        Ok(())
    }

    /// Characters in catalogue (numeric id) order.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values().map(Arc::as_ref)
    }

    #[must_use]
    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id).map(Arc::as_ref)
    }

    #[must_use]
    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    /// The first-person narrator of this document, if it has one.
    #[must_use]
    pub const fn narrator(&self) -> Option<CharacterId> {
        self.narrator
    }

    #[must_use]
    pub fn is_narrator(&self, id: CharacterId) -> bool {
        self.narrator == Some(id)
    }

    /// Replace the raw text and recompute the word count.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.marked_text.clear();
        self.sentences.clear();
        self.name_counts.clear();
        self.word_count = count_words(&self.text);
    }

    /// Load the book's text from `dir/filename`.
    ///
    /// Returns `Ok(false)` and leaves the text untouched when the path is a
    /// directory; such a book has no text to analyze and should be skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] for any other read failure.
    pub fn read_text(&mut self, dir: &Path) -> Result<bool> {
        let path = dir.join(&self.filename);
        if path.is_dir() {
            debug!(book_id = %self.id, path = %path.display(), "text path is a directory");
            return Ok(false);
        }
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(book_id = %self.id, path = %path.display(), "read book text");
                self.set_text(text);
                Ok(true)
            }
            Err(source) => Err(Error::Io {
                book_id: self.id.to_string(),
                path,
                source,
            }),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text with name variants rewritten to markers (empty until computed).
    #[must_use]
    pub fn marked_text(&self) -> &str {
        &self.marked_text
    }

    #[must_use]
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    /// Occurrences of each character's name code in the marked text.
    #[must_use]
    pub const fn name_counts(&self) -> &BTreeMap<CharacterId, u64> {
        &self.name_counts
    }

    #[must_use]
    pub const fn word_count(&self) -> usize {
        self.word_count
    }

    #[must_use]
    pub const fn network(&self) -> &NetworkModel {
        &self.network
    }

    /// Mutable access for annotations such as explicit relation types.
    pub fn network_mut(&mut self) -> &mut NetworkModel {
        &mut self.network
    }

    #[must_use]
    pub const fn is_network_computed(&self) -> bool {
        self.network_computed
    }

    /// Build one sub-document sharing this book's characters.
    pub(crate) fn sub_document(
        &self,
        part: u32,
        perspective: Perspective,
        text: String,
        narrator: Option<CharacterId>,
    ) -> Self {
        let id = self.id.sub_document(part);
        let mut sub = Self {
            characters: self.characters.clone(),
            narrator,
            ..Self::new(
                id,
                self.title.clone(),
                self.author.clone(),
                self.publisher.clone(),
                perspective,
                "subbook",
            )
        };
        sub.set_text(text);
        sub
    }
}

/// Number of whitespace-separated tokens in `text`.
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
