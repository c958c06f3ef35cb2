use serde::{Deserialize, Serialize};

use super::ids::{BookId, CharacterId};
use crate::namecode::NameCode;

/// Optional demographic codes of a character.
///
/// Codes are kept as the catalogue spells them (`"1"`, `"2"`, `"99"`, ...);
/// the community tallies map them onto categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    /// `0` non-migrant, `1` migrant, `99` unknown.
    pub descent: Option<String>,
    /// Age band `1`..`6`, or `99`.
    pub age: Option<String>,
    /// `1` high, `2` low, `99` unknown.
    pub education: Option<String>,
    pub profession: Option<String>,
}

/// Recode a country-of-birth code into a descent code.
///
/// Dutch and Belgian births (`1`, `2`) are non-migrant (`0`); European,
/// Western, Middle Eastern and other births (`3`..`6`) are migrant (`1`);
/// `99` stays unknown. Anything else has no descent code.
#[must_use]
pub fn recode_descent(country_code: &str) -> Option<&'static str> {
    match country_code.trim() {
        "1" | "2" => Some("0"),
        "3" | "4" | "5" | "6" => Some("1"),
        "99" => Some("99"),
        _ => None,
    }
}

/// A character of a novel, as listed in the character catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub book_id: BookId,
    pub id: CharacterId,
    pub name: String,
    /// `1` male, `2` female, `99` unknown.
    pub gender: String,
    pub demographics: Demographics,
    name_variants: Vec<String>,
    is_first_person_narrator: bool,
}

impl Character {
    #[must_use]
    pub fn new(
        book_id: BookId,
        id: CharacterId,
        name: impl Into<String>,
        gender: impl Into<String>,
        is_first_person_narrator: bool,
    ) -> Self {
        Self {
            book_id,
            id,
            name: name.into(),
            gender: gender.into(),
            demographics: Demographics::default(),
            name_variants: Vec::new(),
            is_first_person_narrator,
        }
    }

    #[must_use]
    pub fn with_demographics(mut self, demographics: Demographics) -> Self {
        self.demographics = demographics;
        self
    }

    /// Register a surface form of this character's name.
    ///
    /// Blank and duplicate variants are ignored.
    pub fn add_name_variant(&mut self, variant: impl Into<String>) {
        let variant = variant.into();
        if variant.trim().is_empty() || self.name_variants.contains(&variant) {
            return;
        }
        self.name_variants.push(variant);
    }

    #[must_use]
    pub fn name_variants(&self) -> &[String] {
        &self.name_variants
    }

    /// Whether the catalogue designates this character as the narrator of a
    /// first-person book. Fixed at construction.
    #[must_use]
    pub const fn is_first_person_narrator(&self) -> bool {
        self.is_first_person_narrator
    }

    #[must_use]
    pub fn name_code(&self) -> NameCode {
        NameCode::for_character(self)
    }
}
