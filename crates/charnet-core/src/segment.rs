//! Sentence segmentation of marked text.
//!
//! Sentence boundary detection is delegated to a [`SentenceTokenizer`].
//! [`TextSegmenter`] normalizes what the tokenizer returns: whitespace the
//! tokenizer left around [`CHAR_SEPARATOR`] is collapsed so that name codes
//! stay intact, and line breaks inside a sentence become single spaces.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::model::BookId;
use crate::namecode::CHAR_SEPARATOR;

/// Splits raw text into sentences in reading order.
pub trait SentenceTokenizer {
    fn sentences(&self, text: &str) -> Vec<String>;
}

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.!?…]+["'”’)\]]*\s+|\n\s*\n"#).expect("sentence end pattern")
});

static SEPARATOR_SPACING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|\s*").expect("separator pattern"));

/// Splits after terminal punctuation followed by whitespace, and at blank
/// lines.
///
/// Good enough for prose without abbreviations. Plug in a language-aware
/// tokenizer through [`SentenceTokenizer`] for anything better.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationTokenizer;

impl SentenceTokenizer for PunctuationTokenizer {
    fn sentences(&self, text: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut start = 0;
        for m in SENTENCE_END.find_iter(text) {
            push_trimmed(&mut out, &text[start..m.end()]);
            start = m.end();
        }
        push_trimmed(&mut out, &text[start..]);
        out
    }
}

fn push_trimmed(out: &mut Vec<String>, sentence: &str) {
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

impl<F> SentenceTokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn sentences(&self, text: &str) -> Vec<String> {
        self(text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TextSegmenter<T = PunctuationTokenizer> {
    tokenizer: T,
}

impl<T: SentenceTokenizer> TextSegmenter<T> {
    #[must_use]
    pub const fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    /// Tokenize `text` and normalize each sentence to a single line.
    pub fn segment(&self, book_id: BookId, text: &str) -> Vec<String> {
        let separator = CHAR_SEPARATOR.to_string();
        self.tokenizer
            .sentences(text)
            .into_iter()
            .map(|sentence| {
                let sentence = SEPARATOR_SPACING.replace_all(&sentence, separator.as_str());
                if sentence.contains('\n') {
                    warn!(%book_id, sentence = %sentence, "line break inside sentence");
                }
                sentence.replace('\n', " ")
            })
            .collect()
    }
}
