//! Network construction for one book.
//!
//! # Overview
//!
//! [`Pipeline::compute_network`] dispatches on the book's perspective:
//!
//! - first- and third-person books are marked, segmented and scored
//!   directly;
//! - multi-perspective books are split into sub-documents, each scored on
//!   its own, and their raw weights folded into the parent;
//! - anything else is rejected.
//!
//! Only the top-level book is normalized, by its own word count. A
//! multi-perspective book counts the words of its full text, markers and
//! unannotated passages included, plus the words of every sub-document.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::config::PipelineConfig;
use crate::cooccurrence::{CooccurrenceScorer, count_name_codes};
use crate::error::{Error, ErrorCode, Result};
use crate::model::{Book, Character, Perspective};
use crate::namecode::mark_text;
use crate::network::Composition;
use crate::segment::{PunctuationTokenizer, SentenceTokenizer, TextSegmenter};
use crate::split::split_multi_perspective;

#[derive(Debug, Clone)]
pub struct Pipeline<T = PunctuationTokenizer> {
    segmenter: TextSegmenter<T>,
    scorer: CooccurrenceScorer,
    composition: Composition,
}

impl Default for Pipeline<PunctuationTokenizer> {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl Pipeline<PunctuationTokenizer> {
    /// A pipeline with the built-in punctuation tokenizer.
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::with_tokenizer(PunctuationTokenizer, config)
    }
}

impl<T: SentenceTokenizer> Pipeline<T> {
    #[must_use]
    pub const fn with_tokenizer(tokenizer: T, config: &PipelineConfig) -> Self {
        Self {
            segmenter: TextSegmenter::new(tokenizer),
            scorer: CooccurrenceScorer::new(config.window_size),
            composition: config.composition,
        }
    }

    /// Build and normalize the network of `book`.
    ///
    /// Calling this again on a computed book does nothing.
    ///
    /// # Errors
    ///
    /// - data consistency errors from splitting a multi-perspective book;
    /// - a precondition error for perspective "other" or a book without
    ///   words.
    #[instrument(skip(self, book), fields(book_id = %book.id, perspective = %book.perspective))]
    pub fn compute_network(&self, book: &mut Book) -> Result<()> {
        if book.network_computed {
            debug!("network already computed");
            return Ok(());
        }
        self.accumulate(book)?;
        book.network.normalize(book.word_count)?;
        book.network_computed = true;
        info!(
            words = book.word_count,
            characters = book.character_count(),
            edges = book.network.edge_count(),
            "computed network"
        );
        Ok(())
    }

    fn accumulate(&self, book: &mut Book) -> Result<()> {
        match book.perspective {
            Perspective::FirstPerson | Perspective::ThirdPerson => {
                self.score_document(book);
                Ok(())
            }
            Perspective::Multi => {
                let subs = split_multi_perspective(book)?;
                let mut word_count = book.word_count;
                book.name_counts.clear();
                for mut sub in subs {
                    self.accumulate(&mut sub)?;
                    book.network.compose(&sub.network, self.composition);
                    word_count += sub.word_count;
                    for (id, count) in &sub.name_counts {
                        *book.name_counts.entry(*id).or_insert(0) += count;
                    }
                }
                book.word_count = word_count;
                Ok(())
            }
            Perspective::Other => Err(Error::precondition(
                book.id,
                ErrorCode::UnsupportedPerspective,
                format!("perspective {} has no weighting rule", book.perspective),
            )),
        }
    }

    fn score_document(&self, doc: &mut Book) {
        doc.marked_text = mark_text(&doc.text, doc.characters.values().map(Arc::as_ref));
        doc.sentences = self.segmenter.segment(doc.id, &doc.marked_text);
        doc.name_counts = count_name_codes(&doc.marked_text, doc.characters.values().map(Arc::as_ref));
        debug!(
            book_id = %doc.id,
            sentences = doc.sentences.len(),
            words = doc.word_count,
            "segmented document"
        );
        let characters: Vec<&Character> = doc.characters.values().map(Arc::as_ref).collect();
        self.scorer.score(
            &characters,
            doc.narrator,
            &doc.name_counts,
            &doc.sentences,
            &mut doc.network,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, BookId, CharacterId, Demographics};

    fn book(perspective: Perspective, text: &str) -> Book {
        let mut book = Book::new(BookId::new(10), "Titel", Author::default(), "Uitgever", perspective, "10.txt");
        book.add_character(CharacterId::new(1), "Anna", "2", Demographics::default());
        book.add_character(CharacterId::new(2), "Bert", "1", Demographics::default());
        book.add_character(CharacterId::new(3), "Cor", "1", Demographics::default());
        for (id, name) in [(1, "Anna"), (2, "Bert"), (3, "Cor")] {
            book.add_name_variant(CharacterId::new(id), name, name).expect("variant");
        }
        book.set_text(text);
        book
    }

    fn id(n: u32) -> CharacterId {
        CharacterId::new(n)
    }

    #[test]
    fn third_person_book_gets_symmetric_weights() {
        let mut b = book(
            Perspective::ThirdPerson,
            "Anna zag Bert. Het regende. Het waaide. Cor bleef thuis.",
        );
        Pipeline::default().compute_network(&mut b).expect("compute");
        assert_eq!(b.network().weight(id(1), id(2)), 1);
        assert_eq!(b.network().weight(id(2), id(1)), 1);
        assert_eq!(b.network().weight(id(1), id(3)), 0);
        assert_eq!(b.word_count(), 10);
        let w = b.network().normalized_weight(id(1), id(2)).expect("normalized");
        assert!((w - 0.1).abs() < 1e-10);
        assert_eq!(b.sentences().len(), 4);
    }

    #[test]
    fn first_person_book_weights_narrator_mentions() {
        let mut b = book(
            Perspective::FirstPerson,
            "Ik zag Bert. Bert zag Cor. Later kwam Bert terug.",
        );
        Pipeline::default().compute_network(&mut b).expect("compute");
        assert_eq!(b.name_counts()[&id(2)], 3);
        assert_eq!(b.network().weight(id(1), id(2)), 3);
        assert_eq!(b.network().weight(id(1), id(3)), 1);
        assert_eq!(b.network().weight(id(2), id(1)), 0);
        assert_eq!(b.network().weight(id(2), id(3)), 1);
        assert_eq!(b.network().weight(id(3), id(2)), 1);
    }

    #[test]
    fn other_perspective_is_rejected() {
        let mut b = book(Perspective::Other, "Jij zag Anna.");
        let err = Pipeline::default().compute_network(&mut b).expect_err("unsupported");
        assert_eq!(err.code(), ErrorCode::UnsupportedPerspective);
        assert!(!b.is_network_computed());
    }

    #[test]
    fn empty_text_is_rejected() {
        let mut b = book(Perspective::ThirdPerson, "");
        let err = Pipeline::default().compute_network(&mut b).expect_err("no words");
        assert_eq!(err.code(), ErrorCode::ZeroWordCount);
    }

    #[test]
    fn multi_book_composes_sub_documents() {
        let mut b = book(
            Perspective::Multi,
            "[START_10_1_Anna]Ik zag Bert. Bert lachte.[END_10_1_Anna]\n\
             [START_10_2_pers3]Bert zag Cor.[END_10_2_pers3]",
        );
        Pipeline::default().compute_network(&mut b).expect("compute");
        // Narrated by Anna: Bert twice.
        assert_eq!(b.network().weight(id(1), id(2)), 2);
        // Third-person passage: Bert and Cor co-occur once.
        assert_eq!(b.network().weight(id(2), id(3)), 1);
        assert_eq!(b.network().weight(id(3), id(2)), 1);
        // Eight words of full text plus five and three in the passages.
        assert_eq!(b.word_count(), 16);
        assert_eq!(b.name_counts()[&id(2)], 3);
        assert_eq!(b.narrator(), None);
    }

    #[test]
    fn multi_book_counts_unannotated_text() {
        let mut b = book(
            Perspective::Multi,
            "Een lange inleiding van dertien woorden die nergens over gaat maar wel telt.\n\
             [START_10_2_pers3]Bert zag Cor.[END_10_2_pers3]",
        );
        assert_eq!(b.word_count(), 16);
        Pipeline::default().compute_network(&mut b).expect("compute");
        assert_eq!(b.word_count(), 19);
        let w = b.network().normalized_weight(id(2), id(3)).expect("normalized");
        assert!((w - 1.0 / 19.0).abs() < 1e-10);
    }

    #[test]
    fn second_call_is_a_no_op() {
        let mut b = book(Perspective::ThirdPerson, "Anna zag Bert.");
        let pipeline = Pipeline::default();
        pipeline.compute_network(&mut b).expect("compute");
        pipeline.compute_network(&mut b).expect("compute again");
        assert_eq!(b.network().weight(id(1), id(2)), 1);
    }

    #[test]
    fn custom_tokenizer_is_used() {
        let config = PipelineConfig {
            window_size: 1,
            ..PipelineConfig::default()
        };
        let per_line = |text: &str| text.lines().map(ToString::to_string).collect::<Vec<_>>();
        let pipeline = Pipeline::with_tokenizer(per_line, &config);
        let mut b = book(Perspective::ThirdPerson, "Anna\nBert\nAnna Bert");
        pipeline.compute_network(&mut b).expect("compute");
        assert_eq!(b.sentences().len(), 3);
        assert_eq!(b.network().weight(id(1), id(2)), 1);
    }
}
