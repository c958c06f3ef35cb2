//! Pairwise interaction weights.
//!
//! # Overview
//!
//! Two regimes, chosen per pair:
//!
//! - **Narrator-relative.** When one side of the pair narrates the document,
//!   the weight is the number of times the other side's name code occurs in
//!   the marked text. The edge points from the narrator to the other
//!   character.
//! - **Windowed co-occurrence.** Otherwise a window of `window_size`
//!   sentences slides over the document. A window holding both codes scores
//!   one hit, and scanning resumes `window_size` sentences after the later
//!   of the two positions, so a sustained co-occurrence is not counted by
//!   every overlapping window. Both directions get the same weight.
//!
//! Pairs are visited once, in ascending id order. Pairs with zero weight
//! leave no trace in the network.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::model::{Character, CharacterId};
use crate::namecode::NameCode;
use crate::network::NetworkModel;

/// Default window size in sentences.
pub const DEFAULT_WINDOW_SIZE: usize = 2;

/// Count the windows in which both `a` and `b` occur.
///
/// Every window start from 0 through `len - window` is scanned; text shorter
/// than the window is scanned as one truncated window.
#[must_use]
pub fn window_cooccurrence(sentences: &[String], a: &NameCode, b: &NameCode, window: usize) -> u64 {
    let window = window.max(1);
    let last_start = sentences.len().saturating_sub(window);
    let mut count = 0;
    let mut start = 0;
    while start <= last_start && start < sentences.len() {
        let end = (start + window).min(sentences.len());
        let mut pos_a = None;
        let mut pos_b = None;
        for (pos, sentence) in sentences.iter().enumerate().take(end).skip(start) {
            if a.is_in(sentence) {
                pos_a = Some(pos);
            }
            if b.is_in(sentence) {
                pos_b = Some(pos);
            }
        }
        match (pos_a, pos_b) {
            (Some(pa), Some(pb)) => {
                count += 1;
                start = pa.max(pb) + window;
            }
            _ => start += 1,
        }
    }
    count
}

/// Occurrences of every character's name code in `marked_text`.
pub fn count_name_codes<'a>(
    marked_text: &str,
    characters: impl IntoIterator<Item = &'a Character>,
) -> BTreeMap<CharacterId, u64> {
    characters
        .into_iter()
        .map(|c| (c.id, c.name_code().count_in(marked_text)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooccurrenceScorer {
    window_size: usize,
}

impl Default for CooccurrenceScorer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl CooccurrenceScorer {
    #[must_use]
    pub const fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Add the weights of every character pair of one document to `network`.
    ///
    /// `characters` must be in catalogue order.
    pub fn score(
        &self,
        characters: &[&Character],
        narrator: Option<CharacterId>,
        name_counts: &BTreeMap<CharacterId, u64>,
        sentences: &[String],
        network: &mut NetworkModel,
    ) {
        let codes: Vec<NameCode> = characters.iter().map(|c| c.name_code()).collect();
        let count_of = |id: CharacterId| name_counts.get(&id).copied().unwrap_or(0);
        let mut narrated = 0usize;
        let mut windowed = 0usize;

        for (i, first) in characters.iter().enumerate() {
            for (j, second) in characters.iter().enumerate().skip(i + 1) {
                if narrator == Some(first.id) {
                    let weight = count_of(second.id);
                    trace!(narrator = %first.id, other = %second.id, weight, "narrator weight");
                    if weight > 0 {
                        network.add_weight(first.id, second.id, weight);
                        narrated += 1;
                    }
                } else if narrator == Some(second.id) {
                    let weight = count_of(first.id);
                    trace!(narrator = %second.id, other = %first.id, weight, "narrator weight");
                    if weight > 0 {
                        network.add_weight(second.id, first.id, weight);
                        narrated += 1;
                    }
                } else {
                    let weight =
                        window_cooccurrence(sentences, &codes[i], &codes[j], self.window_size);
                    trace!(source = %first.id, target = %second.id, weight, "window weight");
                    if weight > 0 {
                        network.add_weight(first.id, second.id, weight);
                        network.add_weight(second.id, first.id, weight);
                        windowed += 1;
                    }
                }
            }
        }
        debug!(
            book_id = %network.book_id(),
            narrated,
            windowed,
            window = self.window_size,
            "scored character pairs"
        );
    }
}
