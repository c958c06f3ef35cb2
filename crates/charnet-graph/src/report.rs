//! CSV result files.
//!
//! Three append-only tables, one row per character or per book:
//!
//! - rankings: `book_id, character_id, name, gender, degree, betweenness,
//!   closeness, eigenvector, katz, author_gender, corpus`
//! - network statistics: `book_id, word_count, author_gender, nodes, edges,
//!   density, transitivity, clustering, is_connected` and the four
//!   assortativities
//! - community distributions: 48 demographic counts
//!
//! Floats are written in shortest round-trip form (`0.1`, `1.0`), booleans
//! as `True`/`False`, and undefined values as an empty field. A header is
//! written only when a file is created empty and headers are enabled.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use charnet_core::config::OutputConfig;
use tracing::debug;

use crate::analysis::BookAnalysis;
use crate::community::CommunityTallies;

pub const RANKINGS_HEADER: [&str; 11] = [
    "book_id",
    "character_id",
    "name",
    "gender",
    "degree",
    "betweenness",
    "closeness",
    "eigenvector",
    "katz",
    "author_gender",
    "corpus",
];

pub const STATS_HEADER: [&str; 13] = [
    "book_id",
    "word_count",
    "author_gender",
    "nodes",
    "edges",
    "density",
    "transitivity",
    "clustering",
    "is_connected",
    "gender_assortativity",
    "descent_assortativity",
    "age_assortativity",
    "education_assortativity",
];

// ---------------------------------------------------------------------------
// Field formatting
// ---------------------------------------------------------------------------

/// Quote a field if it contains a comma, a quote or a line break.
#[must_use]
pub fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn float(value: f64) -> String {
    format!("{value:?}")
}

fn optional_float(value: Option<f64>) -> String {
    value.map(float).unwrap_or_default()
}

const fn boolean(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn join(fields: &[String]) -> String {
    fields.iter().map(|f| escape_csv(f)).collect::<Vec<_>>().join(",")
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One row per character, in catalogue order.
#[must_use]
pub fn ranking_rows(analysis: &BookAnalysis, corpus_tag: &str) -> Vec<Vec<String>> {
    analysis
        .centrality
        .scores
        .iter()
        .map(|(id, c)| {
            let node = analysis.graph.node(*id);
            vec![
                analysis.book_id.to_string(),
                id.to_string(),
                node.map(|n| n.name.clone()).unwrap_or_default(),
                node.map(|n| n.gender.clone()).unwrap_or_default(),
                float(c.degree),
                float(c.betweenness),
                float(c.closeness),
                float(c.eigenvector),
                float(c.katz),
                analysis.author_gender.clone(),
                corpus_tag.to_string(),
            ]
        })
        .collect()
}

/// The statistics row, if statistics were computed.
#[must_use]
pub fn stats_row(analysis: &BookAnalysis) -> Option<Vec<String>> {
    let s = analysis.stats.as_ref()?;
    Some(vec![
        analysis.book_id.to_string(),
        analysis.word_count.to_string(),
        analysis.author_gender.clone(),
        s.node_count.to_string(),
        s.edge_count.to_string(),
        float(s.density),
        float(s.transitivity),
        float(s.clustering),
        boolean(s.is_connected).to_string(),
        optional_float(s.gender_assortativity),
        optional_float(s.descent_assortativity),
        optional_float(s.age_assortativity),
        optional_float(s.education_assortativity),
    ])
}

/// The community distribution row, if communities were detected.
#[must_use]
pub fn community_row(analysis: &BookAnalysis) -> Option<Vec<String>> {
    let (_, tallies) = analysis.communities.as_ref()?;
    Some(tallies.row().iter().map(ToString::to_string).collect())
}

// ---------------------------------------------------------------------------
// ResultWriter
// ---------------------------------------------------------------------------

/// Appends analysis results to the three output tables of one task.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    rankings: PathBuf,
    stats: PathBuf,
    communities: PathBuf,
    corpus_tag: String,
    write_headers: bool,
}

impl ResultWriter {
    /// Writer for task `task` of `total`; file names gain a task suffix
    /// when the run is partitioned.
    #[must_use]
    pub fn new(config: &OutputConfig, task: usize, total: usize) -> Self {
        Self {
            rankings: config.path_for(&config.rankings, task, total),
            stats: config.path_for(&config.network_stats, task, total),
            communities: config.path_for(&config.communities, task, total),
            corpus_tag: config.corpus_tag.clone(),
            write_headers: config.write_headers,
        }
    }

    #[must_use]
    pub fn rankings_path(&self) -> &Path {
        &self.rankings
    }

    #[must_use]
    pub fn stats_path(&self) -> &Path {
        &self.stats
    }

    #[must_use]
    pub fn communities_path(&self) -> &Path {
        &self.communities
    }

    /// Append every row produced by `analysis`.
    ///
    /// # Errors
    ///
    /// Returns an error if an output file cannot be opened or written.
    pub fn write(&self, analysis: &BookAnalysis) -> Result<()> {
        let header: Vec<String> = RANKINGS_HEADER.iter().map(ToString::to_string).collect();
        append_rows(
            &self.rankings,
            self.write_headers.then_some(header.as_slice()),
            &ranking_rows(analysis, &self.corpus_tag),
        )?;
        if let Some(row) = stats_row(analysis) {
            let header: Vec<String> = STATS_HEADER.iter().map(ToString::to_string).collect();
            append_rows(&self.stats, self.write_headers.then_some(header.as_slice()), &[row])?;
        }
        if let Some(row) = community_row(analysis) {
            let header = CommunityTallies::header();
            append_rows(
                &self.communities,
                self.write_headers.then_some(header.as_slice()),
                &[row],
            )?;
        }
        debug!(book_id = %analysis.book_id, "wrote results");
        Ok(())
    }
}

/// Append `rows` to the CSV file at `path`, writing `header` first if the
/// file is new or empty.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or written.
pub fn append_rows(path: &Path, header: Option<&[String]>, rows: &[Vec<String>]) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let is_empty = file
        .metadata()
        .with_context(|| format!("failed to stat {}", path.display()))?
        .len()
        == 0;
    let mut out = BufWriter::new(file);
    if let Some(header) = header.filter(|_| is_empty) {
        writeln!(out, "{}", join(header))?;
    }
    for row in rows {
        writeln!(out, "{}", join(row))?;
    }
    out.flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_book;
    use charnet_core::config::AnalysisConfig;
    use charnet_core::model::{Author, Demographics};
    use charnet_core::{Book, BookId, CharacterId, Perspective, Pipeline};
    use tempfile::TempDir;

    fn analysis(config: &AnalysisConfig) -> BookAnalysis {
        let author = Author {
            gender: "2".to_string(),
            ..Author::default()
        };
        let mut book = Book::new(BookId::new(3), "T", author, "P", Perspective::ThirdPerson, "3.txt");
        for (id, name) in [(1, "Anna, de oudste"), (2, "Bert")] {
            book.add_character(CharacterId::new(id), name, "1", Demographics::default());
        }
        book.add_name_variant(CharacterId::new(2), "Bert", "Bert").expect("variant");
        book.set_text("Bert kwam. Bert ging.");
        Pipeline::default().compute_network(&mut book).expect("network");
        analyze_book(&book, config).expect("analysis")
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn ranking_rows_follow_catalogue_order() {
        let rows = ranking_rows(&analysis(&AnalysisConfig::default()), "corpus_test");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "3");
        assert_eq!(rows[0][1], "1");
        assert_eq!(rows[0][2], "Anna, de oudste");
        // No edges: degree 0, katz uniform.
        assert_eq!(rows[0][4], "0.0");
        assert_eq!(rows[0][9], "2");
        assert_eq!(rows[1][10], "corpus_test");
    }

    #[test]
    fn undefined_statistics_are_empty_fields() {
        let config = AnalysisConfig {
            network_stats: true,
            ..AnalysisConfig::default()
        };
        let row = stats_row(&analysis(&config)).expect("stats");
        assert_eq!(row.len(), STATS_HEADER.len());
        assert_eq!(row[3], "2");
        assert_eq!(row[4], "0");
        assert_eq!(row[8], "False");
        assert_eq!(row[9], "");
    }

    #[test]
    fn header_written_once() {
        let dir = TempDir::new().expect("tempdir");
        let out = OutputConfig {
            dir: dir.path().to_path_buf(),
            ..OutputConfig::default()
        };
        let writer = ResultWriter::new(&out, 1, 1);
        let a = analysis(&AnalysisConfig {
            network_stats: true,
            communities: true,
            ..AnalysisConfig::default()
        });
        writer.write(&a).expect("first");
        writer.write(&a).expect("second");

        let rankings = std::fs::read_to_string(writer.rankings_path()).expect("rankings");
        let lines: Vec<&str> = rankings.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("book_id,character_id,name"));
        assert!(lines[1].starts_with("3,1,\"Anna, de oudste\",1,"));

        let stats = std::fs::read_to_string(writer.stats_path()).expect("stats");
        assert_eq!(stats.lines().count(), 3);
        let communities = std::fs::read_to_string(writer.communities_path()).expect("communities");
        let last = communities.lines().last().expect("row");
        assert_eq!(last.split(',').count(), 48);
    }

    #[test]
    fn headers_can_be_disabled() {
        let dir = TempDir::new().expect("tempdir");
        let out = OutputConfig {
            dir: dir.path().to_path_buf(),
            write_headers: false,
            ..OutputConfig::default()
        };
        let writer = ResultWriter::new(&out, 2, 3);
        writer.write(&analysis(&AnalysisConfig::default())).expect("write");
        assert!(writer.rankings_path().ends_with("character_rankings_task_2.csv"));
        let rankings = std::fs::read_to_string(writer.rankings_path()).expect("rankings");
        assert_eq!(rankings.lines().count(), 2);
        assert!(!writer.stats_path().exists());
    }
}
