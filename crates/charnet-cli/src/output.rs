//! Machine-readable run output.
//!
//! With `--json`, one JSON object per processed book is printed on stdout;
//! logs always go to stderr so the two never mix.

use std::io::{self, Write};

use charnet_graph::BookAnalysis;
use serde::Serialize;

/// Summary of one processed book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSummary {
    pub book_id: String,
    pub word_count: usize,
    pub nodes: usize,
    pub edges: usize,
}

impl From<&BookAnalysis> for BookSummary {
    fn from(analysis: &BookAnalysis) -> Self {
        Self {
            book_id: analysis.book_id.to_string(),
            word_count: analysis.word_count,
            nodes: analysis.graph.node_count(),
            edges: analysis.graph.edge_count(),
        }
    }
}

/// Write `value` as one line of JSON.
pub fn write_json_line(w: &mut dyn Write, value: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *w, value)?;
    writeln!(w)?;
    Ok(())
}

/// Print a book summary to stdout.
pub fn print_summary(summary: &BookSummary) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json_line(&mut lock, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_one_json_line() {
        let summary = BookSummary {
            book_id: "12".to_string(),
            word_count: 100,
            nodes: 4,
            edges: 3,
        };
        let mut buf = Vec::new();
        write_json_line(&mut buf, &summary).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(
            text,
            "{\"book_id\":\"12\",\"word_count\":100,\"nodes\":4,\"edges\":3}\n"
        );
    }
}
