//! Reading the catalogue CSV files.
//!
//! Fields may be quoted; a doubled quote inside a quoted field is a literal
//! quote. Records do not span lines. Blank lines are skipped.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Every record of the CSV file at `path`, header included.
///
/// # Errors
///
/// Returns an error if the file cannot be read as UTF-8 text.
pub fn read_records(path: &Path) -> Result<Vec<Vec<String>>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalogue {}", path.display()))?;
    Ok(parse_records(&text))
}

fn parse_records(text: &str) -> Vec<Vec<String>> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

/// Parse a single CSV line, handling quoted fields.
fn parse_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == ',' {
            result.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    result.push(current);
    result
}
