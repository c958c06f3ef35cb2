//! One batch run: catalogues → books → networks → result files.

use std::path::Path;

use anyhow::{Context, Result, bail};
use charnet_core::catalogue::{BookRow, CharacterRow, NameVariantRow, RelationRow, task_range};
use charnet_core::config::OnBookError;
use charnet_core::{Book, Config, Corpus, Pipeline};
use charnet_graph::report::ResultWriter;
use charnet_graph::{BookAnalysis, analyze_book};
use tracing::{error, info, instrument, warn};

use crate::output::{BookSummary, print_summary};
use crate::tables::read_records;

/// Which slice of the corpus this process handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSlice {
    /// 1-based task number.
    pub task: usize,
    pub total: usize,
}

/// Outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub processed: usize,
    pub skipped: usize,
}

/// Load the corpus described by `config`.
///
/// # Errors
///
/// Returns an error if a catalogue cannot be read or is inconsistent.
pub fn load_corpus(config: &Config) -> Result<Corpus> {
    let corpus_cfg = &config.corpus;
    let books = read_records(&corpus_cfg.books_path())?;
    let characters = read_records(&corpus_cfg.characters_path())?;
    let names = read_records(&corpus_cfg.names_path())?;

    let mut corpus = Corpus::from_rows(
        books.iter().filter_map(|r| BookRow::from_fields(r)),
        characters.iter().filter_map(|r| CharacterRow::from_fields(r)),
        names.iter().filter_map(|r| NameVariantRow::from_fields(r)),
    )?;
    if let Some(path) = corpus_cfg.relations_path() {
        let relations = read_records(&path)?;
        corpus.add_relations(relations.iter().filter_map(|r| RelationRow::from_fields(r)))?;
    }
    Ok(corpus)
}

/// Process this task's share of the corpus.
///
/// # Errors
///
/// Returns the first book failure unless `pipeline.on_book_error` is
/// `skip`, and any failure to load the corpus or partition it.
#[instrument(skip(config, emit_json))]
pub fn run(config: &Config, slice: TaskSlice, emit_json: bool) -> Result<RunReport> {
    if slice.task == 0 || slice.task > slice.total {
        bail!("task {} is outside 1..={}", slice.task, slice.total);
    }

    let mut corpus = load_corpus(config)?;
    let ids = corpus.book_ids();
    let range = task_range(ids.len(), slice.task, slice.total)
        .with_context(|| format!("task {} is outside 1..={}", slice.task, slice.total))?;
    info!(
        books = ids.len(),
        first = range.start,
        end = range.end,
        "processing task slice"
    );

    let out_dir = &config.output.dir;
    if !out_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    }

    let pipeline = Pipeline::from_config(&config.pipeline);
    let writer = ResultWriter::new(&config.output, slice.task, slice.total);
    let mut report = RunReport::default();

    for id in &ids[range] {
        let Some(book) = corpus.book_mut(*id) else {
            continue;
        };
        match process_book(book, config, &pipeline, &writer) {
            Ok(None) => {
                info!(book_id = %id, "text path is a directory, skipping book");
                report.skipped += 1;
            }
            Ok(Some(analysis)) => {
                report.processed += 1;
                if emit_json {
                    print_summary(&BookSummary::from(&analysis))?;
                }
            }
            Err(err) => {
                let code = err
                    .downcast_ref::<charnet_core::Error>()
                    .map(|e| e.code().code());
                match config.pipeline.on_book_error {
                    OnBookError::Abort => {
                        error!(book_id = %id, code, "book failed: {err:#}");
                        return Err(err.context(format!("book {id} failed")));
                    }
                    OnBookError::Skip => {
                        warn!(book_id = %id, code, "skipping book: {err:#}");
                        report.skipped += 1;
                    }
                }
            }
        }
    }
    info!(
        processed = report.processed,
        skipped = report.skipped,
        rankings = %writer.rankings_path().display(),
        "run complete"
    );
    Ok(report)
}

fn process_book(
    book: &mut Book,
    config: &Config,
    pipeline: &Pipeline,
    writer: &ResultWriter,
) -> Result<Option<BookAnalysis>> {
    let dir: &Path = config.corpus.text_dir(book.perspective);
    if !book.read_text(dir)? {
        return Ok(None);
    }
    pipeline.compute_network(book)?;
    let analysis = analyze_book(book, &config.analysis)?;
    writer.write(&analysis)?;
    Ok(Some(analysis))
}
