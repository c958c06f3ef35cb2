use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Perspective;
use crate::network::Composition;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the catalogues and the book texts live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_catalogue_dir")]
    pub catalogue_dir: PathBuf,
    #[serde(default = "default_books")]
    pub books: String,
    #[serde(default = "default_characters")]
    pub characters: String,
    #[serde(default = "default_names")]
    pub names: String,
    /// Optional table of annotated relations (`book, source, target, label`).
    #[serde(default)]
    pub relations: Option<String>,
    #[serde(default)]
    pub first_person_dir: Option<PathBuf>,
    #[serde(default)]
    pub third_person_dir: Option<PathBuf>,
    #[serde(default)]
    pub multi_dir: Option<PathBuf>,
    #[serde(default)]
    pub other_dir: Option<PathBuf>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            catalogue_dir: default_catalogue_dir(),
            books: default_books(),
            characters: default_characters(),
            names: default_names(),
            relations: None,
            first_person_dir: None,
            third_person_dir: None,
            multi_dir: None,
            other_dir: None,
        }
    }
}

impl CorpusConfig {
    /// Directory holding the texts of books with `perspective`.
    #[must_use]
    pub fn text_dir(&self, perspective: Perspective) -> &Path {
        let specific = match perspective {
            Perspective::FirstPerson => self.first_person_dir.as_deref(),
            Perspective::ThirdPerson => self.third_person_dir.as_deref(),
            Perspective::Multi => self.multi_dir.as_deref(),
            Perspective::Other => self.other_dir.as_deref(),
        };
        specific.unwrap_or(&self.root)
    }

    #[must_use]
    pub fn books_path(&self) -> PathBuf {
        self.catalogue_dir.join(&self.books)
    }

    #[must_use]
    pub fn characters_path(&self) -> PathBuf {
        self.catalogue_dir.join(&self.characters)
    }

    #[must_use]
    pub fn names_path(&self) -> PathBuf {
        self.catalogue_dir.join(&self.names)
    }

    #[must_use]
    pub fn relations_path(&self) -> Option<PathBuf> {
        self.relations.as_ref().map(|r| self.catalogue_dir.join(r))
    }
}

/// What to do when one book fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnBookError {
    /// Stop the run at the first failing book.
    #[default]
    Abort,
    /// Log the failure and continue with the next book.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default)]
    pub composition: Composition,
    #[serde(default)]
    pub on_book_error: OnBookError,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            composition: Composition::default(),
            on_book_error: OnBookError::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub network_stats: bool,
    #[serde(default)]
    pub communities: bool,
    #[serde(default = "default_katz_alpha")]
    pub katz_alpha: f64,
    #[serde(default = "default_katz_beta")]
    pub katz_beta: f64,
    #[serde(default = "default_katz_max_iter")]
    pub katz_max_iter: usize,
    #[serde(default = "default_katz_tolerance")]
    pub katz_tolerance: f64,
    #[serde(default = "default_bisection_max_iter")]
    pub bisection_max_iter: usize,
    #[serde(default)]
    pub bisection_seed: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            network_stats: false,
            communities: false,
            katz_alpha: default_katz_alpha(),
            katz_beta: default_katz_beta(),
            katz_max_iter: default_katz_max_iter(),
            katz_tolerance: default_katz_tolerance(),
            bisection_max_iter: default_bisection_max_iter(),
            bisection_seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_rankings")]
    pub rankings: String,
    #[serde(default = "default_network_stats")]
    pub network_stats: String,
    #[serde(default = "default_communities")]
    pub communities: String,
    #[serde(default = "default_corpus_tag")]
    pub corpus_tag: String,
    #[serde(default = "default_true")]
    pub write_headers: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            rankings: default_rankings(),
            network_stats: default_network_stats(),
            communities: default_communities(),
            corpus_tag: default_corpus_tag(),
            write_headers: default_true(),
        }
    }
}

impl OutputConfig {
    /// Path of output file `name` for one task of a partitioned run.
    ///
    /// `character_rankings.csv` becomes `character_rankings_task_2.csv` for
    /// task 2 when `total > 1`.
    #[must_use]
    pub fn path_for(&self, name: &str, task: usize, total: usize) -> PathBuf {
        if total <= 1 {
            return self.dir.join(name);
        }
        let file = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{stem}_task_{task}.{ext}"),
            _ => format!("{name}_task_{task}"),
        };
        self.dir.join(file)
    }
}

/// Load the configuration at `path`; a missing file yields the defaults.
///
/// # Errors
///
/// Returns [`Error::Config`] when the file exists but cannot be read, is
/// not valid TOML for this schema, or sets a window size of zero.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let config = toml::from_str::<Config>(&content).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    if config.pipeline.window_size == 0 {
        return Err(Error::Config {
            path: path.to_path_buf(),
            detail: "pipeline.window_size must be at least 1".to_string(),
        });
    }
    Ok(config)
}

fn default_root() -> PathBuf {
    PathBuf::from("corpus")
}

fn default_catalogue_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_books() -> String {
    "BOOKS.csv".to_string()
}

fn default_characters() -> String {
    "NODES.csv".to_string()
}

fn default_names() -> String {
    "NAMES.csv".to_string()
}

const fn default_window_size() -> usize {
    crate::cooccurrence::DEFAULT_WINDOW_SIZE
}

const fn default_katz_alpha() -> f64 {
    0.1
}

const fn default_katz_beta() -> f64 {
    1.0
}

const fn default_katz_max_iter() -> usize {
    1000
}

const fn default_katz_tolerance() -> f64 {
    1e-6
}

const fn default_bisection_max_iter() -> usize {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_rankings() -> String {
    "character_rankings.csv".to_string()
}

fn default_network_stats() -> String {
    "networkstats.csv".to_string()
}

fn default_communities() -> String {
    "communities_frequency_distributions.csv".to_string()
}

fn default_corpus_tag() -> String {
    "corpus".to_string()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let cfg = load_config(&dir.path().join("charnet.toml")).expect("defaults");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.pipeline.window_size, 2);
        assert_eq!(cfg.pipeline.composition, Composition::Sum);
        assert_eq!(cfg.pipeline.on_book_error, OnBookError::Abort);
        assert!(cfg.output.write_headers);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("charnet.toml");
        std::fs::write(
            &path,
            "[pipeline]\nwindow_size = 3\ncomposition = \"max\"\non_book_error = \"skip\"\n\n\
             [corpus]\nroot = \"texts\"\nmulti_dir = \"texts/multi\"\n",
        )
        .expect("write config");
        let cfg = load_config(&path).expect("parse");
        assert_eq!(cfg.pipeline.window_size, 3);
        assert_eq!(cfg.pipeline.composition, Composition::Max);
        assert_eq!(cfg.pipeline.on_book_error, OnBookError::Skip);
        assert_eq!(cfg.corpus.text_dir(Perspective::Multi), Path::new("texts/multi"));
        assert_eq!(cfg.corpus.text_dir(Perspective::FirstPerson), Path::new("texts"));
        assert!((cfg.analysis.katz_alpha - 0.1).abs() < 1e-12);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("charnet.toml");
        std::fs::write(&path, "[pipeline\nwindow_size = ").expect("write config");
        let err = load_config(&path).expect_err("invalid toml");
        assert_eq!(err.code(), ErrorCode::ConfigParseError);
    }

    #[test]
    fn zero_window_size_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("charnet.toml");
        std::fs::write(&path, "[pipeline]\nwindow_size = 0\n").expect("write config");
        let err = load_config(&path).expect_err("zero window");
        assert_eq!(err.code(), ErrorCode::ConfigParseError);
        assert!(err.to_string().contains("window_size"));
    }

    #[test]
    fn relations_table_is_opt_in() {
        let corpus = CorpusConfig::default();
        assert_eq!(corpus.relations_path(), None);

        let corpus = CorpusConfig {
            catalogue_dir: PathBuf::from("cat"),
            relations: Some("RELATIONS.csv".to_string()),
            ..CorpusConfig::default()
        };
        assert_eq!(corpus.relations_path(), Some(PathBuf::from("cat/RELATIONS.csv")));
    }

    #[test]
    fn unknown_composition_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("charnet.toml");
        std::fs::write(&path, "[pipeline]\ncomposition = \"mean\"\n").expect("write config");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn task_suffix_only_for_partitioned_runs() {
        let out = OutputConfig::default();
        assert_eq!(out.path_for("character_rankings.csv", 1, 1), Path::new("./character_rankings.csv"));
        assert_eq!(
            out.path_for("character_rankings.csv", 2, 4),
            Path::new("./character_rankings_task_2.csv")
        );
        assert_eq!(out.path_for("rankings", 3, 4), Path::new("./rankings_task_3"));
    }
}
