//! Command line argument parsing for the sentibench CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::token_filter::StopWords;
use crate::classifier::ClassifierKind;
use crate::error::Result;
use crate::evaluation::EvaluationConfig;
use crate::vectorize::FeatureMethod;

/// sentibench - compare text vectorizers and classifiers on labelled reviews
#[derive(Parser, Debug, Clone)]
#[command(name = "sentibench")]
#[command(about = "Compare count/TF-IDF features across classifiers on labelled reviews")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SentibenchArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SentibenchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Evaluate every feature method with every classifier
    Evaluate(EvaluateArgs),

    /// Show the vocabulary fitted from a data file
    Vocabulary(VocabularyArgs),
}

/// Options shared by commands that read a data file.
#[derive(Parser, Debug, Clone)]
pub struct DataArgs {
    /// CSV file with a header row
    #[arg(value_name = "DATA_FILE")]
    pub data_file: PathBuf,

    /// Evaluation config file (JSON); flags override its values
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Stop word list: english, none
    #[arg(long, value_name = "STOP_WORDS")]
    pub stop_words: Option<String>,

    /// Column holding the review text
    #[arg(long, value_name = "COLUMN")]
    pub text_field: Option<String>,

    /// Column holding the sentiment label
    #[arg(long, value_name = "COLUMN")]
    pub label_field: Option<String>,
}

impl DataArgs {
    /// Load the config file (or defaults) and apply the data flags.
    pub fn base_config(&self) -> Result<EvaluationConfig> {
        let mut config = match &self.config {
            Some(path) => EvaluationConfig::from_file(path)?,
            None => EvaluationConfig::default(),
        };
        if let Some(stop_words) = &self.stop_words {
            config.stop_words = stop_words.parse::<StopWords>()?;
        }
        if let Some(field) = &self.text_field {
            config.dataset.text_field = field.clone();
        }
        if let Some(field) = &self.label_field {
            config.dataset.label_field = field.clone();
        }
        Ok(config)
    }
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Feature methods to evaluate (comma-separated: count, tfidf)
    #[arg(short, long, value_delimiter = ',')]
    pub methods: Vec<String>,

    /// Classifiers to evaluate (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub classifiers: Vec<String>,

    /// Share of rows held out for testing
    #[arg(short, long)]
    pub test_fraction: Option<f64>,

    /// Seed for the split and the random forest
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Disable L2 normalization of TF-IDF rows
    #[arg(long)]
    pub no_normalize: bool,
}

impl EvaluateArgs {
    /// Resolve the effective configuration: file, then flags, then validation.
    ///
    /// Method and classifier names are parsed here, before any data is read.
    pub fn resolve_config(&self) -> Result<EvaluationConfig> {
        let mut config = self.data.base_config()?;

        if !self.methods.is_empty() {
            config.methods = self
                .methods
                .iter()
                .map(|name| name.parse::<FeatureMethod>())
                .collect::<Result<_>>()?;
        }
        if !self.classifiers.is_empty() {
            config.classifiers = self
                .classifiers
                .iter()
                .map(|name| name.parse::<ClassifierKind>())
                .collect::<Result<_>>()?;
        }
        if let Some(fraction) = self.test_fraction {
            config.test_fraction = fraction;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
            config.classifier.seed = seed;
        }
        if self.no_normalize {
            config.tfidf.l2_normalize = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Arguments for vocabulary inspection
#[derive(Parser, Debug, Clone)]
pub struct VocabularyArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Number of terms to show, most frequent first (0 = all)
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}
