//! Output formatting for CLI commands.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SentibenchArgs};
use crate::error::Result;
use crate::evaluation::{ResultEntry, ResultTable};

/// A command result that can be rendered in every output format.
pub trait Report: Serialize {
    /// Column names for CSV output.
    fn csv_header(&self) -> Vec<&'static str>;

    /// One CSV record per row.
    fn csv_rows(&self) -> Vec<Vec<String>>;

    /// Human-readable rendering.
    fn write_human(&self, out: &mut dyn Write) -> Result<()>;
}

/// One row of the evaluation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRow {
    pub key: String,
    pub method: String,
    pub classifier: String,
    pub accuracy: f64,
    pub vocabulary_size: usize,
}

/// Result structure for the evaluate command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub data_file: String,
    pub n_documents: usize,
    pub n_train: usize,
    pub n_test: usize,
    /// Label classes in code order (`classes[0]` is encoded as 0).
    pub classes: Vec<String>,
    pub results: Vec<ResultRow>,
    /// Highest-accuracy row; the earliest wins ties.
    pub best: Option<ResultRow>,
}

impl EvaluationReport {
    pub fn new(
        data_file: String,
        n_documents: usize,
        classes: Vec<String>,
        table: &ResultTable,
    ) -> Self {
        let (n_train, n_test) = table
            .entries()
            .first()
            .map_or((0, 0), |e| (e.n_train, e.n_test));
        let results = table.iter().map(ResultRow::from).collect();

        EvaluationReport {
            data_file,
            n_documents,
            n_train,
            n_test,
            classes,
            results,
            best: table.best().map(ResultRow::from),
        }
    }
}

impl From<&ResultEntry> for ResultRow {
    fn from(entry: &ResultEntry) -> Self {
        ResultRow {
            key: entry.key(),
            method: entry.method.to_string(),
            classifier: entry.classifier.to_string(),
            accuracy: entry.accuracy,
            vocabulary_size: entry.vocabulary_size,
        }
    }
}

impl Report for EvaluationReport {
    fn csv_header(&self) -> Vec<&'static str> {
        vec!["key", "accuracy"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.results
            .iter()
            .map(|row| vec![row.key.clone(), format!("{:.4}", row.accuracy)])
            .collect()
    }

    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Evaluation Results:")?;
        writeln!(out, "═══════════════════")?;
        writeln!(
            out,
            "{} documents ({} train / {} test) from {}",
            self.n_documents, self.n_train, self.n_test, self.data_file
        )?;
        let encoding: Vec<String> = self
            .classes
            .iter()
            .enumerate()
            .map(|(code, class)| format!("{class}={code}"))
            .collect();
        writeln!(out, "Labels: {}", encoding.join(", "))?;
        writeln!(out)?;

        if self.results.is_empty() {
            writeln!(out, "No results (empty dataset).")?;
            return Ok(());
        }

        let width = self
            .results
            .iter()
            .map(|row| row.key.len())
            .max()
            .unwrap_or(0)
            .max("key".len());
        writeln!(out, "{:<width$}  {:>8}", "key", "accuracy")?;
        writeln!(out, "{}  {}", "-".repeat(width), "-".repeat(8))?;
        for row in &self.results {
            writeln!(out, "{:<width$}  {:>8.4}", row.key, row.accuracy)?;
        }

        if let Some(best) = &self.best {
            writeln!(out)?;
            writeln!(out, "Best: {} ({:.4})", best.key, best.accuracy)?;
        }
        Ok(())
    }
}

/// One term of the vocabulary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRow {
    pub term: String,
    pub index: usize,
    pub document_frequency: usize,
}

/// Result structure for the vocabulary command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyReport {
    pub data_file: String,
    pub n_documents: usize,
    pub n_terms: usize,
    /// Terms ordered by descending document frequency, then by term.
    pub terms: Vec<TermRow>,
}

impl Report for VocabularyReport {
    fn csv_header(&self) -> Vec<&'static str> {
        vec!["term", "index", "document_frequency"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.terms
            .iter()
            .map(|row| {
                vec![
                    row.term.clone(),
                    row.index.to_string(),
                    row.document_frequency.to_string(),
                ]
            })
            .collect()
    }

    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Vocabulary:")?;
        writeln!(out, "═══════════")?;
        writeln!(
            out,
            "{} terms from {} documents in {}",
            self.n_terms, self.n_documents, self.data_file
        )?;
        writeln!(out)?;

        let width = self
            .terms
            .iter()
            .map(|row| row.term.chars().count())
            .max()
            .unwrap_or(0)
            .max("term".len());
        writeln!(out, "{:<width$}  {:>8}  {:>8}", "term", "index", "docs")?;
        for row in &self.terms {
            writeln!(
                out,
                "{:<width$}  {:>8}  {:>8}",
                row.term, row.index, row.document_frequency
            )?;
        }
        Ok(())
    }
}

/// Output a result to stdout in the format selected on the command line.
pub fn output_result<T: Report>(message: &str, result: &T, args: &SentibenchArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_result(&mut out, message, result, args)?;
    out.flush()?;
    Ok(())
}

/// Render a result into `out`.
pub fn write_result<T: Report>(
    out: &mut dyn Write,
    message: &str,
    result: &T,
    args: &SentibenchArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(out, message, result, args),
        OutputFormat::Json => output_json(out, result, args),
        OutputFormat::Csv => output_csv(out, result),
    }
}

fn output_human<T: Report>(
    out: &mut dyn Write,
    message: &str,
    result: &T,
    args: &SentibenchArgs,
) -> Result<()> {
    if args.verbosity() > 1 {
        writeln!(out, "{message}")?;
        writeln!(out)?;
    }
    result.write_human(out)
}

fn output_json<T: Report>(out: &mut dyn Write, result: &T, args: &SentibenchArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    writeln!(out, "{json}")?;
    Ok(())
}

fn output_csv<T: Report>(out: &mut dyn Write, result: &T) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(result.csv_header())?;
    for row in result.csv_rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}
