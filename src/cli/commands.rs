//! Command implementations for the sentibench CLI.

use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::analysis::analyzer::StandardAnalyzer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::dataset::load_reviews;
use crate::error::Result;
use crate::evaluation::EvaluationHarness;
use crate::vectorize::{CountVectorizer, DocumentFrequencyTable};

/// Execute a CLI command.
pub fn execute_command(args: SentibenchArgs) -> Result<()> {
    match &args.command {
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, &args),
        Command::Vocabulary(vocabulary_args) => show_vocabulary(vocabulary_args, &args),
    }
}

/// Evaluate the configured method × classifier grid on a data file.
fn evaluate(args: &EvaluateArgs, cli_args: &SentibenchArgs) -> Result<()> {
    // Names and values are validated before the data file is touched.
    let config = args.resolve_config()?;
    let data_file = &args.data.data_file;
    let dataset = load_reviews(data_file, &config.dataset)?;

    let start_time = Instant::now();
    let harness = EvaluationHarness::new(config)?;
    let (encoder, table) = harness.run_dataset(&dataset)?;
    info!(
        "evaluated {} combinations in {} ms",
        table.len(),
        start_time.elapsed().as_millis()
    );

    let report = EvaluationReport::new(
        data_file.display().to_string(),
        dataset.len(),
        encoder.classes().to_vec(),
        &table,
    );
    output_result("Evaluation completed", &report, cli_args)
}

/// Fit a vocabulary on every document of a data file and list its terms.
fn show_vocabulary(args: &VocabularyArgs, cli_args: &SentibenchArgs) -> Result<()> {
    let config = args.data.base_config()?;
    let data_file = &args.data.data_file;
    let dataset = load_reviews(data_file, &config.dataset)?;

    let analyzer = Arc::new(StandardAnalyzer::with_stop_words(&config.stop_words)?);
    let (vocabulary, counts) = CountVectorizer::new(analyzer).fit_transform(&dataset.documents)?;
    let frequencies = DocumentFrequencyTable::from_counts(&counts);

    let mut terms: Vec<TermRow> = vocabulary
        .iter()
        .map(|(term, index)| TermRow {
            term: term.to_string(),
            index,
            document_frequency: frequencies.frequency(index).unwrap_or(0),
        })
        .collect();
    terms.sort_by(|a, b| {
        b.document_frequency
            .cmp(&a.document_frequency)
            .then_with(|| a.term.cmp(&b.term))
    });
    if args.limit > 0 {
        terms.truncate(args.limit);
    }

    let report = VocabularyReport {
        data_file: data_file.display().to_string(),
        n_documents: dataset.len(),
        n_terms: vocabulary.len(),
        terms,
    };
    output_result("Vocabulary fitted", &report, cli_args)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use tempfile::NamedTempFile;

    use super::*;

    fn reviews_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "review,sentiment").unwrap();
        for _ in 0..5 {
            writeln!(file, "great acting,positive").unwrap();
            writeln!(file, "terrible plot,negative").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn run(argv: &[&str]) -> Result<()> {
        execute_command(SentibenchArgs::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_evaluate_command_runs() {
        let file = reviews_file();
        let path = file.path().to_str().unwrap();
        run(&[
            "sentibench",
            "-q",
            "-f",
            "json",
            "evaluate",
            path,
            "--classifiers",
            "naive-bayes,decision-tree",
        ])
        .unwrap();
    }

    #[test]
    fn test_vocabulary_command_runs() {
        let file = reviews_file();
        let path = file.path().to_str().unwrap();
        run(&["sentibench", "-q", "-f", "csv", "vocabulary", path, "-n", "2"]).unwrap();
    }

    #[test]
    fn test_unknown_method_fails_before_reading() {
        let err = run(&["sentibench", "evaluate", "missing.csv", "--methods", "bm25"]).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(run(&["sentibench", "vocabulary", "does-not-exist.csv"]).is_err());
    }
}
