//! The method-comparison evaluation loop.

use std::sync::Arc;

use log::{debug, info};

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::classifier::{ClassifierKind, Label};
use crate::dataset::{LabelEncoder, ReviewDataset};
use crate::error::{Result, SentibenchError};
use crate::evaluation::config::{EvaluationConfig, check_unique};
use crate::evaluation::metrics::accuracy;
use crate::evaluation::report::{ResultEntry, ResultTable};
use crate::model_selection::Partitioner;
use crate::vectorize::FeatureMethod;

/// Runs every (feature method, classifier) combination over one split.
///
/// One partition is drawn per run and shared by all combinations. For each
/// method the vectorizer is fitted on the training documents only, and each
/// classifier is a fresh instance that lives for a single fit/predict cycle.
///
/// # Examples
///
/// ```
/// use sentibench::classifier::ClassifierKind;
/// use sentibench::evaluation::{EvaluationConfig, EvaluationHarness};
/// use sentibench::vectorize::FeatureMethod;
///
/// let mut documents = Vec::new();
/// let mut labels = Vec::new();
/// for _ in 0..5 {
///     documents.push("great acting");
///     labels.push(1);
///     documents.push("terrible plot");
///     labels.push(0);
/// }
///
/// let harness = EvaluationHarness::new(EvaluationConfig::default()).unwrap();
/// let table = harness
///     .run(&documents, &labels, &[FeatureMethod::Count], &[ClassifierKind::NaiveBayes])
///     .unwrap();
/// assert_eq!(table.accuracy("count_naive-bayes"), Some(1.0));
/// ```
pub struct EvaluationHarness {
    config: EvaluationConfig,
    analyzer: Arc<dyn Analyzer>,
    partitioner: Partitioner,
}

impl EvaluationHarness {
    /// Validate `config` and build the shared analyzer and partitioner.
    pub fn new(config: EvaluationConfig) -> Result<Self> {
        config.validate()?;
        let analyzer: Arc<dyn Analyzer> =
            Arc::new(StandardAnalyzer::with_stop_words(&config.stop_words)?);
        let partitioner = config.partitioner()?;
        Ok(EvaluationHarness {
            config,
            analyzer,
            partitioner,
        })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn partitioner(&self) -> &Partitioner {
        &self.partitioner
    }

    /// Evaluate the methods and classifiers listed in the configuration.
    pub fn run_configured<S>(&self, documents: &[S], labels: &[Label]) -> Result<ResultTable>
    where
        S: AsRef<str> + Clone,
    {
        self.run(
            documents,
            labels,
            &self.config.methods,
            &self.config.classifiers,
        )
    }

    /// Like [`run`](Self::run), but with methods and classifiers given by name.
    ///
    /// Every name is parsed before any fitting starts, so a typo fails fast.
    pub fn run_named<S, M, C>(
        &self,
        documents: &[S],
        labels: &[Label],
        methods: &[M],
        classifiers: &[C],
    ) -> Result<ResultTable>
    where
        S: AsRef<str> + Clone,
        M: AsRef<str>,
        C: AsRef<str>,
    {
        let methods = methods
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<FeatureMethod>>>()?;
        let classifiers = classifiers
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<ClassifierKind>>>()?;
        self.run(documents, labels, &methods, &classifiers)
    }

    /// Encode a loaded dataset's labels and evaluate the configured grid.
    pub fn run_dataset(&self, dataset: &ReviewDataset) -> Result<(LabelEncoder, ResultTable)> {
        let (encoder, labels) = dataset.encode_labels()?;
        let table = self.run_configured(&dataset.documents, &labels)?;
        Ok((encoder, table))
    }

    /// Evaluate every `methods × classifiers` combination, in that order.
    ///
    /// An empty corpus yields an empty table.
    pub fn run<S>(
        &self,
        documents: &[S],
        labels: &[Label],
        methods: &[FeatureMethod],
        classifiers: &[ClassifierKind],
    ) -> Result<ResultTable>
    where
        S: AsRef<str> + Clone,
    {
        check_unique("feature method", methods)?;
        check_unique("classifier", classifiers)?;
        if documents.len() != labels.len() {
            return Err(SentibenchError::invalid_config(format!(
                "{} documents but {} labels",
                documents.len(),
                labels.len()
            )));
        }

        let mut table = ResultTable::new();
        if documents.is_empty() {
            info!("empty corpus, nothing to evaluate");
            return Ok(table);
        }

        let split = self.partitioner.split(documents, labels)?;
        info!(
            "evaluating {} combinations on {} train / {} test documents",
            methods.len() * classifiers.len(),
            split.n_train(),
            split.n_test()
        );

        for method in methods {
            let features = method.vectorize(
                self.analyzer.clone(),
                &self.config.tfidf,
                &split.train_documents,
                &split.test_documents,
            )?;
            debug!(
                "{method}: vocabulary of {} terms, {} non-zero training entries",
                features.vocabulary_size,
                features.train.nnz()
            );

            for kind in classifiers {
                let mut model = kind.build(&self.config.classifier);
                model.fit(&features.train, &split.train_labels)?;
                let predictions = model.predict(&features.test)?;
                let score = accuracy(&predictions, &split.test_labels)?;

                let entry = ResultEntry {
                    method: *method,
                    classifier: *kind,
                    accuracy: score,
                    vocabulary_size: features.vocabulary_size,
                    n_train: split.n_train(),
                    n_test: split.n_test(),
                };
                info!("{}: accuracy {score:.4}", entry.key());
                table.push(entry)?;
            }
        }

        Ok(table)
    }
}

impl std::fmt::Debug for EvaluationHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationHarness")
            .field("config", &self.config)
            .field("analyzer", &self.analyzer.name())
            .field("partitioner", &self.partitioner)
            .finish()
    }
}
