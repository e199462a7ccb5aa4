use log::info;

use super::classifier::TicketClassifier;
use super::error::ClassifierError;
use super::extractor::{FeatureExtractor, LanguageExtractor, SemanticExtractor};
use super::record::TrainingBatch;
use super::svm::LinearSvc;
use super::utils::FeatureMatrix;
use crate::config::{SvmConfig, TrainingConfig, VectorizerConfig};

/// An untrained ticket classifier: configuration only.
///
/// `train` is the only way to obtain a [`TicketClassifier`], so a model that
/// can predict is always a fitted one.
#[derive(Debug, Clone, Default)]
pub struct TicketClassifierBuilder {
    config: TrainingConfig,
}

impl TicketClassifierBuilder {
    /// Creates a builder with the production configuration
    ///
    /// # Example
    /// ```
    /// use triage::TicketClassifierBuilder;
    ///
    /// let builder = TicketClassifierBuilder::new();
    /// assert_eq!(builder.config().semantic.min_df, 3);
    /// ```
    pub fn new() -> Self {
        Self {
            config: TrainingConfig::default(),
        }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Replaces the whole training configuration
    pub fn with_config(mut self, config: TrainingConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the vectorizer used for queue and priority features
    pub fn with_semantic_config(mut self, config: VectorizerConfig) -> Self {
        self.config.semantic = config;
        self
    }

    /// Sets the vectorizer used for language features
    pub fn with_language_config(mut self, config: VectorizerConfig) -> Self {
        self.config.language = config;
        self
    }

    /// Sets the solver settings shared by all three classifiers
    pub fn with_svm_config(mut self, config: SvmConfig) -> Self {
        self.config.svm = config;
        self
    }

    /// Fits both extractors and all three classifiers on `batch`.
    ///
    /// Queue and priority are trained on semantic features, language on
    /// character features. All three see every row of the batch.
    ///
    /// # Returns
    /// * `Result<TicketClassifier, ClassifierError>` - The trained classifier, or an error if:
    ///   - The configuration is invalid
    ///   - The batch is empty
    ///   - A vectorizer ends up with no vocabulary
    ///   - A label column has a single distinct value
    ///
    /// # Example
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use triage::{LabeledTicket, TicketClassifier, TrainingBatch};
    ///
    /// let tickets = vec![
    ///     LabeledTicket::new("Invoice", "Refund my invoice", "Billing", "en", "High"),
    ///     LabeledTicket::new("Login", "Server error on login", "Tech", "en", "Low"),
    /// ];
    /// let batch = TrainingBatch::from_tickets(&tickets)?;
    /// let classifier = TicketClassifier::builder().train(&batch)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn train(&self, batch: &TrainingBatch) -> Result<TicketClassifier, ClassifierError> {
        self.config.validate()?;
        if batch.is_empty() {
            return Err(ClassifierError::EmptyInput(
                "No training ticket has both subject and body".into(),
            ));
        }
        info!("Training on {} tickets", batch.len());

        let mut semantic = SemanticExtractor::new(self.config.semantic.clone());
        let mut language = LanguageExtractor::new(self.config.language.clone());

        let semantic_features = semantic.fit_transform(batch.texts())?;
        info!("Semantic vocabulary: {} terms", semantic.vocabulary_size());
        let language_features = language.fit_transform(batch.texts())?;
        info!("Language vocabulary: {} terms", language.vocabulary_size());

        let mut queue_model = LinearSvc::new(self.config.svm.clone());
        let mut priority_model = LinearSvc::new(self.config.svm.clone());
        let mut language_model = LinearSvc::new(self.config.svm.clone());

        fit_target(&mut queue_model, "queue", &semantic_features, batch.queue_labels())?;
        fit_target(&mut priority_model, "priority", &semantic_features, batch.priority_labels())?;
        fit_target(&mut language_model, "language", &language_features, batch.language_labels())?;

        Ok(TicketClassifier {
            config: self.config.clone(),
            semantic,
            language,
            queue_model,
            priority_model,
            language_model,
        })
    }
}

fn fit_target(
    model: &mut LinearSvc,
    target: &str,
    features: &FeatureMatrix,
    labels: &[String],
) -> Result<(), ClassifierError> {
    model.fit(features, labels).map_err(|e| match e {
        ClassifierError::SingleClass(msg) => {
            ClassifierError::SingleClass(format!("{} target {}", target, msg))
        }
        other => other,
    })?;
    info!("Trained {} classifier with labels {:?}", target, model.classes().unwrap_or_default());
    Ok(())
}
