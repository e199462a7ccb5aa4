use log::debug;
use serde::{Deserialize, Serialize};

use super::builder::TicketClassifierBuilder;
use super::error::ClassifierError;
use super::extractor::{FeatureExtractor, LanguageExtractor, SemanticExtractor};
use super::record::{assemble_texts, TicketRecord, TrainingBatch};
use super::svm::LinearSvc;
use super::{ClassifierInfo, TargetInfo};
use crate::config::TrainingConfig;

/// Predicted labels per target, aligned to the retained input rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "Queue")]
    pub queue: Vec<String>,
    #[serde(rename = "Language")]
    pub language: Vec<String>,
    #[serde(rename = "Priority")]
    pub priority: Vec<String>,
}

impl Prediction {
    /// Number of retained rows
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// A trained ticket classifier.
///
/// Holds the two frozen vocabularies and the three fitted classifiers and
/// never changes after training, so it is `Send + Sync` and can be shared
/// behind an `Arc` for concurrent predictions. Retraining builds a new value.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use triage::{LabeledTicket, TicketClassifier, TicketRecord, TrainingBatch};
///
/// let tickets: Vec<LabeledTicket> = (0..6)
///     .map(|i| {
///         let (queue, language, priority) = if i % 2 == 0 {
///             ("Billing", "en", "High")
///         } else {
///             ("Tech", "de", "Low")
///         };
///         LabeledTicket::new(
///             "Ticket please",
///             "please check the invoice payment and the server login",
///             queue,
///             language,
///             priority,
///         )
///     })
///     .collect();
/// let batch = TrainingBatch::from_tickets(&tickets)?;
/// let classifier = TicketClassifier::builder().train(&batch)?;
///
/// let prediction = classifier.predict(&[TicketRecord::new("Invoice", "please check the payment")])?;
/// assert_eq!(prediction.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketClassifier {
    pub(crate) config: TrainingConfig,
    pub(crate) semantic: SemanticExtractor,
    pub(crate) language: LanguageExtractor,
    pub(crate) queue_model: LinearSvc,
    pub(crate) priority_model: LinearSvc,
    pub(crate) language_model: LinearSvc,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<TicketClassifier>();
    }
};

impl TicketClassifier {
    /// Creates an untrained classifier with the production configuration
    pub fn builder() -> TicketClassifierBuilder {
        TicketClassifierBuilder::new()
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fits a brand-new classifier with this classifier's configuration.
    ///
    /// Nothing from the current vocabularies or weights carries over.
    pub fn retrain(&self, batch: &TrainingBatch) -> Result<TicketClassifier, ClassifierError> {
        TicketClassifierBuilder::new()
            .with_config(self.config.clone())
            .train(batch)
    }

    /// Predicts queue, language and priority for every complete record.
    ///
    /// Records missing subject or body are skipped, so the returned
    /// sequences can be shorter than `records`. Callers must reconcile the
    /// lengths themselves.
    ///
    /// # Errors
    /// - `EmptyInput` if no record has both subject and body
    pub fn predict(&self, records: &[TicketRecord]) -> Result<Prediction, ClassifierError> {
        let texts = assemble_texts(records);
        if texts.is_empty() {
            return Err(ClassifierError::EmptyInput(
                "No record has both subject and body".into(),
            ));
        }
        debug!("Predicting {} of {} records", texts.len(), records.len());

        let semantic_features = self.semantic.transform(&texts)?;
        let language_features = self.language.transform(&texts)?;

        Ok(Prediction {
            queue: self.queue_model.predict(&semantic_features)?,
            language: self.language_model.predict(&language_features)?,
            priority: self.priority_model.predict(&semantic_features)?,
        })
    }

    /// Returns vocabulary sizes and label sets
    pub fn info(&self) -> ClassifierInfo {
        let target = |model: &LinearSvc| TargetInfo {
            labels: model.classes().map(<[String]>::to_vec).unwrap_or_default(),
        };
        ClassifierInfo {
            semantic_vocabulary_size: self.semantic.vocabulary_size(),
            language_vocabulary_size: self.language.vocabulary_size(),
            queue: target(&self.queue_model),
            language: target(&self.language_model),
            priority: target(&self.priority_model),
        }
    }

    /// Encodes the whole trained classifier as one opaque blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ClassifierError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decodes a classifier written by [`TicketClassifier::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClassifierError> {
        let classifier: Self = bincode::deserialize(bytes)?;
        if !(classifier.queue_model.is_fitted()
            && classifier.priority_model.is_fitted()
            && classifier.language_model.is_fitted())
        {
            return Err(ClassifierError::NotFitted(
                "Decoded classifier is missing a trained model".into(),
            ));
        }
        Ok(classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::record::LabeledTicket;

    fn tickets() -> Vec<LabeledTicket> {
        vec![
            LabeledTicket::new("Invoice", "please refund the invoice payment", "Billing", "en", "High"),
            LabeledTicket::new("Invoice", "please answer the invoice payment question", "Billing", "en", "Low"),
            LabeledTicket::new("Invoice", "please check the overdue invoice payment", "Billing", "de", "Low"),
            LabeledTicket::new("Server", "please fix the server login error", "Tech", "en", "High"),
            LabeledTicket::new("Server", "please check the slow server login", "Tech", "de", "High"),
            LabeledTicket::new("Server", "please help with the server login timeout", "Tech", "de", "Low"),
        ]
    }

    fn setup_test_classifier() -> Result<TicketClassifier, ClassifierError> {
        TicketClassifier::builder().train(&TrainingBatch::from_tickets(&tickets())?)
    }

    #[test]
    fn test_info() -> Result<(), ClassifierError> {
        let classifier = setup_test_classifier()?;
        let info = classifier.info();
        assert_eq!(info.queue.labels, vec!["Billing", "Tech"]);
        assert_eq!(info.language.labels, vec!["de", "en"]);
        assert_eq!(info.priority.labels, vec!["High", "Low"]);
        assert!(info.semantic_vocabulary_size > 0);
        assert!(info.language_vocabulary_size > 0);
        Ok(())
    }

    #[test]
    fn test_predict_skips_incomplete_records() -> Result<(), ClassifierError> {
        let classifier = setup_test_classifier()?;
        let records = vec![
            TicketRecord::new("Invoice", "please refund"),
            TicketRecord { subject: None, body: Some("server down".into()) },
            TicketRecord::new("Server", "login error"),
        ];
        let prediction = classifier.predict(&records)?;
        assert_eq!(prediction.len(), 2);
        assert_eq!(prediction.language.len(), 2);
        assert_eq!(prediction.priority.len(), 2);
        Ok(())
    }

    #[test]
    fn test_predict_without_complete_records() -> Result<(), ClassifierError> {
        let classifier = setup_test_classifier()?;
        let records = vec![TicketRecord { subject: Some("only a subject".into()), body: None }];
        assert!(matches!(
            classifier.predict(&records),
            Err(ClassifierError::EmptyInput(_))
        ));
        Ok(())
    }

    #[test]
    fn test_prediction_serializes_with_target_names() -> Result<(), Box<dyn std::error::Error>> {
        let prediction = Prediction {
            queue: vec!["Tech".into()],
            language: vec!["en".into()],
            priority: vec!["Low".into()],
        };
        let json = serde_json::to_string(&prediction)?;
        assert_eq!(json, r#"{"Queue":["Tech"],"Language":["en"],"Priority":["Low"]}"#);
        Ok(())
    }

    #[test]
    fn test_bytes_round_trip_predicts_identically() -> Result<(), ClassifierError> {
        let classifier = setup_test_classifier()?;
        let restored = TicketClassifier::from_bytes(&classifier.to_bytes()?)?;
        let records = vec![
            TicketRecord::new("Invoice", "please refund the payment"),
            TicketRecord::new("Server", "login timeout"),
        ];
        assert_eq!(classifier.predict(&records)?, restored.predict(&records)?);
        assert_eq!(restored.config(), classifier.config());
        Ok(())
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(matches!(
            TicketClassifier::from_bytes(b"not a model"),
            Err(ClassifierError::SerializationError(_))
        ));
    }
}
