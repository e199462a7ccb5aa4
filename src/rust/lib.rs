//! A support ticket classifier that predicts destination queue, language and
//! priority from the subject and body of an email.
//!
//! Two feature extractors feed three linear SVMs:
//! - queue and priority use word unigrams and bigrams of text stripped of
//!   punctuation, digits and English/German stop words
//! - language uses character 3- to 5-grams of the lowercased raw text
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use triage::{dataset, TicketClassifier, TicketRecord, TrainingBatch};
//!
//! let tickets = dataset::load_training_csv("data/support_tickets.csv")?;
//! let batch = TrainingBatch::from_tickets(&tickets)?;
//! let classifier = TicketClassifier::builder().train(&batch)?;
//!
//! let prediction = classifier.predict(&[
//!     TicketRecord::new("Invoice overdue", "My invoice payment failed twice."),
//! ])?;
//! println!("Queue: {:?}", prediction.queue);
//! println!("Language: {:?}", prediction.language);
//! println!("Priority: {:?}", prediction.priority);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! A trained [`TicketClassifier`] is immutable and can be shared across
//! threads using `Arc`. Retraining returns a new classifier instead of
//! mutating the shared one.

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod model_store;

pub use classifier::{
    assemble_texts, ClassifierError, ClassifierInfo, FeatureExtractor, LabeledTicket,
    LanguageExtractor, LinearSvc, Prediction, SemanticExtractor, TargetInfo, TfidfVectorizer,
    TicketClassifier, TicketClassifierBuilder, TicketRecord, TrainingBatch,
};
pub use config::{Analyzer, SvmConfig, TrainingConfig, VectorizerConfig};
pub use dataset::{load_training_csv, DatasetError};
pub use model_store::{ModelError, ModelStore};

/// Initializes `env_logger`; set `RUST_LOG` to control verbosity.
pub fn init_logger() {
    env_logger::init();
}
