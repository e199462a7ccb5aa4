mod error;
mod extractor;
mod record;
mod stopwords;
mod svm;
mod text;
mod utils;
mod vectorizer;
pub mod builder;
#[allow(clippy::module_inception)]
mod classifier;

pub use builder::TicketClassifierBuilder;
pub use classifier::{Prediction, TicketClassifier};
pub use error::ClassifierError;
pub use extractor::{FeatureExtractor, LanguageExtractor, SemanticExtractor};
pub use record::{assemble_texts, LabeledTicket, TicketRecord, TrainingBatch};
pub use stopwords::is_stop_word;
pub use svm::LinearSvc;
pub use text::{normalize_language, normalize_semantic};
pub use utils::{FeatureMatrix, SparseVector};
pub use vectorizer::TfidfVectorizer;

/// Labels a single target was trained on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    /// Sorted distinct labels
    pub labels: Vec<String>,
}

/// Information about a trained classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierInfo {
    /// Number of word n-gram columns used by queue and priority
    pub semantic_vocabulary_size: usize,
    /// Number of character n-gram columns used by language
    pub language_vocabulary_size: usize,
    pub queue: TargetInfo,
    pub language: TargetInfo,
    pub priority: TargetInfo,
}
