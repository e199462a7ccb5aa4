/// Represents the different types of errors that can occur in the ticket classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Error occurred due to invalid input parameters or configuration
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// A batch with no usable rows reached a vectorizer or a classifier
    #[error("Empty input: {0}")]
    EmptyInput(String),
    /// Fitting produced no vocabulary terms
    #[error("Empty vocabulary: {0}")]
    EmptyVocabulary(String),
    /// A transform or prediction was requested before fitting
    #[error("Not fitted: {0}")]
    NotFitted(String),
    /// A label column holds fewer than two distinct classes
    #[error("Cannot train on a single class: {0}")]
    SingleClass(String),
    /// Feature rows and label rows are not aligned
    #[error("Label mismatch: expected {expected} labels, found {actual}")]
    LabelMismatch { expected: usize, actual: usize },
    /// Error occurred while encoding or decoding a trained model
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<bincode::Error> for ClassifierError {
    fn from(err: bincode::Error) -> Self {
        ClassifierError::SerializationError(err.to_string())
    }
}
