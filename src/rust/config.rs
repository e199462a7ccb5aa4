use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierError;

/// How a vectorizer splits normalized text into terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Analyzer {
    /// Word n-grams over tokens of two or more word characters
    Word,
    /// Character n-grams over whitespace-collapsed text
    Char,
}

/// Settings of a single TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub analyzer: Analyzer,
    /// Inclusive (min, max) n-gram length
    pub ngram_range: (usize, usize),
    /// Minimum number of training documents a term must occur in
    pub min_df: usize,
}

impl VectorizerConfig {
    /// Word unigrams and bigrams seen in at least 3 documents.
    pub fn semantic() -> Self {
        Self {
            analyzer: Analyzer::Word,
            ngram_range: (1, 2),
            min_df: 3,
        }
    }

    /// Character 3- to 5-grams seen in at least 5 documents.
    pub fn language() -> Self {
        Self {
            analyzer: Analyzer::Char,
            ngram_range: (3, 5),
            min_df: 5,
        }
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), ClassifierError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ValidationError(format!(
                "Invalid n-gram range ({}, {}) for the {} vectorizer",
                min_n, max_n, name
            )));
        }
        if self.min_df == 0 {
            return Err(ClassifierError::ValidationError(format!(
                "min_df must be at least 1 for the {} vectorizer",
                name
            )));
        }
        Ok(())
    }
}

/// Settings of the linear support vector classifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmConfig {
    /// Inverse regularization strength
    pub c: f64,
    /// Stopping tolerance on the projected gradient spread
    pub tolerance: f64,
    /// Maximum passes over the training rows
    pub max_iter: usize,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-4,
            max_iter: 1000,
        }
    }
}

impl SvmConfig {
    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(ClassifierError::ValidationError(format!(
                "Regularization strength C must be positive, got {}",
                self.c
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ClassifierError::ValidationError(format!(
                "Solver tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iter == 0 {
            return Err(ClassifierError::ValidationError(
                "Solver max_iter must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Complete configuration of a ticket classifier.
///
/// The defaults are the production settings; the configuration is stored
/// inside every trained model so a loaded model retrains the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub semantic: VectorizerConfig,
    pub language: VectorizerConfig,
    pub svm: SvmConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            semantic: VectorizerConfig::semantic(),
            language: VectorizerConfig::language(),
            svm: SvmConfig::default(),
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        self.semantic.validate("semantic")?;
        self.language.validate("language")?;
        self.svm.validate()
    }
}
