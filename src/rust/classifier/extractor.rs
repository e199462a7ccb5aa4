use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::text::{normalize_language, normalize_semantic};
use super::utils::FeatureMatrix;
use super::vectorizer::TfidfVectorizer;
use crate::config::VectorizerConfig;

/// Turns joined ticket texts into a feature matrix.
///
/// Implementors only choose the normalization and own a vectorizer; fitting
/// and projection are shared:
/// 1. Normalize every text
/// 2. Fit (training) or project onto the frozen vocabulary (inference)
pub trait FeatureExtractor {
    /// Returns the normalized form of one text
    fn normalize(&self, text: &str) -> String;

    fn vectorizer(&self) -> &TfidfVectorizer;

    fn vectorizer_mut(&mut self) -> &mut TfidfVectorizer;

    /// Builds the vocabulary from `texts` and returns their features.
    fn fit_transform(&mut self, texts: &[String]) -> Result<FeatureMatrix, ClassifierError> {
        let normalized: Vec<String> = texts.iter().map(|t| self.normalize(t)).collect();
        self.vectorizer_mut().fit_transform(&normalized)
    }

    /// Projects `texts` onto the frozen vocabulary.
    ///
    /// # Errors
    /// - `NotFitted` if no vocabulary exists yet
    /// - `EmptyInput` if `texts` is empty
    fn transform(&self, texts: &[String]) -> Result<FeatureMatrix, ClassifierError> {
        let normalized: Vec<String> = texts.iter().map(|t| self.normalize(t)).collect();
        self.vectorizer().transform(&normalized)
    }

    fn vocabulary_size(&self) -> usize {
        self.vectorizer().vocabulary_size()
    }
}

/// Topic and urgency features: stripped, stop-word-free word n-grams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticExtractor {
    vectorizer: TfidfVectorizer,
}

impl SemanticExtractor {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(config),
        }
    }
}

impl Default for SemanticExtractor {
    fn default() -> Self {
        Self::new(VectorizerConfig::semantic())
    }
}

impl FeatureExtractor for SemanticExtractor {
    fn normalize(&self, text: &str) -> String {
        normalize_semantic(text)
    }

    fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    fn vectorizer_mut(&mut self) -> &mut TfidfVectorizer {
        &mut self.vectorizer
    }
}

/// Language features: character n-grams of the lowercased raw text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageExtractor {
    vectorizer: TfidfVectorizer,
}

impl LanguageExtractor {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(config),
        }
    }
}

impl Default for LanguageExtractor {
    fn default() -> Self {
        Self::new(VectorizerConfig::language())
    }
}

impl FeatureExtractor for LanguageExtractor {
    fn normalize(&self, text: &str) -> String {
        normalize_language(text)
    }

    fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    fn vectorizer_mut(&mut self) -> &mut TfidfVectorizer {
        &mut self.vectorizer
    }
}
