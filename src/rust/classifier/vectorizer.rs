use std::collections::{BTreeMap, HashMap, HashSet};

use lazy_static::lazy_static;
use log::debug;
use ndarray::Array1;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{FeatureMatrix, SparseVector};
use crate::config::{Analyzer, VectorizerConfig};

lazy_static! {
    static ref WORD_TOKEN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s\s+").unwrap();
}

/// Terms and inverse document frequencies frozen at fit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Vocabulary {
    terms: HashMap<String, usize>,
    idf: Array1<f64>,
}

/// TF-IDF vectorizer with a fit-once, frozen vocabulary.
///
/// Terms are ordered lexicographically to form the column space. Row weights
/// are raw term counts times the smoothed IDF `ln((1 + n) / (1 + df)) + 1`,
/// scaled to unit L2 norm.
///
/// Terms that are not in the vocabulary are silently dropped by `transform`.
/// Unseen vocabulary degrades predictions but never fails them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: Option<Vocabulary>,
}

impl TfidfVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: None,
        }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Number of columns; zero before fitting.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.as_ref().map_or(0, |v| v.terms.len())
    }

    /// Column index of `term`, if it made it into the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.as_ref()?.terms.get(term).copied()
    }

    /// Splits a document into the terms configured by the analyzer.
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let (min_n, max_n) = self.config.ngram_range;
        match self.config.analyzer {
            Analyzer::Word => word_ngrams(document, min_n, max_n),
            Analyzer::Char => char_ngrams(document, min_n, max_n),
        }
    }

    /// Builds the vocabulary from `documents` and returns their feature rows.
    ///
    /// Any previous vocabulary is discarded.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<FeatureMatrix, ClassifierError> {
        if documents.is_empty() {
            return Err(ClassifierError::EmptyInput(
                "Cannot fit a vectorizer on an empty corpus".into(),
            ));
        }

        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| self.analyze(d)).collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for terms in &analyzed {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(ClassifierError::EmptyVocabulary(
                "The documents produced no terms; perhaps they only contain stop words".into(),
            ));
        }

        let mut kept: Vec<(&str, usize)> = document_frequency
            .into_iter()
            .filter(|&(_, df)| df >= self.config.min_df)
            .collect();
        if kept.is_empty() {
            return Err(ClassifierError::EmptyVocabulary(format!(
                "No terms remain after pruning with min_df={}",
                self.config.min_df
            )));
        }
        kept.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let n_documents = documents.len() as f64;
        let idf: Array1<f64> = kept
            .iter()
            .map(|&(_, df)| ((1.0 + n_documents) / (1.0 + df as f64)).ln() + 1.0)
            .collect();
        let terms: HashMap<String, usize> = kept
            .iter()
            .enumerate()
            .map(|(index, &(term, _))| (term.to_string(), index))
            .collect();

        debug!(
            "Fitted {:?} vectorizer: {} terms kept from {} documents",
            self.config.analyzer,
            terms.len(),
            documents.len()
        );

        let vocabulary = Vocabulary { terms, idf };
        let matrix = Self::project(&vocabulary, &analyzed);
        self.vocabulary = Some(vocabulary);
        Ok(matrix)
    }

    /// Projects `documents` onto the frozen vocabulary.
    pub fn transform(&self, documents: &[String]) -> Result<FeatureMatrix, ClassifierError> {
        let vocabulary = self.vocabulary.as_ref().ok_or_else(|| {
            ClassifierError::NotFitted("Vectorizer has no vocabulary; fit it first".into())
        })?;
        if documents.is_empty() {
            return Err(ClassifierError::EmptyInput(
                "Cannot transform an empty corpus".into(),
            ));
        }

        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| self.analyze(d)).collect();
        Ok(Self::project(vocabulary, &analyzed))
    }

    fn project(vocabulary: &Vocabulary, analyzed: &[Vec<String>]) -> FeatureMatrix {
        let rows = analyzed
            .iter()
            .map(|terms| {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for term in terms {
                    if let Some(&index) = vocabulary.terms.get(term) {
                        *counts.entry(index).or_insert(0.0) += 1.0;
                    }
                }
                for (index, count) in counts.iter_mut() {
                    *count *= vocabulary.idf[*index];
                }
                let mut row = SparseVector::from(counts);
                row.normalize();
                row
            })
            .collect();
        FeatureMatrix::new(rows, vocabulary.terms.len())
    }
}

/// Word n-grams over tokens of at least two word characters; n-grams are
/// joined with a single space, shorter n first.
fn word_ngrams(document: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let tokens: Vec<&str> = WORD_TOKEN.find_iter(document).map(|m| m.as_str()).collect();
    let mut ngrams = Vec::new();
    for n in min_n..=max_n {
        if n > tokens.len() {
            break;
        }
        ngrams.extend(tokens.windows(n).map(|window| window.join(" ")));
    }
    ngrams
}

/// Character n-grams after collapsing whitespace runs into a single space.
fn char_ngrams(document: &str, min_n: usize, max_n: usize) -> Vec<String> {
    let collapsed = WHITESPACE_RUN.replace_all(document, " ");
    let chars: Vec<char> = collapsed.chars().collect();
    let mut ngrams = Vec::new();
    for n in min_n..=max_n {
        if n > chars.len() {
            break;
        }
        ngrams.extend(chars.windows(n).map(|window| window.iter().collect::<String>()));
    }
    ngrams
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(documents: &[&str]) -> Vec<String> {
        documents.iter().map(|d| d.to_string()).collect()
    }

    fn word_config(min_df: usize) -> VectorizerConfig {
        VectorizerConfig {
            analyzer: Analyzer::Word,
            ngram_range: (1, 2),
            min_df,
        }
    }

    #[test]
    fn test_word_ngrams() {
        assert_eq!(
            word_ngrams("server a down now", 1, 2),
            vec!["server", "down", "now", "server down", "down now"]
        );
        assert!(word_ngrams("a b", 1, 2).is_empty());
    }

    #[test]
    fn test_char_ngrams() {
        assert_eq!(char_ngrams("ab  cd", 3, 3), vec!["ab ", "b c", " cd"]);
        assert_eq!(char_ngrams("abcd", 3, 4), vec!["abc", "bcd", "abcd"]);
        assert!(char_ngrams("ab", 3, 5).is_empty());
        assert_eq!(char_ngrams("über", 3, 3), vec!["übe", "ber"]);
    }

    #[test]
    fn test_min_df_pruning_and_order() -> Result<(), ClassifierError> {
        let mut vectorizer = TfidfVectorizer::new(word_config(2));
        let matrix = vectorizer.fit_transform(&corpus(&[
            "printer jam",
            "printer offline",
            "refund request",
        ]))?;

        assert_eq!(vectorizer.vocabulary_size(), 1);
        assert_eq!(vectorizer.term_index("printer"), Some(0));
        assert_eq!(vectorizer.term_index("refund"), None);
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.rows()[0].values(), &[1.0]);
        assert_eq!(matrix.rows()[2].nnz(), 0);
        Ok(())
    }

    #[test]
    fn test_idf_weighting() -> Result<(), ClassifierError> {
        let mut vectorizer = TfidfVectorizer::new(VectorizerConfig {
            analyzer: Analyzer::Word,
            ngram_range: (1, 1),
            min_df: 1,
        });
        vectorizer.fit_transform(&corpus(&["aa bb", "aa cc"]))?;
        let matrix = vectorizer.transform(&corpus(&["aa bb"]))?;

        let idf_aa = 1.0;
        let idf_bb = (3.0f64 / 2.0).ln() + 1.0;
        let norm = (idf_aa * idf_aa + idf_bb * idf_bb).sqrt();
        let row = matrix.rows()[0].to_dense(3);
        assert!((row[0] - idf_aa / norm).abs() < 1e-12);
        assert!((row[1] - idf_bb / norm).abs() < 1e-12);
        assert_eq!(row[2], 0.0);
        Ok(())
    }

    #[test]
    fn test_out_of_vocabulary_terms_are_dropped() -> Result<(), ClassifierError> {
        let mut vectorizer = TfidfVectorizer::new(word_config(1));
        vectorizer.fit_transform(&corpus(&["vpn tunnel"]))?;
        let matrix = vectorizer.transform(&corpus(&["completely unseen words"]))?;
        assert_eq!(matrix.n_rows(), 1);
        assert_eq!(matrix.rows()[0].nnz(), 0);
        assert_eq!(vectorizer.vocabulary_size(), 3);
        Ok(())
    }

    #[test]
    fn test_transform_before_fit() {
        let vectorizer = TfidfVectorizer::new(word_config(1));
        assert!(matches!(
            vectorizer.transform(&corpus(&["anything"])),
            Err(ClassifierError::NotFitted(_))
        ));
    }

    #[test]
    fn test_empty_inputs() {
        let mut vectorizer = TfidfVectorizer::new(word_config(1));
        assert!(matches!(
            vectorizer.fit_transform(&[]),
            Err(ClassifierError::EmptyInput(_))
        ));
        assert!(matches!(
            vectorizer.fit_transform(&corpus(&["", "a"])),
            Err(ClassifierError::EmptyVocabulary(_))
        ));

        let mut pruned = TfidfVectorizer::new(word_config(5));
        assert!(matches!(
            pruned.fit_transform(&corpus(&["alpha", "beta"])),
            Err(ClassifierError::EmptyVocabulary(_))
        ));
        assert!(!pruned.is_fitted());
    }

    #[test]
    fn test_refit_replaces_vocabulary() -> Result<(), ClassifierError> {
        let mut vectorizer = TfidfVectorizer::new(word_config(1));
        vectorizer.fit_transform(&corpus(&["old terms"]))?;
        vectorizer.fit_transform(&corpus(&["fresh"]))?;
        assert_eq!(vectorizer.vocabulary_size(), 1);
        assert_eq!(vectorizer.term_index("old"), None);
        Ok(())
    }
}
