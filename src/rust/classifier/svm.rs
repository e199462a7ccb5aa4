use std::collections::BTreeSet;

use log::{debug, warn};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::FeatureMatrix;
use crate::config::SvmConfig;

const SHUFFLE_SEED: u64 = 0x5eed;

/// Learned hyperplanes, one row per binary problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SvmModel {
    classes: Vec<String>,
    weights: Array2<f64>,
    intercepts: Array1<f64>,
}

/// Linear support vector classifier.
///
/// Minimizes `0.5 * |w|^2 + C * sum(max(0, 1 - y * (w.x + b))^2)` by dual
/// coordinate descent. The intercept is learned as the weight of a constant
/// feature `1.0` and is regularized like any other weight.
///
/// Two classes train a single problem whose positive side is the second
/// class in sorted order. More classes train one-vs-rest problems and the
/// highest decision value wins, the first class on ties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvc {
    config: SvmConfig,
    model: Option<SvmModel>,
}

impl LinearSvc {
    pub fn new(config: SvmConfig) -> Self {
        Self { config, model: None }
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Sorted distinct labels seen during fitting
    pub fn classes(&self) -> Option<&[String]> {
        self.model.as_ref().map(|m| m.classes.as_slice())
    }

    /// Fits the classifier, replacing any previous fit.
    ///
    /// # Errors
    /// - `LabelMismatch` if `labels` and the feature rows differ in length
    /// - `EmptyInput` if there are no rows
    /// - `SingleClass` if `labels` holds fewer than two distinct values
    pub fn fit(&mut self, features: &FeatureMatrix, labels: &[String]) -> Result<(), ClassifierError> {
        if features.n_rows() != labels.len() {
            return Err(ClassifierError::LabelMismatch {
                expected: features.n_rows(),
                actual: labels.len(),
            });
        }
        if features.is_empty() {
            return Err(ClassifierError::EmptyInput(
                "Cannot fit a classifier without training rows".into(),
            ));
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(ClassifierError::SingleClass(format!(
                "found only {:?}, at least two distinct labels are required",
                classes
            )));
        }

        let positives: &[String] = if classes.len() == 2 {
            &classes[1..]
        } else {
            &classes
        };

        let mut weights = Array2::zeros((positives.len(), features.n_features()));
        let mut intercepts = Array1::zeros(positives.len());
        for (k, positive) in positives.iter().enumerate() {
            let targets: Vec<f64> = labels
                .iter()
                .map(|label| if label == positive { 1.0 } else { -1.0 })
                .collect();
            let (w, b) = self.solve(features, &targets, positive);
            weights.row_mut(k).assign(&w);
            intercepts[k] = b;
        }

        self.model = Some(SvmModel {
            classes,
            weights,
            intercepts,
        });
        Ok(())
    }

    /// Signed distances to each hyperplane, shape `(rows, problems)`.
    pub fn decision_function(&self, features: &FeatureMatrix) -> Result<Array2<f64>, ClassifierError> {
        let model = self.model.as_ref().ok_or_else(|| {
            ClassifierError::NotFitted("Classifier must be trained before predicting".into())
        })?;
        if features.n_features() != model.weights.ncols() {
            return Err(ClassifierError::ValidationError(format!(
                "Feature dimension mismatch: classifier expects {} columns, got {}",
                model.weights.ncols(),
                features.n_features()
            )));
        }

        let mut scores = Array2::zeros((features.n_rows(), model.weights.nrows()));
        for (i, row) in features.rows().iter().enumerate() {
            for (k, w) in model.weights.outer_iter().enumerate() {
                scores[[i, k]] = row.dot(w) + model.intercepts[k];
            }
        }
        Ok(scores)
    }

    /// Returns exactly one label per feature row.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Vec<String>, ClassifierError> {
        let scores = self.decision_function(features)?;
        if features.is_empty() {
            return Err(ClassifierError::EmptyInput(
                "Cannot predict an empty feature matrix".into(),
            ));
        }
        // decision_function already checked the model exists
        let classes = self.classes().unwrap_or_default();

        let labels = scores
            .outer_iter()
            .map(|row| {
                let winner = if classes.len() == 2 {
                    usize::from(row[0] > 0.0)
                } else {
                    row.iter()
                        .enumerate()
                        .fold((0, f64::NEG_INFINITY), |best, (k, &score)| {
                            if score > best.1 { (k, score) } else { best }
                        })
                        .0
                };
                classes[winner].clone()
            })
            .collect();
        Ok(labels)
    }

    /// Dual coordinate descent for the squared hinge loss.
    fn solve(&self, features: &FeatureMatrix, targets: &[f64], positive: &str) -> (Array1<f64>, f64) {
        let n = features.n_rows();
        let diag = 0.5 / self.config.c;
        let q_diag: Vec<f64> = features
            .rows()
            .iter()
            .map(|x| diag + x.squared_norm() + 1.0)
            .collect();

        let mut alpha = vec![0.0; n];
        let mut w = Array1::<f64>::zeros(features.n_features());
        let mut b = 0.0;
        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(SHUFFLE_SEED);

        for iteration in 1..=self.config.max_iter {
            order.shuffle(&mut rng);
            let mut pg_max = f64::NEG_INFINITY;
            let mut pg_min = f64::INFINITY;

            for &i in &order {
                let x = &features.rows()[i];
                let y = targets[i];
                let gradient = y * (x.dot(w.view()) + b) - 1.0 + diag * alpha[i];
                let projected = if alpha[i] == 0.0 { gradient.min(0.0) } else { gradient };
                pg_max = pg_max.max(projected);
                pg_min = pg_min.min(projected);

                if projected.abs() > 1e-12 {
                    let previous = alpha[i];
                    alpha[i] = (previous - gradient / q_diag[i]).max(0.0);
                    let step = (alpha[i] - previous) * y;
                    x.scaled_add_to(step, w.view_mut());
                    b += step;
                }
            }

            if pg_max - pg_min <= self.config.tolerance {
                debug!("Problem '{}' converged after {} passes", positive, iteration);
                return (w, b);
            }
        }

        warn!(
            "Problem '{}' did not converge within {} passes; consider more iterations",
            positive, self.config.max_iter
        );
        (w, b)
    }
}

impl Default for LinearSvc {
    fn default() -> Self {
        Self::new(SvmConfig::default())
    }
}
