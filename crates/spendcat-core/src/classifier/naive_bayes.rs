//! Multinomial naive Bayes over TF-IDF features

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::vectorizer::SparseVec;
use crate::error::{Error, Result};

/// Additive (Laplace) smoothing
pub const DEFAULT_ALPHA: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    /// Class labels, sorted
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]` log probabilities
    feature_log_prob: Vec<Vec<f64>>,
}

impl Default for MultinomialNb {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl MultinomialNb {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            classes: Vec::new(),
            class_log_prior: Vec::new(),
            feature_log_prob: Vec::new(),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }

    pub fn fit<L: AsRef<str>>(&mut self, x: &[SparseVec], y: &[L], n_features: usize) -> Result<()> {
        if x.len() != y.len() {
            return Err(Error::Model(format!(
                "Got {} feature rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(Error::Model("No training samples".into()));
        }
        if self.alpha <= 0.0 {
            return Err(Error::Model(format!("Alpha must be positive, got {}", self.alpha)));
        }

        let mut class_index: BTreeMap<&str, usize> = BTreeMap::new();
        for label in y {
            class_index.insert(label.as_ref(), 0);
        }
        for (i, index) in class_index.values_mut().enumerate() {
            *index = i;
        }
        let n_classes = class_index.len();

        let mut class_count = vec![0usize; n_classes];
        let mut feature_count = vec![vec![0.0f64; n_features]; n_classes];
        for (row, label) in x.iter().zip(y) {
            let c = class_index[label.as_ref()];
            class_count[c] += 1;
            for &(j, w) in row {
                if j >= n_features {
                    return Err(Error::Model(format!(
                        "Feature index {} out of range for {} features",
                        j, n_features
                    )));
                }
                feature_count[c][j] += w;
            }
        }

        let n_samples = x.len() as f64;
        self.class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / n_samples).ln())
            .collect();

        let smoothing = self.alpha * n_features as f64;
        self.feature_log_prob = feature_count
            .iter()
            .map(|counts| {
                let denom = (counts.iter().sum::<f64>() + smoothing).ln();
                counts.iter().map(|&n| (n + self.alpha).ln() - denom).collect()
            })
            .collect();

        self.classes = class_index.keys().map(|s| s.to_string()).collect();
        Ok(())
    }

    /// Unnormalized log posterior per class
    pub fn joint_log_likelihood(&self, x: &SparseVec) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(Error::ModelNotFit);
        }
        Ok(self
            .class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| {
                prior
                    + x.iter()
                        .filter_map(|&(j, w)| log_prob.get(j).map(|lp| w * lp))
                        .sum::<f64>()
            })
            .collect())
    }

    /// Most probable class; ties go to the earliest class in sorted order.
    ///
    /// An all-zero vector scores on the priors alone, so it gets the most
    /// frequent training label.
    pub fn predict_one(&self, x: &SparseVec) -> Result<&str> {
        let scores = self.joint_log_likelihood(x)?;
        let mut best = 0;
        for (i, &score) in scores.iter().enumerate().skip(1) {
            if score > scores[best] {
                best = i;
            }
        }
        Ok(&self.classes[best])
    }

    /// Check internal shapes after loading from an artifact
    pub(crate) fn validate(&self) -> Result<()> {
        let n_classes = self.classes.len();
        if self.class_log_prior.len() != n_classes || self.feature_log_prob.len() != n_classes {
            return Err(Error::Model("Classifier parameter shapes disagree".into()));
        }
        let n_features = self.n_features();
        if self.feature_log_prob.iter().any(|row| row.len() != n_features) {
            return Err(Error::Model("Ragged feature log probabilities".into()));
        }
        Ok(())
    }
}
