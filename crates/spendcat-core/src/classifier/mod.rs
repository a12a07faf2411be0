//! Statistical text classifier
//!
//! A TF-IDF vectorizer (word unigrams + bigrams, English stop words removed)
//! feeding a multinomial naive Bayes model. The classifier is an owned value
//! with an explicit lifecycle: `fit` (needs `&mut self`) must run before
//! `predict`, and predicting with an unfit classifier is `Error::ModelNotFit`.
//!
//! Fitted classifiers are saved as JSON artifacts carrying a SHA-256 checksum
//! of their parameters. Loading verifies the checksum, so a loaded model
//! predicts exactly what the saved one did.

mod naive_bayes;
mod stop_words;
mod vectorizer;

pub use naive_bayes::{MultinomialNb, DEFAULT_ALPHA};
pub use stop_words::{is_stop_word, ENGLISH_STOP_WORDS};
pub use vectorizer::{SparseVec, TfidfVectorizer, VectorizerConfig, DEFAULT_TOKEN_PATTERN};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Artifact format written by `TextClassifier::save`
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FittedModel {
    vectorizer: TfidfVectorizer,
    classifier: MultinomialNb,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    checksum: String,
    model: FittedModel,
}

fn checksum(model: &FittedModel) -> Result<String> {
    let payload = serde_json::to_string(model)?;
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// TF-IDF + naive Bayes classifier over cleaned descriptions
#[derive(Debug, Clone)]
pub struct TextClassifier {
    config: VectorizerConfig,
    alpha: f64,
    fitted: Option<FittedModel>,
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl TextClassifier {
    /// An unfit classifier with the default vectorizer settings
    pub fn new() -> Self {
        Self::with_config(VectorizerConfig::default(), DEFAULT_ALPHA)
    }

    pub fn with_config(config: VectorizerConfig, alpha: f64) -> Self {
        Self {
            config,
            alpha,
            fitted: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Labels the model can predict (empty until fit)
    pub fn classes(&self) -> &[String] {
        self.fitted
            .as_ref()
            .map(|m| m.classifier.classes())
            .unwrap_or(&[])
    }

    pub fn n_features(&self) -> usize {
        self.fitted
            .as_ref()
            .map_or(0, |m| m.vectorizer.n_features())
    }

    /// Learn vocabulary, IDF weights and class parameters.
    ///
    /// Refitting replaces the previous model entirely.
    pub fn fit<S, L>(&mut self, texts: &[S], labels: &[L]) -> Result<()>
    where
        S: AsRef<str>,
        L: AsRef<str>,
    {
        if texts.len() != labels.len() {
            return Err(Error::Model(format!(
                "Got {} texts but {} labels",
                texts.len(),
                labels.len()
            )));
        }
        if texts.is_empty() {
            return Err(Error::Model("No training samples".into()));
        }

        let mut vectorizer = TfidfVectorizer::new(self.config.clone())?;
        let x = vectorizer.fit_transform(texts)?;
        let mut classifier = MultinomialNb::new(self.alpha);
        classifier.fit(&x, labels, vectorizer.n_features())?;

        debug!(
            "Fitted classifier on {} samples: {} features, {} classes",
            texts.len(),
            vectorizer.n_features(),
            classifier.classes().len()
        );

        self.fitted = Some(FittedModel {
            vectorizer,
            classifier,
        });
        Ok(())
    }

    /// Predict a label for one text
    pub fn predict_one(&self, text: &str) -> Result<String> {
        let model = self.fitted.as_ref().ok_or(Error::ModelNotFit)?;
        let x = model.vectorizer.transform(text);
        model.classifier.predict_one(&x).map(str::to_string)
    }

    /// Predict a label for each text, in input order
    pub fn predict<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>> {
        let model = self.fitted.as_ref().ok_or(Error::ModelNotFit)?;
        texts
            .iter()
            .map(|t| {
                let x = model.vectorizer.transform(t.as_ref());
                model.classifier.predict_one(&x).map(str::to_string)
            })
            .collect()
    }

    /// Serialize the fitted model to an artifact string
    pub fn to_json(&self) -> Result<String> {
        let model = self.fitted.as_ref().ok_or(Error::ModelNotFit)?;
        let artifact = ModelArtifact {
            format_version: ARTIFACT_VERSION,
            checksum: checksum(model)?,
            model: model.clone(),
        };
        Ok(serde_json::to_string_pretty(&artifact)?)
    }

    /// Restore a fitted model from an artifact string
    pub fn from_json(content: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(content)
            .map_err(|e| Error::Model(format!("Invalid model artifact: {}", e)))?;

        if artifact.format_version != ARTIFACT_VERSION {
            return Err(Error::Model(format!(
                "Unsupported model artifact version {} (expected {})",
                artifact.format_version, ARTIFACT_VERSION
            )));
        }
        if checksum(&artifact.model)? != artifact.checksum {
            return Err(Error::Model("Model artifact checksum mismatch".into()));
        }

        let model = artifact.model;
        model.classifier.validate()?;
        if model.classifier.n_features() != model.vectorizer.n_features() {
            return Err(Error::Model(format!(
                "Vectorizer has {} features but classifier expects {}",
                model.vectorizer.n_features(),
                model.classifier.n_features()
            )));
        }

        Ok(Self {
            config: model.vectorizer.config().clone(),
            alpha: model.classifier.alpha(),
            fitted: Some(model),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json)?;
        info!("Saved model artifact to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let classifier = Self::from_json(&content)?;
        info!(
            "Loaded model from {} ({} classes, {} features)",
            path.display(),
            classifier.classes().len(),
            classifier.n_features()
        );
        Ok(classifier)
    }
}

/// Fit a new classifier on (text, label) pairs
pub fn fit<S, L>(texts: &[S], labels: &[L]) -> Result<TextClassifier>
where
    S: AsRef<str>,
    L: AsRef<str>,
{
    let mut classifier = TextClassifier::new();
    classifier.fit(texts, labels)?;
    Ok(classifier)
}

/// Predict labels with a fitted classifier
pub fn predict<S: AsRef<str>>(texts: &[S], model: &TextClassifier) -> Result<Vec<String>> {
    model.predict(texts)
}
