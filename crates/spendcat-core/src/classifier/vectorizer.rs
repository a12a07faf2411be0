//! TF-IDF vectorizer over word unigrams and bigrams

use std::collections::{BTreeMap, BTreeSet, HashMap};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::stop_words::is_stop_word;
use crate::error::{Error, Result};

/// Tokens are runs of two or more word characters
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse feature vector: (feature index, weight), sorted by index
pub type SparseVec = Vec<(usize, f64)>;

/// Tokenization and n-gram settings, frozen into the model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Inclusive (min, max) n-gram length
    pub ngram_range: (usize, usize),
    pub token_pattern: String,
    /// Drop English stop words before building n-grams
    pub stop_words: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            token_pattern: DEFAULT_TOKEN_PATTERN.to_string(),
            stop_words: true,
        }
    }
}

/// Serialized form of a vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerParams {
    config: VectorizerConfig,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

/// Bag-of-n-grams vectorizer with smoothed IDF weights and L2 row normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VectorizerParams", into = "VectorizerParams")]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    token_re: Regex,
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        let (min_n, max_n) = config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::Model(format!(
                "Invalid n-gram range ({}, {})",
                min_n, max_n
            )));
        }
        let token_re = Regex::new(&config.token_pattern)?;
        Ok(Self {
            config,
            token_re,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        })
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Split text into the n-gram terms used as features
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_re
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !(self.config.stop_words && is_stop_word(t)))
            .collect();

        let (min_n, max_n) = self.config.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Learn the vocabulary and IDF weights from a corpus
    pub fn fit<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<()> {
        let analyzed: Vec<Vec<String>> = docs.iter().map(|d| self.analyze(d.as_ref())).collect();

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for terms in &analyzed {
            let unique: BTreeSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(Error::Model(
                "Empty vocabulary; training texts contain only stop words".into(),
            ));
        }

        let n_docs = docs.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (index, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        Ok(())
    }

    /// TF-IDF vector for one text; terms outside the vocabulary are ignored
    pub fn transform(&self, text: &str) -> SparseVec {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row: SparseVec = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();
        row.sort_by_key(|&(index, _)| index);

        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<Vec<SparseVec>> {
        self.fit(docs)?;
        Ok(docs.iter().map(|d| self.transform(d.as_ref())).collect())
    }
}

impl TryFrom<VectorizerParams> for TfidfVectorizer {
    type Error = Error;

    fn try_from(params: VectorizerParams) -> Result<Self> {
        if params.vocabulary.len() != params.idf.len() {
            return Err(Error::Model(format!(
                "Vocabulary has {} terms but {} IDF weights",
                params.vocabulary.len(),
                params.idf.len()
            )));
        }
        if params.vocabulary.values().any(|&i| i >= params.idf.len()) {
            return Err(Error::Model("Vocabulary index out of range".into()));
        }
        let mut vectorizer = Self::new(params.config)?;
        vectorizer.vocabulary = params.vocabulary;
        vectorizer.idf = params.idf;
        Ok(vectorizer)
    }
}

impl From<TfidfVectorizer> for VectorizerParams {
    fn from(v: TfidfVectorizer) -> Self {
        Self {
            config: v.config,
            vocabulary: v.vocabulary,
            idf: v.idf,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer() -> TfidfVectorizer {
        TfidfVectorizer::new(VectorizerConfig::default()).unwrap()
    }

    #[test]
    fn test_analyze_unigrams_and_bigrams() {
        let v = vectorizer();
        assert_eq!(
            v.analyze("Zomato order again"),
            vec!["zomato", "order", "zomato order"]
        );
    }

    #[test]
    fn test_analyze_drops_short_tokens_and_stop_words() {
        let v = vectorizer();
        assert!(v.analyze("a the of and").is_empty());
        assert_eq!(v.analyze("x uber"), vec!["uber"]);
    }

    #[test]
    fn test_bigrams_skip_removed_stop_words() {
        let v = vectorizer();
        assert_eq!(
            v.analyze("cafe in town"),
            vec!["cafe", "town", "cafe town"]
        );
    }

    #[test]
    fn test_fit_vocabulary_sorted() {
        let mut v = vectorizer();
        v.fit(&["zomato order", "amazon buy"]).unwrap();
        let terms: Vec<&str> = v.vocabulary().keys().map(String::as_str).collect();
        assert_eq!(
            terms,
            vec!["amazon", "amazon buy", "buy", "order", "zomato", "zomato order"]
        );
        assert_eq!(v.vocabulary()["amazon"], 0);
        assert_eq!(v.n_features(), 6);
    }

    #[test]
    fn test_idf_is_smoothed() {
        let mut v = vectorizer();
        v.fit(&["uber ride", "uber eats", "metro card"]).unwrap();
        let uber = v.idf[v.vocabulary()["uber"]];
        let metro = v.idf[v.vocabulary()["metro"]];
        assert!((uber - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
        assert!((metro - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let mut v = vectorizer();
        v.fit(&["uber ride", "metro card"]).unwrap();
        let row = v.transform("uber ride home");
        let norm: f64 = row.iter().map(|(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(row.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_transform_unknown_terms_is_empty() {
        let mut v = vectorizer();
        v.fit(&["uber ride"]).unwrap();
        assert!(v.transform("completely different").is_empty());
        assert!(v.transform("").is_empty());
    }

    #[test]
    fn test_fit_only_stop_words_fails() {
        let mut v = vectorizer();
        assert!(matches!(v.fit(&["the", "and of"]), Err(Error::Model(_))));
    }

    #[test]
    fn test_invalid_config() {
        let config = VectorizerConfig {
            ngram_range: (2, 1),
            ..Default::default()
        };
        assert!(TfidfVectorizer::new(config).is_err());

        let config = VectorizerConfig {
            token_pattern: "(".to_string(),
            ..Default::default()
        };
        assert!(matches!(TfidfVectorizer::new(config), Err(Error::Regex(_))));
    }
}
