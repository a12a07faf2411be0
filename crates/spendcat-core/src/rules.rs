//! Keyword rules for first-match categorization
//!
//! A rule set is an ordered list of categories, each with an ordered list of
//! keywords. A cleaned description gets the first category that has any
//! keyword contained in it, or "Others" when nothing matches.
//!
//! ## Configuration Resolution
//!
//! Rules are loaded with a three-layer resolution:
//! 1. An explicit file passed by the caller (`--rules`)
//! 2. An override in the data dir (~/.local/share/spendcat/config/categories.toml)
//! 3. The embedded defaults (compiled into binary)
//!
//! Files ending in `.json` are read as JSON, everything else as TOML. Both
//! map a category name to an object with a `keywords` list; category order in
//! the file is the match order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::OTHERS;

/// Embedded default rules (compiled into binary)
const DEFAULT_RULES: &str = include_str!("../../../config/categories.toml");

/// A named category and the keywords that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// First keyword of this rule contained in `text`
    fn matching_keyword(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|kw| text.contains(kw))
    }
}

/// The category and keyword that decided a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub category: &'a str,
    pub keyword: &'a str,
}

/// Ordered, read-only set of category rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
}

impl RuleSet {
    /// Build a rule set, rejecting duplicate category names
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate category name: {}",
                    rule.name
                )));
            }
            for kw in &rule.keywords {
                if kw.is_empty() {
                    warn!("Category '{}' has an empty keyword; it matches everything", rule.name);
                } else if kw.chars().any(|c| c.is_uppercase()) {
                    warn!(
                        "Keyword '{}' in category '{}' has uppercase letters and will never match",
                        kw, rule.name
                    );
                }
            }
        }
        Ok(Self { rules })
    }

    /// The embedded default rules
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_RULES)
    }

    /// Parse rules from a JSON document (`{"Food": {"keywords": [...]}}`)
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid rules JSON: {}", e)))?;
        Self::from_value(&value)
    }

    /// Parse rules from a TOML document (one table per category)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid rules TOML: {}", e)))?;
        let value = serde_json::to_value(&table)?;
        Self::from_value(&value)
    }

    /// Load rules from a file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read rules {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let rules = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        info!(
            "Loaded {} categories from {}",
            rules.len(),
            path.display()
        );
        Ok(rules)
    }

    /// Resolve rules: explicit path, then user override, then embedded defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Some(path) = default_rules_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        debug!("Using embedded default rules");
        Self::embedded()
    }

    fn from_value(value: &Value) -> Result<Self> {
        let categories = value
            .as_object()
            .ok_or_else(|| Error::Config("Rules must be a mapping of category names".into()))?;

        if categories.is_empty() {
            return Err(Error::Config("Rules define no categories".into()));
        }

        let mut rules = Vec::with_capacity(categories.len());
        for (name, entry) in categories {
            let entry = entry.as_object().ok_or_else(|| {
                Error::Config(format!("Category '{}' must be an object with keywords", name))
            })?;
            let keywords = entry
                .get("keywords")
                .ok_or_else(|| Error::Config(format!("Category '{}' is missing keywords", name)))?
                .as_array()
                .ok_or_else(|| {
                    Error::Config(format!("Keywords of category '{}' must be a list", name))
                })?
                .iter()
                .map(|kw| {
                    kw.as_str().map(str::to_string).ok_or_else(|| {
                        Error::Config(format!(
                            "Keywords of category '{}' must be strings, found {}",
                            name, kw
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rules.push(CategoryRule::new(name.clone(), keywords));
        }

        Self::new(rules)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Category names in match order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// First category (in rule order) with a keyword contained in `text`
    pub fn match_rule<'a>(&'a self, text: &str) -> Option<RuleMatch<'a>> {
        self.rules.iter().find_map(|rule| {
            rule.matching_keyword(text).map(|keyword| RuleMatch {
                category: rule.name.as_str(),
                keyword,
            })
        })
    }

    /// Category for a cleaned description, or "Others"
    pub fn categorize(&self, clean_description: &str) -> &str {
        self.match_rule(clean_description)
            .map(|m| m.category)
            .unwrap_or(OTHERS)
    }
}

/// Categorize a cleaned description against a rule set
pub fn categorize(clean_description: &str, rules: &RuleSet) -> String {
    rules.categorize(clean_description).to_string()
}

/// Default rules override path
pub fn default_rules_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendcat").join("config").join("categories.toml"))
}
