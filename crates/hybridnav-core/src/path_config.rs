//! Path configuration: pattern-matched per-URL navigation properties
//!
//! A configuration is an ordered list of rules, each pairing a set of
//! case-insensitive regular expressions with a property bag. Resolving a
//! location folds every matching rule's properties left to right into a
//! single map (later rules overwrite earlier ones key by key), which is
//! then read through typed accessors with the documented defaults.

use std::cell::RefCell;
use std::collections::HashMap;

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::location::Location;
use crate::prelude::*;

// ─────────────────────────────────────────────────────────
// Property Enums
// ─────────────────────────────────────────────────────────

/// How a location is presented relative to the current backstack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// Let the resolver decide from backstack comparison
    #[default]
    Default,
    Push,
    Pop,
    Replace,
    ReplaceRoot,
    ClearAll,
    Refresh,
    /// Suppress the navigation entirely
    None,
}

impl Presentation {
    /// Parse from a path-configuration property value
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "default" => Some(Self::Default),
            "push" => Some(Self::Push),
            "pop" => Some(Self::Pop),
            "replace" => Some(Self::Replace),
            "replace_root" => Some(Self::ReplaceRoot),
            "clear_all" => Some(Self::ClearAll),
            "refresh" => Some(Self::Refresh),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Which navigation context (stack) a location lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavContext {
    #[default]
    Default,
    Modal,
}

impl NavContext {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "default" => Some(Self::Default),
            "modal" => Some(Self::Modal),
            _ => None,
        }
    }
}

/// How query strings participate in path-equality comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStringPresentation {
    /// Query string is part of a location's identity
    #[default]
    Default,
    /// Locations differing only in query string are the same place
    Replace,
}

impl QueryStringPresentation {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "default" => Some(Self::Default),
            "replace" => Some(Self::Replace),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Rules
// ─────────────────────────────────────────────────────────

/// One rule from the configuration file: patterns plus the properties
/// they contribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathRule {
    pub patterns: Vec<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

/// On-disk configuration file shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PathConfigurationFile {
    #[serde(default)]
    settings: HashMap<String, serde_json::Value>,
    #[serde(default)]
    rules: Vec<PathRule>,
}

/// A rule with its patterns compiled
#[derive(Debug, Clone)]
struct CompiledRule {
    regexes: Vec<regex::Regex>,
    properties: HashMap<String, String>,
}

impl CompiledRule {
    /// Compile a rule's patterns.
    ///
    /// A malformed pattern is fatal in debug builds and contributes
    /// nothing in release builds, where it is logged and skipped.
    fn compile(rule: &PathRule) -> Self {
        let mut regexes = Vec::with_capacity(rule.patterns.len());
        for pattern in &rule.patterns {
            match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(regex) => regexes.push(regex),
                Err(err) => {
                    if cfg!(debug_assertions) {
                        panic!("malformed path pattern '{pattern}': {err}");
                    }
                    warn!(pattern, %err, "skipping malformed path pattern");
                }
            }
        }
        Self {
            regexes,
            properties: rule.properties.clone(),
        }
    }

    fn matches(&self, path_and_query: &str) -> bool {
        self.regexes.iter().any(|r| r.is_match(path_and_query))
    }
}

// ─────────────────────────────────────────────────────────
// Resolved Properties
// ─────────────────────────────────────────────────────────

/// The merged property bag for one location, never mutated after
/// construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathProperties {
    map: HashMap<String, String>,
}

impl PathProperties {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    /// Raw access; unknown keys are preserved but unused by this core
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Configured presentation, defaulting to [`Presentation::Default`]
    pub fn presentation(&self) -> Presentation {
        self.enum_value("presentation", Presentation::from_value)
            .unwrap_or_default()
    }

    /// Configured context, defaulting to [`NavContext::Default`]
    pub fn context(&self) -> NavContext {
        self.enum_value("context", NavContext::from_value)
            .unwrap_or_default()
    }

    /// Query-string comparison policy for this location
    pub fn query_string_presentation(&self) -> QueryStringPresentation {
        self.enum_value("query_string_presentation", QueryStringPresentation::from_value)
            .unwrap_or_default()
    }

    /// The destination URI for this location, required
    pub fn uri(&self) -> Result<&str> {
        self.get("uri")
            .ok_or_else(|| Error::configuration("no rule contributed the required 'uri' property"))
    }

    /// Fallback destination URI, tried when `uri` resolves to nothing
    pub fn fallback_uri(&self) -> Option<&str> {
        self.get("fallback_uri")
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn pull_to_refresh_enabled(&self) -> bool {
        self.get("pull_to_refresh_enabled") == Some("true")
    }

    fn enum_value<T>(&self, key: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        let value = self.get(key)?;
        let parsed = parse(value);
        if parsed.is_none() {
            warn!(key, value, "unrecognized path property value, using default");
        }
        parsed
    }
}

// ─────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────

/// Where configuration JSON comes from.
///
/// Remote fetching and caching of the JSON itself is an external
/// collaborator's job; by the time it reaches this type it is bytes.
#[derive(Debug, Clone)]
pub enum PathConfigurationSource {
    /// Raw JSON text (e.g. a bundled asset)
    Json(String),
    /// A JSON file on disk (e.g. a previously cached download)
    File(std::path::PathBuf),
    /// An already-parsed value
    Value(serde_json::Value),
}

/// Ordered pattern→properties rules, with a per-location memo cache
#[derive(Debug, Default)]
pub struct PathConfiguration {
    settings: HashMap<String, serde_json::Value>,
    rules: Vec<CompiledRule>,
    // Session-scoped memo: one resolve per distinct path+query between
    // loads. Interior mutability keeps `properties()` usable through a
    // shared reference; the owning session is single-threaded.
    cache: RefCell<HashMap<String, PathProperties>>,
}

impl PathConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration directly from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config = Self::new();
        config.load(PathConfigurationSource::Json(json.to_string()))?;
        Ok(config)
    }

    /// Replace rules and settings from a source, invalidating any cached
    /// per-location results
    pub fn load(&mut self, source: PathConfigurationSource) -> Result<()> {
        let file: PathConfigurationFile = match source {
            PathConfigurationSource::Json(json) => serde_json::from_str(&json)?,
            PathConfigurationSource::File(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading path configuration {}", path.display()))?;
                serde_json::from_str(&text)?
            }
            PathConfigurationSource::Value(value) => serde_json::from_value(value)?,
        };

        self.rules = file.rules.iter().map(CompiledRule::compile).collect();
        self.settings = file.settings;
        self.cache.borrow_mut().clear();

        debug!(rule_count = self.rules.len(), "path configuration loaded");
        Ok(())
    }

    /// Top-level `settings` object from the configuration file
    pub fn settings(&self) -> &HashMap<String, serde_json::Value> {
        &self.settings
    }

    /// Drop memoized per-location results; rules and settings stay.
    ///
    /// Wired to session reset so a rebooted session re-resolves every
    /// location against the live rules.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Resolve the merged properties for a location.
    ///
    /// Rules are evaluated in insertion order; each matching rule's
    /// properties overwrite earlier ones key by key.
    pub fn properties(&self, location: &Location) -> PathProperties {
        self.properties_for_path(&location.path_and_query())
    }

    /// Resolve properties for a raw path+query string
    pub fn properties_for_path(&self, path_and_query: &str) -> PathProperties {
        if let Some(cached) = self.cache.borrow().get(path_and_query) {
            return cached.clone();
        }

        let mut merged: HashMap<String, String> = HashMap::new();
        for rule in &self.rules {
            if rule.matches(path_and_query) {
                for (key, value) in &rule.properties {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        let properties = PathProperties::new(merged);
        self.cache
            .borrow_mut()
            .insert(path_and_query.to_string(), properties.clone());
        properties
    }
}
