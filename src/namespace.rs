//! Namespace resolution: deciding whether `NS:name` references are valid.
//!
//! The parser consults a [`NamespaceResolver`] for every namespaced name it
//! reads. Loading namespace definitions from remote resources is out of
//! scope; [`NamespaceSet`] covers the local cases (enumerated terms, regex
//! patterns, open namespaces) and is built from the `[namespaces]` section
//! of the configuration.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::NamespaceError;
use crate::language::Entity;

/// Resolves namespace prefixes and names.
pub trait NamespaceResolver: Send + Sync {
    fn is_valid_namespace(&self, namespace: &str) -> bool;

    fn is_valid_term(&self, namespace: &str, name: &str) -> bool;

    /// Validate an entity, distinguishing unknown namespaces from unknown
    /// names inside a known namespace.
    fn check(&self, entity: &Entity) -> Result<(), NamespaceError> {
        if !self.is_valid_namespace(&entity.namespace) {
            return Err(NamespaceError::UnknownNamespace {
                namespace: entity.namespace.clone(),
            });
        }
        if !self.is_valid_term(&entity.namespace, &entity.name) {
            return Err(NamespaceError::UnknownTerm {
                namespace: entity.namespace.clone(),
                name: entity.name.clone(),
            });
        }
        Ok(())
    }
}

/// Accepts every namespace and name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl NamespaceResolver for AllowAll {
    fn is_valid_namespace(&self, _namespace: &str) -> bool {
        true
    }

    fn is_valid_term(&self, _namespace: &str, _name: &str) -> bool {
        true
    }
}

/// `[namespaces]` configuration section.
///
/// ```toml
/// [namespaces]
/// open = ["CHEBI"]
///
/// [namespaces.enumerated]
/// HGNC = ["AKT1", "EGFR"]
///
/// [namespaces.patterns]
/// EGID = "[0-9]+"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    /// Namespaces whose names are listed explicitly.
    pub enumerated: BTreeMap<String, Vec<String>>,
    /// Namespaces whose names must fully match a regular expression.
    pub patterns: BTreeMap<String, String>,
    /// Namespaces that accept any name.
    pub open: Vec<String>,
}

impl NamespaceConfig {
    pub fn is_empty(&self) -> bool {
        self.enumerated.is_empty() && self.patterns.is_empty() && self.open.is_empty()
    }

    /// Build the resolver this section describes. An empty section accepts
    /// everything.
    pub fn build_resolver(&self) -> Result<Box<dyn NamespaceResolver>, NamespaceError> {
        if self.is_empty() {
            return Ok(Box::new(AllowAll));
        }
        Ok(Box::new(NamespaceSet::from_config(self)?))
    }
}

/// A fixed collection of locally defined namespaces.
#[derive(Debug, Clone, Default)]
pub struct NamespaceSet {
    enumerated: HashMap<String, HashSet<String>>,
    patterns: HashMap<String, Regex>,
    open: HashSet<String>,
}

impl NamespaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NamespaceConfig) -> Result<Self, NamespaceError> {
        let mut set = Self::new();
        for (namespace, names) in &config.enumerated {
            set.add_enumerated(namespace, names.iter().cloned());
        }
        for (namespace, pattern) in &config.patterns {
            set.add_pattern(namespace, pattern)?;
        }
        for namespace in &config.open {
            set.add_open(namespace);
        }
        Ok(set)
    }

    pub fn add_enumerated(
        &mut self,
        namespace: &str,
        names: impl IntoIterator<Item = String>,
    ) -> &mut Self {
        self.enumerated
            .entry(namespace.to_string())
            .or_default()
            .extend(names);
        self
    }

    pub fn add_pattern(&mut self, namespace: &str, pattern: &str) -> Result<&mut Self, NamespaceError> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|e| NamespaceError::InvalidPattern {
            namespace: namespace.to_string(),
            message: e.to_string(),
        })?;
        self.patterns.insert(namespace.to_string(), regex);
        Ok(self)
    }

    pub fn add_open(&mut self, namespace: &str) -> &mut Self {
        self.open.insert(namespace.to_string());
        self
    }
}

impl NamespaceResolver for NamespaceSet {
    fn is_valid_namespace(&self, namespace: &str) -> bool {
        self.open.contains(namespace)
            || self.enumerated.contains_key(namespace)
            || self.patterns.contains_key(namespace)
    }

    fn is_valid_term(&self, namespace: &str, name: &str) -> bool {
        if self.open.contains(namespace) {
            return true;
        }
        if let Some(names) = self.enumerated.get(namespace) {
            if names.contains(name) {
                return true;
            }
        }
        self.patterns
            .get(namespace)
            .is_some_and(|regex| regex.is_match(name))
    }
}
