//! CLI configuration: default prefixes applied to every rendered query.
//!
//! Looked up, in order, at an explicit path, `./sparqlburger.toml`, and
//! `<config dir>/sparqlburger/config.toml`. A missing file means defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ast::{Prefix, popular_prefixes};
use crate::error::BuildResult;

/// File name checked in the current directory.
pub const LOCAL_CONFIG: &str = "sparqlburger.toml";

/// A `[[prefix]]` entry, shared by config files and recipes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefixSpec {
    pub name: String,
    pub namespace: String,
}

impl From<&PrefixSpec> for Prefix {
    fn from(spec: &PrefixSpec) -> Self {
        Prefix::new(&spec.name, &spec.namespace)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Emit the popular rdf/rdfs/xml/owl/prov/foaf prefixes first.
    #[serde(default)]
    pub popular_prefixes: bool,

    #[serde(default, rename = "prefix")]
    pub prefixes: Vec<PrefixSpec>,
}

impl Config {
    pub fn from_toml_str(content: &str) -> BuildResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> BuildResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load the first config found. An explicit path must exist.
    pub fn discover(explicit: Option<&Path>) -> BuildResult<Self> {
        if let Some(path) = explicit {
            tracing::debug!("Loading config from {}", path.display());
            return Self::load(path);
        }

        for path in Self::search_paths() {
            if path.exists() {
                tracing::debug!("Loading config from {}", path.display());
                return Self::load(&path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Implicit config locations, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sparqlburger").join("config.toml"));
        }
        paths
    }

    /// The prefixes this config contributes, in emission order.
    pub fn prefixes(&self) -> Vec<Prefix> {
        let mut prefixes = Vec::new();
        if self.popular_prefixes {
            prefixes.extend(popular_prefixes());
        }
        prefixes.extend(self.prefixes.iter().map(Prefix::from));
        prefixes
    }
}
