//! Built-in skill catalog.
//!
//! The IndieGraph content ships inside the binary as TOML and is parsed once
//! at startup. Hosts may also supply their own catalog text in the same
//! format via [`parse_catalog`].

use serde::Deserialize;

use indiepilot_types::error::GraphError;
use indiepilot_types::skill::SkillDefinition;

use super::SkillGraph;

const BUILTIN_CATALOG: &str = include_str!("catalog.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    skills: Vec<SkillDefinition>,
}

/// Parse catalog TOML (a list of `[[skills]]` tables) into definitions.
pub fn parse_catalog(content: &str) -> Result<Vec<SkillDefinition>, GraphError> {
    toml::from_str::<CatalogFile>(content)
        .map(|file| file.skills)
        .map_err(|e| GraphError::Catalog(e.to_string()))
}

impl SkillGraph {
    /// Build the graph from the catalog shipped with IndiePilot.
    pub fn builtin() -> Result<Self, GraphError> {
        Self::build(parse_catalog(BUILTIN_CATALOG)?)
    }

    /// Build a graph from catalog TOML text.
    pub fn from_toml(content: &str) -> Result<Self, GraphError> {
        Self::build(parse_catalog(content)?)
    }
}
