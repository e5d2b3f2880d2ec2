use thiserror::Error;

use crate::content::{ContentDef, ContentRegistry};
use crate::error::RegistryError;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse contents RON: {0}")]
    ContentParseError(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Parse a single contents RON string into a list of definitions.
pub fn load_contents_from_str(ron_str: &str) -> Result<Vec<ContentDef>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::ContentParseError(e.to_string()))
}

/// Load and concatenate multiple content sources, in order.
pub fn load_all_contents(sources: &[&str]) -> Result<Vec<ContentDef>, LoadError> {
    let mut all_contents = Vec::new();
    for source in sources {
        all_contents.extend(load_contents_from_str(source)?);
    }
    Ok(all_contents)
}

/// Result of building a registry from RON sources.
#[derive(Debug)]
pub struct RegistryLoadResult {
    pub registry: ContentRegistry,
    pub warnings: Vec<String>,
}

/// Parse every source, register the contents and resolve liquid alternatives.
pub fn build_registry(sources: &[&str]) -> Result<RegistryLoadResult, LoadError> {
    let defs = load_all_contents(sources)?;
    let mut registry = ContentRegistry::new();
    registry.register_all(&defs)?;
    let warnings = registry.resolve_crossrefs();
    log::debug!(
        "Content registry built: {} entries, {} warnings",
        registry.len(),
        warnings.len()
    );
    Ok(RegistryLoadResult { registry, warnings })
}
