use thiserror::Error;

/// Errors raised while building a content registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Content name already registered: {0}")]
    DuplicateName(String),

    #[error("Content registry is full ({0} entries)")]
    Full(usize),
}
