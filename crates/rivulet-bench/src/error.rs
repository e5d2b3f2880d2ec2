use rivulet_core::loader::LoadError;
use rivulet_liquid::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("scene content '{0}' is not registered")]
    MissingContent(String),
}
