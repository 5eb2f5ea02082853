use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("replay request {filename} was delivered over the bridge transport")]
    BridgedReplay { filename: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read registry config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse registry config: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(source: toml::de::Error) -> Self {
        Self::Parse { source }
    }
}
