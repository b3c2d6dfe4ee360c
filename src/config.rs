use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

use crate::storage::Ed25519Signer;

/// Where the invocation signer comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerSource {
    /// Fresh random key for this run only
    Ephemeral,
    /// Seed loaded from a key file
    KeyFile(PathBuf),
}

/// Configuration for one put-website run
#[derive(Debug, Clone)]
pub struct Config {
    pub source: PathBuf,
    pub collection: Url,
    pub signer_source: SignerSource,
}

impl Config {
    /// Validate command line inputs
    ///
    /// # Errors
    ///
    /// Returns an error if the source is not a directory or the target is
    /// not an absolute URL
    pub fn new(source: PathBuf, target: &str, key_file: Option<PathBuf>) -> Result<Self> {
        Self::validate_source(&source)?;
        let collection = Self::parse_collection(target)?;

        let signer_source = match key_file {
            Some(path) => SignerSource::KeyFile(path),
            None => SignerSource::Ephemeral,
        };

        Ok(Self {
            source,
            collection,
            signer_source,
        })
    }

    fn validate_source(source: &Path) -> Result<()> {
        if !source.exists() {
            anyhow::bail!("Source directory does not exist: {}", source.display());
        }
        if !source.is_dir() {
            anyhow::bail!("Source is not a directory: {}", source.display());
        }
        Ok(())
    }

    fn parse_collection(target: &str) -> Result<Url> {
        if target.is_empty() {
            anyhow::bail!("Target collection URL cannot be empty");
        }

        let url = Url::parse(target)
            .with_context(|| format!("Target '{}' is not an absolute URL", target))?;

        if url.cannot_be_a_base() {
            anyhow::bail!(
                "Target '{}' cannot hold resources (expected e.g. https://storage.example/space/<id>/)",
                target
            );
        }

        if !url.path().ends_with('/') {
            warn!(
                "Target '{}' does not end with '/'; file names will be appended to its last segment",
                target
            );
        }

        Ok(url)
    }

    /// Create the signer for this run
    pub fn signer(&self) -> Result<Ed25519Signer> {
        match &self.signer_source {
            SignerSource::KeyFile(path) => Ed25519Signer::from_key_file(path)
                .with_context(|| format!("Failed to load signing key from {}", path.display())),
            SignerSource::Ephemeral => Ok(Ed25519Signer::generate()),
        }
    }
}
