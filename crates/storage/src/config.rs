//! Layout configuration.
//!
//! The consuming tool reads this from its own config file or command line
//! and turns it into a [`StorageLayout`] once at startup.

use crate::layout::{StorageLayout, CURRENT_VERSION};
use serde::{Deserialize, Serialize};
use walvault_core::{Error, Result};

/// Storage layout configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Base URL, `s3://<bucket>/<prefix>`.
    pub base_url: String,

    /// Key-naming format version (default: `005`).
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    CURRENT_VERSION.to_string()
}

impl LayoutConfig {
    /// Create a configuration for the current version.
    pub fn new(base_url: impl Into<String>) -> Self {
        LayoutConfig {
            base_url: base_url.into(),
            version: default_version(),
        }
    }

    /// Set the format version (builder pattern).
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Validate configuration.
    ///
    /// Unlike constructing a layout directly, an unsupported version is
    /// rejected here instead of at the first key operation.
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    /// Build the layout.
    pub fn build(&self) -> Result<StorageLayout> {
        if self.version != CURRENT_VERSION {
            return Err(Error::UnsupportedVersion {
                version: self.version.clone(),
                supported: CURRENT_VERSION,
            });
        }
        StorageLayout::with_version(&self.base_url, self.version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_version() {
        let config = LayoutConfig::new("s3://foo/bar");
        assert_eq!(config.version, "005");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_build() {
        let layout = LayoutConfig::new("s3://foo/bar").build().unwrap();
        assert_eq!(layout.bucket_name(), "foo");
        assert_eq!(layout.prefix(), "bar/");
    }

    #[test]
    fn test_validation_bad_scheme() {
        let config = LayoutConfig::new("file:///tmp/backups");
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_validation_unsupported_version() {
        let config = LayoutConfig::new("s3://foo/bar").with_version("006");
        assert!(matches!(
            config.validate(),
            Err(Error::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn test_deserialize_with_default() {
        let config: LayoutConfig = serde_json::from_str(r#"{"base_url": "s3://foo/bar"}"#).unwrap();
        assert_eq!(config, LayoutConfig::new("s3://foo/bar"));

        let config: LayoutConfig =
            serde_json::from_str(r#"{"base_url": "s3://foo/bar", "version": "004"}"#).unwrap();
        assert_eq!(config.version, "004");
    }
}
