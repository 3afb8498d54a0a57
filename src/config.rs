//! Resolver configuration loader describing the public root and asset grouping.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "asset_locator.config.json";

/// Discoverable configuration consumed by [`crate::AssetResolver`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Document root from which assets are served directly to clients.
    pub public_root: String,
    /// Opaque environment tag copied onto every resolved asset.
    pub environment: String,
    /// Extensions (without the leading dot) that belong to the styles group.
    pub style_extensions: Vec<String>,
    /// Extensions (without the leading dot) that belong to the scripts group.
    pub script_extensions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            public_root: "public".into(),
            environment: "production".into(),
            style_extensions: ["css", "sass", "scss", "less", "styl"]
                .into_iter()
                .map(String::from)
                .collect(),
            script_extensions: ["js", "coffee", "ts", "dart"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ResolverConfig {
    /// Load `asset_locator.config.json` from `dir`.
    ///
    /// A missing or unparsable file yields [`ResolverConfig::default`]; the public root is still
    /// validated later by [`crate::AssetResolver::new`].
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Public root joined onto `base` when it was configured as a relative path.
    pub fn public_root_path(&self, base: &Path) -> PathBuf {
        base.join(&self.public_root)
    }

    /// Copy of this configuration with the public root made absolute against `base`.
    pub fn anchored_at(&self, base: &Path) -> Self {
        Self {
            public_root: self.public_root_path(base).to_string_lossy().into_owned(),
            ..self.clone()
        }
    }
}
