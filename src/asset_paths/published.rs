//! Absolute path resolution and the published-copy search for assets outside the public root.

use tracing::trace;

use crate::filesystem::AssetFilesystem;

/// Resolves raw asset paths into absolute locations relative to a public document root.
#[derive(Debug)]
pub struct PublishedPathResolver<'a, F> {
    filesystem: &'a F,
    public_root: &'a str,
}

impl<'a, F: AssetFilesystem> PublishedPathResolver<'a, F> {
    /// Create a resolver for `public_root`, which must be absolute and free of trailing slashes.
    pub fn new(filesystem: &'a F, public_root: &'a str) -> Self {
        Self {
            filesystem,
            public_root,
        }
    }

    /// Canonicalise `path`, falling back to the original string when that is not possible.
    pub fn build_absolute_path(&self, path: Option<&str>) -> Option<String> {
        let path = path?;
        Some(
            self.filesystem
                .canonicalize(path)
                .unwrap_or_else(|_| path.to_string()),
        )
    }

    /// Returns `true` when `absolute_path` does not start with the configured public root.
    pub fn outside_public(&self, absolute_path: &str) -> bool {
        !absolute_path.starts_with(self.public_root)
    }

    /// Search the public root for a published copy of `path`.
    ///
    /// The path is split into segments and leading segments are dropped one at a time until a
    /// candidate beneath the public root exists. Vendor packages frequently publish their assets
    /// a few directories shallower than the path they were authored under. When nothing matches
    /// the original path is returned unchanged.
    pub fn find_published_path(&self, path: &str) -> String {
        let stripped = path.strip_prefix(self.public_root).unwrap_or(path);
        let normalised = stripped.replace('\\', "/");
        let segments: Vec<&str> = normalised
            .split('/')
            .filter(|segment| !matches!(*segment, "" | "." | ".."))
            .collect();

        for start in 0..segments.len() {
            let candidate = format!("{}/{}", self.public_root, segments[start..].join("/"));
            trace!(%candidate, "probing published asset candidate");
            if self.filesystem.exists(&candidate) {
                return candidate;
            }
        }

        path.to_string()
    }
}
