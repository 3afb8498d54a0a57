//! Root-relative identifiers for resolved assets.

use sha2::{Digest, Sha256};
use tracing::debug;

use super::filters::is_remote_reference;

/// Derives the identifier used to reference an asset from the public root.
#[derive(Debug, Clone, Copy)]
pub struct RelativePathBuilder<'a> {
    canonical_root: &'a str,
}

impl<'a> RelativePathBuilder<'a> {
    /// Create a builder stripping the canonicalised public root.
    pub fn new(canonical_root: &'a str) -> Self {
        Self { canonical_root }
    }

    /// Build the root-relative path for `absolute_path`.
    ///
    /// Remote references are returned without trimming. Local paths lose their leading and
    /// trailing slashes, and paths that cannot be related to the public root at all are
    /// replaced with [`hashed_relative_path`].
    pub fn build_relative_path(&self, absolute_path: Option<&str>) -> Option<String> {
        let path = absolute_path?;
        let candidate = path
            .strip_prefix(self.canonical_root)
            .unwrap_or(path)
            .replace('\\', "/");

        if is_remote_reference(path) {
            return Some(candidate);
        }

        let relative = candidate.trim_matches('/');
        let original = path.replace('\\', "/");
        if relative == original.trim_matches('/') {
            let hashed = hashed_relative_path(&original);
            debug!(path, %hashed, "asset lies outside the public root; using hashed identifier");
            return Some(hashed);
        }

        Some(relative.to_string())
    }
}

/// Synthesise a stable identifier for an asset that lives outside the public root.
///
/// The directory portion is replaced by its SHA-256 digest so that files with the same name in
/// different directories never collide, while the basename stays readable. A path without a
/// basename (`""`, `"/"`) yields the bare digest.
pub fn hashed_relative_path(path: &str) -> String {
    let (directory, basename) = split_dirname(path);
    let digest = hex::encode(Sha256::digest(directory.as_bytes()));
    if basename.is_empty() {
        digest
    } else {
        format!("{digest}/{basename}")
    }
}

/// Split a path into its directory and basename, following POSIX `dirname` semantics.
fn split_dirname(path: &str) -> (&str, &str) {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return (if path.is_empty() { "." } else { "/" }, "");
    }

    match trimmed.rfind('/') {
        None => (".", trimmed),
        Some(index) => {
            let directory = trimmed[..index].trim_end_matches('/');
            let directory = if directory.is_empty() { "/" } else { directory };
            (directory, &trimmed[index + 1..])
        }
    }
}
