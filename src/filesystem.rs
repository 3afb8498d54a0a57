//! Filesystem capability used while resolving asset paths.
//!
//! Resolution only ever needs two questions answered: does a path exist, and what is its
//! canonical form. Both are routed through [`AssetFilesystem`] so that the resolver can run
//! against the real disk or against an in-memory tree in tests.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

/// Capability required by the resolver to inspect the filesystem.
pub trait AssetFilesystem {
  /// Returns `true` when a file or directory exists at `path`.
  fn exists(&self, path: &str) -> bool;

  /// Resolve symlinks and `.`/`..` components into an absolute real path.
  fn canonicalize(&self, path: &str) -> io::Result<String>;
}

impl<F: AssetFilesystem + ?Sized> AssetFilesystem for &F {
  fn exists(&self, path: &str) -> bool {
    (**self).exists(path)
  }

  fn canonicalize(&self, path: &str) -> io::Result<String> {
    (**self).canonicalize(path)
  }
}

/// [`AssetFilesystem`] backed by the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFilesystem;

impl AssetFilesystem for DiskFilesystem {
  fn exists(&self, path: &str) -> bool {
    Path::new(path).exists()
  }

  fn canonicalize(&self, path: &str) -> io::Result<String> {
    let canonical = fs::canonicalize(path)?;
    Ok(canonical.to_string_lossy().into_owned())
  }
}

/// In-memory [`AssetFilesystem`] holding a set of files, directories and symlinks.
///
/// Every ancestor of a registered file counts as an existing directory. Canonicalisation is
/// purely lexical apart from symlink substitution, and fails with [`ErrorKind::NotFound`] for
/// anything that does not exist.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
  entries: BTreeSet<String>,
  links: BTreeMap<String, String>,
}

impl MemoryFilesystem {
  /// Create an empty tree.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a file together with all of its parent directories.
  pub fn with_file(mut self, path: &str) -> Self {
    self.insert(path);
    self
  }

  /// Register a directory together with all of its parents.
  pub fn with_dir(mut self, path: &str) -> Self {
    self.insert(path);
    self
  }

  /// Register a symlink so that `from` (and everything beneath it) resolves to `to`.
  pub fn with_link(mut self, from: &str, to: &str) -> Self {
    self
      .links
      .insert(normalise(from), normalise(to));
    self
  }

  fn insert(&mut self, path: &str) {
    let normalised = normalise(path);
    let mut current = normalised.as_str();
    loop {
      self.entries.insert(current.to_string());
      match current.rfind('/') {
        Some(0) => {
          self.entries.insert("/".to_string());
          break;
        }
        Some(index) => current = &current[..index],
        None => break,
      }
    }
  }

  fn follow_links(&self, path: String) -> String {
    let mut resolved = path;
    // Bounded so that a cyclic link table cannot loop forever.
    for _ in 0..32 {
      let target = self.links.iter().find_map(|(from, to)| {
        let rest = resolved.strip_prefix(from.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then(|| format!("{to}{rest}"))
      });
      match target {
        Some(next) => resolved = normalise(&next),
        None => break,
      }
    }
    resolved
  }
}

impl AssetFilesystem for MemoryFilesystem {
  fn exists(&self, path: &str) -> bool {
    let resolved = self.follow_links(normalise(path));
    self.entries.contains(&resolved)
  }

  fn canonicalize(&self, path: &str) -> io::Result<String> {
    if !path.starts_with('/') {
      return Err(io::Error::new(
        ErrorKind::NotFound,
        format!("{path} is not an absolute path"),
      ));
    }

    let resolved = self.follow_links(normalise(path));
    if self.entries.contains(&resolved) {
      Ok(resolved)
    } else {
      Err(io::Error::new(
        ErrorKind::NotFound,
        format!("{path} does not exist"),
      ))
    }
  }
}

/// Collapse `.`/`..` segments and duplicate separators of an absolute, slash separated path.
fn normalise(path: &str) -> String {
  let mut segments: Vec<&str> = Vec::new();
  for segment in path.split('/') {
    match segment {
      "" | "." => {}
      ".." => {
        segments.pop();
      }
      other => segments.push(other),
    }
  }
  format!("/{}", segments.join("/"))
}
