//! Asset resolution orchestrator tying path resolution, relative identifiers and ordering together.

use std::io;
use std::path::Path;

use tracing::debug;

use crate::asset_paths::{PublishedPathResolver, RelativePathBuilder};
use crate::config::ResolverConfig;
use crate::filesystem::AssetFilesystem;
use crate::models::{Asset, ResolvedAsset, ResolvedLocation};
use crate::order::OrderAssigner;

/// Errors raised while validating the resolver configuration.
///
/// Resolution itself never fails; only an unusable public root is reported, once, when the
/// resolver is constructed.
#[derive(Debug)]
pub enum ResolverError {
  /// The configured public root is blank.
  EmptyPublicRoot,
  /// The configured public root is not an absolute path.
  RelativePublicRoot {
    /// Root that was configured.
    root: String,
  },
  /// The configured public root could not be canonicalised.
  UnreachablePublicRoot {
    /// Root that was configured.
    root: String,
    /// Source I/O error.
    source: io::Error,
  },
}

impl std::fmt::Display for ResolverError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::EmptyPublicRoot => write!(f, "public root is not configured"),
      Self::RelativePublicRoot { root } => {
        write!(f, "public root {root} must be an absolute path")
      }
      Self::UnreachablePublicRoot { root, source } => {
        write!(f, "public root {root} is unreachable: {source}")
      }
    }
  }
}

impl std::error::Error for ResolverError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::UnreachablePublicRoot { source, .. } => Some(source),
      Self::EmptyPublicRoot | Self::RelativePublicRoot { .. } => None,
    }
  }
}

/// Resolves raw asset paths for a single build session.
///
/// Every call to [`AssetResolver::resolve`] produces the absolute path, the root-relative
/// identifier and the next order index. The resolver owns its order counter, so one instance
/// corresponds to one producer; `&mut self` keeps concurrent callers from sharing it
/// unsynchronised.
#[derive(Debug)]
pub struct AssetResolver<F> {
  filesystem: F,
  config: ResolverConfig,
  public_root: String,
  canonical_root: String,
  orders: OrderAssigner,
}

impl<F: AssetFilesystem> AssetResolver<F> {
  /// Validate the configured public root and create a resolver with a fresh order counter.
  pub fn new(config: &ResolverConfig, filesystem: F) -> Result<Self, ResolverError> {
    let configured = config.public_root.trim();
    if configured.is_empty() {
      return Err(ResolverError::EmptyPublicRoot);
    }
    if !Path::new(configured).is_absolute() {
      return Err(ResolverError::RelativePublicRoot {
        root: configured.to_string(),
      });
    }

    let canonical_root = filesystem.canonicalize(configured).map_err(|source| {
      ResolverError::UnreachablePublicRoot {
        root: configured.to_string(),
        source,
      }
    })?;
    let public_root = configured.trim_end_matches(['/', '\\']).to_string();

    debug!(%public_root, %canonical_root, environment = %config.environment, "asset resolver ready");

    Ok(Self {
      filesystem,
      config: config.clone(),
      public_root,
      canonical_root: canonical_root.trim_end_matches(['/', '\\']).to_string(),
      orders: OrderAssigner::new(),
    })
  }

  /// Resolve `path` into its absolute and relative forms and assign the next order index.
  ///
  /// Unresolvable paths degrade to the original string or to a hashed identifier; an absent
  /// path yields an unresolved location. The order index is consumed in every case.
  pub fn resolve(&mut self, path: Option<&str>) -> ResolvedAsset {
    let location = self.locate(path);
    let order = self.orders.next_order();

    debug!(
      path = ?path,
      absolute = ?location.absolute_path(),
      relative = ?location.relative_path(),
      order,
      "resolved asset"
    );

    ResolvedAsset { location, order }
  }

  /// Resolve `path` and construct the [`Asset`] tagged with its location and order.
  pub fn make_asset(&mut self, path: Option<&str>) -> Asset {
    let resolved = self.resolve(path);
    Asset::new(resolved, &self.config)
  }

  /// Public root as configured, without a trailing slash.
  pub fn public_root(&self) -> &str {
    &self.public_root
  }

  /// Environment tag copied onto each constructed asset.
  pub fn environment(&self) -> &str {
    &self.config.environment
  }

  /// Number of order indices handed out by this resolver.
  pub fn issued(&self) -> usize {
    self.orders.issued()
  }

  fn locate(&self, path: Option<&str>) -> ResolvedLocation {
    let published = PublishedPathResolver::new(&self.filesystem, &self.public_root);
    let (Some(raw), Some(absolute)) = (path, published.build_absolute_path(path)) else {
      return ResolvedLocation::unresolved();
    };

    let absolute = if published.outside_public(&absolute) {
      published.find_published_path(raw)
    } else {
      absolute
    };

    let relative = RelativePathBuilder::new(&self.canonical_root)
      .build_relative_path(Some(absolute.as_str()))
      .unwrap_or_default();

    ResolvedLocation::new(absolute, relative)
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use sha2::{Digest, Sha256};
  use tempfile::tempdir;

  use super::*;
  use crate::filesystem::{DiskFilesystem, MemoryFilesystem};
  use crate::models::AssetGroup;

  const ROOT: &str = "/var/www/public";

  fn config() -> ResolverConfig {
    ResolverConfig {
      public_root: ROOT.into(),
      environment: "testing".into(),
      ..ResolverConfig::default()
    }
  }

  fn public_tree() -> MemoryFilesystem {
    MemoryFilesystem::new()
      .with_file("/var/www/public/css/app.css")
      .with_file("/var/www/public/dist/app.js")
      .with_file("/vendor/pkg/dist/app.js")
  }

  #[test]
  fn rejects_unusable_public_roots() {
    let fs = MemoryFilesystem::new();

    let blank = ResolverConfig {
      public_root: "  ".into(),
      ..config()
    };
    assert!(matches!(
      AssetResolver::new(&blank, &fs),
      Err(ResolverError::EmptyPublicRoot)
    ));

    let relative = ResolverConfig {
      public_root: "public".into(),
      ..config()
    };
    assert!(matches!(
      AssetResolver::new(&relative, &fs),
      Err(ResolverError::RelativePublicRoot { .. })
    ));

    let err = AssetResolver::new(&config(), &fs).unwrap_err();
    assert!(matches!(err, ResolverError::UnreachablePublicRoot { .. }));
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().contains(ROOT));
  }

  #[test]
  fn trims_trailing_slash_from_public_root() {
    let fs = public_tree();
    let with_slash = ResolverConfig {
      public_root: "/var/www/public/".into(),
      ..config()
    };
    let mut resolver = AssetResolver::new(&with_slash, &fs).unwrap();

    assert_eq!(resolver.public_root(), ROOT);
    let resolved = resolver.resolve(Some("/var/www/public/css/app.css"));
    assert_eq!(resolved.location.relative_path(), Some("css/app.css"));
  }

  #[test]
  fn resolves_assets_inside_the_public_root() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let resolved = resolver.resolve(Some("/var/www/public/css/app.css"));
    assert_eq!(
      resolved.location.absolute_path(),
      Some("/var/www/public/css/app.css")
    );
    assert_eq!(resolved.location.relative_path(), Some("css/app.css"));
    assert_eq!(resolved.order, 1);
  }

  #[test]
  fn re_resolving_an_absolute_path_is_idempotent() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let first = resolver.resolve(Some("/var/www/public/js/../css/app.css"));
    let absolute = first.location.absolute_path().unwrap().to_string();
    let second = resolver.resolve(Some(absolute.as_str()));

    assert_eq!(second.location.absolute_path(), Some(absolute.as_str()));
    assert_eq!(
      second.location.relative_path(),
      first.location.relative_path()
    );
  }

  #[test]
  fn locates_published_vendor_assets() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let resolved = resolver.resolve(Some("/vendor/pkg/dist/app.js"));
    assert_eq!(
      resolved.location.absolute_path(),
      Some("/var/www/public/dist/app.js")
    );
    assert_eq!(resolved.location.relative_path(), Some("dist/app.js"));
  }

  #[test]
  fn locates_published_copies_of_missing_paths() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let resolved = resolver.resolve(Some("workbench/acme/css/app.css"));
    assert_eq!(
      resolved.location.absolute_path(),
      Some("/var/www/public/css/app.css")
    );
    assert_eq!(resolved.location.relative_path(), Some("css/app.css"));
  }

  #[test]
  fn passes_remote_references_through() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let resolved = resolver.resolve(Some("//cdn.example.com/lib.js"));
    assert_eq!(
      resolved.location.absolute_path(),
      Some("//cdn.example.com/lib.js")
    );
    assert_eq!(
      resolved.location.relative_path(),
      Some("//cdn.example.com/lib.js")
    );
  }

  #[test]
  fn hashes_assets_that_cannot_be_related_to_the_root() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let resolved = resolver.resolve(Some("/completely/unrelated/file.css"));
    let expected = format!(
      "{}/file.css",
      hex::encode(Sha256::digest(b"/completely/unrelated"))
    );

    assert_eq!(
      resolved.location.absolute_path(),
      Some("/completely/unrelated/file.css")
    );
    assert_eq!(resolved.location.relative_path(), Some(expected.as_str()));

    let mut fresh = AssetResolver::new(&config(), &fs).unwrap();
    fresh.resolve(Some("/other.css"));
    let again = fresh.resolve(Some("/completely/unrelated/file.css"));
    assert_eq!(again.location.relative_path(), Some(expected.as_str()));
  }

  #[test]
  fn empty_and_root_paths_hash_without_edge_slashes() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let empty = resolver.resolve(Some(""));
    assert_eq!(empty.location.absolute_path(), Some(""));
    assert_eq!(
      empty.location.relative_path(),
      Some(hex::encode(Sha256::digest(b".")).as_str())
    );

    let root = resolver.resolve(Some("/"));
    assert_eq!(root.location.absolute_path(), Some("/"));
    assert_eq!(
      root.location.relative_path(),
      Some(hex::encode(Sha256::digest(b"/")).as_str())
    );

    for resolved in [&empty, &root] {
      let relative = resolved.location.relative_path().unwrap();
      assert!(!relative.starts_with('/') && !relative.ends_with('/'));
    }
  }

  #[test]
  fn hashes_backslash_paths_by_their_forward_slash_directory() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let resolved = resolver.resolve(Some("vendor\\pkg\\app.css"));
    let expected = format!("{}/app.css", hex::encode(Sha256::digest(b"vendor/pkg")));

    assert_eq!(resolved.location.absolute_path(), Some("vendor\\pkg\\app.css"));
    assert_eq!(resolved.location.relative_path(), Some(expected.as_str()));
  }

  #[test]
  fn remote_urls_pick_up_a_published_copy_with_the_same_suffix() {
    let fs = public_tree().with_file("/var/www/public/app.js");
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let resolved = resolver.resolve(Some("https://cdn.example.com/app.js"));
    assert_eq!(
      resolved.location.absolute_path(),
      Some("/var/www/public/app.js")
    );
    assert_eq!(resolved.location.relative_path(), Some("app.js"));

    let unpublished = resolver.resolve(Some("https://cdn.example.com/vendor.js"));
    assert_eq!(
      unpublished.location.relative_path(),
      Some("https://cdn.example.com/vendor.js")
    );
  }

  #[test]
  fn absent_paths_stay_unresolved_but_consume_an_order() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let resolved = resolver.resolve(None);
    assert!(resolved.location.is_unresolved());
    assert_eq!(resolved.location.relative_path(), None);
    assert_eq!(resolved.order, 1);
    assert_eq!(resolver.resolve(Some("/var/www/public/css/app.css")).order, 2);
  }

  #[test]
  fn assigns_gapless_orders_per_resolver() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();
    let paths = [
      Some("/var/www/public/css/app.css"),
      Some("/vendor/pkg/dist/app.js"),
      None,
      Some("//cdn.example.com/lib.js"),
      Some("/completely/unrelated/file.css"),
    ];

    let orders: Vec<usize> = paths.iter().map(|path| resolver.resolve(*path).order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5]);
    assert_eq!(resolver.issued(), 5);

    let mut next_session = AssetResolver::new(&config(), &fs).unwrap();
    assert_eq!(next_session.resolve(paths[0]).order, 1);
  }

  #[test]
  fn make_asset_tags_location_order_and_environment() {
    let fs = public_tree();
    let mut resolver = AssetResolver::new(&config(), &fs).unwrap();

    let style = resolver.make_asset(Some("/var/www/public/css/app.css"));
    let script = resolver.make_asset(Some("/vendor/pkg/dist/app.js"));

    assert_eq!(style.order(), 1);
    assert_eq!(style.environment(), "testing");
    assert_eq!(style.group(), Some(AssetGroup::Styles));
    assert_eq!(script.order(), 2);
    assert_eq!(script.relative_path(), Some("dist/app.js"));
    assert!(script.is_script());
  }

  #[test]
  fn resolves_against_the_real_filesystem() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let base = fs::canonicalize(temp.path())?;
    let public = base.join("public");
    fs::create_dir_all(public.join("packages/acme/css"))?;
    fs::write(public.join("packages/acme/css/theme.less"), b"@color: red;")?;
    fs::create_dir_all(base.join("vendor/acme/theme/packages/acme/css"))?;

    let config = ResolverConfig::default().anchored_at(&base);
    let mut resolver = AssetResolver::new(&config, DiskFilesystem)?;

    let vendor_path = base
      .join("vendor/acme/theme/packages/acme/css/theme.less")
      .to_string_lossy()
      .into_owned();
    let asset = resolver.make_asset(Some(vendor_path.as_str()));

    assert_eq!(asset.relative_path(), Some("packages/acme/css/theme.less"));
    assert_eq!(asset.usable_path().as_deref(), Some("packages/acme/css/theme.css"));
    assert_eq!(asset.order(), 1);
    Ok(())
  }
}
