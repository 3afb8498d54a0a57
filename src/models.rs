//! Data structures produced while resolving assets.

use std::cmp::Ordering;

use serde::Serialize;

use crate::asset_paths::is_remote_reference;
use crate::config::ResolverConfig;

/// Absolute and root-relative forms of a resolved asset path.
///
/// Both paths are present together, or absent together when the raw path was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
  absolute_path: Option<String>,
  relative_path: Option<String>,
}

impl ResolvedLocation {
  /// Location of an asset whose raw path was absent.
  pub fn unresolved() -> Self {
    Self::default()
  }

  pub(crate) fn new(absolute_path: String, relative_path: String) -> Self {
    Self {
      absolute_path: Some(absolute_path),
      relative_path: Some(relative_path),
    }
  }

  /// Canonical filesystem location, or the raw path when it could not be canonicalised.
  pub fn absolute_path(&self) -> Option<&str> {
    self.absolute_path.as_deref()
  }

  /// Identifier relative to the public root used to build public references.
  pub fn relative_path(&self) -> Option<&str> {
    self.relative_path.as_deref()
  }

  /// Returns `true` when the raw path was absent.
  pub fn is_unresolved(&self) -> bool {
    self.absolute_path.is_none()
  }
}

/// Output of a single resolution: the location plus its order index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
  /// Absolute and relative forms of the asset path.
  pub location: ResolvedLocation,
  /// Position of the asset within the resolver session, starting at 1.
  pub order: usize,
}

/// Asset group inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetGroup {
  /// Stylesheets and stylesheet pre-processor sources.
  Styles,
  /// Scripts and script pre-processor sources.
  Scripts,
}

impl AssetGroup {
  /// Extension under which assets of this group are served.
  pub fn served_extension(self) -> &'static str {
    match self {
      Self::Styles => "css",
      Self::Scripts => "js",
    }
  }

  fn from_extension(extension: &str, config: &ResolverConfig) -> Option<Self> {
    let matches = |list: &[String]| list.iter().any(|value| value.eq_ignore_ascii_case(extension));
    if matches(&config.style_extensions) {
      Some(Self::Styles)
    } else if matches(&config.script_extensions) {
      Some(Self::Scripts)
    } else {
      None
    }
  }
}

/// Resolved asset tagged with its location and order.
///
/// Neither the location nor the order is re-derived after construction. Assets sort by their
/// order index so a collection can be bundled in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
  #[serde(flatten)]
  location: ResolvedLocation,
  order: usize,
  environment: String,
  group: Option<AssetGroup>,
}

impl Asset {
  pub(crate) fn new(resolved: ResolvedAsset, config: &ResolverConfig) -> Self {
    let group = resolved
      .location
      .relative_path()
      .and_then(extension_of)
      .and_then(|extension| AssetGroup::from_extension(&extension, config));

    Self {
      location: resolved.location,
      order: resolved.order,
      environment: config.environment.clone(),
      group,
    }
  }

  /// Absolute and relative forms of the asset path.
  pub fn location(&self) -> &ResolvedLocation {
    &self.location
  }

  /// Canonical filesystem location of the asset.
  pub fn absolute_path(&self) -> Option<&str> {
    self.location.absolute_path()
  }

  /// Identifier relative to the public root.
  pub fn relative_path(&self) -> Option<&str> {
    self.location.relative_path()
  }

  /// Order index assigned when the asset was resolved.
  pub fn order(&self) -> usize {
    self.order
  }

  /// Environment tag the asset was resolved under.
  pub fn environment(&self) -> &str {
    &self.environment
  }

  /// Group inferred from the extension, if it is a known style or script.
  pub fn group(&self) -> Option<AssetGroup> {
    self.group
  }

  /// Returns `true` for stylesheets.
  pub fn is_style(&self) -> bool {
    self.group == Some(AssetGroup::Styles)
  }

  /// Returns `true` for scripts.
  pub fn is_script(&self) -> bool {
    self.group == Some(AssetGroup::Scripts)
  }

  /// Returns `true` for protocol-relative references and fully qualified URLs.
  pub fn is_remote(&self) -> bool {
    self.relative_path().is_some_and(is_remote_reference)
  }

  /// Lower-cased extension of the relative path.
  pub fn extension(&self) -> Option<String> {
    self.relative_path().and_then(extension_of)
  }

  /// Relative path under which the built asset is served.
  ///
  /// Pre-processor sources such as `app.less` or `app.coffee` are served with their group's
  /// extension (`app.css`, `app.js`). Remote and ungrouped assets keep their path.
  pub fn usable_path(&self) -> Option<String> {
    let relative = self.relative_path()?;
    let (Some(group), false) = (self.group, self.is_remote()) else {
      return Some(relative.to_string());
    };

    let served = group.served_extension();
    match relative.rsplit_once('.') {
      Some((stem, extension)) if !extension.eq_ignore_ascii_case(served) => {
        Some(format!("{stem}.{served}"))
      }
      _ => Some(relative.to_string()),
    }
  }
}

impl PartialOrd for Asset {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Asset {
  fn cmp(&self, other: &Self) -> Ordering {
    self
      .order
      .cmp(&other.order)
      .then_with(|| self.location.cmp(&other.location))
      .then_with(|| self.environment.cmp(&other.environment))
      .then_with(|| self.group.cmp(&other.group))
  }
}

fn extension_of(path: &str) -> Option<String> {
  let path = path.split(['?', '#']).next().unwrap_or(path);
  let basename = path.rsplit('/').next().unwrap_or(path);
  let (stem, extension) = basename.rsplit_once('.')?;
  if stem.is_empty() || extension.is_empty() {
    return None;
  }
  Some(extension.to_ascii_lowercase())
}
