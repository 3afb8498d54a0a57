//! Helpers for resolving asset paths against the public document root.
//!
//! The responsibilities are split into focused submodules so that remote reference detection,
//! absolute path resolution with its published-copy search, and relative identifier generation
//! can each be tested independently. [`crate::AssetResolver`] composes them into the full
//! resolution pipeline.

mod filters;
mod published;
mod relative;

pub use filters::is_remote_reference;
pub use published::PublishedPathResolver;
pub use relative::{RelativePathBuilder, hashed_relative_path};
