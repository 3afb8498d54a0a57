#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod config;
pub mod filesystem;
pub mod logging;
pub mod models;
pub mod order;
pub mod resolver;

pub use config::ResolverConfig;
pub use filesystem::{AssetFilesystem, DiskFilesystem, MemoryFilesystem};
pub use models::{Asset, AssetGroup, ResolvedAsset, ResolvedLocation};
pub use order::OrderAssigner;
pub use resolver::{AssetResolver, ResolverError};
