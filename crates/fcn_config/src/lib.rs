//! Parsing and validation of `exact.toml` configuration files.
//!
//! The file carries the options of an exact physical design run in an
//! `[exact]` table and an optional list of `[[blacklist]]` entries that forbid
//! gate functions on individual tiles. [`load_config`] produces a validated
//! [`ExactConfig`]; [`resolve_blacklist`] groups the blacklist by tile.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_blacklist, ResolvedBlacklist, TileBlacklist};
pub use types::*;
