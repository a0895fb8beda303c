//! Core types, configuration, and error handling for commitnet.
//!
//! This crate provides the shared foundation used by the other commitnet crates:
//! - [`CommitnetError`]: unified error type using `thiserror` and `miette`
//! - [`CommitnetConfig`]: configuration loaded from `.commitnet.toml`
//! - Shared records: [`CommitRecord`], [`CommitterTotal`], [`CommitterIdentity`],
//!   and the CLI [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{CommitnetConfig, DataConfig, GitHubConfig, NetworkConfig};
pub use error::CommitnetError;
pub use types::{CommitRecord, CommitterIdentity, CommitterTotal, OutputFormat};

/// A convenience `Result` type for commitnet operations.
pub type Result<T> = std::result::Result<T, CommitnetError>;
