//! Common utilities and shared types for pic4pick.
//!
//! This crate provides foundational components used across all pic4pick crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Storage**: Object storage backends (local, S3-compatible) for photo variants
//!
//! # Example
//!
//! ```no_run
//! use pic4pick_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Listening on port {}", config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use storage::{
    LocalStorage, StorageBackend, StorageConfig, StorageService, UploadedFile, build_storage,
    generate_storage_key, normalize_extension,
};
