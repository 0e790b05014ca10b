//! Centralized error handling for playback-proxy
//!
//! # Error Categories
//!
//! - **Configuration Errors**: missing or malformed config files
//! - **Proxy Errors**: URL construction failures (always softened to fail-open)
//! - **Preference Errors**: persistence of the quality preference state
//!
//! # Usage
//!
//! ```rust
//! use playback_proxy::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::validation("empty url"))
//! }
//! assert!(example_function().is_err());
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for proxy construction Results
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Convenience type alias for preference persistence Results
pub type PreferenceResult<T> = Result<T, PreferenceError>;
