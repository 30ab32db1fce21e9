//! Error handling for the CDC WONDER query layer
//!
//! This crate provides the error infrastructure shared by the rest of the
//! workspace: machine-distinguishable reason codes for configuration errors
//! and the top-level error enum covering validation, transport and decoding
//! failures.

mod error;
mod reason_code;

pub use error::*;
pub use reason_code::*;

/// Result type for WONDER operations
pub type Result<T> = std::result::Result<T, WonderError>;
