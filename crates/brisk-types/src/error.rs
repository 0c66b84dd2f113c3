//! Error types for raw-code parsing in brisk-types.

use thiserror::Error;

/// Errors that can occur when converting raw vendor codes into typed values.
///
/// This error type is transport-agnostic; client and store errors belong in
/// brisk-core and brisk-store.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Operating-mode code outside the known 1..=5 table.
    #[error("Unknown work mode code: {0}")]
    UnknownWorkMode(u8),
}

/// Result type alias using brisk-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
