//! Error types for brisk-core.
//!
//! This module defines the errors that can occur when talking to the
//! vendor's appliance API and when validating control requests.
//!
//! # Recovery expectations
//!
//! | Error | Strategy | Rationale |
//! |-------|----------|-----------|
//! | [`Error::Auth`] | Do not retry | Credentials or session are wrong; re-login is an operator action |
//! | [`Error::Network`] | Caller's choice | Transient transport failure; the scheduler's dispatch policy decides |
//! | [`Error::Rejected`] | Do not retry | The device refused the update as sent |
//! | [`Error::DeviceNotFound`] | Do not retry | Nickname has no matching appliance on the account |
//! | [`Error::EmptyCommand`] | Do not retry | Request validation failure, nothing was sent |
//!
//! The core never retries on its own; delivery is at-most-once unless the
//! scheduler is configured otherwise.

use thiserror::Error;

/// Errors that can occur when communicating with the vendor appliance API.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Authentication with the vendor service failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure reaching the vendor service.
    #[error("Network failure: {0}")]
    Network(String),

    /// The device or vendor service refused the update.
    #[error("Update rejected by device {puid}: {reason}")]
    Rejected {
        /// The appliance the update was sent to.
        puid: String,
        /// The reason reported by the service.
        reason: String,
    },

    /// No appliance matched the requested selection.
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceNotFoundReason),

    /// A scheduling or control request produced no fields to send.
    #[error("Empty command: no fields to send")]
    EmptyCommand,
}

/// Reason why no appliance matched.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new reasons
/// in future versions without breaking downstream code.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum DeviceNotFoundReason {
    /// The account's appliance list came back empty.
    NoAppliances,
    /// No appliance matched the requested nickname.
    NoMatch { nickname: String },
}

impl std::fmt::Display for DeviceNotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAppliances => write!(f, "no appliances on the account"),
            Self::NoMatch { nickname } => write!(f, "no appliance named '{}'", nickname),
        }
    }
}

impl Error {
    /// Create an authentication failure.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create a network failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a rejected-update error.
    pub fn rejected(puid: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            puid: puid.into(),
            reason: reason.into(),
        }
    }

    /// Create a device not found error for a specific nickname.
    pub fn device_not_found(nickname: impl Into<String>) -> Self {
        Self::DeviceNotFound(DeviceNotFoundReason::NoMatch {
            nickname: nickname.into(),
        })
    }

    /// True for failures of the transport itself rather than of the
    /// request, the distinction the dispatch policy cares about.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}

/// Result type alias using brisk-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
