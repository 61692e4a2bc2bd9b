//! Error types for the tracer core.

use thiserror::Error;

/// Errors raised while building scene objects or doing vector math.
///
/// None of these are retried internally: they describe programmer or input
/// mistakes and surface at the call that produced them. A ray that hits
/// nothing is not an error and is reported through `Option` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid geometric parameters (radius, height, degenerate point sets).
    #[error("invalid geometry: {0}")]
    Construction(String),

    /// An operation produced, or was asked to work on, a zero vector.
    #[error("degenerate computation: {0}")]
    DegenerateComputation(&'static str),

    /// Camera builder invoked with missing or invalid settings.
    #[error("invalid camera configuration: {0}")]
    Configuration(String),
}

impl Error {
    pub(crate) fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;
