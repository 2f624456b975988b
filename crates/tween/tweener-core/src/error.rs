//! Error types for the configuration and loading surface.
//!
//! The tick path never fails; only building animations from serialized
//! descriptions or raw JSON can.

use thiserror::Error;

/// Errors produced while loading or validating tween configuration.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum TweenError {
    /// Durations must be strictly positive and finite.
    #[error("invalid duration: {time} (must be > 0)")]
    InvalidDuration { time: f64 },

    /// A transition without numeric keys has nothing to interpolate.
    #[error("include list is empty")]
    EmptyInclude,

    /// Animatable state must be a JSON object.
    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    /// An easing name that matches no preset.
    #[error("unknown easing '{name}'")]
    UnknownEasing { name: String },

    /// JSON parse/shape error.
    #[error("json error: {reason}")]
    Json { reason: String },
}

impl TweenError {
    /// Coarse category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. } | Self::EmptyInclude | Self::UnknownEasing { .. } => {
                "validation"
            }
            Self::NotAnObject { .. } | Self::Json { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for TweenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}
