//! Error types for filter construction.
//!
//! The bus itself is infallible: `register`, `emit` and `end` never fail.
//! Only building filters from runtime parameters can go wrong, which is what
//! [`BuildError`] describes.
//!
//! Like every error here it provides `as_label` / `as_message` helpers for
//! logs and metrics.

use thiserror::Error;

use crate::filters::ParamKind;

/// # Errors produced while building filters and pipelines.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Argument count or kinds differ from the builder's signature.
    #[error(
        "parameter mismatch for '{filter}': got ({}), expected ({})",
        join_kinds(.got),
        join_kinds(.expected)
    )]
    ParamMismatch {
        /// Name of the filter being built.
        filter: String,
        /// Kinds the builder accepts, in order.
        expected: Vec<ParamKind>,
        /// Kinds actually supplied, in order.
        got: Vec<ParamKind>,
    },

    /// Argument has the right kind but an unusable value.
    #[error("invalid argument #{index} for '{filter}': {reason}")]
    InvalidArgument {
        /// Name of the filter being built.
        filter: String,
        /// Zero-based argument position.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// No builder registered under this name.
    #[error("unknown filter '{name}'")]
    UnknownFilter {
        /// The requested name.
        name: String,
    },

    /// A pipeline needs at least one stage.
    #[error("pipeline has no stages")]
    EmptyPipeline,
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use voyeur::BuildError;
    ///
    /// let err = BuildError::UnknownFilter { name: "nope".into() };
    /// assert_eq!(err.as_label(), "build_unknown_filter");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::ParamMismatch { .. } => "build_param_mismatch",
            BuildError::InvalidArgument { .. } => "build_invalid_argument",
            BuildError::UnknownFilter { .. } => "build_unknown_filter",
            BuildError::EmptyPipeline => "build_empty_pipeline",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BuildError::ParamMismatch {
                filter,
                expected,
                got,
            } => format!(
                "{filter}: expected {} argument(s) ({}), got {} ({})",
                expected.len(),
                join_kinds(expected),
                got.len(),
                join_kinds(got)
            ),
            BuildError::InvalidArgument {
                filter,
                index,
                reason,
            } => format!("{filter}: argument #{index}: {reason}"),
            BuildError::UnknownFilter { name } => format!("no filter named {name:?}"),
            BuildError::EmptyPipeline => "no stages".to_string(),
        }
    }
}

fn join_kinds(kinds: &[ParamKind]) -> String {
    kinds
        .iter()
        .map(ParamKind::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
