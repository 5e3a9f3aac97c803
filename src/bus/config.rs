//! # Bus configuration.
//!
//! Provides [`BusConfig`], the settings a bus core is created with.
//!
//! Config is used in two ways:
//! 1. **Explicit buses**: `pair_with(config)`
//! 2. **Filter stages**: `Map` creates its internal bus with a `"map"` label

use std::borrow::Cow;

/// Settings for one bus core.
///
/// ## Field semantics
/// - `label`: name attached to every log record of this bus (no uniqueness required)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusConfig {
    /// Name used in `tracing` fields to tell buses apart.
    pub label: Cow<'static, str>,
}

impl BusConfig {
    /// Creates a config with the given label.
    pub fn labeled(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Default for BusConfig {
    /// Default configuration:
    ///
    /// - `label = "bus"`
    fn default() -> Self {
        Self::labeled("bus")
    }
}
