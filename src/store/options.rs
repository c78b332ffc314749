//! Behavior switches for the store

use serde::{Deserialize, Serialize};

use super::latency::LatencyProfile;

/// How much the store checks its inputs
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Accept everything, including dangling foreign keys
    #[default]
    Passthrough,
    /// Reject blank fields and references to records that do not exist
    Strict,
}

impl ValidationMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, ValidationMode::Strict)
    }
}

/// What `send_message` does with the prior messages a caller passes in
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    /// Ignore them; the store's own history is authoritative
    #[default]
    Stored,
    /// A non-empty caller list replaces the stored history before appending
    CallerSupplied,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub latency: LatencyProfile,
    pub validation: ValidationMode,
    pub history: HistoryMode,
}

impl StoreOptions {
    /// No delays, reference behavior otherwise
    pub fn immediate() -> Self {
        Self {
            latency: LatencyProfile::none(),
            ..Self::default()
        }
    }

    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_history(mut self, history: HistoryMode) -> Self {
        self.history = history;
        self
    }

    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }
}
