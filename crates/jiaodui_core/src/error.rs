//! Engine error types.

use thiserror::Error;

use jiaodui_rules::CorpusError;

/// Errors that can occur while building or running the engine.
///
/// Rule evaluation failures are not errors at this level: the engine
/// isolates them and reports them as [`crate::RuleFailure`]s.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Corpus loading error.
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),
}

impl EngineError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
