//! Error types for the simulation core.
//!
//! Only world generation is fatal. Every other variant is recovered locally
//! by the caller and reported through `tracing`.

use thiserror::Error;

/// Failure of a decision policy to produce a well-formed action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("observation has {got} channels, policy expects {expected}")]
    InputSize { expected: usize, got: usize },

    #[error("policy produced {got} outputs, expected {expected}")]
    OutputSize { expected: usize, got: usize },

    #[error("policy produced a non-finite output at index {index}")]
    NonFinite { index: usize },

    #[error("policy panicked: {0}")]
    Panicked(String),
}

#[derive(Error, Debug)]
pub enum SimError {
    /// Invalid seed or dimension input. Fatal at startup.
    #[error("World generation failed: {0}")]
    WorldGeneration(String),

    /// No eligible terrain for a spawn. The spawn is skipped.
    #[error("No valid spawn location for {what}")]
    NoValidSpawnLocation { what: &'static str },

    #[error("Policy evaluation failed: {0}")]
    PolicyEvaluation(#[from] PolicyError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Snapshot rejected on restore. The world keeps its prior state.
    #[error("Snapshot rejected: {0}")]
    Snapshot(String),
}

impl SimError {
    #[must_use]
    pub fn world_generation<S: Into<String>>(msg: S) -> Self {
        Self::WorldGeneration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
