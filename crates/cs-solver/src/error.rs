// error.rs — Error types for the solver backend.

use thiserror::Error;

/// Errors raised while talking to an external logic solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The external solver refused or crashed.
    #[error("solver failed: {0}")]
    SolverFailed(String),

    /// A line in the solver output did not parse as a known fact.
    #[error("malformed solver fact: {0}")]
    MalformedFact(String),

    /// An identifier in the output did not map back to an address.
    #[error("unknown identifier in solver output: {0}")]
    UnknownIdentifier(String),
}
