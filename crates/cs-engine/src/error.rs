// error.rs — Error types for the resolution engine.
//
// Engine errors are local by policy: a path error downgrades one owner
// definition to an unresolved record, a delay error downgrades one
// traversal step to zero delay. Neither aborts the run; both surface
// as warnings on the enclosing function.

use cs_model::Address;
use thiserror::Error;

/// Failures while evaluating a single path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The expression does not match the path grammar.
    #[error("malformed path '{0}'")]
    MalformedPath(String),

    /// The root (or re-rooted) contract is not in the snapshot.
    #[error("unknown contract {0}")]
    UnknownContract(Address),

    /// A segment named a field the current node does not have.
    #[error("unknown field '{field}' on {contract}")]
    UnknownField { contract: Address, field: String },

    /// An array index was out of bounds.
    #[error("index {index} out of range (array length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A node had the wrong shape for the requested step.
    #[error("type mismatch at '{at}': {reason}")]
    TypeMismatch { at: String, reason: String },
}

/// Failures while resolving a delay reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelayError {
    /// The referenced contract is not in the snapshot.
    #[error("delay contract {0} not in snapshot")]
    DelayContractMissing(Address),

    /// The referenced contract has no field of that name.
    #[error("delay field '{field}' not found on {contract}")]
    DelayFieldMissing { contract: Address, field: String },

    /// The referenced field is not a number.
    #[error("delay field '{field}' on {contract} is not numeric")]
    DelayNotNumeric { contract: Address, field: String },

    /// The referenced field parsed to a negative value.
    #[error("delay field '{field}' on {contract} is negative")]
    DelayNegative { contract: Address, field: String },
}
