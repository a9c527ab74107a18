// error.rs — Error types for the data model.

use thiserror::Error;

/// Errors that can occur while constructing model values.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An address string did not parse as `<chain>:<hex>`.
    #[error("malformed address '{0}': expected <chain>:<0x-hex>")]
    MalformedAddress(String),

    /// A snapshot contained the same address twice.
    #[error("duplicate address in snapshot: {0}")]
    DuplicateAddress(String),
}
