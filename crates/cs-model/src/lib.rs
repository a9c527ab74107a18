//! # cs-model
//!
//! Data model for the Chainspect permission-resolution pipeline.
//!
//! Everything here is a plain owned value with serde support and no
//! I/O: addresses and their type taxonomy, the recursive [`FieldValue`]
//! tree that discovered contract state lives in, and the three
//! documents the pipeline exchanges (discovered snapshot, curator
//! overrides, resolved permissions).
//!
//! ## Key components
//!
//! - [`Address`] / [`AddressType`] — chain-qualified identity and the
//!   terminal/non-terminal classification that drives traversal
//! - [`FieldValue`] — tagged value tree the path evaluator descends
//! - [`DiscoveredSnapshot`] — read-only snapshot keyed by address
//! - [`OverridesDocument`] — the curator catalogue of permissioned
//!   functions, owner definitions and delay references
//! - [`ResolvedDocument`] — direct and ultimate owners per function,
//!   with via paths and cumulative delays

pub mod address;
pub mod discovered;
pub mod error;
pub mod field_value;
pub mod overrides;
pub mod resolved;

pub use address::{Address, AddressType};
pub use discovered::{DiscoveredDocument, DiscoveredEntry, DiscoveredField, DiscoveredSnapshot};
pub use error::ModelError;
pub use field_value::FieldValue;
pub use overrides::{
    Classification, ContractOverrides, DelayRef, FunctionOverride, OverridesDocument,
    OwnerDefinition, PermissionType, RiskScore, OVERRIDES_VERSION,
};
pub use resolved::{
    format_delay, Provenance, ResolvedContract, ResolvedDocument, ResolvedFunction, UltimateOwner,
    ViaStep, RESOLVED_VERSION,
};
