//! # cs-store
//!
//! File-backed stores for the Chainspect pipeline.
//!
//! Each project directory holds three JSON documents:
//!
//! - `discovered.json` — the read-only snapshot of on-chain state,
//!   loaded through [`DiscoveredStore`] with mtime memoization and a
//!   16-hex provenance hash
//! - `permission-overrides.json` — the curator catalogue, read and
//!   written through [`OverridesStore`] (legacy flat-array files are
//!   migrated on load)
//! - `resolved-permissions.json` — resolution output, written
//!   atomically through [`ResolvedStore`]
//!
//! Store failures are structural: they abort a resolution run rather
//! than degrade it.

pub mod discovered;
pub mod error;
pub mod hash;
pub mod overrides;
pub mod resolved;

pub use discovered::{DiscoveredStore, DISCOVERED_FILE};
pub use error::StoreError;
pub use overrides::{OverridesStore, OVERRIDES_FILE};
pub use resolved::{ResolvedStore, RESOLVED_FILE};
