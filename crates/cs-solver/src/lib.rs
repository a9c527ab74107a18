//! # cs-solver
//!
//! Optional declarative backend for permission resolution.
//!
//! Where the traversal engine walks the ownership graph itself, this
//! backend flattens the inputs into `permission/6`, `address/3`,
//! `addressType/2` and `canActIndependently/1` facts, hands them to an
//! external [`LogicSolver`], and maps the returned
//! `ultimatePermission/10` facts onto the same resolved-document shape
//! (including the terminal-plus-via deduplication rule).
//!
//! Backend choice is the caller's: the CLI exposes it as
//! `--backend solver`.

pub mod backend;
pub mod error;
pub mod facts;
pub mod output;

pub use backend::{resolve_with_solver, LogicSolver};
pub use error::SolverError;
pub use facts::{emit_facts, parse_solver_id, solver_id};
pub use output::{parse_output, SolverRoute};
