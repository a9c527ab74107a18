// backend.rs — Driving an external solver end to end.
//
// The backend emits the fact program, hands it to the solver, parses
// the ultimatePermission answers and assembles the same resolved
// document the traversal engine would produce. Routes come back per
// giver contract, so every permissioned function on a contract shares
// that contract's ultimate-owner set; direct owners are still resolved
// per function.

use std::collections::BTreeSet;

use cs_engine::OwnerResolver;
use cs_model::{
    Address, DiscoveredSnapshot, OverridesDocument, Provenance, ResolvedDocument,
    ResolvedFunction,
};

use crate::error::SolverError;
use crate::facts::emit_facts;
use crate::output::{parse_output, route_to_owner};

/// An external declarative solver: takes the fact program, returns
/// its answer set as text.
pub trait LogicSolver {
    fn solve(&self, program: &str) -> Result<String, SolverError>;
}

/// Resolve the whole overrides document through a logic solver.
pub fn resolve_with_solver(
    overrides: &OverridesDocument,
    snapshot: &DiscoveredSnapshot,
    solver: &dyn LogicSolver,
) -> Result<ResolvedDocument, SolverError> {
    let program = emit_facts(overrides, snapshot);
    tracing::debug!(bytes = program.len(), "emitted fact program");
    let answer = solver.solve(&program)?;
    let routes = parse_output(&answer)?;

    let owners = OwnerResolver::new(snapshot);
    let mut document = ResolvedDocument::new(Provenance {
        permission_overrides_version: overrides.version.clone(),
        discovered_json_hash: snapshot.content_hash().to_string(),
    });

    for (contract, function) in overrides.permissioned_functions() {
        let direct = owners.resolve(contract, &function.owner_definitions);

        let mut warnings = Vec::new();
        let mut direct_owners: Vec<Address> = Vec::new();
        for owner in &direct {
            match &owner.address {
                Some(address) => {
                    if !direct_owners.contains(address) {
                        direct_owners.push(address.clone());
                    }
                }
                None => {
                    if let Some(error) = &owner.error {
                        warnings.push(format!(
                            "Failed to resolve owner '{}': {}",
                            owner.source.path, error
                        ));
                    }
                }
            }
        }

        // Same dedup rule as the traversal: terminal plus via
        // sequence, first occurrence wins.
        let mut seen = BTreeSet::new();
        let mut ultimate_owners = Vec::new();
        for route in routes.get(contract).map(Vec::as_slice).unwrap_or(&[]) {
            let owner = route_to_owner(route, snapshot);
            if seen.insert(owner.dedup_key()) {
                ultimate_owners.push(owner);
            }
        }

        let mut unique_warnings = Vec::new();
        for warning in warnings {
            if !unique_warnings.contains(&warning) {
                unique_warnings.push(warning);
            }
        }

        document.push_function(
            contract.clone(),
            ResolvedFunction {
                function_name: function.function_name.clone(),
                direct_owners,
                ultimate_owners,
                warnings: unique_warnings,
            },
        );
    }

    Ok(document)
}
