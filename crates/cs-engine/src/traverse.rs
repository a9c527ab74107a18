// traverse.rs — The traversal engine.
//
// For every permissioned function, resolve its direct owners, then
// run a branching DFS from each one until a terminal principal (EOA,
// multisig, unknown address) or an un-annotated intermediate is
// reached. Each branch carries its own path, via sequence and delay
// stack, copied on descent, so parallel branches can revisit the same
// address; routes that converge on the same terminal by the same via
// sequence are deduplicated afterwards.
//
// Edge transitivity: an owner definition tagged with an explicit
// permission type is only followed if that type is `act`. Untyped
// edges follow the node rule — terminal address types stop, contracts
// continue into their own owners.
//
// Delays are resolved on the giver node (the contract being traversed
// through): the step delay is the max across its delay refs, failed
// refs count as zero and leave one warning on the enclosing function.

use std::collections::BTreeSet;

use cs_model::{
    Address, DiscoveredSnapshot, FunctionOverride, OverridesDocument, Provenance,
    ResolvedDocument, ResolvedFunction, UltimateOwner, ViaStep,
};

use crate::delay::DelayResolver;
use crate::graph::{GraphNode, OwnershipGraph};
use crate::owners::{DirectOwner, OwnerResolver};

/// Resolve every permissioned function in the overrides document.
///
/// Pure apart from logging: the result is a function of the two
/// inputs, stamped with their provenance.
pub fn resolve_permissions(
    overrides: &OverridesDocument,
    snapshot: &DiscoveredSnapshot,
) -> ResolvedDocument {
    let engine = TraversalEngine::new(overrides, snapshot);
    let mut document = ResolvedDocument::new(Provenance {
        permission_overrides_version: overrides.version.clone(),
        discovered_json_hash: snapshot.content_hash().to_string(),
    });

    let mut functions = 0usize;
    for (contract, contract_overrides) in &overrides.contracts {
        for function in contract_overrides
            .functions
            .iter()
            .filter(|f| f.is_permissioned())
        {
            let resolved = engine.resolve_function(contract, function);
            document.push_function(contract.clone(), resolved);
            functions += 1;
        }
    }

    tracing::info!(
        contracts = document.contracts.len(),
        functions,
        discovered_hash = snapshot.content_hash(),
        "resolved permissions"
    );
    document
}

/// The DFS over the ownership graph.
pub struct TraversalEngine<'a> {
    snapshot: &'a DiscoveredSnapshot,
    graph: OwnershipGraph,
    owners: OwnerResolver<'a>,
    delays: DelayResolver<'a>,
}

impl<'a> TraversalEngine<'a> {
    pub fn new(overrides: &OverridesDocument, snapshot: &'a DiscoveredSnapshot) -> Self {
        Self {
            snapshot,
            graph: OwnershipGraph::build(overrides),
            owners: OwnerResolver::new(snapshot),
            delays: DelayResolver::new(snapshot),
        }
    }

    /// Resolve one function: direct owners, then the trace from each.
    pub fn resolve_function(
        &self,
        contract: &Address,
        function: &FunctionOverride,
    ) -> ResolvedFunction {
        let direct = self.owners.resolve(contract, &function.owner_definitions);

        let mut warnings = Vec::new();
        let mut direct_owners: Vec<Address> = Vec::new();
        for owner in &direct {
            match &owner.address {
                Some(address) => {
                    if !direct_owners.contains(address) {
                        direct_owners.push(address.clone());
                    }
                }
                None => push_unresolved_warning(&mut warnings, owner),
            }
        }

        let mut collected = Vec::new();
        // The origin contract seeds the path so self-ownership and
        // mutual cycles report from the contract itself.
        let origin = [contract.clone()];
        for address in &direct_owners {
            self.trace(address, &origin, &[], &[], &mut collected, &mut warnings);
        }

        let mut seen = BTreeSet::new();
        let mut ultimate_owners = Vec::new();
        for owner in collected {
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

        tracing::debug!(
            contract = %contract,
            function = %function.function_name,
            direct = direct_owners.len(),
            ultimate = ultimate_owners.len(),
            warnings = unique_warnings.len(),
            "resolved function"
        );

        ResolvedFunction {
            function_name: function.function_name.clone(),
            direct_owners,
            ultimate_owners,
            warnings: unique_warnings,
        }
    }

    /// One DFS step. `path` is the addresses already on this branch
    /// (origin contract first), `via` and `delays` the route so far.
    fn trace(
        &self,
        current: &Address,
        path: &[Address],
        via: &[ViaStep],
        delays: &[u64],
        out: &mut Vec<UltimateOwner>,
        warnings: &mut Vec<String>,
    ) {
        if let Some(first) = path.iter().position(|a| a == current) {
            let mut chain: Vec<String> = path[first..].iter().map(ToString::to_string).collect();
            chain.push(current.to_string());
            warnings.push(format!("Cycle detected: {}", chain.join(" → ")));
            return;
        }

        let address_type = self.snapshot.address_type_of(current);
        if address_type.is_terminal() {
            out.push(UltimateOwner::new(
                current.clone(),
                address_type,
                via.to_vec(),
                delays.to_vec(),
            ));
            return;
        }

        // A contract nobody curated, or curated without owners, is
        // where the chain bottoms out.
        let node = self
            .graph
            .node(current)
            .filter(|n| !n.owner_definitions.is_empty());
        let Some(node) = node else {
            out.push(UltimateOwner::new(
                current.clone(),
                address_type,
                via.to_vec(),
                delays.to_vec(),
            ));
            return;
        };

        let step_delay = self.step_delay(node, warnings);

        let mut next_path = path.to_vec();
        next_path.push(current.clone());
        let mut next_via = via.to_vec();
        next_via.push(ViaStep::new(
            current.clone(),
            address_type,
            (step_delay > 0).then_some(step_delay),
        ));
        let mut next_delays = delays.to_vec();
        if step_delay > 0 {
            next_delays.push(step_delay);
        }

        for owner in self.owners.resolve(current, &node.owner_definitions) {
            let Some(address) = &owner.address else {
                push_unresolved_warning(warnings, &owner);
                continue;
            };
            if let Some(tag) = owner.source.permission_type {
                if !tag.is_transitive() {
                    tracing::debug!(
                        giver = %current,
                        owner = %address,
                        permission = ?tag,
                        "non-transitive edge; branch ends"
                    );
                    continue;
                }
            }
            self.trace(address, &next_path, &next_via, &next_delays, out, warnings);
        }
    }

    /// Worst-case delay imposed by a giver node: the max across its
    /// delay refs. Failed refs contribute zero and one warning.
    fn step_delay(&self, node: &GraphNode, warnings: &mut Vec<String>) -> u64 {
        let mut step_delay = 0u64;
        for delay_ref in &node.delay_refs {
            match self.delays.resolve(delay_ref) {
                Ok(seconds) => step_delay = step_delay.max(seconds),
                Err(error) => warnings.push(format!(
                    "Failed to resolve delay {}.{}: {}",
                    delay_ref.contract_address, delay_ref.field_name, error
                )),
            }
        }
        step_delay
    }
}

fn push_unresolved_warning(warnings: &mut Vec<String>, owner: &DirectOwner) {
    let reason = owner
        .error
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "no addresses produced".to_string());
    warnings.push(format!(
        "Failed to resolve owner '{}': {}",
        owner.source.path, reason
    ));
}
