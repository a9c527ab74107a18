// graph.rs — The ownership graph.
//
// A read-only projection of the overrides catalogue: per contract, the
// concatenation of owner definitions across its permissioned functions
// and the distinct delay references across them. Non-permissioned
// functions contribute nothing. Contracts whose functions are all
// non-permissioned keep an empty node, which distinguishes "curated
// but unowned" from "never curated".
//
// The graph owns its data; it holds no references into the overrides
// document past construction and is shareable during traversal.

use std::collections::{BTreeMap, BTreeSet};

use cs_model::{Address, DelayRef, OverridesDocument, OwnerDefinition};

/// One contract's aggregated ownership data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphNode {
    pub owner_definitions: Vec<OwnerDefinition>,
    pub delay_refs: Vec<DelayRef>,
}

/// Contract address → aggregated owner definitions and delay refs.
#[derive(Debug, Clone, Default)]
pub struct OwnershipGraph {
    nodes: BTreeMap<Address, GraphNode>,
}

impl OwnershipGraph {
    /// Build the graph in a single pass over the overrides document.
    pub fn build(overrides: &OverridesDocument) -> Self {
        let mut nodes = BTreeMap::new();
        for (address, contract) in &overrides.contracts {
            let mut node = GraphNode::default();
            let mut seen_delays = BTreeSet::new();
            for function in contract.functions.iter().filter(|f| f.is_permissioned()) {
                node.owner_definitions
                    .extend(function.owner_definitions.iter().cloned());
                if let Some(delay) = &function.delay {
                    if seen_delays.insert(delay.clone()) {
                        node.delay_refs.push(delay.clone());
                    }
                }
            }
            nodes.insert(address.clone(), node);
        }
        tracing::debug!(contracts = nodes.len(), "built ownership graph");
        Self { nodes }
    }

    pub fn node(&self, address: &Address) -> Option<&GraphNode> {
        self.nodes.get(address)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_model::FunctionOverride;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn delay_ref(contract: &str, field: &str) -> DelayRef {
        DelayRef {
            contract_address: addr(contract),
            field_name: field.to_string(),
        }
    }

    #[test]
    fn concatenates_definitions_across_permissioned_functions() {
        let mut doc = OverridesDocument::new();
        doc.upsert_function(
            addr("eth:0xaa"),
            FunctionOverride::permissioned("schedule")
                .with_owner(OwnerDefinition::new("$self.admin")),
        );
        doc.upsert_function(
            addr("eth:0xaa"),
            FunctionOverride::permissioned("execute")
                .with_owner(OwnerDefinition::new("$self.admin"))
                .with_owner(OwnerDefinition::new("$self.proposer")),
        );

        let graph = OwnershipGraph::build(&doc);
        let node = graph.node(&addr("eth:0xaa")).unwrap();
        let paths: Vec<_> = node
            .owner_definitions
            .iter()
            .map(|d| d.path.as_str())
            .collect();
        // Concatenation, not a set: repeated definitions survive.
        assert_eq!(paths, vec!["$self.admin", "$self.admin", "$self.proposer"]);
    }

    #[test]
    fn non_permissioned_functions_are_ignored() {
        let mut doc = OverridesDocument::new();
        doc.upsert_function(
            addr("eth:0xc0"),
            FunctionOverride::non_permissioned("balanceOf")
                .with_owner(OwnerDefinition::new("$self.admin")),
        );

        let graph = OwnershipGraph::build(&doc);
        let node = graph.node(&addr("eth:0xc0")).unwrap();
        assert!(node.owner_definitions.is_empty());
        assert!(node.delay_refs.is_empty());
    }

    #[test]
    fn curated_contract_keeps_empty_node() {
        let mut doc = OverridesDocument::new();
        doc.upsert_function(
            addr("eth:0xc0"),
            FunctionOverride::non_permissioned("balanceOf"),
        );

        let graph = OwnershipGraph::build(&doc);
        // Present-but-empty is different from absent.
        assert!(graph.node(&addr("eth:0xc0")).is_some());
        assert!(graph.node(&addr("eth:0xdead")).is_none());
    }

    #[test]
    fn delay_refs_are_distinct() {
        let mut doc = OverridesDocument::new();
        doc.upsert_function(
            addr("eth:0xaa"),
            FunctionOverride::permissioned("schedule")
                .with_delay(delay_ref("eth:0xaa", "minDelay")),
        );
        doc.upsert_function(
            addr("eth:0xaa"),
            FunctionOverride::permissioned("execute")
                .with_delay(delay_ref("eth:0xaa", "minDelay")),
        );
        doc.upsert_function(
            addr("eth:0xaa"),
            FunctionOverride::permissioned("veto")
                .with_delay(delay_ref("eth:0xaa", "vetoDelay")),
        );

        let graph = OwnershipGraph::build(&doc);
        let node = graph.node(&addr("eth:0xaa")).unwrap();
        assert_eq!(node.delay_refs.len(), 2);
    }
}
