// owners.rs — Direct-owner resolution.
//
// Turns a function's ordered owner definitions into direct-owner
// records. A definition that fails to evaluate yields exactly one
// unresolved record carrying the error; a definition that evaluates
// yields one record per produced address, each tagged with the
// effective permission type (the curator's explicit tag, or the
// default inferred from the owner's address type).

use cs_model::{Address, DiscoveredSnapshot, FieldValue, OwnerDefinition, PermissionType};

use crate::error::PathError;
use crate::eval::PathEvaluator;

/// Placeholder shown in place of an address when resolution failed.
pub const RESOLUTION_FAILED: &str = "RESOLUTION_FAILED";

/// One resolved (or failed) direct owner of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectOwner {
    /// The owner's address; `None` when resolution failed.
    pub address: Option<Address>,
    /// The definition this record came from.
    pub source: OwnerDefinition,
    /// Effective permission type (explicit or defaulted). Meaningless
    /// for unresolved records.
    pub permission_type: PermissionType,
    /// Preserved structured value, when the path ended in an object.
    pub structured: Option<FieldValue>,
    /// Why resolution failed, when it did.
    pub error: Option<PathError>,
}

impl DirectOwner {
    pub fn is_resolved(&self) -> bool {
        self.address.is_some()
    }

    /// The address string, or the failure placeholder.
    pub fn display_address(&self) -> String {
        match &self.address {
            Some(address) => address.to_string(),
            None => RESOLUTION_FAILED.to_string(),
        }
    }
}

/// Resolves owner definitions against one snapshot.
pub struct OwnerResolver<'a> {
    snapshot: &'a DiscoveredSnapshot,
    evaluator: PathEvaluator<'a>,
}

impl<'a> OwnerResolver<'a> {
    pub fn new(snapshot: &'a DiscoveredSnapshot) -> Self {
        Self {
            snapshot,
            evaluator: PathEvaluator::new(snapshot),
        }
    }

    /// Resolve every definition in order; output order follows input
    /// order. Addresses repeated within one definition's result are
    /// deduplicated here.
    pub fn resolve(
        &self,
        contract: &Address,
        definitions: &[OwnerDefinition],
    ) -> Vec<DirectOwner> {
        let mut owners = Vec::new();
        for definition in definitions {
            match self.evaluator.evaluate_str(&definition.path, contract) {
                Err(error) => {
                    tracing::debug!(
                        contract = %contract,
                        path = %definition.path,
                        %error,
                        "owner definition failed to resolve"
                    );
                    owners.push(DirectOwner {
                        address: None,
                        source: definition.clone(),
                        permission_type: definition
                            .permission_type
                            .unwrap_or(PermissionType::Act),
                        structured: None,
                        error: Some(error),
                    });
                }
                Ok(resolution) => {
                    let mut seen = Vec::new();
                    for address in resolution.addresses {
                        if seen.contains(&address) {
                            continue;
                        }
                        seen.push(address.clone());
                        let owner_type = self.snapshot.address_type_of(&address);
                        owners.push(DirectOwner {
                            permission_type: definition
                                .permission_type
                                .unwrap_or_else(|| PermissionType::default_for(owner_type)),
                            address: Some(address),
                            source: definition.clone(),
                            structured: resolution.structured.clone(),
                            error: None,
                        });
                    }
                }
            }
        }
        owners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_model::{AddressType, DiscoveredDocument, DiscoveredEntry};

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    fn snapshot() -> DiscoveredSnapshot {
        let entries = vec![
            DiscoveredEntry::new(addr("eth:0xc0"), AddressType::Contract)
                .with_field(
                    "admin",
                    FieldValue::address(addr("eth:0xe1"), AddressType::Eoa),
                )
                .with_field(
                    "timelock",
                    FieldValue::address(addr("eth:0xaa"), AddressType::Timelock),
                )
                .with_field(
                    "role",
                    FieldValue::object([(
                        "members".to_string(),
                        FieldValue::array(vec![
                            FieldValue::address(addr("eth:0xe2"), AddressType::Eoa),
                            FieldValue::address(addr("eth:0xe2"), AddressType::Eoa),
                            FieldValue::address(addr("eth:0xe3"), AddressType::Eoa),
                        ]),
                    )]),
                ),
            DiscoveredEntry::new(addr("eth:0xaa"), AddressType::Timelock),
        ];
        DiscoveredSnapshot::new(DiscoveredDocument { entries }, "0".repeat(16)).unwrap()
    }

    #[test]
    fn single_address_yields_one_record() {
        let snap = snapshot();
        let resolver = OwnerResolver::new(&snap);
        let owners = resolver.resolve(
            &addr("eth:0xc0"),
            &[OwnerDefinition::new("$self.admin")],
        );
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].address, Some(addr("eth:0xe1")));
        assert!(owners[0].is_resolved());
        assert!(owners[0].error.is_none());
    }

    #[test]
    fn failure_yields_placeholder_record() {
        let snap = snapshot();
        let resolver = OwnerResolver::new(&snap);
        let owners = resolver.resolve(
            &addr("eth:0xc0"),
            &[OwnerDefinition::new("$self.nonexistent")],
        );
        assert_eq!(owners.len(), 1);
        assert!(!owners[0].is_resolved());
        assert_eq!(owners[0].display_address(), RESOLUTION_FAILED);
        assert!(matches!(
            owners[0].error,
            Some(PathError::UnknownField { .. })
        ));
    }

    #[test]
    fn failure_does_not_stop_later_definitions() {
        let snap = snapshot();
        let resolver = OwnerResolver::new(&snap);
        let owners = resolver.resolve(
            &addr("eth:0xc0"),
            &[
                OwnerDefinition::new("$self.nonexistent"),
                OwnerDefinition::new("$self.admin"),
            ],
        );
        assert_eq!(owners.len(), 2);
        assert!(!owners[0].is_resolved());
        assert_eq!(owners[1].address, Some(addr("eth:0xe1")));
    }

    #[test]
    fn multi_address_result_dedups_and_attaches_structure() {
        let snap = snapshot();
        let resolver = OwnerResolver::new(&snap);
        let owners = resolver.resolve(&addr("eth:0xc0"), &[OwnerDefinition::new("$self.role")]);
        // 0xe2 appears twice in the members array but once here.
        assert_eq!(owners.len(), 2);
        assert_eq!(owners[0].address, Some(addr("eth:0xe2")));
        assert_eq!(owners[1].address, Some(addr("eth:0xe3")));
        assert!(owners.iter().all(|o| o.structured.is_some()));
    }

    #[test]
    fn permission_type_defaults_from_owner_type() {
        let snap = snapshot();
        let resolver = OwnerResolver::new(&snap);

        let eoa = resolver.resolve(&addr("eth:0xc0"), &[OwnerDefinition::new("$self.admin")]);
        assert_eq!(eoa[0].permission_type, PermissionType::Act);

        let timelock =
            resolver.resolve(&addr("eth:0xc0"), &[OwnerDefinition::new("$self.timelock")]);
        assert_eq!(timelock[0].permission_type, PermissionType::Admin);
    }

    #[test]
    fn explicit_permission_type_wins() {
        let snap = snapshot();
        let resolver = OwnerResolver::new(&snap);
        let owners = resolver.resolve(
            &addr("eth:0xc0"),
            &[OwnerDefinition::new("$self.timelock").with_permission(PermissionType::Act)],
        );
        assert_eq!(owners[0].permission_type, PermissionType::Act);
    }
}
