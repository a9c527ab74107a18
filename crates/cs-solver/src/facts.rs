// facts.rs — Fact emission for the declarative backend.
//
// Instead of walking the graph itself, this backend flattens the
// overrides and snapshot into facts and leaves the transitive closure
// to an external solver:
//
//   permission(Receiver, "type", Giver, Delay, "Description", "Role").
//   address(Id, "chain", "qualified").
//   addressType(Id, eoa|multisig|contract|unknown).
//   canActIndependently(Id).
//
// Identifiers substitute the colon of a qualified address with an
// underscore (`eth:0xab` → `eth_0xab`), keeping them atom-safe.

use std::collections::BTreeSet;

use cs_engine::{DelayResolver, OwnerResolver, PathExpr, Segment};
use cs_model::{Address, AddressType, DiscoveredSnapshot, OverridesDocument, PermissionType};

use crate::error::SolverError;

/// Qualified address → solver identifier.
pub fn solver_id(address: &Address) -> String {
    format!("{}_{}", address.chain(), address.hex())
}

/// Solver identifier → qualified address.
pub fn parse_solver_id(id: &str) -> Result<Address, SolverError> {
    let (chain, hex) = id
        .split_once('_')
        .ok_or_else(|| SolverError::UnknownIdentifier(id.to_string()))?;
    format!("{}:{}", chain, hex)
        .parse()
        .map_err(|_| SolverError::UnknownIdentifier(id.to_string()))
}

/// The four-valued type taxonomy the solver works with.
fn solver_type(address_type: AddressType) -> &'static str {
    match address_type {
        AddressType::Eoa | AddressType::EoaPermissioned => "eoa",
        AddressType::Multisig => "multisig",
        AddressType::Unknown => "unknown",
        _ => "contract",
    }
}

fn permission_name(permission: PermissionType) -> &'static str {
    match permission {
        PermissionType::Member => "member",
        PermissionType::Act => "act",
        PermissionType::Admin => "admin",
        PermissionType::Interact => "interact",
        PermissionType::Upgrade => "upgrade",
        PermissionType::Challenge => "challenge",
        PermissionType::Guard => "guard",
        PermissionType::Propose => "propose",
        PermissionType::Sequence => "sequence",
        PermissionType::Validate => "validate",
        PermissionType::Disperse => "disperse",
        PermissionType::RelayDa => "relayDA",
        PermissionType::OperateLinea => "operateLinea",
        PermissionType::Fastconfirm => "fastconfirm",
        PermissionType::Configure => "configure",
        PermissionType::Whitelist => "whitelist",
    }
}

/// The role a path targets, when it goes through a role table
/// (`$self.accessControl.PAUSER_ROLE.members` → `PAUSER_ROLE`).
fn role_of_path(path: &str) -> String {
    let Ok(expr) = PathExpr::parse(path) else {
        return String::new();
    };
    let mut segments = expr.segments.iter();
    while let Some(segment) = segments.next() {
        let name = match segment {
            Segment::Field(name) => name,
            Segment::Key(key) => key,
        };
        if name == "accessControl" {
            if let Some(role) = segments.next() {
                return match role {
                    Segment::Field(name) => name.clone(),
                    Segment::Key(key) => key.clone(),
                };
            }
        }
    }
    String::new()
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Flatten overrides and snapshot into a fact program.
///
/// Facts are emitted in a stable order: permissions in document order,
/// then the address universe sorted.
pub fn emit_facts(overrides: &OverridesDocument, snapshot: &DiscoveredSnapshot) -> String {
    let owners = OwnerResolver::new(snapshot);
    let delays = DelayResolver::new(snapshot);

    let mut lines = Vec::new();
    let mut universe: BTreeSet<Address> = BTreeSet::new();

    for (contract, function) in overrides.permissioned_functions() {
        universe.insert(contract.clone());

        // The function's own delay, zero when unresolvable.
        let delay = function
            .delay
            .as_ref()
            .and_then(|d| delays.resolve(d).ok())
            .unwrap_or(0);
        let description = function
            .description
            .as_deref()
            .unwrap_or(function.function_name.as_str());

        for owner in owners.resolve(contract, &function.owner_definitions) {
            let Some(address) = &owner.address else {
                tracing::debug!(
                    contract = %contract,
                    path = %owner.source.path,
                    "skipping unresolved owner in fact emission"
                );
                continue;
            };
            universe.insert(address.clone());
            lines.push(format!(
                "permission({}, {}, {}, {}, {}, {}).",
                solver_id(address),
                quote(permission_name(owner.permission_type)),
                solver_id(contract),
                delay,
                quote(description),
                quote(&role_of_path(&owner.source.path)),
            ));
        }
    }

    for address in &universe {
        let address_type = snapshot.address_type_of(address);
        lines.push(format!(
            "address({}, {}, {}).",
            solver_id(address),
            quote(address.chain()),
            quote(&address.to_string()),
        ));
        lines.push(format!(
            "addressType({}, {}).",
            solver_id(address),
            solver_type(address_type),
        ));
        if matches!(address_type, AddressType::Eoa | AddressType::Multisig) {
            lines.push(format!("canActIndependently({}).", solver_id(address)));
        }
    }

    let mut program = lines.join("\n");
    program.push('\n');
    program
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs_model::{
        DiscoveredDocument, DiscoveredEntry, FieldValue, FunctionOverride, OwnerDefinition,
    };

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn solver_id_round_trip() {
        let address = addr("eth:0xab12");
        let id = solver_id(&address);
        assert_eq!(id, "eth_0xab12");
        assert_eq!(parse_solver_id(&id).unwrap(), address);
    }

    #[test]
    fn parse_rejects_garbage_ids() {
        assert!(parse_solver_id("noseparator").is_err());
        assert!(parse_solver_id("eth_nothex").is_err());
    }

    #[test]
    fn role_extracted_from_access_control_paths() {
        assert_eq!(
            role_of_path("$self.accessControl.PAUSER_ROLE.members"),
            "PAUSER_ROLE"
        );
        assert_eq!(
            role_of_path("$self.accessControl[DEFAULT_ADMIN_ROLE]"),
            "DEFAULT_ADMIN_ROLE"
        );
        assert_eq!(role_of_path("$self.owner"), "");
        assert_eq!(role_of_path("not a path"), "");
    }

    #[test]
    fn emits_permission_and_universe_facts() {
        let snap = DiscoveredSnapshot::new(
            DiscoveredDocument {
                entries: vec![
                    DiscoveredEntry::new(addr("eth:0xc0"), AddressType::Contract).with_field(
                        "admin",
                        FieldValue::address(addr("eth:0xe1"), AddressType::Eoa),
                    ),
                    DiscoveredEntry::new(addr("eth:0xe1"), AddressType::Eoa),
                ],
            },
            "0".repeat(16),
        )
        .unwrap();
        let mut overrides = OverridesDocument::new();
        overrides.upsert_function(
            addr("eth:0xc0"),
            FunctionOverride::permissioned("changeAdmin")
                .with_owner(OwnerDefinition::new("$self.admin")),
        );

        let program = emit_facts(&overrides, &snap);
        assert!(program.contains(
            "permission(eth_0xe1, \"act\", eth_0xc0, 0, \"changeAdmin\", \"\")."
        ));
        assert!(program.contains("address(eth_0xe1, \"eth\", \"eth:0xe1\")."));
        assert!(program.contains("addressType(eth_0xe1, eoa)."));
        assert!(program.contains("addressType(eth_0xc0, contract)."));
        assert!(program.contains("canActIndependently(eth_0xe1)."));
        assert!(!program.contains("canActIndependently(eth_0xc0)."));
    }

    #[test]
    fn function_delay_lands_in_permission_fact() {
        let snap = DiscoveredSnapshot::new(
            DiscoveredDocument {
                entries: vec![DiscoveredEntry::new(addr("eth:0xaa"), AddressType::Timelock)
                    .with_field("minDelay", FieldValue::number("3600"))
                    .with_field(
                        "admin",
                        FieldValue::address(addr("eth:0xbb"), AddressType::Multisig),
                    )],
            },
            "0".repeat(16),
        )
        .unwrap();
        let mut overrides = OverridesDocument::new();
        overrides.upsert_function(
            addr("eth:0xaa"),
            FunctionOverride::permissioned("execute")
                .with_owner(OwnerDefinition::new("$self.admin"))
                .with_delay(cs_model::DelayRef {
                    contract_address: addr("eth:0xaa"),
                    field_name: "minDelay".to_string(),
                }),
        );

        let program = emit_facts(&overrides, &snap);
        assert!(program
            .contains("permission(eth_0xbb, \"act\", eth_0xaa, 3600, \"execute\", \"\")."));
    }
}
