// overrides.rs — The curator-authored permission catalogue.
//
// Curators classify each discovered function as permissioned or not,
// and for permissioned ones declare who holds the permission (path
// expressions into the snapshot) and where the function's time-delay
// lives (a delay reference). The overrides document is the write-side
// of the curation workflow and the sole input to the ownership graph.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressType};

/// Permission tags a curator can attach to an owner definition.
///
/// Only `act` chains transitively during traversal; every other tag is
/// an administrative or role-specific edge that does not confer the
/// ability to act as the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionType {
    Member,
    Act,
    Admin,
    Interact,
    Upgrade,
    Challenge,
    Guard,
    Propose,
    Sequence,
    Validate,
    Disperse,
    #[serde(rename = "relayDA")]
    RelayDa,
    #[serde(rename = "operateLinea")]
    OperateLinea,
    Fastconfirm,
    Configure,
    Whitelist,
}

impl PermissionType {
    /// True if an edge of this type is followed through intermediates.
    pub fn is_transitive(&self) -> bool {
        matches!(self, PermissionType::Act)
    }

    /// The default tag when a curator left it out, inferred from the
    /// resolved owner's type. Principals that can act independently
    /// (and addresses we know nothing about) default to `act`;
    /// contracts default to `admin`.
    pub fn default_for(owner_type: AddressType) -> Self {
        match owner_type {
            AddressType::Eoa
            | AddressType::EoaPermissioned
            | AddressType::Multisig
            | AddressType::Unknown => PermissionType::Act,
            _ => PermissionType::Admin,
        }
    }
}

/// One declared owner of a permissioned function: a path expression
/// plus an optional permission tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerDefinition {
    pub path: String,
    #[serde(
        rename = "permissionType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub permission_type: Option<PermissionType>,
}

impl OwnerDefinition {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            permission_type: None,
        }
    }

    pub fn with_permission(mut self, permission_type: PermissionType) -> Self {
        self.permission_type = Some(permission_type);
        self
    }
}

/// Where a function's time-delay lives: a numeric field on a contract,
/// read from the snapshot at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayRef {
    pub contract_address: Address,
    pub field_name: String,
}

/// Curator classification of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Permissioned,
    NonPermissioned,
}

/// Curator risk assessment of a permissioned function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskScore {
    Unscored,
    LowRisk,
    MediumRisk,
    HighRisk,
    Critical,
}

/// The full curator record for one function on one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOverride {
    pub function_name: String,
    pub user_classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<RiskScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_definitions: Vec<OwnerDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<DelayRef>,
    pub timestamp: DateTime<Utc>,
}

impl FunctionOverride {
    pub fn permissioned(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            user_classification: Classification::Permissioned,
            checked: None,
            score: None,
            description: None,
            reason: None,
            owner_definitions: Vec::new(),
            delay: None,
            timestamp: Utc::now(),
        }
    }

    pub fn non_permissioned(function_name: impl Into<String>) -> Self {
        Self {
            user_classification: Classification::NonPermissioned,
            ..Self::permissioned(function_name)
        }
    }

    pub fn with_owner(mut self, definition: OwnerDefinition) -> Self {
        self.owner_definitions.push(definition);
        self
    }

    pub fn with_delay(mut self, delay: DelayRef) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn is_permissioned(&self) -> bool {
        self.user_classification == Classification::Permissioned
    }
}

/// All overrides for one contract.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContractOverrides {
    #[serde(default)]
    pub functions: Vec<FunctionOverride>,
}

/// The on-disk overrides document: contracts mapped to their function
/// overrides. A (contract, functionName) pair appears at most once;
/// `upsert_function` replaces in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverridesDocument {
    pub version: String,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub contracts: BTreeMap<Address, ContractOverrides>,
}

pub const OVERRIDES_VERSION: &str = "1.0";

impl OverridesDocument {
    pub fn new() -> Self {
        Self {
            version: OVERRIDES_VERSION.to_string(),
            last_modified: Utc::now(),
            contracts: BTreeMap::new(),
        }
    }

    /// Insert or replace the override for (contract, functionName).
    pub fn upsert_function(&mut self, contract: Address, function: FunctionOverride) {
        let entry = self.contracts.entry(contract).or_default();
        match entry
            .functions
            .iter_mut()
            .find(|f| f.function_name == function.function_name)
        {
            Some(existing) => *existing = function,
            None => entry.functions.push(function),
        }
    }

    pub fn function(&self, contract: &Address, function_name: &str) -> Option<&FunctionOverride> {
        self.contracts
            .get(contract)?
            .functions
            .iter()
            .find(|f| f.function_name == function_name)
    }

    /// Iterate permissioned functions per contract, in document order.
    pub fn permissioned_functions(
        &self,
    ) -> impl Iterator<Item = (&Address, &FunctionOverride)> {
        self.contracts.iter().flat_map(|(address, overrides)| {
            overrides
                .functions
                .iter()
                .filter(|f| f.is_permissioned())
                .map(move |f| (address, f))
        })
    }
}

impl Default for OverridesDocument {
    fn default() -> Self {
        Self::new()
    }
}
