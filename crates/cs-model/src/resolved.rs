// resolved.rs — The output side: ultimate owners and the resolved document.
//
// An UltimateOwner is a terminal principal reached by following
// ownership edges from a direct owner, together with the via path that
// got there and the time-delay accrued along it. The resolved document
// groups these per function per contract and stamps the inputs it was
// generated from.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressType};

/// One intermediate hop on the way to an ultimate owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViaStep {
    pub address: Address,
    pub address_type: AddressType,
    /// Delay in seconds imposed by this hop, when it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_formatted: Option<String>,
}

impl ViaStep {
    pub fn new(address: Address, address_type: AddressType, delay: Option<u64>) -> Self {
        Self {
            address,
            address_type,
            delay_formatted: delay.map(format_delay),
            delay,
        }
    }
}

/// A terminal principal holding a permission, with the route taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UltimateOwner {
    pub address: Address,
    pub address_type: AddressType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<ViaStep>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub delays: Vec<u64>,
    pub cumulative_delay: u64,
    pub cumulative_delay_formatted: String,
}

impl UltimateOwner {
    /// Build a record from its route; the cumulative delay is always
    /// the sum of the per-step delays.
    pub fn new(
        address: Address,
        address_type: AddressType,
        via: Vec<ViaStep>,
        delays: Vec<u64>,
    ) -> Self {
        let cumulative_delay = delays.iter().sum();
        Self {
            address,
            address_type,
            via,
            delays,
            cumulative_delay,
            cumulative_delay_formatted: format_delay(cumulative_delay),
        }
    }

    /// Two records are duplicates iff they share the terminal address
    /// and the exact via-address sequence.
    pub fn dedup_key(&self) -> (Address, Vec<Address>) {
        (
            self.address.clone(),
            self.via.iter().map(|s| s.address.clone()).collect(),
        )
    }
}

/// Resolution output for one function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFunction {
    pub function_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub direct_owners: Vec<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ultimate_owners: Vec<UltimateOwner>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Resolution output for one contract.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedContract {
    pub functions: Vec<ResolvedFunction>,
}

/// What inputs a resolved document was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub permission_overrides_version: String,
    pub discovered_json_hash: String,
}

/// The on-disk resolved document. Only contracts with at least one
/// resolved permissioned function are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDocument {
    pub version: String,
    pub last_modified: DateTime<Utc>,
    pub generated_from: Provenance,
    #[serde(default)]
    pub contracts: BTreeMap<Address, ResolvedContract>,
}

pub const RESOLVED_VERSION: &str = "1.0";

impl ResolvedDocument {
    pub fn new(generated_from: Provenance) -> Self {
        Self {
            version: RESOLVED_VERSION.to_string(),
            last_modified: Utc::now(),
            generated_from,
            contracts: BTreeMap::new(),
        }
    }

    pub fn push_function(&mut self, contract: Address, function: ResolvedFunction) {
        self.contracts
            .entry(contract)
            .or_default()
            .functions
            .push(function);
    }
}

/// Render a delay as `"Xd Yh Zm Ws"`, omitting zero components;
/// `"0s"` for zero.
pub fn format_delay(total_seconds: u64) -> String {
    if total_seconds == 0 {
        return "0s".to_string();
    }
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 {
        parts.push(format!("{}s", seconds));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn format_delay_zero() {
        assert_eq!(format_delay(0), "0s");
    }

    #[test]
    fn format_delay_single_components() {
        assert_eq!(format_delay(86_400), "1d");
        assert_eq!(format_delay(3_600), "1h");
        assert_eq!(format_delay(60), "1m");
        assert_eq!(format_delay(1), "1s");
    }

    #[test]
    fn format_delay_omits_zero_components() {
        assert_eq!(format_delay(86_401), "1d 1s");
        assert_eq!(format_delay(90_061), "1d 1h 1m 1s");
        assert_eq!(format_delay(7 * 86_400 + 12 * 3_600), "7d 12h");
    }

    #[test]
    fn cumulative_delay_is_sum_of_delays() {
        let owner = UltimateOwner::new(
            addr("eth:0xbb"),
            AddressType::Multisig,
            vec![ViaStep::new(
                addr("eth:0xaa"),
                AddressType::Timelock,
                Some(86_400),
            )],
            vec![86_400, 3_600],
        );
        assert_eq!(owner.cumulative_delay, 90_000);
        assert_eq!(owner.cumulative_delay_formatted, "1d 1h");
    }

    #[test]
    fn dedup_key_covers_terminal_and_via_sequence() {
        let a = UltimateOwner::new(
            addr("eth:0xbb"),
            AddressType::Multisig,
            vec![ViaStep::new(addr("eth:0xaa"), AddressType::Timelock, None)],
            vec![],
        );
        let b = UltimateOwner::new(
            addr("eth:0xbb"),
            AddressType::Multisig,
            vec![ViaStep::new(addr("eth:0xaa"), AddressType::Timelock, Some(60))],
            vec![60],
        );
        // Same terminal, same via addresses: duplicates even though
        // the delays differ.
        assert_eq!(a.dedup_key(), b.dedup_key());

        let c = UltimateOwner::new(addr("eth:0xbb"), AddressType::Multisig, vec![], vec![]);
        assert_ne!(a.dedup_key(), c.dedup_key());
    }

    #[test]
    fn via_step_formats_its_delay() {
        let step = ViaStep::new(addr("eth:0xaa"), AddressType::Timelock, Some(86_400));
        assert_eq!(step.delay_formatted.as_deref(), Some("1d"));
        let none = ViaStep::new(addr("eth:0xaa"), AddressType::Timelock, None);
        assert!(none.delay_formatted.is_none());
    }

    #[test]
    fn document_serde_uses_camel_case() {
        let mut doc = ResolvedDocument::new(Provenance {
            permission_overrides_version: "1.0".to_string(),
            discovered_json_hash: "a".repeat(16),
        });
        doc.push_function(
            addr("eth:0xc"),
            ResolvedFunction {
                function_name: "pause".to_string(),
                direct_owners: vec![addr("eth:0xaa")],
                ultimate_owners: vec![UltimateOwner::new(
                    addr("eth:0xbb"),
                    AddressType::Multisig,
                    vec![ViaStep::new(
                        addr("eth:0xaa"),
                        AddressType::Timelock,
                        Some(86_400),
                    )],
                    vec![86_400],
                )],
                warnings: vec![],
            },
        );

        let json = serde_json::to_string_pretty(&doc).unwrap();
        assert!(json.contains("\"generatedFrom\""));
        assert!(json.contains("\"discoveredJsonHash\""));
        assert!(json.contains("\"cumulativeDelayFormatted\": \"1d\""));
        let back: ResolvedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
