// discovered.rs — The discovered on-chain snapshot.
//
// A snapshot is the read-only output of a discovery run: one entry per
// contract or account, each with its typed fields. The snapshot also
// carries a short content hash of the file it was loaded from, which
// stamps resolved documents with their provenance.
//
// Field lookup order matters: the legacy ad-hoc `values` map wins over
// the ordered `fields` sequence, because older discovery handlers wrote
// there first and curators' paths still expect that.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressType};
use crate::error::ModelError;
use crate::field_value::FieldValue;

/// A named field on a discovered entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredField {
    pub name: String,
    pub value: FieldValue,
}

/// One contract or account in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredEntry {
    pub address: Address,
    #[serde(rename = "type")]
    pub address_type: AddressType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<DiscoveredField>,
    /// Legacy ad-hoc values map kept by older discovery handlers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<BTreeMap<String, FieldValue>>,
}

impl DiscoveredEntry {
    pub fn new(address: Address, address_type: AddressType) -> Self {
        Self {
            address,
            address_type,
            name: None,
            fields: Vec::new(),
            values: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push(DiscoveredField {
            name: name.into(),
            value,
        });
        self
    }

    /// Look up a field by name: `values.<name>` first, then the
    /// ordered `fields` sequence.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        if let Some(values) = &self.values {
            if let Some(v) = values.get(name) {
                return Some(v);
            }
        }
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }
}

/// The on-disk discovered document: a flat list of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredDocument {
    pub entries: Vec<DiscoveredEntry>,
}

/// An in-memory snapshot: entries keyed by address plus the content
/// hash of the file they came from.
#[derive(Debug, Clone)]
pub struct DiscoveredSnapshot {
    entries: BTreeMap<Address, DiscoveredEntry>,
    content_hash: String,
}

impl DiscoveredSnapshot {
    /// Build a snapshot from a document. Addresses must be unique.
    pub fn new(document: DiscoveredDocument, content_hash: String) -> Result<Self, ModelError> {
        let mut entries = BTreeMap::new();
        for entry in document.entries {
            let address = entry.address.clone();
            if entries.insert(address.clone(), entry).is_some() {
                return Err(ModelError::DuplicateAddress(address.to_string()));
            }
        }
        Ok(Self {
            entries,
            content_hash,
        })
    }

    /// The 16-hex-character provenance stamp of the backing file.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn entry(&self, address: &Address) -> Option<&DiscoveredEntry> {
        self.entries.get(address)
    }

    /// The type of an address; addresses missing from the snapshot are
    /// `Unknown`.
    pub fn address_type_of(&self, address: &Address) -> AddressType {
        self.entries
            .get(address)
            .map(|e| e.address_type)
            .unwrap_or(AddressType::Unknown)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn snapshot_rejects_duplicate_addresses() {
        let doc = DiscoveredDocument {
            entries: vec![
                DiscoveredEntry::new(addr("eth:0xc"), AddressType::Contract),
                DiscoveredEntry::new(addr("eth:0xC"), AddressType::Timelock),
            ],
        };
        let err = DiscoveredSnapshot::new(doc, "0".repeat(16)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateAddress(_)));
    }

    #[test]
    fn missing_address_is_unknown() {
        let doc = DiscoveredDocument { entries: vec![] };
        let snapshot = DiscoveredSnapshot::new(doc, "0".repeat(16)).unwrap();
        assert_eq!(
            snapshot.address_type_of(&addr("eth:0xdead")),
            AddressType::Unknown
        );
    }

    #[test]
    fn values_map_wins_over_fields() {
        let mut entry = DiscoveredEntry::new(addr("eth:0xc"), AddressType::Contract)
            .with_field("owner", FieldValue::string("from-fields"));
        entry.values = Some(
            [("owner".to_string(), FieldValue::string("from-values"))]
                .into_iter()
                .collect(),
        );
        assert_eq!(
            entry.field("owner"),
            Some(&FieldValue::string("from-values"))
        );
    }

    #[test]
    fn fields_searched_by_name_in_order() {
        let entry = DiscoveredEntry::new(addr("eth:0xc"), AddressType::Contract)
            .with_field("admin", FieldValue::string("a"))
            .with_field("owner", FieldValue::string("b"));
        assert_eq!(entry.field("owner"), Some(&FieldValue::string("b")));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn document_serde_round_trip() {
        let doc = DiscoveredDocument {
            entries: vec![DiscoveredEntry::new(addr("eth:0xc"), AddressType::Contract)
                .with_field(
                    "admin",
                    FieldValue::address(addr("eth:0xe1"), AddressType::Eoa),
                )],
        };
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let back: DiscoveredDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
