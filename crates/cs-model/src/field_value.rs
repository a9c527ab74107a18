// field_value.rs — The recursive value tree for discovered contract state.
//
// Discovered contract fields are heterogeneous: plain scalars, big
// decimal numbers, addresses with a type hint, nested role tables,
// arrays of signers. FieldValue is the tagged sum type that replaces
// dynamic typing for all of them. The path evaluator descends this
// tree; nothing else in the pipeline inspects raw JSON.
//
// Numbers are carried as decimal strings because on-chain values
// routinely exceed 64 bits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressType};

/// A single discovered value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldValue {
    /// A qualified address with a best-effort type hint.
    Address {
        value: Address,
        #[serde(rename = "addressType", default)]
        address_type: AddressType,
    },
    /// Raw hex data that is not an address.
    Hex { value: String },
    String { value: String },
    /// A decimal integer, possibly wider than 64 bits.
    Number { value: String },
    Boolean { value: bool },
    Array { items: Vec<FieldValue> },
    Object { entries: BTreeMap<String, FieldValue> },
    /// The handler could not determine a value.
    Unknown,
    /// The handler failed; the message is preserved verbatim.
    Error { message: String },
}

impl FieldValue {
    pub fn address(value: Address, address_type: AddressType) -> Self {
        FieldValue::Address {
            value,
            address_type,
        }
    }

    pub fn number(value: impl Into<String>) -> Self {
        FieldValue::Number {
            value: value.into(),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        FieldValue::String {
            value: value.into(),
        }
    }

    pub fn array(items: Vec<FieldValue>) -> Self {
        FieldValue::Array { items }
    }

    pub fn object(entries: impl IntoIterator<Item = (String, FieldValue)>) -> Self {
        FieldValue::Object {
            entries: entries.into_iter().collect(),
        }
    }

    /// The address carried by this node, if it is an `address` value.
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            FieldValue::Address { value, .. } => Some(value),
            _ => None,
        }
    }

    /// True for scalar leaves (everything except arrays and objects).
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            FieldValue::Array { .. } | FieldValue::Object { .. }
        )
    }

    /// Collect every address leaf under this node, in document order.
    ///
    /// Duplicates are kept; callers that need a set deduplicate
    /// themselves.
    pub fn collect_addresses(&self, out: &mut Vec<Address>) {
        match self {
            FieldValue::Address { value, .. } => out.push(value.clone()),
            FieldValue::Array { items } => {
                for item in items {
                    item.collect_addresses(out);
                }
            }
            FieldValue::Object { entries } => {
                for value in entries.values() {
                    value.collect_addresses(out);
                }
            }
            _ => {}
        }
    }
}
