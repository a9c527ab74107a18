// address.rs — Chain-qualified addresses and the address-type taxonomy.
//
// Every account in the pipeline is identified by a chain-qualified
// address of the form `<chain>:<hex>`, e.g. `eth:0xabcd…`. The hex
// portion is case-insensitive on input and normalized to lowercase, so
// equality and ordering always operate on the normalized form. The
// chain tag is an opaque short identifier.
//
// Some external tooling hands us the bare hex form without a chain
// tag; `Address::qualify` attaches a chain so those values can be
// compared against qualified ones.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// A chain-qualified account identifier.
///
/// Construct via [`Address::from_str`] (or serde, which uses the same
/// string form). The parsed value is already normalized.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    chain: String,
    hex: String,
}

impl Address {
    /// The chain tag, e.g. `eth`.
    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// The normalized (lowercase) hex body, including the `0x` prefix.
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Attach a chain tag to a bare hex string.
    ///
    /// External tooling that only knows hex bodies goes through here so
    /// comparisons always happen on the qualified form.
    pub fn qualify(chain: &str, bare_hex: &str) -> Result<Self, ModelError> {
        format!("{}:{}", chain, bare_hex).parse()
    }
}

impl FromStr for Address {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chain, hex) = s
            .split_once(':')
            .ok_or_else(|| ModelError::MalformedAddress(s.to_string()))?;
        let chain = chain.trim().to_ascii_lowercase();
        let hex = hex.trim().to_ascii_lowercase();
        if chain.is_empty() || !chain.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ModelError::MalformedAddress(s.to_string()));
        }
        let body = hex
            .strip_prefix("0x")
            .ok_or_else(|| ModelError::MalformedAddress(s.to_string()))?;
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ModelError::MalformedAddress(s.to_string()));
        }
        Ok(Self { chain, hex })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.hex)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Classification of an address in the discovered snapshot.
///
/// The terminal subset (`EOA`, `Multisig`, `Unknown`) halts ownership
/// traversal: these principals answer to nobody further up the chain
/// that we can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum AddressType {
    #[serde(rename = "EOA")]
    Eoa,
    #[serde(rename = "EOAPermissioned")]
    EoaPermissioned,
    Unverified,
    Token,
    Multisig,
    Diamond,
    Timelock,
    Contract,
    #[default]
    Unknown,
}

impl AddressType {
    /// True if traversal stops at an address of this type.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AddressType::Eoa | AddressType::Multisig | AddressType::Unknown
        )
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressType::Eoa => "EOA",
            AddressType::EoaPermissioned => "EOAPermissioned",
            AddressType::Unverified => "Unverified",
            AddressType::Token => "Token",
            AddressType::Multisig => "Multisig",
            AddressType::Diamond => "Diamond",
            AddressType::Timelock => "Timelock",
            AddressType::Contract => "Contract",
            AddressType::Unknown => "Unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case() {
        let a: Address = "ETH:0xABCDef12".parse().unwrap();
        assert_eq!(a.chain(), "eth");
        assert_eq!(a.hex(), "0xabcdef12");
        assert_eq!(a.to_string(), "eth:0xabcdef12");
    }

    #[test]
    fn equality_is_case_insensitive() {
        let a: Address = "eth:0xABCD".parse().unwrap();
        let b: Address = "eth:0xabcd".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_missing_chain() {
        assert!("0xabcd".parse::<Address>().is_err());
        assert!(":0xabcd".parse::<Address>().is_err());
    }

    #[test]
    fn rejects_non_hex_body() {
        assert!("eth:0xzz".parse::<Address>().is_err());
        assert!("eth:abcd".parse::<Address>().is_err());
        assert!("eth:0x".parse::<Address>().is_err());
    }

    #[test]
    fn qualify_bare_hex() {
        let a = Address::qualify("eth", "0xABCD").unwrap();
        assert_eq!(a.to_string(), "eth:0xabcd");
    }

    #[test]
    fn serde_round_trip_as_string() {
        let a: Address = "eth:0xabcd".parse().unwrap();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"eth:0xabcd\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn terminal_subset() {
        assert!(AddressType::Eoa.is_terminal());
        assert!(AddressType::Multisig.is_terminal());
        assert!(AddressType::Unknown.is_terminal());
        assert!(!AddressType::EoaPermissioned.is_terminal());
        assert!(!AddressType::Timelock.is_terminal());
        assert!(!AddressType::Contract.is_terminal());
    }

    #[test]
    fn address_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&AddressType::Eoa).unwrap(),
            "\"EOA\""
        );
        assert_eq!(
            serde_json::to_string(&AddressType::EoaPermissioned).unwrap(),
            "\"EOAPermissioned\""
        );
        assert_eq!(
            serde_json::to_string(&AddressType::Timelock).unwrap(),
            "\"Timelock\""
        );
    }
}
