use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

pub use kaspa_addresses::{Address, Prefix, Version};

use crate::error::{CoordinatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Simnet,
    Devnet,
}

impl Network {
    pub fn prefix(self) -> Prefix {
        match self {
            Network::Mainnet => Prefix::Mainnet,
            Network::Testnet => Prefix::Testnet,
            Network::Simnet => Prefix::Simnet,
            Network::Devnet => Prefix::Devnet,
        }
    }

    pub fn from_prefix(prefix: Prefix) -> Self {
        match prefix {
            Prefix::Mainnet => Network::Mainnet,
            Prefix::Testnet => Network::Testnet,
            Prefix::Simnet => Network::Simnet,
            Prefix::Devnet => Network::Devnet,
        }
    }
}

impl FromStr for Network {
    type Err = CoordinatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "kaspa" => Ok(Network::Mainnet),
            "testnet" | "testnet-10" | "testnet-11" | "kaspatest" => Ok(Network::Testnet),
            "simnet" | "kaspasim" => Ok(Network::Simnet),
            "devnet" | "kaspadev" => Ok(Network::Devnet),
            other => Err(CoordinatorError::InputValidation(format!(
                "unknown network: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Simnet => "simnet",
            Network::Devnet => "devnet",
        };
        f.write_str(name)
    }
}

/// Wallet-side queries on a [`kaspa_addresses::Address`].
pub trait AddressExt: Sized {
    fn network(&self) -> Network;

    fn is_script_hash(&self) -> bool;

    /// Fails with `NetworkMismatch` unless the address belongs to `network`.
    fn require_network(self, network: Network) -> Result<Self>;
}

impl AddressExt for Address {
    fn network(&self) -> Network {
        Network::from_prefix(self.prefix)
    }

    fn is_script_hash(&self) -> bool {
        self.version == Version::ScriptHash
    }

    fn require_network(self, network: Network) -> Result<Self> {
        if self.prefix != network.prefix() {
            return Err(CoordinatorError::NetworkMismatch {
                expected: network.to_string(),
                actual: self.network().to_string(),
                address: self.to_string(),
            });
        }
        Ok(self)
    }
}

/// Encoded length after the prefix for the version given by the first two
/// characters: 53 payload characters for 33 bytes or 55 for 34, plus 8 of
/// checksum.
fn expected_body_len(body: &str) -> Option<usize> {
    let mut chars = body.chars();
    match (chars.next()?, chars.next()?) {
        ('q' | 'p', 'q' | 'p' | 'z' | 'r') => Some(61),
        ('q', 'y' | '9' | 'x' | '8') => Some(63),
        _ => None,
    }
}

/// Parses `s` with `Address::try_from`. Strings whose length does not fit
/// their version are rejected first, since the decoder asserts on it.
pub fn parse_address(s: &str) -> Result<Address> {
    let invalid = |reason: String| CoordinatorError::InvalidAddress {
        address: s.to_string(),
        reason,
    };

    let (_, body) = s
        .split_once(':')
        .ok_or_else(|| invalid("missing prefix".to_string()))?;
    if expected_body_len(body) != Some(body.len()) {
        return Err(invalid("unknown version or bad length".to_string()));
    }
    Address::try_from(s).map_err(|e| invalid(e.to_string()))
}

/// Returns true when `s` parses as an address of any known network.
pub fn validate_address(s: &str) -> bool {
    parse_address(s).is_ok()
}

pub fn address_from_payload(network: Network, version: Version, payload: &[u8]) -> Result<Address> {
    if payload.len() != version.public_key_len() {
        return Err(CoordinatorError::InvalidAddress {
            address: hex::encode(payload),
            reason: format!(
                "{} payload must be {} bytes, got {}",
                version,
                version.public_key_len(),
                payload.len()
            ),
        });
    }
    Ok(Address::new(network.prefix(), version, payload))
}

pub(crate) fn deserialize_address<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Address, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_address(&s).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_optional_address<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Address>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(s) => parse_address(&s).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
