//! Caller-declared inputs and signature overrides.

use std::str::FromStr;

use kaspa_consensus_core::tx::{TransactionId, TransactionOutpoint};
use serde::{Deserialize, Serialize};

use crate::address::{deserialize_address, parse_address, Address};
use crate::error::{CoordinatorError, Result};

/// A UTXO the caller wants spent, whatever coin selection would pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomInput {
    #[serde(deserialize_with = "deserialize_address")]
    pub address: Address,
    #[serde(rename = "outpoint")]
    pub transaction_id: TransactionId,
    pub index: u32,
}

impl CustomInput {
    pub fn outpoint(&self) -> TransactionOutpoint {
        TransactionOutpoint::new(self.transaction_id, self.index)
    }
}

/// How one input's signature script is produced after the default pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomSigner {
    /// Sign with the wallet key behind `address` and wrap the signature
    /// together with the redeem `script` as a pay-to-script-hash spend.
    ScriptHash { address: Address, script: Vec<u8> },
    /// Use `raw` as the signature script verbatim.
    Literal { raw: Vec<u8> },
}

/// Wire form: `signer` is either a wallet address (then `script` is
/// mandatory) or a ready-made hex signature script.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomSignatureRequest {
    pub outpoint: String,
    pub index: u32,
    pub signer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CustomSignatureRequest")]
pub struct CustomSignature {
    pub outpoint: TransactionOutpoint,
    pub signer: CustomSigner,
}

impl CustomSignature {
    pub fn new(outpoint: TransactionOutpoint, signer: &str, script: Option<&str>) -> Result<Self> {
        let signer = match parse_address(signer) {
            Ok(address) => {
                let script = script.ok_or(CoordinatorError::MissingScript)?;
                CustomSigner::ScriptHash {
                    address,
                    script: hex::decode(script.trim())?,
                }
            }
            Err(_) => CustomSigner::Literal {
                raw: hex::decode(signer.trim())?,
            },
        };
        Ok(Self { outpoint, signer })
    }
}

impl TryFrom<CustomSignatureRequest> for CustomSignature {
    type Error = CoordinatorError;

    fn try_from(request: CustomSignatureRequest) -> Result<Self> {
        let transaction_id = TransactionId::from_str(&request.outpoint).map_err(|e| {
            CoordinatorError::InputValidation(format!("invalid outpoint {}: {}", request.outpoint, e))
        })?;
        Self::new(
            TransactionOutpoint::new(transaction_id, request.index),
            &request.signer,
            request.script.as_deref(),
        )
    }
}
