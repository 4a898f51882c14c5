use kaspa_consensus_core::subnets::SubnetworkId;
use kaspa_consensus_core::tx::{
    ScriptPublicKey, SignableTransaction, Transaction, TransactionId, TransactionInput, TransactionOutpoint,
    TransactionOutput, UtxoEntry,
};
use serde::{Deserialize, Serialize};

use crate::address::{Address, Network};
use crate::error::{CoordinatorError, Result};
use crate::script::script_owner;

/// Serde adapter writing 64-bit integers as decimal strings, so the JSON stays
/// lossless for consumers whose numbers are IEEE doubles. Plain numbers are
/// still accepted on input.
mod safe_u64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s.parse().map_err(de::Error::custom),
            StringOrNumber::Number(n) => Ok(n),
        }
    }
}

/// A spendable output reported by the node, with the address it pays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtxoInput {
    pub address: Option<Address>,
    pub outpoint: TransactionOutpoint,
    pub entry: UtxoEntry,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SafeJsonUtxo {
    #[serde(with = "safe_u64")]
    amount: u64,
    script_public_key: ScriptPublicKey,
    #[serde(with = "safe_u64")]
    block_daa_score: u64,
    #[serde(default)]
    is_coinbase: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SafeJsonInput {
    transaction_id: TransactionId,
    index: u32,
    #[serde(default, with = "hex::serde")]
    signature_script: Vec<u8>,
    #[serde(with = "safe_u64")]
    sequence: u64,
    sig_op_count: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    utxo: Option<SafeJsonUtxo>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SafeJsonOutput {
    #[serde(with = "safe_u64")]
    value: u64,
    script_public_key: ScriptPublicKey,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SafeJsonTransaction {
    id: TransactionId,
    version: u16,
    inputs: Vec<SafeJsonInput>,
    outputs: Vec<SafeJsonOutput>,
    #[serde(with = "safe_u64")]
    lock_time: u64,
    subnetwork_id: SubnetworkId,
    #[serde(with = "safe_u64")]
    gas: u64,
    #[serde(default, with = "hex::serde")]
    payload: Vec<u8>,
    #[serde(default, with = "safe_u64")]
    mass: u64,
}

impl From<&SignableTransaction> for SafeJsonTransaction {
    fn from(signable: &SignableTransaction) -> Self {
        let tx = &signable.tx;
        let inputs = tx
            .inputs
            .iter()
            .zip(&signable.entries)
            .map(|(input, entry)| SafeJsonInput {
                transaction_id: input.previous_outpoint.transaction_id,
                index: input.previous_outpoint.index,
                signature_script: input.signature_script.clone(),
                sequence: input.sequence,
                sig_op_count: input.sig_op_count,
                utxo: entry.as_ref().map(|entry| SafeJsonUtxo {
                    amount: entry.amount,
                    script_public_key: entry.script_public_key.clone(),
                    block_daa_score: entry.block_daa_score,
                    is_coinbase: entry.is_coinbase,
                }),
            })
            .collect();
        let outputs = tx
            .outputs
            .iter()
            .map(|output| SafeJsonOutput {
                value: output.value,
                script_public_key: output.script_public_key.clone(),
            })
            .collect();

        Self {
            id: tx.id(),
            version: tx.version,
            inputs,
            outputs,
            lock_time: tx.lock_time,
            subnetwork_id: tx.subnetwork_id.clone(),
            gas: tx.gas,
            payload: tx.payload.clone(),
            mass: tx.mass(),
        }
    }
}

impl TryFrom<SafeJsonTransaction> for SignableTransaction {
    type Error = CoordinatorError;

    fn try_from(safe: SafeJsonTransaction) -> Result<Self> {
        let mut inputs = Vec::with_capacity(safe.inputs.len());
        let mut entries = Vec::with_capacity(safe.inputs.len());
        for input in safe.inputs {
            inputs.push(TransactionInput::new(
                TransactionOutpoint::new(input.transaction_id, input.index),
                input.signature_script,
                input.sequence,
                input.sig_op_count,
            ));
            entries.push(input.utxo.map(|utxo| {
                UtxoEntry::new(utxo.amount, utxo.script_public_key, utxo.block_daa_score, utxo.is_coinbase)
            }));
        }
        let outputs = safe
            .outputs
            .into_iter()
            .map(|output| TransactionOutput::new(output.value, output.script_public_key))
            .collect();

        let tx = Transaction::new(
            safe.version,
            inputs,
            outputs,
            safe.lock_time,
            safe.subnetwork_id,
            safe.gas,
            safe.payload,
        );
        if tx.id() != safe.id {
            return Err(CoordinatorError::InputValidation(format!(
                "transaction id {} does not match its contents ({})",
                safe.id,
                tx.id()
            )));
        }
        tx.set_mass(safe.mass);

        let mut signable = SignableTransaction::new(tx);
        signable.entries = entries;
        Ok(signable)
    }
}

/// camelCase JSON of the transaction and its UTXO entries, with every 64-bit
/// integer written as a decimal string.
pub fn serialize_to_safe_json(transaction: &SignableTransaction) -> Result<String> {
    Ok(serde_json::to_string(&SafeJsonTransaction::from(transaction))?)
}

/// Inverse of [`serialize_to_safe_json`]. The `id` field must match the id
/// computed from the transaction body.
pub fn deserialize_from_safe_json(json: &str) -> Result<SignableTransaction> {
    let safe: SafeJsonTransaction = serde_json::from_str(json)?;
    safe.try_into()
}

/// Unique addresses owning the transaction's inputs, in input order.
/// Inputs without a UTXO entry or with non-standard scripts are skipped.
pub fn input_addresses(transaction: &SignableTransaction, network: Network) -> Vec<Address> {
    let mut addresses: Vec<Address> = Vec::new();
    for entry in transaction.entries.iter().flatten() {
        let Some(address) = script_owner(&entry.script_public_key, network) else {
            continue;
        };
        if !addresses.contains(&address) {
            addresses.push(address);
        }
    }
    addresses
}

pub fn find_input(transaction: &Transaction, outpoint: &TransactionOutpoint) -> Option<usize> {
    transaction
        .inputs
        .iter()
        .position(|input| input.previous_outpoint == *outpoint)
}

pub fn is_signed(input: &TransactionInput) -> bool {
    !input.signature_script.is_empty()
}

/// A transaction built by this wallet and awaiting signatures. Only the
/// signature scripts of its inputs can change after construction, which
/// leaves its id untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    signable: SignableTransaction,
}

impl PendingTransaction {
    pub fn new(signable: SignableTransaction) -> Self {
        Self { signable }
    }

    pub fn id(&self) -> TransactionId {
        self.signable.id()
    }

    pub fn transaction(&self) -> &Transaction {
        &self.signable.tx
    }

    pub fn signable(&self) -> &SignableTransaction {
        &self.signable
    }

    pub fn fill_input(&mut self, index: usize, signature_script: &[u8]) -> Result<()> {
        let transaction_id = self.id().to_string();
        let input = self
            .signable
            .tx
            .inputs
            .get_mut(index)
            .ok_or(CoordinatorError::InputIndexOutOfRange { transaction_id, index })?;
        input.signature_script = signature_script.to_vec();
        Ok(())
    }

    pub fn serialize_to_safe_json(&self) -> Result<String> {
        serialize_to_safe_json(&self.signable)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::address::{address_from_payload, Version};

    fn address(byte: u8, version: Version) -> Address {
        address_from_payload(Network::Testnet, version, &[byte; 32]).unwrap()
    }

    #[test]
    fn safe_json_writes_large_integers_as_strings() {
        let owner = address(1, Version::PubKey);
        let tx = transaction(&[utxo(&owner, txid(0xbb), 0, u64::MAX)], &[(owner.clone(), 5)]);
        let json = serialize_to_safe_json(&tx).unwrap();

        assert!(json.contains(&format!("\"amount\":\"{}\"", u64::MAX)));
        assert!(json.contains("\"value\":\"5\""));
        assert!(json.contains(&format!("\"id\":\"{}\"", tx.id())));
        assert!(json.contains(&format!("\"transactionId\":\"{}\"", txid(0xbb))));

        let parsed = deserialize_from_safe_json(&json).unwrap();
        assert_eq!(parsed.tx, tx.tx);
        assert_eq!(parsed.entries, tx.entries);
        assert_eq!(serialize_to_safe_json(&parsed).unwrap(), json);
    }

    #[test]
    fn accepts_plain_numbers_and_missing_utxo() {
        let owner = address(1, Version::PubKey);
        let mut tx = transaction(&[utxo(&owner, txid(0xcc), 2, 10)], &[(owner, 7)]);
        tx.entries = vec![None];

        let mut value: serde_json::Value = serde_json::from_str(&serialize_to_safe_json(&tx).unwrap()).unwrap();
        value["outputs"][0]["value"] = serde_json::json!(7);
        value["gas"] = serde_json::json!(0);

        let parsed = deserialize_from_safe_json(&value.to_string()).unwrap();
        assert_eq!(parsed.tx.outputs[0].value, 7);
        assert_eq!(parsed.entries, vec![None]);
        assert!(parsed.tx.payload.is_empty());
    }

    #[test]
    fn malformed_json_and_forged_ids_are_reported() {
        assert!(matches!(
            deserialize_from_safe_json("{not json").unwrap_err(),
            CoordinatorError::Json(_)
        ));

        let owner = address(1, Version::PubKey);
        let tx = transaction(&[utxo(&owner, txid(1), 0, 10)], &[(owner, 5)]);
        let json = serialize_to_safe_json(&tx)
            .unwrap()
            .replace(&tx.id().to_string(), &txid(9).to_string());
        assert!(matches!(
            deserialize_from_safe_json(&json).unwrap_err(),
            CoordinatorError::InputValidation(_)
        ));
    }

    #[test]
    fn input_addresses_are_unique_and_ordered() {
        let a = address(1, Version::PubKey);
        let b = address(2, Version::ScriptHash);
        let tx = transaction(
            &[utxo(&a, txid(1), 0, 10), utxo(&b, txid(1), 1, 10), utxo(&a, txid(2), 0, 10)],
            &[],
        );
        assert_eq!(input_addresses(&tx, Network::Testnet), vec![a, b]);
    }

    #[test]
    fn fill_input_replaces_signature_script_and_keeps_id() {
        let a = address(1, Version::PubKey);
        let mut pending = PendingTransaction::new(transaction(&[utxo(&a, txid(1), 0, 10)], &[]));
        let id = pending.id();

        pending.fill_input(0, &[0x41, 0xff]).unwrap();
        assert_eq!(pending.transaction().inputs[0].signature_script, vec![0x41, 0xff]);
        assert!(is_signed(&pending.transaction().inputs[0]));
        assert_eq!(pending.id(), id);

        assert!(matches!(
            pending.fill_input(3, &[0x41]).unwrap_err(),
            CoordinatorError::InputIndexOutOfRange { index: 3, .. }
        ));
    }
}
