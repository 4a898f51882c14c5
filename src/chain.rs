//! Seams to the node and to the wallet library doing coin selection and
//! signature hashing. Implementations return `CoordinatorError` directly so
//! their failures reach callers unchanged.

use async_trait::async_trait;
use bitcoin::secp256k1::SecretKey;
use kaspa_consensus_core::tx::{SignableTransaction, Transaction, TransactionId};

use crate::address::Address;
use crate::error::Result;
use crate::tx::{PendingTransaction, UtxoInput};

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_utxos_by_addresses(&self, addresses: &[Address]) -> Result<Vec<UtxoInput>>;

    /// Returns the id the node reported for the accepted transaction.
    async fn submit_transaction(&self, transaction: &Transaction) -> Result<TransactionId>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutput {
    pub address: Address,
    pub amount: u64,
}

#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Spent first, ahead of automatic selection.
    pub priority_entries: Vec<UtxoInput>,
    pub outputs: Vec<PaymentOutput>,
    pub change_address: Address,
    pub priority_fee: u64,
}

/// Coin selection, fee calculation and change insertion over the wallet's
/// own UTXO set. Large payments may come back split across several
/// transactions.
pub trait TransactionGenerator: Send + Sync {
    fn create_transactions(&self, settings: GeneratorSettings) -> Result<Vec<PendingTransaction>>;
}

pub trait TransactionSigner: Send + Sync {
    /// Signs every input whose owning key is among `keys`.
    fn sign_transaction(&self, transaction: SignableTransaction, keys: &[SecretKey]) -> Result<SignableTransaction>;

    /// Signature fragment for one input, push opcode included.
    fn create_input_signature(
        &self,
        transaction: &SignableTransaction,
        input_index: usize,
        key: &SecretKey,
    ) -> Result<Vec<u8>>;
}
