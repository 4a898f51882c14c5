use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use kaspa_consensus_core::tx::{SignableTransaction, TransactionId};
use tokio::sync::{broadcast, Mutex, RwLock};

use crate::address::{parse_address, Address, AddressExt};
use crate::address_book::AddressBook;
use crate::amount::kaspa_to_sompi;
use crate::chain::{ChainClient, GeneratorSettings, PaymentOutput, TransactionGenerator, TransactionSigner};
use crate::crypto::decrypt_xchacha20poly1305;
use crate::custom::{CustomInput, CustomSignature, CustomSigner};
use crate::error::{CoordinatorError, Result};
use crate::keys::PrivateKeyGenerator;
use crate::script::script_hash_signature_script;
use crate::tx::{
    deserialize_from_safe_json, find_input, input_addresses, is_signed, serialize_to_safe_json, PendingTransaction,
    UtxoInput,
};

const EVENT_CAPACITY: usize = 64;

/// Ciphertext of the wallet seed plus the account it derives keys for.
#[derive(Clone)]
pub struct EncryptedAccount {
    pub encrypted_key: String,
    pub account_id: u32,
}

impl fmt::Debug for EncryptedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedAccount")
            .field("encrypted_key", &"<redacted>")
            .field("account_id", &self.account_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// Sent once per successful `submit_contextful` batch, carrying the
    /// batch's last serialized transaction as the caller passed it in.
    Transaction(String),
}

/// Drives build, sign and submit for one wallet. Transactions built here are
/// kept until submitted so signatures can be attached to the exact object the
/// generator produced.
pub struct TransactionCoordinator {
    chain: Arc<dyn ChainClient>,
    generator: Arc<dyn TransactionGenerator>,
    signer: Arc<dyn TransactionSigner>,
    addresses: RwLock<AddressBook>,
    account: RwLock<Option<EncryptedAccount>>,
    pending: Mutex<HashMap<TransactionId, PendingTransaction>>,
    events: broadcast::Sender<CoordinatorEvent>,
}

impl TransactionCoordinator {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        generator: Arc<dyn TransactionGenerator>,
        signer: Arc<dyn TransactionSigner>,
        addresses: AddressBook,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            chain,
            generator,
            signer,
            addresses: RwLock::new(addresses),
            account: RwLock::new(None),
            pending: Mutex::new(HashMap::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.events.subscribe()
    }

    pub fn addresses(&self) -> &RwLock<AddressBook> {
        &self.addresses
    }

    pub async fn pending_ids(&self) -> Vec<TransactionId> {
        self.pending.lock().await.keys().copied().collect()
    }

    /// Replaces any previously imported account. The ciphertext is only
    /// checked when `sign` decrypts it.
    pub async fn import_account(&self, encrypted_key: impl Into<String>, account_id: u32) {
        *self.account.write().await = Some(EncryptedAccount {
            encrypted_key: encrypted_key.into(),
            account_id,
        });
        log::info!("imported account {}", account_id);
    }

    /// Forgets the imported account. Pending transactions are kept.
    pub async fn reset(&self) {
        *self.account.write().await = None;
        log::info!("account state cleared");
    }

    /// Builds unsigned transactions paying `outputs` (address, KAS amount)
    /// with `fee` as priority fee, spending `custom_inputs` first.
    pub async fn build(
        &self,
        outputs: &[(String, String)],
        fee: &str,
        custom_inputs: &[CustomInput],
    ) -> Result<Vec<String>> {
        log::info!(
            "building transactions: {} outputs, {} custom inputs",
            outputs.len(),
            custom_inputs.len()
        );

        let network = self.addresses.read().await.network();
        let outputs = outputs
            .iter()
            .map(|(address, amount)| -> Result<PaymentOutput> {
                Ok(PaymentOutput {
                    address: parse_address(address)?.require_network(network)?,
                    amount: kaspa_to_sompi(amount)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let priority_fee = kaspa_to_sompi(fee)?;
        let priority_entries = self.resolve_custom_inputs(custom_inputs).await?;

        let transactions = {
            let mut addresses = self.addresses.write().await;
            let change_address = addresses
                .last_change_address()
                .cloned()
                .ok_or_else(|| CoordinatorError::InputValidation("address book has no change address".to_string()))?;

            let transactions = self.generator.create_transactions(GeneratorSettings {
                priority_entries,
                outputs,
                change_address,
                priority_fee,
            })?;

            addresses.increment(1, 0)?;
            transactions
        };

        let mut pending = self.pending.lock().await;
        let mut serialized = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            serialized.push(transaction.serialize_to_safe_json()?);
            log::debug!(
                "tracking transaction {} ({} inputs)",
                transaction.id(),
                transaction.transaction().inputs.len()
            );
            pending.insert(transaction.id(), transaction);
        }

        log::info!("built {} transaction(s)", serialized.len());
        Ok(serialized)
    }

    async fn resolve_custom_inputs(&self, custom_inputs: &[CustomInput]) -> Result<Vec<UtxoInput>> {
        if custom_inputs.is_empty() {
            return Ok(Vec::new());
        }

        let mut addresses: Vec<Address> = Vec::new();
        for custom in custom_inputs {
            if !addresses.contains(&custom.address) {
                addresses.push(custom.address.clone());
            }
        }
        let entries = self.chain.get_utxos_by_addresses(&addresses).await?;
        log::debug!(
            "resolving {} custom inputs against {} utxo entries",
            custom_inputs.len(),
            entries.len()
        );

        custom_inputs
            .iter()
            .map(|custom| {
                let outpoint = custom.outpoint();
                entries
                    .iter()
                    .find(|entry| entry.outpoint == outpoint)
                    .cloned()
                    .ok_or_else(|| CoordinatorError::CustomEntryUnresolved {
                        transaction_id: custom.transaction_id.to_string(),
                        index: custom.index,
                    })
            })
            .collect()
    }

    /// Signs each serialized transaction with the imported account's keys,
    /// then applies `customs` on top. Output order follows input order.
    pub async fn sign(
        &self,
        transactions: &[String],
        password: &str,
        customs: &[CustomSignature],
    ) -> Result<Vec<String>> {
        let account = self
            .account
            .read()
            .await
            .clone()
            .ok_or(CoordinatorError::NoImportedAccount)?;

        let seed = decrypt_xchacha20poly1305(&account.encrypted_key, password)?;
        let keys = PrivateKeyGenerator::new(&seed, account.account_id)?;
        let addresses = self.addresses.read().await;
        let network = addresses.network();

        let mut signed = Vec::with_capacity(transactions.len());
        for raw in transactions {
            let transaction = deserialize_from_safe_json(raw)?;

            let mut private_keys = Vec::new();
            for address in input_addresses(&transaction, network) {
                // script-hash inputs are covered by custom signatures
                if address.is_script_hash() {
                    continue;
                }
                private_keys.push(keys.key_for(addresses.find_indexes(&address)?)?);
            }
            log::debug!(
                "signing transaction {} with {} key(s)",
                transaction.id(),
                private_keys.len()
            );

            let mut transaction = self.signer.sign_transaction(transaction, &private_keys)?;
            for custom in customs {
                self.apply_custom_signature(&mut transaction, custom, &keys, &addresses)?;
            }
            signed.push(serialize_to_safe_json(&transaction)?);
        }

        log::info!("signed {} transaction(s)", signed.len());
        Ok(signed)
    }

    fn apply_custom_signature(
        &self,
        transaction: &mut SignableTransaction,
        custom: &CustomSignature,
        keys: &PrivateKeyGenerator,
        addresses: &AddressBook,
    ) -> Result<()> {
        let Some(input_index) = find_input(&transaction.tx, &custom.outpoint) else {
            log::debug!(
                "custom signature {} has no input in transaction {}",
                custom.outpoint,
                transaction.id()
            );
            return Ok(());
        };

        let signature_script = match &custom.signer {
            CustomSigner::ScriptHash { address, script } => {
                let key = keys.key_for(addresses.find_indexes(address)?)?;
                let signature = self.signer.create_input_signature(transaction, input_index, &key)?;
                script_hash_signature_script(script, signature)?
            }
            CustomSigner::Literal { raw } => raw.clone(),
        };

        log::debug!(
            "custom signature script set on input {} of {}",
            input_index,
            transaction.id()
        );
        transaction.tx.inputs[input_index].signature_script = signature_script;
        Ok(())
    }

    /// Copies the signature scripts of each serialized transaction onto the
    /// tracked transaction with the same id and submits that one. Returns the
    /// ids the chain client reported.
    pub async fn submit_contextful(&self, transactions: &[String]) -> Result<Vec<TransactionId>> {
        let mut submitted = Vec::with_capacity(transactions.len());

        for raw in transactions {
            let transaction = deserialize_from_safe_json(raw)?;
            let id = transaction.id();

            let filled = {
                let mut pending = self.pending.lock().await;
                let cached = pending
                    .get_mut(&id)
                    .ok_or_else(|| CoordinatorError::UnknownTransaction(id.to_string()))?;

                for (input_index, input) in transaction.tx.inputs.iter().enumerate() {
                    if !is_signed(input) {
                        return Err(CoordinatorError::MissingSignatureScript { input_index });
                    }
                    cached.fill_input(input_index, &input.signature_script)?;
                }
                cached.transaction().clone()
            };

            let accepted = self.chain.submit_transaction(&filled).await?;
            self.pending.lock().await.remove(&id);
            log::info!("submitted transaction {}", accepted);
            submitted.push(accepted);
        }

        if let Some(last) = transactions.last() {
            if self.events.send(CoordinatorEvent::Transaction(last.clone())).is_err() {
                log::debug!("no event subscribers");
            }
        }
        Ok(submitted)
    }
}
