//! Build, sign and submit coordination for a Kaspa wallet account.
//!
//! Coin selection, signature hashing and the node connection stay behind the
//! traits in [`chain`]; this crate tracks the transactions it built, picks
//! the keys that sign each input and splices caller-supplied signature
//! scripts into specific inputs.

pub mod address;
pub mod address_book;
pub mod amount;
pub mod chain;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod crypto;
pub mod custom;
pub mod error;
pub mod keys;
pub mod script;
pub mod tx;

pub use address::{parse_address, validate_address, Address, AddressExt, Network, Prefix, Version};
pub use address_book::{AddressBook, AddressIndex, AddressKind};
pub use chain::{ChainClient, GeneratorSettings, PaymentOutput, TransactionGenerator, TransactionSigner};
pub use coordinator::{CoordinatorEvent, EncryptedAccount, TransactionCoordinator};
pub use custom::{CustomInput, CustomSignature, CustomSignatureRequest, CustomSigner};
pub use error::{CoordinatorError, Result};
pub use tx::{deserialize_from_safe_json, serialize_to_safe_json, PendingTransaction, UtxoInput};
