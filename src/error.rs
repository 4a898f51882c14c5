use std::path::PathBuf;
use bitcoin::amount::ParseAmountError;
use bitcoin::bip32::Error as Bip32Error;
use bitcoin::secp256k1::Error as SecpError;
use kaspa_txscript::script_builder::ScriptBuilderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON file {file_path:?}: {source}")]
    JsonFile {
        file_path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed serialized transaction: {0}")]
    Json(#[from] serde_json::Error),

    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid amount: {0}")]
    Amount(#[from] ParseAmountError),

    #[error("key derivation error: {0}")]
    Bip32(#[from] Bip32Error),

    #[error("secp256k1 error: {0}")]
    Secp256k1(#[from] SecpError),

    #[error("decryption failed")]
    Decrypt,

    #[error("encryption failed")]
    Encrypt,

    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("network mismatch: wallet is on {expected}, address {address} belongs to {actual}")]
    NetworkMismatch {
        expected: String,
        actual: String,
        address: String,
    },

    #[error("Failed to resolve custom entry {transaction_id}:{index}")]
    CustomEntryUnresolved { transaction_id: String, index: u32 },

    #[error("No imported account")]
    NoImportedAccount,

    #[error("Script is required when signer address is supplied")]
    MissingScript,

    #[error("Input signature script isn't defined (input {input_index})")]
    MissingSignatureScript { input_index: usize },

    #[error("Transaction {0} is not generated by wallet, use the node-level submit path instead")]
    UnknownTransaction(String),

    #[error("address {0} does not belong to this wallet")]
    UnknownAddress(String),

    #[error("input index {index} is out of range for transaction {transaction_id}")]
    InputIndexOutOfRange { transaction_id: String, index: usize },

    #[error("script error: {0}")]
    Script(#[from] ScriptBuilderError),

    #[error("insufficient funds: available {available} sompi, required {required} sompi")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("transaction generator error: {0}")]
    Generator(String),

    #[error("signer error: {0}")]
    Signer(String),

    #[error("chain client error: {0}")]
    Chain(String),

    #[error("input validation error: {0}")]
    InputValidation(String),
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;
