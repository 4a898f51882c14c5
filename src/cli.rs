use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::address::Network;
use crate::address_book::AddressBook;
use crate::amount::sompi_to_kaspa;
use crate::config::WalletConfig;
use crate::crypto::{decrypt_xchacha20poly1305, encrypt_xchacha20poly1305};
use crate::error::Result;
use crate::keys::PrivateKeyGenerator;
use crate::tx::{deserialize_from_safe_json, input_addresses, is_signed};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,

    /// Also write the result to this file
    #[clap(short, long, value_parser, global = true)]
    pub output_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encrypt a hex wallet seed into a key accepted by account import
    Encrypt {
        #[clap(long)]
        seed_hex: String,
        #[clap(long, env = "KASPA_WALLET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Print the receive and change addresses of a wallet file
    Addresses {
        #[clap(short, long, value_parser)]
        input_file: PathBuf,
        #[clap(long, env = "KASPA_WALLET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Summarize a safe-JSON transaction file
    Inspect {
        #[clap(short, long, value_parser)]
        input_file: PathBuf,
        /// "mainnet", "testnet", "simnet" or "devnet"
        #[clap(short, long, default_value = "testnet")]
        network: String,
    },
}

pub fn encrypt_seed(seed_hex: &str, password: &str) -> Result<String> {
    let seed = hex::decode(seed_hex.trim())?;
    encrypt_xchacha20poly1305(&seed, password)
}

pub fn wallet_addresses(config: &WalletConfig, password: &str) -> Result<String> {
    let network = config.network()?;
    let seed = decrypt_xchacha20poly1305(&config.encrypted_key, password)?;
    let keys = PrivateKeyGenerator::new(&seed, config.account_id)?;
    let book = AddressBook::with_counts(keys.account_xpub(), network, config.receive_count, config.change_count)?;

    let mut out = String::new();
    for (i, address) in book.receive_addresses().iter().enumerate() {
        writeln!(out, "receive #{} {}", i, address)?;
    }
    for (i, address) in book.change_addresses().iter().enumerate() {
        writeln!(out, "change #{} {}", i, address)?;
    }
    Ok(out)
}

pub fn inspect_transaction(json: &str, network: Network) -> Result<String> {
    let transaction = deserialize_from_safe_json(json)?;

    let mut out = String::new();
    writeln!(out, "id {}", transaction.id())?;
    for (i, input) in transaction.tx.inputs.iter().enumerate() {
        let status = if is_signed(input) { "signed" } else { "unsigned" };
        writeln!(
            out,
            "input #{} {}:{} {}",
            i, input.previous_outpoint.transaction_id, input.previous_outpoint.index, status
        )?;
    }
    for (i, output) in transaction.tx.outputs.iter().enumerate() {
        writeln!(out, "output #{} {} KAS", i, sompi_to_kaspa(output.value))?;
    }
    for address in input_addresses(&transaction, network) {
        writeln!(out, "owner {}", address)?;
    }
    Ok(out)
}
