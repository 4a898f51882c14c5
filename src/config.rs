use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::address::Network;
use crate::error::{CoordinatorError, Result};

fn default_count() -> u32 {
    1
}

/// Wallet description read by the CLI.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfig {
    pub network: String, // "mainnet", "testnet", "simnet", "devnet"
    pub encrypted_key: String,
    #[serde(default)]
    pub account_id: u32,
    #[serde(default = "default_count")]
    pub receive_count: u32,
    #[serde(default = "default_count")]
    pub change_count: u32,
}

impl WalletConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            log::error!("failed to read wallet file {:?}", path);
            CoordinatorError::Io(e)
        })?;
        Self::from_json(&content).map_err(|e| match e {
            CoordinatorError::Json(source) => CoordinatorError::JsonFile {
                file_path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn network(&self) -> Result<Network> {
        self.network.parse()
    }
}
