use std::fs;

use clap::Parser;

use kaspa_tx_coordinator::cli::{self, CliArgs, Command};
use kaspa_tx_coordinator::config::WalletConfig;
use kaspa_tx_coordinator::{CoordinatorError, Network};

fn main() -> Result<(), CoordinatorError> {
    env_logger::init();

    let args = CliArgs::parse();

    let output = match &args.command {
        Command::Encrypt { seed_hex, password } => {
            log::info!("encrypting wallet seed");
            cli::encrypt_seed(seed_hex, password)?
        }
        Command::Addresses { input_file, password } => {
            let config = WalletConfig::load(input_file)?;
            log::info!("deriving addresses for account {} on {}", config.account_id, config.network);
            cli::wallet_addresses(&config, password)?
        }
        Command::Inspect { input_file, network } => {
            let network: Network = network.parse()?;
            let json = fs::read_to_string(input_file).map_err(|e| {
                log::error!("failed to read transaction file {:?}", input_file);
                CoordinatorError::Io(e)
            })?;
            cli::inspect_transaction(&json, network)?
        }
    };

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    if let Some(path) = &args.output_file {
        fs::write(path, output.as_bytes()).map_err(|e| {
            log::error!("failed to write output file {:?}", path);
            CoordinatorError::Io(e)
        })?;
        log::info!("result saved to {:?}", path);
    }
    Ok(())
}
