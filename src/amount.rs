use bitcoin::{Amount, Denomination};

use crate::error::Result;

/// Sompi per KAS. The chain uses the same 10^8 scaling as bitcoin's satoshi,
/// so the conversion borrows bitcoin's `Denomination::Bitcoin` parser.
pub const SOMPI_PER_KASPA: u64 = 100_000_000;

/// Parses a human-readable KAS amount ("10.5") into sompi.
pub fn kaspa_to_sompi(value: &str) -> Result<u64> {
    let amount = Amount::from_str_in(value.trim(), Denomination::Bitcoin)?;
    Ok(amount.to_sat())
}

pub fn sompi_to_kaspa(sompi: u64) -> String {
    Amount::from_sat(sompi).to_string_in(Denomination::Bitcoin)
}
