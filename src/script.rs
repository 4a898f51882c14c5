use kaspa_consensus_core::tx::ScriptPublicKey;
use kaspa_txscript::{extract_script_pub_key_address, pay_to_script_hash_signature_script};

pub use kaspa_txscript::pay_to_address_script;

use crate::address::{Address, Network};
use crate::error::Result;

/// Signature script spending a pay-to-script-hash output: `signature`
/// followed by a canonical push of `redeem_script`. The signature fragment
/// already carries its own push opcode.
pub fn script_hash_signature_script(redeem_script: &[u8], signature: Vec<u8>) -> Result<Vec<u8>> {
    Ok(pay_to_script_hash_signature_script(redeem_script.to_vec(), signature)?)
}

/// The address a standard script pays, `None` for non-standard scripts.
pub fn script_owner(script_public_key: &ScriptPublicKey, network: Network) -> Option<Address> {
    extract_script_pub_key_address(script_public_key, network.prefix()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{address_from_payload, Version};
    use crate::error::CoordinatorError;

    #[test]
    fn script_hash_signature_script_appends_pushed_redeem_script() {
        let mut signature = vec![0x41];
        signature.extend_from_slice(&[0x11; 64]);
        signature.push(0x01);

        let script = script_hash_signature_script(&[0x51], signature.clone()).unwrap();
        assert_eq!(&script[..66], signature.as_slice());
        assert_eq!(&script[66..], &[0x01, 0x51]);

        let redeem = [0xab; 80];
        let script = script_hash_signature_script(&redeem, vec![]).unwrap();
        assert_eq!(&script[..2], &[0x4c, 80]);
        assert_eq!(script.len(), 82);
    }

    #[test]
    fn oversized_redeem_script_is_rejected() {
        let err = script_hash_signature_script(&[0u8; 521], vec![0x41]).unwrap_err();
        assert!(matches!(err, CoordinatorError::Script(_)));
    }

    #[test]
    fn standard_scripts_map_back_to_addresses() {
        for (version, len) in [
            (Version::PubKey, 32),
            (Version::PubKeyECDSA, 33),
            (Version::ScriptHash, 32),
        ] {
            let address = address_from_payload(Network::Testnet, version, &vec![0x42; len]).unwrap();
            let spk = pay_to_address_script(&address);
            assert_eq!(script_owner(&spk, Network::Testnet), Some(address));
        }

        let nonstandard = ScriptPublicKey::from_vec(0, vec![0x51]);
        assert_eq!(script_owner(&nonstandard, Network::Testnet), None);
    }
}
