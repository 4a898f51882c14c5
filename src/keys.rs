use bitcoin::bip32::{ChildNumber, DerivationPath, Xpriv, Xpub};
use bitcoin::secp256k1::{All, Secp256k1, SecretKey};
use bitcoin::NetworkKind;

use crate::address::{address_from_payload, Address, Network, Version};
use crate::address_book::{AddressIndex, AddressKind};
use crate::error::Result;

pub const PURPOSE: u32 = 44;
pub const COIN_TYPE: u32 = 111111;

/// Derives signing keys below `m/44'/111111'/<account>'`.
pub struct PrivateKeyGenerator {
    secp: Secp256k1<All>,
    account: Xpriv,
}

impl PrivateKeyGenerator {
    pub fn new(seed: &[u8], account_id: u32) -> Result<Self> {
        let secp = Secp256k1::new();
        let master = Xpriv::new_master(NetworkKind::Main, seed)?;
        let account = master.derive_priv(&secp, &account_path(account_id)?)?;
        Ok(Self { secp, account })
    }

    pub fn account_xpub(&self) -> Xpub {
        Xpub::from_priv(&self.secp, &self.account)
    }

    pub fn receive_key(&self, index: u32) -> Result<SecretKey> {
        self.derive(AddressKind::Receive, index)
    }

    pub fn change_key(&self, index: u32) -> Result<SecretKey> {
        self.derive(AddressKind::Change, index)
    }

    pub fn key_for(&self, index: AddressIndex) -> Result<SecretKey> {
        self.derive(index.kind, index.index)
    }

    fn derive(&self, kind: AddressKind, index: u32) -> Result<SecretKey> {
        let path = [
            ChildNumber::from_normal_idx(kind.branch())?,
            ChildNumber::from_normal_idx(index)?,
        ];
        Ok(self.account.derive_priv(&self.secp, &path)?.private_key)
    }
}

fn account_path(account_id: u32) -> Result<DerivationPath> {
    Ok(DerivationPath::from(vec![
        ChildNumber::from_hardened_idx(PURPOSE)?,
        ChildNumber::from_hardened_idx(COIN_TYPE)?,
        ChildNumber::from_hardened_idx(account_id)?,
    ]))
}

/// The Schnorr P2PK address controlled by `key`.
pub fn address_for_key(key: &SecretKey, network: Network) -> Result<Address> {
    let secp = Secp256k1::signing_only();
    let (x_only, _) = key.x_only_public_key(&secp);
    address_from_payload(network, Version::PubKey, &x_only.serialize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address_book::AddressBook;

    #[test]
    fn keys_match_address_book_derivation() {
        let generator = PrivateKeyGenerator::new(&[1u8; 64], 3).unwrap();
        let mut book = AddressBook::new(generator.account_xpub(), Network::Mainnet).unwrap();
        book.increment(2, 2).unwrap();

        for (i, address) in book.receive_addresses().iter().enumerate() {
            let key = generator.receive_key(i as u32).unwrap();
            assert_eq!(&address_for_key(&key, Network::Mainnet).unwrap(), address);
        }
        for (i, address) in book.change_addresses().iter().enumerate() {
            let index = book.find_indexes(address).unwrap();
            let key = generator.key_for(index).unwrap();
            assert_eq!(key, generator.change_key(i as u32).unwrap());
            assert_eq!(&address_for_key(&key, Network::Mainnet).unwrap(), address);
        }
    }

    #[test]
    fn accounts_are_independent() {
        let a = PrivateKeyGenerator::new(&[1u8; 64], 0).unwrap();
        let b = PrivateKeyGenerator::new(&[1u8; 64], 1).unwrap();
        assert_ne!(a.receive_key(0).unwrap(), b.receive_key(0).unwrap());
        assert_ne!(a.receive_key(0).unwrap(), a.change_key(0).unwrap());
    }

    #[test]
    fn rejects_hardened_range_account_ids() {
        assert!(PrivateKeyGenerator::new(&[1u8; 64], 1 << 31).is_err());
    }
}
