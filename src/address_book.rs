use bitcoin::bip32::{ChildNumber, Xpub};
use bitcoin::secp256k1::{Secp256k1, VerifyOnly};

use crate::address::{address_from_payload, Address, Network, Version};
use crate::error::{CoordinatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Receive,
    Change,
}

impl AddressKind {
    /// Branch under the account key: `0` for receive, `1` for change.
    pub fn branch(self) -> u32 {
        match self {
            AddressKind::Receive => 0,
            AddressKind::Change => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressIndex {
    pub kind: AddressKind,
    pub index: u32,
}

impl AddressIndex {
    pub fn is_receive(&self) -> bool {
        self.kind == AddressKind::Receive
    }
}

/// Receive and change address pools derived from an account public key.
pub struct AddressBook {
    secp: Secp256k1<VerifyOnly>,
    network: Network,
    receive_xpub: Xpub,
    change_xpub: Xpub,
    receive: Vec<Address>,
    change: Vec<Address>,
}

impl AddressBook {
    /// Starts with one receive and one change address.
    pub fn new(account_xpub: Xpub, network: Network) -> Result<Self> {
        Self::with_counts(account_xpub, network, 1, 1)
    }

    pub fn with_counts(account_xpub: Xpub, network: Network, receive_count: u32, change_count: u32) -> Result<Self> {
        let secp = Secp256k1::verification_only();
        let receive_xpub = account_xpub.derive_pub(&secp, &[ChildNumber::from_normal_idx(AddressKind::Receive.branch())?])?;
        let change_xpub = account_xpub.derive_pub(&secp, &[ChildNumber::from_normal_idx(AddressKind::Change.branch())?])?;

        let mut book = Self {
            secp,
            network,
            receive_xpub,
            change_xpub,
            receive: Vec::new(),
            change: Vec::new(),
        };
        book.increment(receive_count, change_count)?;
        Ok(book)
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn receive_addresses(&self) -> &[Address] {
        &self.receive
    }

    pub fn change_addresses(&self) -> &[Address] {
        &self.change
    }

    pub fn last_change_address(&self) -> Option<&Address> {
        self.change.last()
    }

    pub fn find_indexes(&self, address: &Address) -> Result<AddressIndex> {
        let lookup = |pool: &[Address], kind: AddressKind| {
            pool.iter().position(|a| a == address).map(|i| AddressIndex {
                kind,
                index: i as u32,
            })
        };
        lookup(&self.receive, AddressKind::Receive)
            .or_else(|| lookup(&self.change, AddressKind::Change))
            .ok_or_else(|| CoordinatorError::UnknownAddress(address.to_string()))
    }

    /// Extends the receive and change pools by the given number of freshly
    /// derived addresses.
    pub fn increment(&mut self, receive: u32, change: u32) -> Result<()> {
        for _ in 0..receive {
            let address = self.derive(AddressKind::Receive, self.receive.len() as u32)?;
            log::debug!("derived receive address #{}: {}", self.receive.len(), address);
            self.receive.push(address);
        }
        for _ in 0..change {
            let address = self.derive(AddressKind::Change, self.change.len() as u32)?;
            log::debug!("derived change address #{}: {}", self.change.len(), address);
            self.change.push(address);
        }
        Ok(())
    }

    fn derive(&self, kind: AddressKind, index: u32) -> Result<Address> {
        let branch = match kind {
            AddressKind::Receive => &self.receive_xpub,
            AddressKind::Change => &self.change_xpub,
        };
        let child = branch.derive_pub(&self.secp, &[ChildNumber::from_normal_idx(index)?])?;
        let (x_only, _) = child.public_key.x_only_public_key();
        address_from_payload(self.network, Version::PubKey, &x_only.serialize())
    }
}
