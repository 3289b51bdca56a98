//! The seed every keystore under test is loaded with.
//!
//! Expected values of the tests are derived from it, so the operator must load exactly this
//! phrase on the keystore before running the suite. Never use it to store actual funds.

use std::{fmt, str::FromStr};

use miniscript::bitcoin::{
    bip32::{self, DerivationPath, Fingerprint, Xpriv, Xpub},
    secp256k1, Network,
};

use crate::keystore::KeystoreKind;

pub const TEST_PHRASE: [&str; 24] = [
    "merge", "alley", "lucky", "axis", "penalty", "manage", "latin", "gasp", "virus", "captain",
    "wheel", "deal", "chase", "fragile", "chapter", "boss", "zero", "dirt", "stadium", "tooth",
    "physical", "valve", "kid", "plunge",
];

pub const GROUP_SIZE: usize = 6;

/// A column of the displayed phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGroup<'a> {
    /// Number of the first word of the group, starting at 1.
    pub start: usize,
    pub words: &'a [&'static str],
}

/// Splits the phrase in ordered groups of [`GROUP_SIZE`] words.
pub fn groups<'a>(words: &'a [&'static str]) -> Vec<WordGroup<'a>> {
    words
        .chunks(GROUP_SIZE)
        .enumerate()
        .map(|(i, words)| WordGroup {
            start: i * GROUP_SIZE + 1,
            words,
        })
        .collect()
}

pub fn phrase(words: &[&str]) -> String {
    words.join(" ")
}

/// The Coldcard simulator can be started directly with the test seed.
pub fn simulator_command(kind: Option<KeystoreKind>, words: &[&str]) -> Option<String> {
    if kind == Some(KeystoreKind::Coldcard) {
        Some(format!("./simulator.py --seed '{}'", phrase(words)))
    } else {
        None
    }
}

#[derive(Debug)]
pub enum SeedError {
    Mnemonic(bip39::Error),
    Bip32(bip32::Error),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Mnemonic(e) => write!(f, "Error when working with mnemonics: {}", e),
            Self::Bip32(e) => write!(f, "BIP32 error: {}", e),
        }
    }
}

impl std::error::Error for SeedError {}

/// Keys of the test seed, used to compute what a keystore is expected to answer.
pub struct TestSeed {
    curve: secp256k1::Secp256k1<secp256k1::All>,
    master_xpriv: Xpriv,
    network: Network,
}

impl std::fmt::Debug for TestSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSeed")
            .field("network", &self.network)
            .finish()
    }
}

impl TestSeed {
    pub fn new(network: Network) -> Result<Self, SeedError> {
        Self::from_words(network, &TEST_PHRASE)
    }

    pub fn from_words(network: Network, words: &[&str]) -> Result<Self, SeedError> {
        let mnemonic = bip39::Mnemonic::from_str(&phrase(words)).map_err(SeedError::Mnemonic)?;
        let master_xpriv =
            Xpriv::new_master(network, &mnemonic.to_seed("")).map_err(SeedError::Bip32)?;
        Ok(Self {
            curve: secp256k1::Secp256k1::new(),
            master_xpriv,
            network,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.master_xpriv.fingerprint(&self.curve)
    }

    pub fn xpub_at(&self, path: &DerivationPath) -> Result<Xpub, SeedError> {
        let xpriv = self
            .master_xpriv
            .derive_priv(&self.curve, path)
            .map_err(SeedError::Bip32)?;
        Ok(Xpub::from_priv(&self.curve, &xpriv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_groups_of_six() {
        let groups = groups(&TEST_PHRASE);
        assert_eq!(groups.len(), 4);
        assert_eq!(
            groups.iter().map(|g| g.start).collect::<Vec<_>>(),
            vec![1, 7, 13, 19]
        );
        assert_eq!(groups[0].words, &TEST_PHRASE[0..6]);
        assert_eq!(groups[1].words, &TEST_PHRASE[6..12]);
        assert_eq!(groups[2].words, &TEST_PHRASE[12..18]);
        assert_eq!(groups[3].words, &TEST_PHRASE[18..24]);
        assert_eq!(groups[3].words[5], "plunge");
    }

    #[test]
    fn simulator_command_only_for_coldcard() {
        let cmd = simulator_command(Some(KeystoreKind::Coldcard), &TEST_PHRASE).unwrap();
        assert!(cmd.starts_with("./simulator.py --seed 'merge alley"));
        assert!(cmd.ends_with("kid plunge'"));
        assert_eq!(simulator_command(Some(KeystoreKind::Hermit), &TEST_PHRASE), None);
        assert_eq!(simulator_command(None, &TEST_PHRASE), None);
    }

    #[test]
    fn invalid_phrase() {
        assert!(TestSeed::from_words(Network::Testnet, &["merge", "alley"]).is_err());
    }
}
