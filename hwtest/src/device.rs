//! Access to the keystores plugged to the coordinator.

use std::sync::Arc;

use async_hwi::{ledger, Error as HWIError, HWI};
use async_trait::async_trait;
use miniscript::bitcoin::{
    bip32::{DerivationPath, Xpub},
    psbt::Psbt,
};
use tracing::{debug, warn};

use crate::{
    detect::{DetectError, Metadata, MetadataDetector},
    keystore::KeystoreKind,
};

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("{0} cannot be driven from the coordinator")]
    Unsupported(KeystoreKind),
    #[error("No {0} device found")]
    NotFound(KeystoreKind),
    #[error("Device error: {0}")]
    Hwi(String),
}

impl From<HWIError> for DeviceError {
    fn from(e: HWIError) -> Self {
        Self::Hwi(e.to_string())
    }
}

impl From<DeviceError> for DetectError {
    fn from(e: DeviceError) -> Self {
        match e {
            DeviceError::Unsupported(kind) => DetectError::Unsupported(kind),
            DeviceError::NotFound(kind) => DetectError::NotFound(kind),
            DeviceError::Hwi(e) => DetectError::Device(e),
        }
    }
}

/// A keystore answering the tests directly.
#[async_trait]
pub trait Device: Send + Sync {
    async fn extended_public_key(&self, path: &DerivationPath) -> Result<Xpub, DeviceError>;

    /// Returns the PSBT with the signatures of the device.
    async fn sign_psbt(&self, psbt: Psbt) -> Result<Psbt, DeviceError>;
}

/// Connects to the first device of the given kind, HID devices are tried before the
/// simulator.
pub async fn connect(kind: KeystoreKind) -> Result<Arc<dyn HWI + Send + Sync>, DeviceError> {
    if kind != KeystoreKind::Ledger {
        return Err(DeviceError::Unsupported(kind));
    }

    let hid: Option<Arc<dyn HWI + Send + Sync>> = match ledger::HidApi::new() {
        Ok(api) => {
            let mut found: Option<Arc<dyn HWI + Send + Sync>> = None;
            for detected in ledger::Ledger::<ledger::TransportHID>::enumerate(&api) {
                match ledger::Ledger::<ledger::TransportHID>::connect(&api, detected) {
                    Ok(device) => {
                        found = Some(Arc::new(device));
                        break;
                    }
                    Err(HWIError::DeviceNotFound) => {}
                    Err(e) => debug!("{}", e),
                }
            }
            found
        }
        Err(e) => {
            warn!("Failed to access HID devices: {}", e);
            None
        }
    };
    if let Some(device) = hid {
        return Ok(device);
    }

    match ledger::LedgerSimulator::try_connect().await {
        Ok(device) => Ok(Arc::new(device)),
        Err(HWIError::DeviceNotFound) => Err(DeviceError::NotFound(kind)),
        Err(e) => Err(e.into()),
    }
}

/// Connects to the device on every call, the operator may swap devices between two tests.
#[derive(Debug, Clone, Copy)]
pub struct HwiDevice {
    kind: KeystoreKind,
}

impl HwiDevice {
    pub fn new(kind: KeystoreKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl Device for HwiDevice {
    async fn extended_public_key(&self, path: &DerivationPath) -> Result<Xpub, DeviceError> {
        let device = connect(self.kind).await?;
        tracing::info!("Asking {} for the extended public key at {}", self.kind, path);
        Ok(device.get_extended_pubkey(path).await?)
    }

    async fn sign_psbt(&self, mut psbt: Psbt) -> Result<Psbt, DeviceError> {
        let device = connect(self.kind).await?;
        tracing::info!("Asking {} to sign the transaction", self.kind);
        device.sign_tx(&mut psbt).await?;
        Ok(psbt)
    }
}

/// Reads the firmware version of the connected device.
#[derive(Debug, Clone, Copy, Default)]
pub struct HwiDetector;

#[async_trait]
impl MetadataDetector for HwiDetector {
    async fn detect(&self, kind: KeystoreKind) -> Result<Metadata, DetectError> {
        let device = connect(kind).await?;
        let version = device.get_version().await.map_err(DeviceError::from)?;
        Ok(Metadata::new(kind.to_string(), version.to_string()))
    }
}
