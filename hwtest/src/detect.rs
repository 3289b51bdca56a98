//! Keystore version detection.

use async_trait::async_trait;

use crate::{
    interaction::{InteractionMessage, Phase, Prompt, Step},
    keystore::KeystoreKind,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub model: String,
    pub version: String,
    /// Human readable summary, used as the keystore version.
    pub spec: String,
}

impl Metadata {
    pub fn new(model: impl Into<String>, version: impl Into<String>) -> Self {
        let model = model.into();
        let version = version.into();
        Self {
            spec: format!("{} v{}", model, version),
            model,
            version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectError {
    #[error("Version detection is not available for {0}")]
    Unsupported(KeystoreKind),
    #[error("No {0} device found")]
    NotFound(KeystoreKind),
    #[error("Device error: {0}")]
    Device(String),
}

#[async_trait]
pub trait MetadataDetector: Send + Sync {
    async fn detect(&self, kind: KeystoreKind) -> Result<Metadata, DetectError>;
}

/// The interaction the operator goes through when detecting the version of a keystore.
pub fn detection_prompt(kind: KeystoreKind) -> Prompt {
    Prompt::new(vec![Step::Response])
        .with_message(InteractionMessage::info(
            Phase::Pending,
            "device.setup",
            format!("Make sure your {} is plugged in and unlocked.", kind),
        ))
        .with_message(InteractionMessage::info(
            Phase::Active,
            "device.active",
            format!("Reading the firmware version of your {}...", kind),
        ))
}
