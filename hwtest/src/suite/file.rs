//! Suite files list the tests to run on top of, or instead of, the default ones.
//!
//! ```toml
//! include_defaults = true
//!
//! [[test]]
//! kind = "export_public_key"
//! path = "m/49'/1'/0'"
//!
//! [[test]]
//! kind = "sign_psbt"
//! format = "P2WSH"
//! derivation = "m/48'/1'/0'/2'"
//! psbt = "cHNidP8BA..."
//! cosigners = [{ fingerprint = "efbf8c0a", xpub = "tpubDF..." }]
//! ```

use std::{path::Path, str::FromStr, sync::Arc};

use miniscript::bitcoin::{
    bip32::{DerivationPath, Fingerprint},
    psbt::Psbt,
};
use serde::Deserialize;

use super::{default_suite, display_path, ExportPublicKeyTest, SignPsbtTest, TestContext};
use crate::test::{ExtendedPublicKey, Test, TestParams};

#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("Failed to read the suite file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse the suite file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid derivation path '{0}'")]
    Path(String),
    #[error("Invalid fingerprint '{0}'")]
    Fingerprint(String),
    #[error("Invalid transaction: {0}")]
    Psbt(String),
    #[error("Failed to derive the test seed key: {0}")]
    Seed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Cosigner {
    pub fingerprint: String,
    pub xpub: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestDefinition {
    ExportPublicKey {
        path: String,
    },
    SignPsbt {
        format: String,
        derivation: String,
        /// Base64 encoded.
        psbt: String,
        #[serde(default)]
        cosigners: Vec<Cosigner>,
    },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuiteFile {
    #[serde(default = "default_true")]
    pub include_defaults: bool,
    #[serde(default, rename = "test")]
    pub tests: Vec<TestDefinition>,
}

impl Default for SuiteFile {
    fn default() -> Self {
        Self {
            include_defaults: true,
            tests: Vec::new(),
        }
    }
}

fn parse_path(s: &str) -> Result<DerivationPath, SuiteError> {
    DerivationPath::from_str(s).map_err(|_| SuiteError::Path(s.to_string()))
}

impl TestDefinition {
    pub fn build(&self, ctx: &TestContext) -> Result<Arc<dyn Test>, SuiteError> {
        match self {
            Self::ExportPublicKey { path } => Ok(Arc::new(ExportPublicKeyTest::new(
                ctx.clone(),
                parse_path(path)?,
            ))),
            Self::SignPsbt {
                format,
                derivation,
                psbt,
                cosigners,
            } => {
                let path = parse_path(derivation)?;
                let psbt = Psbt::from_str(psbt.trim())
                    .map_err(|e| SuiteError::Psbt(e.to_string()))?;
                let own_key = ctx
                    .seed
                    .xpub_at(&path)
                    .map_err(|e| SuiteError::Seed(e.to_string()))?;
                let mut extended_public_keys = vec![ExtendedPublicKey {
                    root_fingerprint: ctx.seed.fingerprint(),
                    base58: own_key.to_string(),
                }];
                for cosigner in cosigners {
                    extended_public_keys.push(ExtendedPublicKey {
                        root_fingerprint: Fingerprint::from_str(&cosigner.fingerprint)
                            .map_err(|_| SuiteError::Fingerprint(cosigner.fingerprint.clone()))?,
                        base58: cosigner.xpub.clone(),
                    });
                }
                let params = TestParams {
                    format: format.clone(),
                    derivation: display_path(&path),
                    extended_public_keys,
                };
                Ok(Arc::new(SignPsbtTest::new(ctx.clone(), psbt, params)))
            }
        }
    }
}

impl SuiteFile {
    pub fn from_path(path: &Path) -> Result<Self, SuiteError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The tests of the suite for the keystore of the context.
    pub fn build(&self, ctx: &TestContext) -> Result<Vec<Arc<dyn Test>>, SuiteError> {
        let mut tests = if self.include_defaults {
            default_suite(ctx)
        } else {
            Vec::new()
        };
        for definition in &self.tests {
            tests.push(definition.build(ctx)?);
        }
        tracing::info!("Built a suite of {} tests for {}", tests.len(), ctx.kind);
        Ok(tests)
    }
}
