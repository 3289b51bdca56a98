use std::str::FromStr;

use async_trait::async_trait;
use miniscript::bitcoin::{
    base58,
    bip32::{DerivationPath, Xpub},
    Network,
};
use serde_json::Value;

use super::{display_path, TestContext};
use crate::{
    interaction::{Interaction, InteractionMessage, Phase, Prompt, Request, Step},
    keystore::Modality,
    test::{Test, TestError},
};

const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
const TPUB_VERSION: [u8; 4] = [0x04, 0x35, 0x87, 0xCF];

/// xpub, ypub, Ypub, zpub, Zpub.
const MAINNET_VERSIONS: [[u8; 4]; 5] = [
    XPUB_VERSION,
    [0x04, 0x9D, 0x7C, 0xB2],
    [0x02, 0x95, 0xB4, 0x3F],
    [0x04, 0xB2, 0x47, 0x46],
    [0x02, 0xAA, 0x7E, 0xD3],
];

/// tpub, upub, Upub, vpub, Vpub.
const TESTNET_VERSIONS: [[u8; 4]; 5] = [
    TPUB_VERSION,
    [0x04, 0x4A, 0x52, 0x62],
    [0x02, 0x42, 0x89, 0xEF],
    [0x04, 0x5F, 0x1C, 0xF6],
    [0x02, 0x57, 0x54, 0x83],
];

/// Reads an extended public key, whatever SLIP-132 prefix the keystore used (ypub, Zpub,
/// Vpub...). The prefix must belong to the network of the suite: a mainnet key exported
/// during a testnet run is an error.
pub fn normalize_xpub(s: &str, network: Network) -> Result<Xpub, TestError> {
    let s = s.trim();
    let mut data = base58::decode_check(s).map_err(|e| TestError::Parse(e.to_string()))?;
    if data.len() != 78 {
        return Err(TestError::Parse(format!(
            "'{}' is not an extended public key",
            s
        )));
    }
    let (version, accepted) = if network == Network::Bitcoin {
        (XPUB_VERSION, &MAINNET_VERSIONS)
    } else {
        (TPUB_VERSION, &TESTNET_VERSIONS)
    };
    if !accepted.iter().any(|v| data[0..4] == v[..]) {
        return Err(TestError::Parse(format!(
            "'{}' is not an extended public key for {}",
            s, network
        )));
    }
    data[0..4].copy_from_slice(&version);
    Xpub::decode(&data).map_err(|e| TestError::Parse(e.to_string()))
}

fn same_path(s: &str, path: &DerivationPath) -> bool {
    DerivationPath::from_str(s.trim()).is_ok_and(|p| &p == path)
}

/// Finds the key exported at `path` in a Coldcard generic JSON export: either a section with
/// `deriv` and `xpub` entries, or a flat `<name>_deriv` entry next to a `<name>` one.
fn find_exported_xpub<'a>(export: &'a Value, path: &DerivationPath) -> Option<&'a str> {
    let entries = export.as_object()?;
    for (key, value) in entries {
        if let Some(section) = value.as_object() {
            let deriv = section.get("deriv").and_then(Value::as_str);
            if deriv.is_some_and(|d| same_path(d, path)) {
                if let Some(xpub) = section.get("xpub").and_then(Value::as_str) {
                    return Some(xpub);
                }
            }
        } else if let (Some(name), Some(deriv)) = (key.strip_suffix("_deriv"), value.as_str()) {
            if same_path(deriv, path) {
                if let Some(xpub) = entries.get(name).and_then(Value::as_str) {
                    return Some(xpub);
                }
            }
        }
    }
    None
}

/// Export of the extended public key at a BIP32 path.
#[derive(Debug)]
pub struct ExportPublicKeyTest {
    ctx: TestContext,
    path: DerivationPath,
}

impl ExportPublicKeyTest {
    pub fn new(ctx: TestContext, path: DerivationPath) -> Self {
        Self { ctx, path }
    }

    fn path_str(&self) -> String {
        display_path(&self.path)
    }

    fn to_value(&self, xpub: &Xpub) -> Value {
        Value::String(xpub.to_string())
    }
}

#[async_trait]
impl Test for ExportPublicKeyTest {
    fn name(&self) -> String {
        format!("Export xpub at {}", self.path_str())
    }

    fn description(&self) -> String {
        format!(
            "Export the extended public key of the test seed at {}.",
            self.path_str()
        )
    }

    fn interaction(&self) -> Box<dyn Interaction> {
        let kind = self.ctx.kind;
        let path = self.path_str();
        let prompt = match kind.modality() {
            Modality::Direct => Prompt::new(vec![Step::Response])
                .with_message(InteractionMessage::info(
                    Phase::Pending,
                    "device.open",
                    format!("Open the Bitcoin app on your {}.", kind),
                ))
                .with_message(InteractionMessage::info(
                    Phase::Active,
                    "device.export",
                    format!("Confirm the export of {} on your {} if asked.", path, kind),
                )),
            Modality::File => Prompt::new(vec![Step::Response]).with_message(
                InteractionMessage::info(
                    Phase::Pending,
                    "coldcard.export",
                    "On your Coldcard go to Advanced > MicroSD Card > Export Wallet > Generic \
                     JSON, then upload the exported file.",
                ),
            ),
            Modality::Qr => {
                let command = format!("export-xpub {}", path);
                Prompt::new(vec![Step::Request, Step::Response])
                    .with_request(Request::Command(command.clone()))
                    .with_message(InteractionMessage::info(
                        Phase::Pending,
                        "hermit.command",
                        command,
                    ))
                    .with_message(InteractionMessage::info(
                        Phase::Pending,
                        "hermit.scan",
                        "Scan the command with Hermit, then paste the data it displays below.",
                    ))
            }
        };
        Box::new(prompt)
    }

    fn expected(&self) -> Result<Value, TestError> {
        self.ctx
            .seed
            .xpub_at(&self.path)
            .map(|xpub| self.to_value(&xpub))
            .map_err(|e| TestError::Expected(e.to_string()))
    }

    async fn actual(&self) -> Result<Value, TestError> {
        let xpub = self.ctx.device.extended_public_key(&self.path).await?;
        Ok(self.to_value(&normalize_xpub(&xpub.to_string(), self.ctx.network)?))
    }

    fn parse(&self, data: &[u8]) -> Result<Value, TestError> {
        let export: Value =
            serde_json::from_slice(data).map_err(|e| TestError::Parse(e.to_string()))?;
        let xpub = find_exported_xpub(&export, &self.path).ok_or_else(|| {
            TestError::Parse(format!("No key exported at {}", self.path_str()))
        })?;
        Ok(self.to_value(&normalize_xpub(xpub, self.ctx.network)?))
    }

    fn postprocess(&self, scanned: &str) -> Result<Value, TestError> {
        let scanned = scanned.trim();
        let xpub = if scanned.starts_with('{') {
            let value: Value =
                serde_json::from_str(scanned).map_err(|e| TestError::Parse(e.to_string()))?;
            match value.get("xpub").and_then(Value::as_str) {
                Some(xpub) => normalize_xpub(xpub, self.ctx.network)?,
                None => return Err(TestError::Parse("No xpub in the scanned data".to_string())),
            }
        } else {
            normalize_xpub(scanned, self.ctx.network)?
        };
        Ok(self.to_value(&xpub))
    }
}
