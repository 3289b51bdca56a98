use std::str::FromStr;

use async_trait::async_trait;
use miniscript::bitcoin::{bip32::Fingerprint, psbt::Psbt};
use serde_json::Value;

use super::{network_label, TestContext};
use crate::{
    interaction::{Interaction, InteractionMessage, Phase, Prompt, Request, Step},
    keystore::Modality,
    test::{Test, TestError, TestParams},
};

/// Number of inputs carrying a signature made by a key of the given master fingerprint.
pub fn signed_inputs(psbt: &Psbt, fingerprint: Fingerprint) -> usize {
    psbt.inputs
        .iter()
        .filter(|input| {
            input.partial_sigs.keys().any(|pk| {
                input
                    .bip32_derivation
                    .get(&pk.inner)
                    .is_some_and(|(fg, _)| *fg == fingerprint)
            })
        })
        .count()
}

/// Reads a PSBT file, binary or base64.
fn read_psbt(data: &[u8]) -> Result<Psbt, TestError> {
    if let Ok(psbt) = Psbt::deserialize(data) {
        return Ok(psbt);
    }
    let text = std::str::from_utf8(data).map_err(|e| TestError::Parse(e.to_string()))?;
    Psbt::from_str(text.trim()).map_err(|e| TestError::Parse(e.to_string()))
}

/// Signature of a multisig transaction the keystore cosigns.
#[derive(Debug)]
pub struct SignPsbtTest {
    ctx: TestContext,
    psbt: Psbt,
    params: TestParams,
}

impl SignPsbtTest {
    pub fn new(ctx: TestContext, psbt: Psbt, params: TestParams) -> Self {
        Self { ctx, psbt, params }
    }

    fn count(&self, psbt: &Psbt) -> Value {
        Value::from(signed_inputs(psbt, self.ctx.seed.fingerprint()))
    }
}

#[async_trait]
impl Test for SignPsbtTest {
    fn name(&self) -> String {
        format!(
            "Sign {} {} transaction",
            network_label(self.ctx.network),
            self.params.format
        )
    }

    fn description(&self) -> String {
        format!(
            "Sign every input of a {} {} multisig transaction, keys derived at {}.",
            network_label(self.ctx.network),
            self.params.format,
            self.params.derivation
        )
    }

    fn interaction(&self) -> Box<dyn Interaction> {
        let kind = self.ctx.kind;
        let prompt = Prompt::new(vec![Step::Request, Step::Response])
            .with_request(Request::Psbt(Box::new(self.psbt.clone())));
        let prompt = match kind.modality() {
            Modality::Direct => prompt
                .with_message(InteractionMessage::info(
                    Phase::Pending,
                    "device.open",
                    format!("Open the Bitcoin app on your {}.", kind),
                ))
                .with_message(InteractionMessage::info(
                    Phase::Active,
                    "device.sign",
                    format!("Review and approve the transaction on your {}.", kind),
                )),
            Modality::File => prompt
                .with_message(InteractionMessage::warning(
                    Phase::Pending,
                    "coldcard.wallet",
                    "Import the wallet configuration on your Coldcard before signing: Settings > \
                     Multisig Wallets > Import from SD.",
                ))
                .with_message(InteractionMessage::info(
                    Phase::Pending,
                    "coldcard.sign",
                    "Copy the transaction to the MicroSD card, sign it with Ready To Sign and \
                     upload the signed file.",
                )),
            Modality::Qr => prompt
                .with_message(InteractionMessage::info(
                    Phase::Pending,
                    "hermit.command",
                    "sign-bitcoin",
                ))
                .with_message(InteractionMessage::info(
                    Phase::Pending,
                    "hermit.scan",
                    "Run sign-bitcoin on Hermit, scan the transaction, then paste the signed \
                     transaction it displays below.",
                )),
        };
        Box::new(prompt)
    }

    fn params(&self) -> Option<&TestParams> {
        Some(&self.params)
    }

    fn unsigned_transaction(&self) -> Option<&Psbt> {
        Some(&self.psbt)
    }

    fn expected(&self) -> Result<Value, TestError> {
        Ok(Value::from(self.psbt.inputs.len()))
    }

    async fn actual(&self) -> Result<Value, TestError> {
        let signed = self.ctx.device.sign_psbt(self.psbt.clone()).await?;
        Ok(self.count(&signed))
    }

    fn parse(&self, data: &[u8]) -> Result<Value, TestError> {
        Ok(self.count(&read_psbt(data)?))
    }

    fn postprocess(&self, scanned: &str) -> Result<Value, TestError> {
        let psbt = Psbt::from_str(scanned.trim()).map_err(|e| TestError::Parse(e.to_string()))?;
        Ok(self.count(&psbt))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        download::{psbt_download, wallet_config_download},
        keystore::KeystoreKind,
        seed::TestSeed,
        suite::tests::context,
        test::{ExtendedPublicKey, TestResult},
    };
    use chrono::{TimeZone, Utc};
    use miniscript::bitcoin::{
        absolute, bip32::DerivationPath, ecdsa, secp256k1, transaction, Amount, OutPoint,
        ScriptBuf, Sequence, Transaction, TxIn, TxOut, Witness,
    };
    use serde_json::json;

    const DERIVATION: &str = "m/48'/1'/0'/2'";

    /// Adds a signature for the test seed key to every input it derives.
    pub fn sign_with_seed(mut psbt: Psbt, seed: &TestSeed) -> Psbt {
        let secp = secp256k1::Secp256k1::new();
        let secret = secp256k1::SecretKey::from_slice(&[1; 32]).unwrap();
        let sig = secp.sign_ecdsa(&secp256k1::Message::from_digest([2; 32]), &secret);
        let fingerprint = seed.fingerprint();
        for input in &mut psbt.inputs {
            let keys: Vec<_> = input
                .bip32_derivation
                .iter()
                .filter(|(_, (fg, _))| *fg == fingerprint)
                .map(|(pk, _)| *pk)
                .collect();
            for pk in keys {
                input.partial_sigs.insert(
                    miniscript::bitcoin::PublicKey::new(pk),
                    ecdsa::Signature::sighash_all(sig),
                );
            }
        }
        psbt
    }

    pub fn unsigned_psbt(seed: &TestSeed, inputs: u32) -> Psbt {
        let tx = Transaction {
            version: transaction::Version::TWO,
            lock_time: absolute::LockTime::ZERO,
            input: (0..inputs)
                .map(|vout| TxIn {
                    previous_output: OutPoint {
                        vout,
                        ..OutPoint::null()
                    },
                    script_sig: ScriptBuf::new(),
                    sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
                    witness: Witness::new(),
                })
                .collect(),
            output: vec![TxOut {
                value: Amount::from_sat(10_000),
                script_pubkey: ScriptBuf::new(),
            }],
        };
        let mut psbt = Psbt::from_unsigned_tx(tx).unwrap();
        let path = DerivationPath::from_str(DERIVATION).unwrap();
        let xpub = seed.xpub_at(&path).unwrap();
        for input in &mut psbt.inputs {
            input
                .bip32_derivation
                .insert(xpub.public_key, (seed.fingerprint(), path.clone()));
        }
        psbt
    }

    fn test(kind: KeystoreKind, inputs: u32) -> SignPsbtTest {
        let ctx = context(kind);
        let psbt = unsigned_psbt(&ctx.seed, inputs);
        let params = TestParams {
            format: "P2WSH".to_string(),
            derivation: DERIVATION.to_string(),
            extended_public_keys: vec![ExtendedPublicKey {
                root_fingerprint: ctx.seed.fingerprint(),
                base58: ctx
                    .seed
                    .xpub_at(&DerivationPath::from_str(DERIVATION).unwrap())
                    .unwrap()
                    .to_string(),
            }],
        };
        SignPsbtTest::new(ctx, psbt, params)
    }

    #[tokio::test]
    async fn direct_signature() {
        let test = test(KeystoreKind::Ledger, 2);
        assert_eq!(test.name(), "Sign Testnet P2WSH transaction");
        assert_eq!(test.expected().unwrap(), json!(2));
        assert_eq!(test.run().await, TestResult::Success);
    }

    #[tokio::test]
    async fn coldcard_files() {
        let test = test(KeystoreKind::Coldcard, 3);
        let unsigned = test.unsigned_transaction().unwrap().clone();
        assert_eq!(signed_inputs(&unsigned, test.ctx.seed.fingerprint()), 0);

        let signed = sign_with_seed(unsigned.clone(), &test.ctx.seed);
        assert_eq!(test.run_parse(signed.serialize()).await, TestResult::Success);
        assert_eq!(
            test.run_parse(signed.to_string().into_bytes()).await,
            TestResult::Success
        );
        match test.run_parse(unsigned.serialize()).await {
            TestResult::Failure {
                expected,
                actual,
                diff,
            } => {
                assert_eq!(expected, json!(3));
                assert_eq!(actual, json!(0));
                assert!(diff.is_none());
            }
            r => panic!("unexpected {:?}", r),
        }
        assert!(test.run_parse(b"garbage".to_vec()).await.is_error());
    }

    #[test]
    fn coldcard_downloads() {
        let test = test(KeystoreKind::Coldcard, 1);
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 32, 0).unwrap();
        let download = psbt_download(&test, &now).unwrap();
        assert_eq!(download.filename, "1432-P2WSH-T.psbt");
        assert_eq!(download.body, test.psbt.serialize());

        let config = wallet_config_download(&test.name(), test.params()).unwrap();
        assert_eq!(config.filename, "wc-p2wsh-T.txt");
        let body = String::from_utf8(config.body).unwrap();
        assert!(body.contains("Format: P2WSH\nDerivation: m/48'/1'/0'/2'\n\n"));
        assert!(body.ends_with("\r\n"));
    }

    #[test]
    fn hermit_request() {
        let test = test(KeystoreKind::Hermit, 1);
        let interaction = test.interaction();
        assert!(interaction.starts_with_request());
        assert!(matches!(interaction.request(), Some(Request::Psbt(_))));
        let signed = sign_with_seed(test.psbt.clone(), &test.ctx.seed);
        assert_eq!(test.postprocess(&signed.to_string()).unwrap(), json!(1));
        assert!(test.postprocess("").is_err());
    }
}
