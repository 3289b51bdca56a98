//! The tests run against a keystore and the progression through them.

pub mod file;
pub mod pubkey;
pub mod psbt;

use std::{str::FromStr, sync::Arc};

use miniscript::bitcoin::{bip32::DerivationPath, Network};

use crate::{
    device::Device,
    keystore::KeystoreKind,
    run::{PendingResult, TestRun, TestStatus},
    seed::TestSeed,
    test::{Test, TestResult},
};

pub use file::{SuiteError, SuiteFile, TestDefinition};
pub use psbt::SignPsbtTest;
pub use pubkey::ExportPublicKeyTest;

/// Paths of the public key exports every keystore goes through.
pub const DEFAULT_EXPORT_PATHS: [&str; 4] = [
    "m/45'/0'/0'",
    "m/48'/1'/0'/1'",
    "m/48'/1'/0'/2'",
    "m/84'/1'/0'",
];

/// What a test needs to know about the keystore under test.
#[derive(Clone)]
pub struct TestContext {
    pub network: Network,
    pub kind: KeystoreKind,
    pub seed: Arc<TestSeed>,
    pub device: Arc<dyn Device>,
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("network", &self.network)
            .field("kind", &self.kind)
            .finish()
    }
}

pub fn network_label(network: Network) -> &'static str {
    match network {
        Network::Bitcoin => "Mainnet",
        Network::Signet => "Signet",
        Network::Regtest => "Regtest",
        _ => "Testnet",
    }
}

/// Paths are displayed with their `m/` prefix.
pub fn display_path(path: &DerivationPath) -> String {
    let path = path.to_string();
    if path.starts_with('m') {
        path
    } else {
        format!("m/{}", path)
    }
}

pub fn default_suite(ctx: &TestContext) -> Vec<Arc<dyn Test>> {
    DEFAULT_EXPORT_PATHS
        .iter()
        .filter_map(|path| DerivationPath::from_str(path).ok())
        .map(|path| Arc::new(ExportPublicKeyTest::new(ctx.clone(), path)) as Arc<dyn Test>)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub pending: usize,
    pub active: usize,
    pub success: usize,
    pub failure: usize,
    pub error: usize,
}

/// Runs of the suite tests for one keystore, in order.
#[derive(Debug)]
pub struct TestSuiteRun {
    pub kind: KeystoreKind,
    runs: Vec<TestRun>,
    current: usize,
}

impl TestSuiteRun {
    pub fn new(kind: KeystoreKind, tests: Vec<Arc<dyn Test>>) -> Self {
        Self {
            kind,
            runs: tests.into_iter().map(TestRun::new).collect(),
            current: 0,
        }
    }

    pub fn runs(&self) -> &[TestRun] {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&TestRun> {
        self.runs.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut TestRun> {
        self.runs.get_mut(self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.runs.len()
    }

    pub fn next(&mut self) {
        if !self.is_last() {
            self.current += 1;
        }
    }

    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub fn select(&mut self, index: usize) {
        if index < self.runs.len() {
            self.current = index;
        }
    }

    pub fn start(&mut self, index: usize) -> Option<PendingResult> {
        let kind = self.kind;
        self.runs.get_mut(index).and_then(|run| run.start(kind))
    }

    pub fn start_parse(&mut self, index: usize, data: Vec<u8>) -> Option<PendingResult> {
        self.runs.get_mut(index).map(|run| run.start_parse(data))
    }

    pub fn resolve(&mut self, index: usize, scanned: &str) -> Option<String> {
        self.runs.get_mut(index).and_then(|run| run.resolve(scanned))
    }

    /// Records the result of a run, returns the error message to notify if any.
    pub fn end(&mut self, index: usize, attempt: u64, result: TestResult) -> Option<String> {
        self.runs
            .get_mut(index)
            .and_then(|run| run.complete(attempt, result))
    }

    pub fn reset(&mut self, index: usize) {
        if let Some(run) = self.runs.get_mut(index) {
            run.reset();
        }
    }

    /// Whether any run awaits a result.
    pub fn is_running(&self) -> bool {
        self.runs.iter().any(|run| run.status == TestStatus::Active)
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for run in &self.runs {
            match run.status {
                TestStatus::Pending => summary.pending += 1,
                TestStatus::Active => summary.active += 1,
                TestStatus::Success => summary.success += 1,
                TestStatus::Failure => summary.failure += 1,
                TestStatus::Error => summary.error += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::device::DeviceError;
    use async_trait::async_trait;
    use miniscript::bitcoin::{bip32::Xpub, psbt::Psbt};

    /// Answers like a keystore loaded with the test seed.
    pub struct SeedDevice(pub Arc<TestSeed>);

    #[async_trait]
    impl Device for SeedDevice {
        async fn extended_public_key(&self, path: &DerivationPath) -> Result<Xpub, DeviceError> {
            self.0
                .xpub_at(path)
                .map_err(|e| DeviceError::Hwi(e.to_string()))
        }

        async fn sign_psbt(&self, psbt: Psbt) -> Result<Psbt, DeviceError> {
            Ok(super::psbt::tests::sign_with_seed(psbt, &self.0))
        }
    }

    pub fn context(kind: KeystoreKind) -> TestContext {
        let seed = Arc::new(TestSeed::new(Network::Testnet).unwrap());
        TestContext {
            network: Network::Testnet,
            kind,
            device: Arc::new(SeedDevice(seed.clone())),
            seed,
        }
    }

    #[test]
    fn default_paths() {
        let suite = default_suite(&context(KeystoreKind::Ledger));
        assert_eq!(
            suite.iter().map(|t| t.name()).collect::<Vec<_>>(),
            vec![
                "Export xpub at m/45'/0'/0'",
                "Export xpub at m/48'/1'/0'/1'",
                "Export xpub at m/48'/1'/0'/2'",
                "Export xpub at m/84'/1'/0'",
            ]
        );
    }

    #[test]
    fn navigation() {
        let ctx = context(KeystoreKind::Coldcard);
        let mut suite = TestSuiteRun::new(ctx.kind, default_suite(&ctx));
        assert_eq!(suite.len(), 4);
        assert_eq!(suite.current_index(), 0);
        suite.previous();
        assert_eq!(suite.current_index(), 0);
        suite.next();
        suite.next();
        suite.next();
        assert!(suite.is_last());
        suite.next();
        assert_eq!(suite.current_index(), 3);
        suite.select(1);
        assert_eq!(suite.current_index(), 1);
        suite.select(10);
        assert_eq!(suite.current_index(), 1);
        assert!(TestSuiteRun::new(KeystoreKind::Hermit, Vec::new()).is_last());
    }

    #[tokio::test]
    async fn summary_counts() {
        let ctx = context(KeystoreKind::Ledger);
        let mut suite = TestSuiteRun::new(ctx.kind, default_suite(&ctx));
        let pending = suite.start(0).unwrap();
        let attempt = suite.runs()[0].attempt();
        assert_eq!(suite.end(0, attempt, pending.await), None);
        assert!(!suite.is_running());
        let _in_flight = suite.start(1).unwrap();
        assert!(suite.is_running());
        assert_eq!(
            suite.summary(),
            Summary {
                pending: 2,
                active: 1,
                success: 1,
                failure: 0,
                error: 0,
            }
        );
        suite.reset(1);
        assert_eq!(suite.summary().pending, 3);
        assert!(!suite.is_running());
    }

    #[test]
    fn hermit_runs_are_resolved() {
        let ctx = context(KeystoreKind::Hermit);
        let mut suite = TestSuiteRun::new(ctx.kind, default_suite(&ctx));
        assert!(suite.start(0).is_none());
        assert_eq!(suite.runs()[0].status, TestStatus::Active);
        assert!(suite.resolve(0, "not an xpub").is_some());
        assert_eq!(suite.runs()[0].status, TestStatus::Error);
    }
}
