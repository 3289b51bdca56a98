//! Lifecycle of a single test run.
//!
//! ```text
//! pending -> active -> success | failure | error
//!    ^                            |
//!    +----------- reset ----------+
//! ```
//!
//! Operations on the test are futures handed back to the caller, the run only records
//! transitions. Every start bumps the attempt counter so a result computed for a run that was
//! reset in the meantime is discarded.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::{
    interaction::Phase,
    keystore::{KeystoreKind, Modality},
    result::{format_message, RunMessage},
    test::{Test, TestResult},
};

pub type PendingResult = Pin<Box<dyn Future<Output = TestResult> + Send + 'static>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestStatus {
    #[default]
    Pending,
    Active,
    Success,
    Failure,
    Error,
}

impl TestStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Success | Self::Failure | Self::Error)
    }

    /// Interaction phase matching the status, completed runs have none.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Pending => Some(Phase::Pending),
            Self::Active => Some(Phase::Active),
            _ => None,
        }
    }
}

impl From<&TestResult> for TestStatus {
    fn from(result: &TestResult) -> Self {
        match result {
            TestResult::Success => Self::Success,
            TestResult::Failure { .. } => Self::Failure,
            TestResult::Error(_) => Self::Error,
        }
    }
}

pub struct TestRun {
    pub status: TestStatus,
    pub message: Option<RunMessage>,
    pub test: Arc<dyn Test>,
    attempt: u64,
}

impl std::fmt::Debug for TestRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRun")
            .field("test", &self.test.name())
            .field("status", &self.status)
            .field("message", &self.message)
            .finish()
    }
}

impl TestRun {
    pub fn new(test: Arc<dyn Test>) -> Self {
        Self {
            status: TestStatus::Pending,
            message: None,
            test,
            attempt: 0,
        }
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    fn activate(&mut self) {
        self.status = TestStatus::Active;
        self.message = None;
        self.attempt += 1;
    }

    /// Marks the run as active and returns the operation to await, if any: QR-driven keystores
    /// answer out of band and are resolved with [`TestRun::resolve`].
    pub fn start(&mut self, kind: KeystoreKind) -> Option<PendingResult> {
        self.activate();
        if kind.modality() == Modality::Qr {
            return None;
        }
        let test = self.test.clone();
        Some(Box::pin(async move { test.run().await }))
    }

    /// Marks the run as active and returns the parsing of data exported by the keystore.
    pub fn start_parse(&mut self, data: Vec<u8>) -> PendingResult {
        self.activate();
        let test = self.test.clone();
        Box::pin(async move { test.run_parse(data).await })
    }

    /// Resolves the run with data scanned from the keystore. Returns the error message to
    /// notify, if any.
    pub fn resolve(&mut self, scanned: &str) -> Option<String> {
        if self.status != TestStatus::Active {
            self.activate();
        }
        let result = match self.test.postprocess(scanned) {
            Ok(actual) => self.test.resolve(actual),
            Err(e) => e.into(),
        };
        self.complete(self.attempt, result)
    }

    /// Records the result of the given attempt. Returns the error message to notify, if any.
    pub fn complete(&mut self, attempt: u64, result: TestResult) -> Option<String> {
        if self.status != TestStatus::Active || attempt != self.attempt {
            tracing::debug!(
                "Discarding result of attempt {} for test '{}'",
                attempt,
                self.test.name()
            );
            return None;
        }
        self.status = TestStatus::from(&result);
        self.message = format_message(&result);
        tracing::info!("Test '{}' ended: {:?}", self.test.name(), self.status);
        match result {
            TestResult::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.status = TestStatus::Pending;
        self.message = None;
    }
}

/// Where the keyboard focus is when a key is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    TextInput,
    Elsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Start,
    Next,
}

/// Action of the space bar on the current run.
pub fn on_space(status: TestStatus, focus: Focus, is_last: bool) -> Option<Shortcut> {
    if focus == Focus::TextInput {
        return None;
    }
    match status {
        TestStatus::Active => None,
        TestStatus::Pending => Some(Shortcut::Start),
        _ if !is_last => Some(Shortcut::Next),
        _ => None,
    }
}
