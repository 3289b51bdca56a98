//! Rendering of a single test run.

use hwtest::{
    diff::{Segment, SegmentKind},
    interaction::Level,
    keystore::{KeystoreKind, Modality},
    result::{FailureReport, RunMessage},
    run::{TestRun, TestStatus},
    test::Test,
};
use hwtest_ui::{
    component::{button, card, code, separation, text},
    font, theme,
    widget::*,
};
use iced::{widget::qr_code, Alignment, Length};

use super::message::TestMessage;

/// Printed on the keystore screen, not worth repeating next to the QR code.
const HERMIT_COMMAND: &str = "hermit.command";

/// What is displayed for a run, derived from the keystore kind and the run status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub json_reader: bool,
    pub signing_downloads: bool,
    pub psbt_reader: bool,
    pub messages: bool,
    pub start_button: bool,
    pub request_qr: bool,
    pub scan_reader: bool,
    pub running: bool,
    pub reset_button: bool,
}

pub fn controls(kind: KeystoreKind, status: TestStatus, test: &dyn Test) -> Controls {
    let pending = status == TestStatus::Pending;
    let complete = status.is_complete();
    let signing = test.unsigned_transaction().is_some();
    let mut controls = Controls {
        running: status == TestStatus::Active,
        reset_button: complete,
        ..Default::default()
    };
    match kind.modality() {
        Modality::File => {
            controls.json_reader = !signing && pending;
            controls.signing_downloads = signing && !complete;
            controls.psbt_reader = signing && pending;
        }
        Modality::Qr => {
            controls.request_qr = pending && test.interaction().starts_with_request();
            controls.scan_reader = !complete;
        }
        Modality::Direct => {
            controls.messages = status.phase().is_some();
            controls.start_button = pending;
        }
    }
    controls
}

/// Instructions of the test for the current status.
pub fn instructions(test: &dyn Test, status: TestStatus) -> Vec<(Level, String)> {
    let Some(phase) = status.phase() else {
        return Vec::new();
    };
    test.interaction()
        .messages_for(phase)
        .into_iter()
        .filter(|m| m.code != HERMIT_COMMAND)
        .map(|m| (m.level, m.text.clone()))
        .collect()
}

/// The message the space bar sends to start a pending run.
pub fn start_message(kind: KeystoreKind) -> TestMessage {
    match kind.modality() {
        Modality::File => TestMessage::UploadFile,
        Modality::Direct | Modality::Qr => TestMessage::Start,
    }
}

fn instructions_view<'a>(test: &dyn Test, status: TestStatus) -> Column<'a, TestMessage> {
    instructions(test, status)
        .into_iter()
        .fold(Column::new().spacing(5), |col, (level, message)| {
            let t = text::p1_regular(message);
            col.push(match level {
                Level::Info => t,
                Level::Warning => t.style(theme::text::warning),
                Level::Error => t.style(theme::text::error),
            })
        })
}

fn segment<'a>(segment: &Segment) -> Container<'a, TestMessage> {
    Container::new(text::monospace(segment.value.clone())).style(match segment.kind {
        SegmentKind::Added => theme::diff::added,
        SegmentKind::Removed => theme::diff::removed,
        SegmentKind::Common => theme::diff::common,
    })
}

/// Content of a labelled part of a failure report.
#[derive(Debug, PartialEq)]
enum Section<'r> {
    Code(&'r str),
    Diff(&'r [Segment]),
}

fn failure_sections(report: &FailureReport) -> Vec<(&'static str, Section)> {
    let mut sections = vec![
        ("Expected:", Section::Code(&report.expected)),
        ("Actual:", Section::Code(&report.actual)),
    ];
    if let Some(diff) = &report.diff {
        sections.push(("Diff:", Section::Diff(diff)));
    }
    sections
}

fn failure<'a>(report: &FailureReport) -> Column<'a, TestMessage> {
    failure_sections(report).into_iter().fold(
        Column::new().spacing(10).push(text::p1_bold("Test failed")),
        |col, (label, section)| {
            let col = col.push(text::caption(label));
            match section {
                Section::Code(value) => col.push(code(value.to_string())),
                Section::Diff(diff) => col.push(
                    diff.iter()
                        .fold(Row::new(), |row, s| row.push(segment(s)))
                        .wrap(),
                ),
            }
        },
    )
}

fn result<'a>(run: &TestRun) -> Option<Element<'a, TestMessage>> {
    match (run.status, &run.message) {
        (TestStatus::Success, _) => Some(card::success(text::p1_bold("Test passed")).into()),
        (TestStatus::Failure, Some(RunMessage::Failure(report))) => {
            Some(card::error(failure(report)).width(Length::Fill).into())
        }
        (TestStatus::Error, Some(RunMessage::Error(message))) => Some(
            card::warning(
                Column::new()
                    .spacing(10)
                    .push(text::p1_bold("Test error"))
                    .push(text::p1_regular(message.clone())),
            )
            .width(Length::Fill)
            .into(),
        ),
        _ => None,
    }
}

/// The request to display, a QR code if it fits in one.
fn request<'a>(
    test: &dyn Test,
    qr: Option<&'a qr_code::Data>,
) -> Option<Element<'a, TestMessage>> {
    if let Some(data) = qr {
        return Some(
            Container::new(QRCode::new(data).cell_size(8))
                .padding(10)
                .style(theme::container::foreground)
                .into(),
        );
    }
    test.interaction()
        .request()
        .map(|request| code(request).into())
}

fn scan_reader<'a>(status: TestStatus, scanned: &'a str) -> Element<'a, TestMessage> {
    if status == TestStatus::Pending {
        return button::primary("Scan QR Codes From Hermit")
            .on_press(TestMessage::Start)
            .into();
    }
    Column::new()
        .spacing(10)
        .push(
            TextInput::new("Paste the data displayed by Hermit", scanned)
                .on_input(TestMessage::ScannedEdited)
                .on_submit(TestMessage::SubmitScanned)
                .font(font::MONOSPACE)
                .padding(10)
                .style(theme::text_input::primary),
        )
        .push(
            Row::new()
                .spacing(10)
                .push(
                    button::primary("Submit").on_press_maybe(
                        (!scanned.trim().is_empty()).then_some(TestMessage::SubmitScanned),
                    ),
                )
                .push(button::secondary("Clear").on_press(TestMessage::Reset)),
        )
        .into()
}

pub fn view<'a>(
    index: usize,
    run: &'a TestRun,
    kind: KeystoreKind,
    scanned: &'a str,
    qr: Option<&'a qr_code::Data>,
) -> Element<'a, TestMessage> {
    let test = run.test.as_ref();
    let status = run.status;
    let controls = controls(kind, status, test);

    let mut col = Column::new()
        .spacing(15)
        .push(
            Column::new()
                .spacing(5)
                .push(text::h3(test.name()))
                .push(text::caption(format!("Test {}", index + 1)).style(theme::text::secondary)),
        )
        .push(text::p1_regular(test.description()))
        .push(separation());

    if controls.messages || (kind.is_indirect() && !status.is_complete()) {
        col = col.push(instructions_view(test, status));
    }

    if controls.signing_downloads {
        col = col.push(
            Row::new()
                .spacing(10)
                .push(button::secondary("Download PSBT").on_press(TestMessage::DownloadPsbt))
                .push(
                    button::secondary("Download wallet config")
                        .on_press(TestMessage::DownloadWalletConfig),
                ),
        );
    }
    if controls.json_reader {
        col = col.push(button::primary("Upload JSON file").on_press(TestMessage::UploadFile));
    }
    if controls.psbt_reader {
        col = col.push(button::primary("Upload signed PSBT").on_press(TestMessage::UploadFile));
    }
    if controls.request_qr {
        if let Some(request) = request(test, qr) {
            col = col.push(request);
        }
    }
    if controls.scan_reader {
        col = col.push(scan_reader(status, scanned));
    }

    let mut buttons = Row::new().spacing(10).align_y(Alignment::Center);
    if controls.start_button {
        buttons = buttons.push(button::primary("Start Test").on_press(TestMessage::Start));
    }
    if controls.running {
        buttons = buttons.push(button::primary("Running test..."));
    }
    if controls.reset_button {
        buttons = buttons.push(button::secondary("Reset Test").on_press(TestMessage::Reset));
    }
    col = col.push(buttons);

    if let Some(result) = result(run) {
        col = col.push(result);
    }

    card::simple(col).width(Length::Fill).into()
}

/// Short label of a status, for the list of tests.
pub fn status_label(status: TestStatus) -> &'static str {
    match status {
        TestStatus::Pending => "pending",
        TestStatus::Active => "running",
        TestStatus::Success => "passed",
        TestStatus::Failure => "failed",
        TestStatus::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwtest::{
        device::HwiDevice,
        miniscript::bitcoin::{
            absolute, bip32::DerivationPath, psbt::Psbt, transaction, Network, Transaction,
        },
        seed::TestSeed,
        suite::{ExportPublicKeyTest, SignPsbtTest, TestContext},
        test::TestParams,
    };
    use std::{str::FromStr, sync::Arc};

    fn context(kind: KeystoreKind) -> TestContext {
        TestContext {
            network: Network::Testnet,
            kind,
            seed: Arc::new(TestSeed::new(Network::Testnet).unwrap()),
            device: Arc::new(HwiDevice::new(kind)),
        }
    }

    fn export(kind: KeystoreKind) -> ExportPublicKeyTest {
        ExportPublicKeyTest::new(
            context(kind),
            DerivationPath::from_str("m/84'/1'/0'").unwrap(),
        )
    }

    fn sign(kind: KeystoreKind) -> SignPsbtTest {
        let psbt = Psbt::from_unsigned_tx(Transaction {
            version: transaction::Version::TWO,
            lock_time: absolute::LockTime::ZERO,
            input: Vec::new(),
            output: Vec::new(),
        })
        .unwrap();
        SignPsbtTest::new(
            context(kind),
            psbt,
            TestParams {
                format: "P2WSH".to_string(),
                derivation: "m/48'/1'/0'/2'".to_string(),
                extended_public_keys: Vec::new(),
            },
        )
    }

    #[test]
    fn direct_keystore() {
        let test = export(KeystoreKind::Ledger);
        let pending = controls(KeystoreKind::Ledger, TestStatus::Pending, &test);
        assert_eq!(
            pending,
            Controls {
                messages: true,
                start_button: true,
                ..Default::default()
            }
        );
        let active = controls(KeystoreKind::Ledger, TestStatus::Active, &test);
        assert_eq!(
            active,
            Controls {
                messages: true,
                running: true,
                ..Default::default()
            }
        );
        for status in [TestStatus::Success, TestStatus::Failure, TestStatus::Error] {
            assert_eq!(
                controls(KeystoreKind::Trezor, status, &test),
                Controls {
                    reset_button: true,
                    ..Default::default()
                }
            );
        }
    }

    #[test]
    fn coldcard_export() {
        let test = export(KeystoreKind::Coldcard);
        let c = controls(KeystoreKind::Coldcard, TestStatus::Pending, &test);
        assert!(c.json_reader);
        assert!(!c.signing_downloads && !c.psbt_reader);
        assert!(!c.messages && !c.start_button);

        let c = controls(KeystoreKind::Coldcard, TestStatus::Active, &test);
        assert!(!c.json_reader && c.running);
    }

    #[test]
    fn coldcard_signature() {
        let test = sign(KeystoreKind::Coldcard);
        let c = controls(KeystoreKind::Coldcard, TestStatus::Pending, &test);
        assert!(c.signing_downloads && c.psbt_reader);
        assert!(!c.json_reader);

        let c = controls(KeystoreKind::Coldcard, TestStatus::Active, &test);
        assert!(c.signing_downloads && !c.psbt_reader);

        let c = controls(KeystoreKind::Coldcard, TestStatus::Success, &test);
        assert!(!c.signing_downloads && c.reset_button);
    }

    #[test]
    fn hermit() {
        let test = export(KeystoreKind::Hermit);
        let c = controls(KeystoreKind::Hermit, TestStatus::Pending, &test);
        assert!(c.request_qr && c.scan_reader);
        assert!(!c.start_button && !c.messages);

        let c = controls(KeystoreKind::Hermit, TestStatus::Active, &test);
        assert!(!c.request_qr && c.scan_reader && c.running);

        let c = controls(KeystoreKind::Hermit, TestStatus::Failure, &test);
        assert!(!c.scan_reader && c.reset_button);
    }

    #[test]
    fn hermit_command_is_not_repeated() {
        let test = export(KeystoreKind::Hermit);
        let messages = instructions(&test, TestStatus::Pending);
        assert_eq!(messages.len(), 1);
        assert!(!messages[0].1.starts_with("export-xpub"));
        assert!(instructions(&test, TestStatus::Success).is_empty());
    }

    #[test]
    fn instructions_follow_status() {
        let test = export(KeystoreKind::Ledger);
        assert_eq!(
            instructions(&test, TestStatus::Pending),
            vec![(Level::Info, "Open the Bitcoin app on your Ledger.".to_string())]
        );
        assert_eq!(
            instructions(&test, TestStatus::Active),
            vec![(
                Level::Info,
                "Confirm the export of m/84'/1'/0' on your Ledger if asked.".to_string()
            )]
        );

        let coldcard = sign(KeystoreKind::Coldcard);
        let messages = instructions(&coldcard, TestStatus::Pending);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].0, Level::Warning);
    }

    #[test]
    fn start_shortcut_per_keystore() {
        assert!(matches!(
            start_message(KeystoreKind::Coldcard),
            TestMessage::UploadFile
        ));
        assert!(matches!(
            start_message(KeystoreKind::Hermit),
            TestMessage::Start
        ));
        assert!(matches!(
            start_message(KeystoreKind::Trezor),
            TestMessage::Start
        ));
    }

    #[test]
    fn failure_report_sections() {
        let mut report = FailureReport {
            expected: "tpubA m/84'".to_string(),
            actual: "tpubB m/84'".to_string(),
            diff: None,
        };
        assert_eq!(
            failure_sections(&report),
            vec![
                ("Expected:", Section::Code("tpubA m/84'")),
                ("Actual:", Section::Code("tpubB m/84'")),
            ]
        );

        let diff = hwtest::diff::diff_words(&report.expected, &report.actual);
        report.diff = Some(diff.clone());
        let sections = failure_sections(&report);
        let labels: Vec<&str> = sections.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["Expected:", "Actual:", "Diff:"]);
        assert_eq!(sections[2].1, Section::Diff(&diff));
    }
}
