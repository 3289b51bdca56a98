pub mod message;
pub mod picker;
pub mod run;
pub mod seed;

use std::sync::Arc;

use iced::{
    event::{self, Event},
    keyboard,
    widget::{focus_next, focus_previous, qr_code},
    window::{self, Id},
    Alignment, Length, Size, Subscription, Task,
};
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;

use hwtest::{
    detect::MetadataDetector,
    device::{HwiDetector, HwiDevice},
    download::{psbt_download, wallet_config_download, Download, DownloadError},
    interaction::Interaction,
    keystore::{KeystoreKind, KeystoreSelection, Modality},
    miniscript::bitcoin::Network,
    run::{on_space, Focus, PendingResult, Shortcut, TestStatus},
    seed::TestSeed,
    suite::{default_suite, SuiteFile, TestContext, TestSuiteRun},
    test::Test,
};
use hwtest_ui::{
    component::{button, card, notification, text},
    theme,
    widget::*,
};

use crate::{
    dir::HwTestDirectory,
    export,
    logger::setup_logger,
    settings::{GlobalSettings, KeystoreSettings, WindowConfig},
    VERSION,
};

pub use message::{Key, Message, PickerMessage, TestMessage};

#[derive(Debug, Clone)]
pub struct Config {
    pub datadir: HwTestDirectory,
    pub network: Network,
    pub suite: SuiteFile,
}

impl Config {
    pub fn new(datadir: HwTestDirectory, network: Option<Network>, suite: SuiteFile) -> Self {
        Self {
            datadir,
            network: network.unwrap_or(Network::Testnet),
            suite,
        }
    }
}

pub struct App {
    config: Config,
    selection: KeystoreSelection,
    seed: Option<Arc<TestSeed>>,
    suite: Option<TestSuiteRun>,
    /// Bumped on every suite rebuild, run messages of an older suite are dropped.
    generation: u64,
    /// QR codes of the requests of the suite tests, by index.
    requests: Vec<Option<qr_code::Data>>,
    scanned: String,
    notification: Option<String>,
    detector: Arc<dyn MetadataDetector>,
    window_id: Option<Id>,
    window_config: Option<WindowConfig>,
}

async fn ctrl_c() -> Result<(), ()> {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("{}", e);
    };
    info!("Signal received, exiting");
    Ok(())
}

/// The request of a QR-driven test, if it is displayed before the keystore answers.
fn request_qr_code(kind: KeystoreKind, test: &dyn Test) -> Option<qr_code::Data> {
    if kind.modality() != Modality::Qr {
        return None;
    }
    let interaction = test.interaction();
    if !interaction.starts_with_request() {
        return None;
    }
    let request = interaction.request()?;
    match qr_code::Data::new(request.to_string()) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!(
                "Request of test '{}' does not fit in a QR code: {}",
                test.name(),
                e
            );
            None
        }
    }
}

impl App {
    pub fn title(&self) -> String {
        format!("Keystore test suite v{}", VERSION)
    }

    pub fn new((config, log_level): (Config, Option<LevelFilter>)) -> (App, Task<Message>) {
        let log_level = log_level.unwrap_or(LevelFilter::INFO);
        if let Err(e) = setup_logger(log_level, config.datadir.clone()) {
            tracing::warn!("Error while setting up the logger: {}", e);
        }
        let settings_path = GlobalSettings::path(&config.datadir);
        let window_config = GlobalSettings::load_window_config(&settings_path);
        let selection = GlobalSettings::load_keystore(&settings_path)
            .map(|s| KeystoreSelection::new(s.kind, s.version))
            .unwrap_or_default();

        let mut notification = None;
        let seed = match TestSeed::new(config.network) {
            Ok(seed) => Some(Arc::new(seed)),
            Err(e) => {
                error!("Failed to load the test seed: {}", e);
                notification = Some(e.to_string());
                None
            }
        };

        let mut app = Self {
            config,
            selection,
            seed,
            suite: None,
            generation: 0,
            requests: Vec::new(),
            scanned: String::new(),
            notification,
            detector: Arc::new(HwiDetector),
            window_id: None,
            window_config,
        };
        app.build_suite();

        (
            app,
            Task::batch(vec![
                window::get_oldest().map(Message::Window),
                Task::perform(ctrl_c(), |_| Message::CtrlC),
            ]),
        )
    }

    /// Rebuilds the runs for the selected keystore kind, all of them pending.
    fn build_suite(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.suite = None;
        self.requests.clear();
        self.scanned.clear();
        let (Some(kind), Some(seed)) = (self.selection.kind, &self.seed) else {
            return;
        };
        let ctx = TestContext {
            network: self.config.network,
            kind,
            seed: seed.clone(),
            device: Arc::new(HwiDevice::new(kind)),
        };
        let tests = match self.config.suite.build(&ctx) {
            Ok(tests) => tests,
            Err(e) => {
                error!("Failed to build the test suite: {}", e);
                self.notification = Some(e.to_string());
                default_suite(&ctx)
            }
        };
        self.requests = tests
            .iter()
            .map(|test| request_qr_code(kind, test.as_ref()))
            .collect();
        self.suite = Some(TestSuiteRun::new(kind, tests));
    }

    fn save_selection(&self) {
        let path = GlobalSettings::path(&self.config.datadir);
        let keystore = KeystoreSettings {
            kind: self.selection.kind,
            version: self.selection.version.clone(),
        };
        if let Err(e) = GlobalSettings::update_keystore(&path, &keystore) {
            error!("Failed to save the keystore selection: {e}");
        }
    }

    fn notify(&mut self, message: Option<String>) {
        if message.is_some() {
            self.notification = message;
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // we get this message only once at startup
            Message::Window(id) => {
                self.window_id = id;
                if let (Some(id), Some(WindowConfig { width, height })) = (id, &self.window_config)
                {
                    window::resize(
                        id,
                        Size {
                            width: *width,
                            height: *height,
                        },
                    )
                } else {
                    Task::none()
                }
            }
            Message::WindowSize(size) => {
                self.window_config = Some(WindowConfig {
                    width: size.width,
                    height: size.height,
                });
                Task::none()
            }
            Message::CtrlC
            | Message::Event(iced::Event::Window(iced::window::Event::CloseRequested)) => {
                if let Some(window_config) = &self.window_config {
                    let path = GlobalSettings::path(&self.config.datadir);
                    if let Err(e) = GlobalSettings::update_window_config(&path, window_config) {
                        error!("Failed to update the window config: {e}");
                    }
                }
                match self.window_id {
                    Some(id) => window::close(id),
                    None => iced::window::get_latest().and_then(iced::window::close),
                }
            }
            Message::Event(_) => Task::none(),
            Message::KeyPressed(Key::Tab(shift)) => {
                if shift {
                    focus_previous()
                } else {
                    focus_next()
                }
            }
            Message::KeyPressed(Key::Space(focus)) => self.on_space(focus),
            Message::Picker(msg) => self.update_picker(msg),
            Message::Run(generation, index, msg) => {
                if generation == self.generation {
                    self.update_run(index, msg)
                } else {
                    debug!(
                        "Dropping a message for test {} of a previous suite",
                        index + 1
                    );
                    Task::none()
                }
            }
            Message::SelectTest(index) => {
                self.navigate(|suite| suite.select(index));
                Task::none()
            }
            Message::NextTest => {
                self.navigate(TestSuiteRun::next);
                Task::none()
            }
            Message::PreviousTest => {
                self.navigate(TestSuiteRun::previous);
                Task::none()
            }
            Message::DismissNotification => {
                self.notification = None;
                Task::none()
            }
        }
    }

    /// Moves to another test, never while the current one is running.
    fn navigate<F: FnOnce(&mut TestSuiteRun)>(&mut self, f: F) {
        let Some(suite) = &mut self.suite else {
            return;
        };
        if !can_navigate(suite) {
            return;
        }
        f(suite);
        self.scanned.clear();
    }

    fn is_running(&self) -> bool {
        self.suite.as_ref().is_some_and(TestSuiteRun::is_running)
    }

    fn on_space(&mut self, focus: Focus) -> Task<Message> {
        let Some(suite) = &self.suite else {
            return Task::none();
        };
        let Some(current) = suite.current() else {
            return Task::none();
        };
        let index = suite.current_index();
        let kind = suite.kind;
        match on_space(current.status, focus, suite.is_last()) {
            Some(Shortcut::Start) => self.update_run(index, run::start_message(kind)),
            Some(Shortcut::Next) => self.update(Message::NextTest),
            None => Task::none(),
        }
    }

    fn update_picker(&mut self, message: PickerMessage) -> Task<Message> {
        match message {
            PickerMessage::KindSelected(picker::KindChoice(kind)) => {
                if kind == self.selection.kind || self.is_running() {
                    return Task::none();
                }
                if self.selection.set_kind(kind) {
                    self.build_suite();
                    self.save_selection();
                }
                Task::none()
            }
            PickerMessage::VersionEdited(version) => {
                if self.selection.set_version(version) {
                    self.save_selection();
                }
                Task::none()
            }
            PickerMessage::Detect => {
                if let Some(kind) = self.selection.start_detection() {
                    let detector = self.detector.clone();
                    Task::perform(async move { detector.detect(kind).await }, |res| {
                        PickerMessage::Detected(res).into()
                    })
                } else {
                    Task::none()
                }
            }
            PickerMessage::Detected(res) => {
                match self.selection.end_detection(res) {
                    Some(e) => self.notification = Some(e),
                    None => self.save_selection(),
                }
                Task::none()
            }
        }
    }

    fn update_run(&mut self, index: usize, message: TestMessage) -> Task<Message> {
        let generation = self.generation;
        let Some(suite) = &mut self.suite else {
            return Task::none();
        };
        let Some(status) = suite.runs().get(index).map(|run| run.status) else {
            return Task::none();
        };
        match message {
            TestMessage::Start => {
                if status != TestStatus::Pending {
                    return Task::none();
                }
                let pending = suite.start(index);
                completion(suite, generation, index, pending)
            }
            TestMessage::Completed { attempt, result } => {
                let error = suite.end(index, attempt, result);
                self.notify(error);
                Task::none()
            }
            TestMessage::Reset => {
                suite.reset(index);
                self.scanned.clear();
                Task::none()
            }
            TestMessage::UploadFile => {
                if status != TestStatus::Pending {
                    return Task::none();
                }
                let signing = suite
                    .runs()
                    .get(index)
                    .is_some_and(|run| run.test.unsigned_transaction().is_some());
                let open = if signing {
                    export::open_file("Select the signed PSBT", "PSBT", &["psbt"])
                } else {
                    export::open_file("Select the Coldcard JSON export", "JSON", &["json"])
                };
                Task::perform(open, move |data| {
                    Message::Run(generation, index, TestMessage::FileLoaded(data))
                })
            }
            TestMessage::FileLoaded(Some(data)) => {
                if status != TestStatus::Pending {
                    return Task::none();
                }
                let pending = suite.start_parse(index, data);
                completion(suite, generation, index, pending)
            }
            TestMessage::FileLoaded(None) => Task::none(),
            TestMessage::ScannedEdited(scanned) => {
                self.scanned = scanned;
                Task::none()
            }
            TestMessage::SubmitScanned => {
                let scanned = std::mem::take(&mut self.scanned);
                let error = suite.resolve(index, &scanned);
                self.notify(error);
                Task::none()
            }
            TestMessage::DownloadPsbt => {
                let download = suite.runs().get(index).map(|run| {
                    psbt_download(run.test.as_ref(), &chrono::Local::now())
                });
                self.save(index, download)
            }
            TestMessage::DownloadWalletConfig => {
                let download = suite
                    .runs()
                    .get(index)
                    .map(|run| wallet_config_download(&run.test.name(), run.test.params()));
                self.save(index, download)
            }
            TestMessage::Saved(Ok(Some(path))) => {
                info!("Download saved at {}", path.to_string_lossy());
                Task::none()
            }
            TestMessage::Saved(Ok(None)) => Task::none(),
            TestMessage::Saved(Err(e)) => {
                self.notification = Some(e);
                Task::none()
            }
        }
    }

    fn save(
        &mut self,
        index: usize,
        download: Option<Result<Download, DownloadError>>,
    ) -> Task<Message> {
        let generation = self.generation;
        match download {
            Some(Ok(download)) => Task::perform(export::save(download), move |res| {
                Message::Run(generation, index, TestMessage::Saved(res))
            }),
            Some(Err(e)) => {
                error!("Failed to prepare the download: {}", e);
                self.notification = Some(e.to_string());
                Task::none()
            }
            None => Task::none(),
        }
    }

    pub fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(|event, status, _| match (&event, status) {
            (
                Event::Keyboard(keyboard::Event::KeyPressed {
                    key: iced::keyboard::Key::Named(iced::keyboard::key::Named::Tab),
                    modifiers,
                    ..
                }),
                event::Status::Ignored,
            ) => Some(Message::KeyPressed(Key::Tab(modifiers.shift()))),
            (
                Event::Keyboard(keyboard::Event::KeyPressed {
                    key: iced::keyboard::Key::Named(iced::keyboard::key::Named::Space),
                    ..
                }),
                status,
            ) => Some(Message::KeyPressed(Key::Space(match status {
                event::Status::Captured => Focus::TextInput,
                event::Status::Ignored => Focus::Elsewhere,
            }))),
            (
                iced::Event::Window(iced::window::Event::CloseRequested),
                event::Status::Ignored,
            ) => Some(Message::Event(event)),
            (iced::Event::Window(iced::window::Event::Resized(size)), _) => {
                Some(Message::WindowSize(*size))
            }
            _ => None,
        })
    }

    pub fn view(&self) -> Element<Message> {
        let sidebar = Column::new()
            .spacing(30)
            .width(Length::Fixed(340.0))
            .push(picker::view(&self.selection, self.is_running()).map(Message::Picker))
            .push_maybe(self.suite.as_ref().map(tests_list));

        let mut main = Column::new()
            .spacing(20)
            .width(Length::Fill)
            .push(seed::view(self.selection.kind));
        match &self.suite {
            Some(suite) => {
                if let Some(current) = suite.current() {
                    let index = suite.current_index();
                    let generation = self.generation;
                    main = main
                        .push(
                            run::view(
                                index,
                                current,
                                suite.kind,
                                &self.scanned,
                                self.requests.get(index).and_then(Option::as_ref),
                            )
                            .map(move |msg| Message::Run(generation, index, msg)),
                        )
                        .push(navigation(suite));
                } else {
                    main = main.push(card::simple(text::p1_regular("The test suite is empty.")));
                }
            }
            None => {
                main = main.push(card::simple(text::p1_regular(
                    "Select the type of keystore to test.",
                )));
            }
        }

        Column::new()
            .push_maybe(
                self.notification
                    .as_ref()
                    .map(|n| notification::error(n, Message::DismissNotification)),
            )
            .push(
                Container::new(
                    Row::new()
                        .spacing(30)
                        .push(sidebar)
                        .push(Scrollable::new(main).style(theme::scrollable::primary)),
                )
                .padding(20)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(theme::container::background),
            )
            .into()
    }
}

fn can_navigate(suite: &TestSuiteRun) -> bool {
    suite
        .current()
        .map_or(true, |run| run.status != TestStatus::Active)
}

/// Awaits the operation of a started run, if any.
fn completion(
    suite: &TestSuiteRun,
    generation: u64,
    index: usize,
    pending: Option<PendingResult>,
) -> Task<Message> {
    let Some(pending) = pending else {
        return Task::none();
    };
    let attempt = suite
        .runs()
        .get(index)
        .map(|run| run.attempt())
        .unwrap_or_default();
    Task::perform(pending, move |result| {
        Message::Run(generation, index, TestMessage::Completed { attempt, result })
    })
}

fn tests_list(suite: &TestSuiteRun) -> Element<Message> {
    let can_navigate = can_navigate(suite);
    let summary = suite.summary();
    let current = suite.current_index();
    suite
        .runs()
        .iter()
        .enumerate()
        .fold(
            Column::new()
                .spacing(5)
                .push(text::h4_bold("Tests"))
                .push(
                    text::caption(format!(
                        "{} passed, {} failed, {} errors, {} remaining",
                        summary.success,
                        summary.failure,
                        summary.error,
                        summary.pending + summary.active
                    ))
                    .style(theme::text::secondary),
                ),
            |col, (i, r)| {
                col.push(
                    button::menu(
                        text::p1_regular(format!(
                            "{}. {} ({})",
                            i + 1,
                            r.test.name(),
                            run::status_label(r.status)
                        )),
                        i == current,
                    )
                    .on_press_maybe(can_navigate.then_some(Message::SelectTest(i))),
                )
            },
        )
        .into()
}

fn navigation(suite: &TestSuiteRun) -> Element<Message> {
    let can_navigate = can_navigate(suite);
    Row::new()
        .spacing(10)
        .align_y(Alignment::Center)
        .push(
            button::secondary("Previous")
                .on_press_maybe(
                    (can_navigate && suite.current_index() > 0).then_some(Message::PreviousTest),
                ),
        )
        .push(
            text::p2_regular(format!("{} / {}", suite.current_index() + 1, suite.len()))
                .style(theme::text::secondary),
        )
        .push(
            button::primary("Next")
                .on_press_maybe((can_navigate && !suite.is_last()).then_some(Message::NextTest)),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hwtest::detect::{DetectError, Metadata};

    struct FixedDetector;

    #[async_trait]
    impl MetadataDetector for FixedDetector {
        async fn detect(&self, kind: KeystoreKind) -> Result<Metadata, DetectError> {
            Err(DetectError::NotFound(kind))
        }
    }

    fn app(datadir: &std::path::Path) -> App {
        let config = Config::new(
            HwTestDirectory::new(datadir.to_path_buf()),
            None,
            SuiteFile::default(),
        );
        App {
            config,
            selection: KeystoreSelection::default(),
            seed: TestSeed::new(Network::Testnet).ok().map(Arc::new),
            suite: None,
            generation: 0,
            requests: Vec::new(),
            scanned: String::new(),
            notification: None,
            detector: Arc::new(FixedDetector),
            window_id: None,
            window_config: None,
        }
    }

    fn run(app: &mut App, index: usize, message: TestMessage) {
        let generation = app.generation;
        let _ = app.update(Message::Run(generation, index, message));
    }

    fn select(app: &mut App, kind: Option<KeystoreKind>) {
        let _ = app.update(Message::Picker(PickerMessage::KindSelected(
            picker::KindChoice(kind),
        )));
    }

    #[test]
    fn kind_selection_builds_and_persists_suite() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        assert!(app.suite.is_none());

        select(&mut app, Some(KeystoreKind::Coldcard));
        let suite = app.suite.as_ref().unwrap();
        assert_eq!(suite.kind, KeystoreKind::Coldcard);
        assert_eq!(suite.len(), 4);
        assert!(app.requests.iter().all(Option::is_none));

        let saved = GlobalSettings::load_keystore(&GlobalSettings::path(&app.config.datadir));
        assert_eq!(saved.unwrap().kind, Some(KeystoreKind::Coldcard));

        select(&mut app, Some(KeystoreKind::Hermit));
        assert_eq!(app.suite.as_ref().unwrap().kind, KeystoreKind::Hermit);
        assert!(app.requests.iter().all(Option::is_some));

        select(&mut app, None);
        assert!(app.suite.is_none());
    }

    #[test]
    fn version_requires_kind() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        let _ = app.update(Message::Picker(PickerMessage::VersionEdited("1.0".into())));
        assert_eq!(app.selection.version, "");

        select(&mut app, Some(KeystoreKind::Trezor));
        let _ = app.update(Message::Picker(PickerMessage::VersionEdited("2.6.0".into())));
        assert_eq!(app.selection.version, "2.6.0");
    }

    #[test]
    fn failed_detection_is_notified() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        select(&mut app, Some(KeystoreKind::Ledger));
        let _ = app.update(Message::Picker(PickerMessage::Detect));
        assert!(app.selection.is_detecting());

        let _ = app.update(Message::Picker(PickerMessage::Detected(Err(
            DetectError::NotFound(KeystoreKind::Ledger),
        ))));
        assert!(!app.selection.is_detecting());
        assert_eq!(app.notification.as_deref(), Some("No Ledger device found"));

        let _ = app.update(Message::DismissNotification);
        assert!(app.notification.is_none());
    }

    #[test]
    fn hermit_scanned_data_resolves_run() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        select(&mut app, Some(KeystoreKind::Hermit));

        run(&mut app, 0, TestMessage::Start);
        assert_eq!(app.suite.as_ref().unwrap().runs()[0].status, TestStatus::Active);

        let expected = app.suite.as_ref().unwrap().runs()[0]
            .test
            .expected()
            .unwrap();
        run(
            &mut app,
            0,
            TestMessage::ScannedEdited(expected.as_str().unwrap().to_string()),
        );
        run(&mut app, 0, TestMessage::SubmitScanned);
        assert_eq!(app.suite.as_ref().unwrap().runs()[0].status, TestStatus::Success);
        assert!(app.scanned.is_empty());

        // Space moves on to the next test once the current one is complete.
        let _ = app.update(Message::KeyPressed(Key::Space(Focus::Elsewhere)));
        assert_eq!(app.suite.as_ref().unwrap().current_index(), 1);

        run(&mut app, 1, TestMessage::Start);
        run(&mut app, 1, TestMessage::ScannedEdited("garbage".into()));
        run(&mut app, 1, TestMessage::SubmitScanned);
        assert_eq!(app.suite.as_ref().unwrap().runs()[1].status, TestStatus::Error);
        assert!(app.notification.is_some());
    }

    #[test]
    fn no_navigation_while_running() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        select(&mut app, Some(KeystoreKind::Hermit));
        run(&mut app, 0, TestMessage::Start);
        let _ = app.update(Message::NextTest);
        let _ = app.update(Message::SelectTest(2));
        assert_eq!(app.suite.as_ref().unwrap().current_index(), 0);

        run(&mut app, 0, TestMessage::Reset);
        let _ = app.update(Message::SelectTest(2));
        assert_eq!(app.suite.as_ref().unwrap().current_index(), 2);
        let _ = app.update(Message::PreviousTest);
        assert_eq!(app.suite.as_ref().unwrap().current_index(), 1);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        select(&mut app, Some(KeystoreKind::Coldcard));

        run(&mut app, 0, TestMessage::FileLoaded(Some(b"{}".to_vec())));
        let attempt = app.suite.as_ref().unwrap().runs()[0].attempt();
        run(&mut app, 0, TestMessage::Reset);
        run(
            &mut app,
            0,
            TestMessage::Completed {
                attempt,
                result: hwtest::test::TestResult::Error("late".to_string()),
            },
        );
        assert_eq!(app.suite.as_ref().unwrap().runs()[0].status, TestStatus::Pending);
        assert!(app.notification.is_none());
    }

    #[test]
    fn results_of_a_previous_suite_are_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        select(&mut app, Some(KeystoreKind::Ledger));
        let ledger = app.generation;
        run(&mut app, 0, TestMessage::Start);
        let attempt = app.suite.as_ref().unwrap().runs()[0].attempt();

        // No kind change while the Ledger run awaits its result.
        select(&mut app, Some(KeystoreKind::Hermit));
        assert_eq!(app.suite.as_ref().unwrap().kind, KeystoreKind::Ledger);
        assert_eq!(app.selection.kind, Some(KeystoreKind::Ledger));

        run(&mut app, 0, TestMessage::Reset);
        select(&mut app, Some(KeystoreKind::Hermit));
        assert_eq!(app.suite.as_ref().unwrap().kind, KeystoreKind::Hermit);
        assert_ne!(app.generation, ledger);
        run(&mut app, 0, TestMessage::Start);
        assert_eq!(app.suite.as_ref().unwrap().runs()[0].attempt(), attempt);

        let _ = app.update(Message::Run(
            ledger,
            0,
            TestMessage::Completed {
                attempt,
                result: hwtest::test::TestResult::Success,
            },
        ));
        assert_eq!(app.suite.as_ref().unwrap().runs()[0].status, TestStatus::Active);

        // A file picked for the Ledger suite does not start a Hermit run either.
        run(&mut app, 0, TestMessage::Reset);
        let _ = app.update(Message::Run(
            ledger,
            0,
            TestMessage::FileLoaded(Some(b"{}".to_vec())),
        ));
        assert_eq!(app.suite.as_ref().unwrap().runs()[0].status, TestStatus::Pending);
    }

    #[test]
    fn kind_is_kept_while_detecting() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        select(&mut app, Some(KeystoreKind::Ledger));
        let _ = app.update(Message::Picker(PickerMessage::Detect));
        select(&mut app, Some(KeystoreKind::Trezor));
        assert_eq!(app.selection.kind, Some(KeystoreKind::Ledger));
        assert_eq!(app.suite.as_ref().unwrap().kind, KeystoreKind::Ledger);

        let _ = app.update(Message::Picker(PickerMessage::Detected(Ok(Metadata {
            model: "Nano S".to_string(),
            version: "2.1.0".to_string(),
            spec: "Nano S v2.1.0".to_string(),
        }))));
        assert_eq!(app.selection.version, "Nano S v2.1.0");
        select(&mut app, Some(KeystoreKind::Trezor));
        assert_eq!(app.suite.as_ref().unwrap().kind, KeystoreKind::Trezor);
    }

    #[test]
    fn space_is_ignored_in_text_inputs() {
        let tmp = tempfile::tempdir().unwrap();
        let mut app = app(tmp.path());
        select(&mut app, Some(KeystoreKind::Hermit));
        let _ = app.update(Message::KeyPressed(Key::Space(Focus::TextInput)));
        assert_eq!(app.suite.as_ref().unwrap().runs()[0].status, TestStatus::Pending);
        let _ = app.update(Message::KeyPressed(Key::Space(Focus::Elsewhere)));
        assert_eq!(app.suite.as_ref().unwrap().runs()[0].status, TestStatus::Active);
    }
}
