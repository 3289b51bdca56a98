use std::path::PathBuf;

use hwtest::{
    detect::{DetectError, Metadata},
    run::Focus,
    test::TestResult,
};
use iced::{window::Id, Size};

use super::picker::KindChoice;

#[derive(Debug, Clone)]
pub enum Key {
    Tab(bool),
    Space(Focus),
}

#[derive(Debug, Clone)]
pub enum Message {
    CtrlC,
    Event(iced::Event),
    Window(Option<Id>),
    WindowSize(Size),
    KeyPressed(Key),

    Picker(PickerMessage),
    /// Message for the run at the given index of the suite of the given generation.
    Run(u64, usize, TestMessage),
    SelectTest(usize),
    NextTest,
    PreviousTest,
    DismissNotification,
}

#[derive(Debug, Clone)]
pub enum PickerMessage {
    KindSelected(KindChoice),
    VersionEdited(String),
    Detect,
    Detected(Result<Metadata, DetectError>),
}

#[derive(Debug, Clone)]
pub enum TestMessage {
    Start,
    Completed { attempt: u64, result: TestResult },
    Reset,
    UploadFile,
    FileLoaded(Option<Vec<u8>>),
    ScannedEdited(String),
    SubmitScanned,
    DownloadPsbt,
    DownloadWalletConfig,
    Saved(Result<Option<PathBuf>, String>),
}

impl From<PickerMessage> for Message {
    fn from(value: PickerMessage) -> Self {
        Self::Picker(value)
    }
}
