use std::fmt;

use hwtest::{
    detect::detection_prompt,
    interaction::Interaction,
    keystore::{supports_version_detection, KeystoreKind, KeystoreSelection},
};
use hwtest_ui::{
    component::{button, text},
    theme,
    widget::*,
};
use iced::{widget::pick_list, Alignment, Length};

use super::message::PickerMessage;

/// Entry of the keystore type list, `None` being the placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindChoice(pub Option<KeystoreKind>);

impl KindChoice {
    pub const ALL: [KindChoice; 5] = [
        KindChoice(None),
        KindChoice(Some(KeystoreKind::Trezor)),
        KindChoice(Some(KeystoreKind::Ledger)),
        KindChoice(Some(KeystoreKind::Coldcard)),
        KindChoice(Some(KeystoreKind::Hermit)),
    ];
}

impl fmt::Display for KindChoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(kind) => write!(f, "{}", kind),
            None => write!(f, "< Select type >"),
        }
    }
}

pub fn detect_label(selection: &KeystoreSelection) -> &'static str {
    if selection.is_detecting() {
        "Detecting..."
    } else {
        "Detect"
    }
}

/// Instructions of the version detection for the current status.
fn detection_messages(selection: &KeystoreSelection) -> Vec<String> {
    match selection.kind {
        Some(kind) if supports_version_detection(Some(kind)) => detection_prompt(kind)
            .messages_for(selection.status)
            .into_iter()
            .map(|m| m.text.clone())
            .collect(),
        _ => Vec::new(),
    }
}

/// The kind is locked while a version detection or a test run is ongoing.
pub fn view(selection: &KeystoreSelection, running: bool) -> Element<PickerMessage> {
    let kind: Element<PickerMessage> = if selection.can_change_kind() && !running {
        pick_list(
            &KindChoice::ALL[..],
            Some(KindChoice(selection.kind)),
            PickerMessage::KindSelected,
        )
        .width(Length::Fill)
        .padding(10)
        .into()
    } else {
        TextInput::new("", &KindChoice(selection.kind).to_string())
            .padding(10)
            .style(theme::text_input::primary)
            .into()
    };

    let mut version = TextInput::new("Version", &selection.version)
        .padding(10)
        .style(theme::text_input::primary);
    if selection.can_edit_version() {
        version = version.on_input(PickerMessage::VersionEdited);
    }

    Column::new()
        .spacing(10)
        .push(text::h4_bold("Keystore"))
        .push(kind)
        .push(
            Row::new()
                .spacing(10)
                .align_y(Alignment::Center)
                .push(version.width(Length::Fill))
                .push(
                    button::secondary(detect_label(selection))
                        .on_press_maybe(selection.can_detect().then_some(PickerMessage::Detect)),
                ),
        )
        .push(
            detection_messages(selection)
                .into_iter()
                .fold(Column::new().spacing(5), |col, m| {
                    col.push(text::p2_regular(m).style(theme::text::secondary))
                }),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwtest::{detect::Metadata, interaction::Phase};

    #[test]
    fn type_choices() {
        let labels: Vec<String> = KindChoice::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            labels,
            vec!["< Select type >", "Trezor", "Ledger", "Coldcard", "Hermit"]
        );
    }

    #[test]
    fn detection_label_and_messages() {
        let mut selection = KeystoreSelection::new(Some(KeystoreKind::Ledger), String::new());
        assert_eq!(detect_label(&selection), "Detect");
        assert_eq!(
            detection_messages(&selection),
            vec!["Make sure your Ledger is plugged in and unlocked.".to_string()]
        );

        assert_eq!(selection.start_detection(), Some(KeystoreKind::Ledger));
        assert_eq!(selection.status, Phase::Active);
        assert_eq!(detect_label(&selection), "Detecting...");
        assert_eq!(
            detection_messages(&selection),
            vec!["Reading the firmware version of your Ledger...".to_string()]
        );

        selection.end_detection(Ok(Metadata::new("Ledger", "2.1.0")));
        assert_eq!(detect_label(&selection), "Detect");
        assert_eq!(selection.version, "Ledger v2.1.0");
    }

    #[test]
    fn no_messages_for_indirect_keystores() {
        let selection = KeystoreSelection::new(Some(KeystoreKind::Hermit), String::new());
        assert!(detection_messages(&selection).is_empty());
        assert!(detection_messages(&KeystoreSelection::default()).is_empty());
    }
}
