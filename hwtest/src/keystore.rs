//! Keystore selection.
//!
//! The operator picks the kind of keystore under test and the firmware version it runs. The
//! kind decides how data is exchanged with the keystore during the tests.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    detect::{DetectError, Metadata},
    interaction::Phase,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeystoreKind {
    Trezor,
    Ledger,
    Coldcard,
    Hermit,
}

/// How data is exchanged with a keystore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    /// The device is connected to the machine running the coordinator.
    Direct,
    /// Data is carried back and forth with files.
    File,
    /// Data is carried back and forth with QR codes.
    Qr,
}

impl KeystoreKind {
    pub const ALL: [KeystoreKind; 4] = [
        KeystoreKind::Trezor,
        KeystoreKind::Ledger,
        KeystoreKind::Coldcard,
        KeystoreKind::Hermit,
    ];

    pub fn modality(&self) -> Modality {
        match self {
            Self::Trezor | Self::Ledger => Modality::Direct,
            Self::Coldcard => Modality::File,
            Self::Hermit => Modality::Qr,
        }
    }

    /// Indirect keystores need out-of-band data transfer.
    pub fn is_indirect(&self) -> bool {
        self.modality() != Modality::Direct
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trezor => "trezor",
            Self::Ledger => "ledger",
            Self::Coldcard => "coldcard",
            Self::Hermit => "hermit",
        }
    }
}

impl fmt::Display for KeystoreKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Trezor => write!(f, "Trezor"),
            Self::Ledger => write!(f, "Ledger"),
            Self::Coldcard => write!(f, "Coldcard"),
            Self::Hermit => write!(f, "Hermit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeystore(pub String);

impl fmt::Display for UnknownKeystore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unknown keystore type '{}'", self.0)
    }
}

impl std::error::Error for UnknownKeystore {}

impl FromStr for KeystoreKind {
    type Err = UnknownKeystore;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeystoreKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s.to_lowercase())
            .ok_or_else(|| UnknownKeystore(s.to_string()))
    }
}

/// Whether a version can be detected for the selection: nothing selected and the indirect
/// keystores cannot.
pub fn supports_version_detection(kind: Option<KeystoreKind>) -> bool {
    kind.map(|k| !k.is_indirect()).unwrap_or(false)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeystoreSelection {
    pub kind: Option<KeystoreKind>,
    pub version: String,
    pub status: Phase,
}

impl KeystoreSelection {
    pub fn new(kind: Option<KeystoreKind>, version: String) -> Self {
        Self {
            kind,
            version,
            status: Phase::Pending,
        }
    }

    /// The version is kept when switching between kinds and dropped when the selection is
    /// cleared. Returns false and leaves the selection untouched while a detection runs.
    pub fn set_kind(&mut self, kind: Option<KeystoreKind>) -> bool {
        if !self.can_change_kind() {
            return false;
        }
        if kind.is_none() {
            self.version.clear();
        }
        self.kind = kind;
        true
    }

    pub fn can_change_kind(&self) -> bool {
        !self.is_detecting()
    }

    /// Returns false and leaves the selection untouched if no kind is selected.
    pub fn set_version(&mut self, version: String) -> bool {
        if self.kind.is_none() {
            return false;
        }
        self.version = version;
        true
    }

    pub fn can_edit_version(&self) -> bool {
        self.kind.is_some()
    }

    pub fn can_detect(&self) -> bool {
        self.status != Phase::Active && supports_version_detection(self.kind)
    }

    pub fn is_detecting(&self) -> bool {
        self.status == Phase::Active
    }

    /// Marks the detection as running and returns the kind to detect, if detection is possible.
    pub fn start_detection(&mut self) -> Option<KeystoreKind> {
        if !self.can_detect() {
            return None;
        }
        self.status = Phase::Active;
        self.kind
    }

    /// Records the outcome of a detection. The status goes back to pending whatever the
    /// outcome, the error message to notify is returned on failure.
    pub fn end_detection(&mut self, result: Result<Metadata, DetectError>) -> Option<String> {
        self.status = Phase::Pending;
        match result {
            Ok(metadata) => {
                if self.kind.is_some() {
                    self.version = metadata.spec;
                }
                None
            }
            Err(e) => {
                tracing::error!("Keystore version detection failed: {}", e);
                Some(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kinds() {
        assert_eq!(KeystoreKind::from_str("hermit"), Ok(KeystoreKind::Hermit));
        assert_eq!(KeystoreKind::from_str("Ledger"), Ok(KeystoreKind::Ledger));
        assert!(KeystoreKind::from_str("").is_err());
        assert!(KeystoreKind::from_str("bitbox").is_err());
        for kind in KeystoreKind::ALL {
            assert_eq!(KeystoreKind::from_str(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn detection_disabled_without_direct_keystore() {
        for kind in [None, Some(KeystoreKind::Coldcard), Some(KeystoreKind::Hermit)] {
            for status in [Phase::Pending, Phase::Active] {
                let selection = KeystoreSelection {
                    kind,
                    version: "1.0.0".to_string(),
                    status,
                };
                assert!(!selection.can_detect(), "{:?} {:?}", kind, status);
            }
        }
        let mut selection = KeystoreSelection::new(Some(KeystoreKind::Ledger), String::new());
        assert!(selection.can_detect());
        selection.status = Phase::Active;
        assert!(!selection.can_detect());
        assert!(selection.is_detecting());
    }

    #[test]
    fn changing_kind_keeps_version() {
        let mut selection = KeystoreSelection::new(Some(KeystoreKind::Trezor), "2.6.0".into());
        selection.set_kind(Some(KeystoreKind::Ledger));
        assert_eq!(selection.version, "2.6.0");
        assert_eq!(selection.kind, Some(KeystoreKind::Ledger));

        selection.set_kind(None);
        assert_eq!(selection.version, "");
        assert_eq!(selection.kind, None);
    }

    #[test]
    fn kind_locked_while_detecting() {
        let mut selection = KeystoreSelection::new(Some(KeystoreKind::Ledger), String::new());
        assert_eq!(selection.start_detection(), Some(KeystoreKind::Ledger));
        assert!(!selection.can_change_kind());
        assert!(!selection.set_kind(Some(KeystoreKind::Trezor)));
        assert!(!selection.set_kind(None));
        assert_eq!(selection.kind, Some(KeystoreKind::Ledger));

        selection.end_detection(Ok(Metadata {
            model: "Nano X".to_string(),
            version: "2.2.3".to_string(),
            spec: "Nano X v2.2.3".to_string(),
        }));
        assert_eq!(selection.version, "Nano X v2.2.3");
        assert!(selection.set_kind(Some(KeystoreKind::Trezor)));
        assert_eq!(selection.kind, Some(KeystoreKind::Trezor));
    }

    #[test]
    fn version_requires_kind() {
        let mut selection = KeystoreSelection::default();
        assert!(!selection.can_edit_version());
        assert!(!selection.set_version("1.0".into()));
        assert_eq!(selection.version, "");

        selection.set_kind(Some(KeystoreKind::Coldcard));
        assert!(selection.can_edit_version());
        assert!(selection.set_version("5.1.2".into()));
        assert_eq!(selection.version, "5.1.2");
        assert_eq!(selection.kind, Some(KeystoreKind::Coldcard));
    }

    #[test]
    fn detection_lifecycle() {
        let mut selection = KeystoreSelection::new(Some(KeystoreKind::Ledger), String::new());
        assert_eq!(selection.start_detection(), Some(KeystoreKind::Ledger));
        assert_eq!(selection.status, Phase::Active);
        // No concurrent detection.
        assert_eq!(selection.start_detection(), None);

        let notification = selection.end_detection(Ok(Metadata {
            model: "Nano S".to_string(),
            version: "2.1.0".to_string(),
            spec: "Nano S v2.1.0".to_string(),
        }));
        assert_eq!(notification, None);
        assert_eq!(selection.version, "Nano S v2.1.0");
        assert_eq!(selection.status, Phase::Pending);

        selection.start_detection();
        let notification =
            selection.end_detection(Err(DetectError::NotFound(KeystoreKind::Ledger)));
        assert_eq!(notification, Some("No Ledger device found".to_string()));
        assert_eq!(selection.version, "Nano S v2.1.0");
        assert_eq!(selection.status, Phase::Pending);
    }

    #[test]
    fn detection_refused_for_indirect() {
        let mut selection = KeystoreSelection::new(Some(KeystoreKind::Hermit), String::new());
        assert_eq!(selection.start_detection(), None);
        assert_eq!(selection.status, Phase::Pending);
        let mut selection = KeystoreSelection::default();
        assert_eq!(selection.start_detection(), None);
    }
}
