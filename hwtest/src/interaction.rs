//! Interactions are one request/response cycle with a keystore.
//!
//! They carry the user-facing messages for each phase of the cycle, the order in which data
//! flows (does the coordinator talk first, or the keystore?) and the payload to hand over to
//! the keystore when the coordinator talks first.

use std::fmt;

use miniscript::bitcoin::psbt::Psbt;

/// Phase of an interaction, shared by the keystore version detection and the test runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Pending,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The coordinator hands a payload over to the keystore.
    Request,
    /// The keystore hands a payload over to the coordinator.
    Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionMessage {
    pub phase: Phase,
    pub level: Level,
    pub code: &'static str,
    pub text: String,
}

impl InteractionMessage {
    pub fn info(phase: Phase, code: &'static str, text: impl Into<String>) -> Self {
        Self {
            phase,
            level: Level::Info,
            code,
            text: text.into(),
        }
    }

    pub fn warning(phase: Phase, code: &'static str, text: impl Into<String>) -> Self {
        Self {
            phase,
            level: Level::Warning,
            code,
            text: text.into(),
        }
    }
}

/// Payload handed over to the keystore.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Psbt(Box<Psbt>),
    Command(String),
}

impl Request {
    /// Raw content, as written to a file.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Psbt(psbt) => psbt.serialize(),
            Self::Command(cmd) => cmd.as_bytes().to_vec(),
        }
    }
}

impl fmt::Display for Request {
    /// Textual content, as displayed in a QR code.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Psbt(psbt) => write!(f, "{}", psbt),
            Self::Command(cmd) => write!(f, "{}", cmd),
        }
    }
}

pub trait Interaction: Send + Sync {
    fn workflow(&self) -> &[Step];

    fn request(&self) -> Option<Request>;

    fn messages(&self) -> &[InteractionMessage];

    fn messages_for(&self, phase: Phase) -> Vec<&InteractionMessage> {
        self.messages().iter().filter(|m| m.phase == phase).collect()
    }

    fn has_message(&self, phase: Phase, code: &str) -> bool {
        self.messages_for(phase).iter().any(|m| m.code == code)
    }

    /// Whether the coordinator has to display something before the keystore can answer.
    fn starts_with_request(&self) -> bool {
        self.workflow().first() == Some(&Step::Request)
    }
}

/// An interaction defined once and for all by the test building it.
#[derive(Debug, Clone)]
pub struct Prompt {
    workflow: Vec<Step>,
    request: Option<Request>,
    messages: Vec<InteractionMessage>,
}

impl Prompt {
    pub fn new(workflow: Vec<Step>) -> Self {
        Self {
            workflow,
            request: None,
            messages: Vec::new(),
        }
    }

    pub fn with_request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_message(mut self, message: InteractionMessage) -> Self {
        self.messages.push(message);
        self
    }
}

impl Interaction for Prompt {
    fn workflow(&self) -> &[Step] {
        &self.workflow
    }

    fn request(&self) -> Option<Request> {
        self.request.clone()
    }

    fn messages(&self) -> &[InteractionMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_filtered_by_phase() {
        let prompt = Prompt::new(vec![Step::Response])
            .with_message(InteractionMessage::info(Phase::Pending, "a", "plug"))
            .with_message(InteractionMessage::info(Phase::Active, "b", "confirm"))
            .with_message(InteractionMessage::warning(Phase::Pending, "c", "careful"));

        let pending: Vec<&str> = prompt
            .messages_for(Phase::Pending)
            .iter()
            .map(|m| m.code)
            .collect();
        assert_eq!(pending, vec!["a", "c"]);
        assert!(prompt.has_message(Phase::Active, "b"));
        assert!(!prompt.has_message(Phase::Active, "a"));
        assert!(!prompt.starts_with_request());
    }

    #[test]
    fn command_request() {
        let prompt = Prompt::new(vec![Step::Request, Step::Response])
            .with_request(Request::Command("export-xpub m/45'".to_string()));
        assert!(prompt.starts_with_request());
        let request = prompt.request().unwrap();
        assert_eq!(request.to_string(), "export-xpub m/45'");
        assert_eq!(request.to_bytes(), b"export-xpub m/45'".to_vec());
    }
}
