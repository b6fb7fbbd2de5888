use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutchanError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OutchanError>;

/// An error that knows how to present itself to a user.
///
/// Consumed by [`OutputChannel::pretty_error`](crate::output::OutputChannel::pretty_error):
/// the message becomes the `Error!` line and the optional link an action line below it.
pub trait Diagnostic {
    fn message(&self) -> String;

    fn link(&self) -> Option<&str> {
        None
    }

    fn action(&self) -> Option<&str> {
        None
    }
}

/// A ready-made [`Diagnostic`] for errors raised outside this crate.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{message}")]
pub struct PrettyError {
    pub message: String,
    pub link: Option<String>,
    pub action: Option<String>,
}

impl PrettyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

impl Diagnostic for PrettyError {
    fn message(&self) -> String {
        self.message.clone()
    }

    fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

impl Diagnostic for OutchanError {
    fn message(&self) -> String {
        self.to_string()
    }
}

impl Diagnostic for anyhow::Error {
    fn message(&self) -> String {
        format!("{self:#}")
    }
}
