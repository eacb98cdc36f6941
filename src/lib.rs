pub mod app;
pub mod config;
pub mod credentials;
pub mod data;
pub mod exchange;
pub mod models;

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// Network or HTTP level failure. `status` is absent when no response arrived.
    Transport { status: Option<u16> },
    /// Well-formed error object returned by the exchange.
    Exchange { code: i64, msg: String },
    /// Payload did not have the expected shape; `raw` keeps it for diagnosis.
    MalformedResponse { raw: String },
    Configuration,
    InvalidInput,
    Other,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Other,
            message: message.into(),
        }
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport { status },
            message: message.into(),
        }
    }

    pub fn exchange(code: i64, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        Self {
            message: format!("exchange error {code}: {msg}"),
            kind: ErrorKind::Exchange { code, msg },
        }
    }

    pub fn malformed(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MalformedResponse { raw: raw.into() },
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Configuration,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            message: message.into(),
        }
    }

    /// Connection failures, 5xx and 429 replies. Only these are worth repeating.
    pub fn is_transient(&self) -> bool {
        match self.kind {
            ErrorKind::Transport { status: None } => true,
            ErrorKind::Transport { status: Some(code) } => code == 429 || code >= 500,
            _ => false,
        }
    }

    pub fn exchange_code(&self) -> Option<i64> {
        match &self.kind {
            ErrorKind::Exchange { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
