use crate::{Error, Result};
use std::env;
use std::fmt;
use std::fs;

/// API key (sent as a header) and secret key (only ever used to sign).
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        let secret_key = secret_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(Error::configuration("api_key must be set"));
        }
        if secret_key.is_empty() {
            return Err(Error::configuration("secret_key must be set"));
        }
        Ok(Self {
            api_key,
            secret_key,
        })
    }

    /// Key file layout: API key on the first line, secret key on the second.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| Error::configuration(format!("failed to read keys file: {err}")))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut lines = content.lines();
        let api_key = lines
            .next()
            .ok_or_else(|| Error::configuration("keys file is empty"))?;
        let secret_key = lines
            .next()
            .ok_or_else(|| Error::configuration("keys file has no secret key line"))?;
        Self::new(api_key, secret_key)
    }

    /// `BINAPI_API_KEY` and `BINAPI_SECRET_KEY`; `None` when neither is set.
    pub fn from_env() -> Result<Option<Self>> {
        let api_key = env::var("BINAPI_API_KEY").ok();
        let secret_key = env::var("BINAPI_SECRET_KEY").ok();
        match (api_key, secret_key) {
            (None, None) => Ok(None),
            (Some(api_key), Some(secret_key)) => Self::new(api_key, secret_key).map(Some),
            _ => Err(Error::configuration(
                "BINAPI_API_KEY and BINAPI_SECRET_KEY must be set together",
            )),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
