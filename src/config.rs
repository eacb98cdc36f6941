use crate::data::MAX_KLINES_PER_REQUEST;
use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fs;

const MAX_GET_ATTEMPTS: u32 = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub base_url_v1: String,
    pub base_url_v2: String,
    pub recv_window_ms: u64,
    /// Added to every request timestamp to absorb clock skew.
    pub request_delay_ms: i64,
    pub max_klines_per_request: u32,
    /// Decimal places kept when prices are sent.
    pub price_precision: u32,
    pub timeout_secs: u64,
    pub get_attempts: u32,
    pub keys_path: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct ClientConfigFile {
    base_url_v1: Option<String>,
    base_url_v2: Option<String>,
    recv_window_ms: Option<u64>,
    request_delay_ms: Option<i64>,
    max_klines_per_request: Option<u32>,
    price_precision: Option<u32>,
    timeout_secs: Option<u64>,
    get_attempts: Option<u32>,
    keys_path: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url_v1: "https://fapi.binance.com/fapi/v1/".to_string(),
            base_url_v2: "https://fapi.binance.com/fapi/v2/".to_string(),
            recv_window_ms: 6000,
            request_delay_ms: 150,
            max_klines_per_request: MAX_KLINES_PER_REQUEST,
            price_precision: 2,
            timeout_secs: 10,
            get_attempts: 3,
            keys_path: None,
        }
    }
}

impl ClientConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|err| Error::configuration(format!("failed to read config: {err}")))?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus env overrides, for running without a config file.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ClientConfigFile = toml::from_str(content)
            .map_err(|err| Error::configuration(format!("failed to parse config: {err}")))?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: ClientConfigFile) -> Self {
        let mut config = Self::default();
        if let Some(value) = file.base_url_v1 {
            config.base_url_v1 = value;
        }
        if let Some(value) = file.base_url_v2 {
            config.base_url_v2 = value;
        }
        if let Some(value) = file.recv_window_ms {
            config.recv_window_ms = value;
        }
        if let Some(value) = file.request_delay_ms {
            config.request_delay_ms = value;
        }
        if let Some(value) = file.max_klines_per_request {
            config.max_klines_per_request = value;
        }
        if let Some(value) = file.price_precision {
            config.price_precision = value;
        }
        if let Some(value) = file.timeout_secs {
            config.timeout_secs = value;
        }
        if let Some(value) = file.get_attempts {
            config.get_attempts = value;
        }
        if let Some(value) = file.keys_path {
            config.keys_path = Some(value);
        }
        config
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = read_string_env("BINAPI_BASE_URL_V1")? {
            self.base_url_v1 = value;
        }
        if let Some(value) = read_string_env("BINAPI_BASE_URL_V2")? {
            self.base_url_v2 = value;
        }
        if let Some(value) = read_parsed_env::<u64>("BINAPI_RECV_WINDOW_MS")? {
            self.recv_window_ms = value;
        }
        if let Some(value) = read_parsed_env::<i64>("BINAPI_REQUEST_DELAY_MS")? {
            self.request_delay_ms = value;
        }
        if let Some(value) = read_parsed_env::<u32>("BINAPI_MAX_KLINES")? {
            self.max_klines_per_request = value;
        }
        if let Some(value) = read_parsed_env::<u32>("BINAPI_PRICE_PRECISION")? {
            self.price_precision = value;
        }
        if let Some(value) = read_parsed_env::<u64>("BINAPI_TIMEOUT_SECS")? {
            self.timeout_secs = value;
        }
        if let Some(value) = read_parsed_env::<u32>("BINAPI_GET_ATTEMPTS")? {
            self.get_attempts = value;
        }
        if let Some(value) = read_string_env("BINAPI_KEYS_PATH")? {
            self.keys_path = Some(value);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("base_url_v1", &self.base_url_v1),
            ("base_url_v2", &self.base_url_v2),
        ] {
            if value.trim().is_empty() {
                return Err(Error::configuration(format!("{name} must be set")));
            }
            if !value.ends_with('/') {
                return Err(Error::configuration(format!("{name} must end with '/'")));
            }
        }
        if !(1..=60_000).contains(&self.recv_window_ms) {
            return Err(Error::configuration("recv_window_ms must be in 1..=60000"));
        }
        if !(1..=MAX_KLINES_PER_REQUEST).contains(&self.max_klines_per_request) {
            return Err(Error::configuration(format!(
                "max_klines_per_request must be in 1..={MAX_KLINES_PER_REQUEST}"
            )));
        }
        if self.price_precision > 8 {
            return Err(Error::configuration("price_precision must be <= 8"));
        }
        if !(1..=MAX_GET_ATTEMPTS).contains(&self.get_attempts) {
            return Err(Error::configuration(format!(
                "get_attempts must be in 1..={MAX_GET_ATTEMPTS}"
            )));
        }
        if let Some(path) = &self.keys_path {
            if path.trim().is_empty() {
                return Err(Error::configuration("keys_path must be non-empty"));
            }
        }
        Ok(())
    }
}

fn read_string_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::configuration(format!("failed to read {key}: {err}"))),
    }
}

fn read_parsed_env<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match read_string_env(key)? {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| Error::configuration(format!("{key} is invalid: {err}"))),
        None => Ok(None),
    }
}
