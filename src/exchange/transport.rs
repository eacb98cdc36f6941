use crate::exchange::params::Params;
use crate::{Error, ErrorKind, Result};
use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub type Headers<'a> = [(&'a str, &'a str)];

/// One HTTP round trip per call, decoded to JSON. Exchange error objects come back
/// as `ErrorKind::Exchange`.
pub trait Transport {
    fn get(&self, url: &str, params: &Params, headers: &Headers) -> Result<Value>;
    fn post(&self, url: &str, params: &Params, headers: &Headers) -> Result<Value>;
    fn delete(&self, url: &str, params: &Params, headers: &Headers) -> Result<Value>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, params: &Params, headers: &Headers) -> Result<Value> {
        (**self).get(url, params, headers)
    }

    fn post(&self, url: &str, params: &Params, headers: &Headers) -> Result<Value> {
        (**self).post(url, params, headers)
    }

    fn delete(&self, url: &str, params: &Params, headers: &Headers) -> Result<Value> {
        (**self).delete(url, params, headers)
    }
}

const BASE_DELAY_MS: u64 = 500;
const MAX_DELAY_MS: u64 = 30_000;

/// Pause before the retry that follows failed `attempt` (1-based): 500 ms doubling,
/// capped at 30 s.
pub fn retry_delay(attempt: u32) -> Duration {
    let factor = 1_u64
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u64::MAX);
    Duration::from_millis(BASE_DELAY_MS.saturating_mul(factor).min(MAX_DELAY_MS))
}

pub struct HttpTransport {
    client: Client,
    get_attempts: u32,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64, get_attempts: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .map_err(|err| Error::configuration(format!("http client build failed: {err}")))?;
        Ok(Self {
            client,
            get_attempts: get_attempts.max(1),
        })
    }

    fn send_once(
        &self,
        method: Method,
        url: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<Value> {
        // The query is attached verbatim so the bytes on the wire match what was signed.
        let full_url = params.to_url(url);
        let mut request = self.client.request(method.clone(), full_url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .map_err(|err| Error::transport(None, format!("http request failed: {err}")))?;
        let status = response.status();
        let text = response.text().map_err(|err| {
            Error::transport(Some(status.as_u16()), format!("http read failed: {err}"))
        })?;
        debug!(%method, url, status = status.as_u16(), bytes = text.len(), "exchange response");

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(status_error(status));
        }
        match decode_body(&text) {
            Ok(value) if status.is_success() => Ok(value),
            Err(err) if status.is_success() || matches!(err.kind, ErrorKind::Exchange { .. }) => {
                Err(err)
            }
            // 4xx without an error object, e.g. proxy pages.
            _ => Err(status_error(status)),
        }
    }
}

fn status_error(status: StatusCode) -> Error {
    Error::transport(
        Some(status.as_u16()),
        format!("exchange response status: {status}"),
    )
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, params: &Params, headers: &Headers) -> Result<Value> {
        let mut attempt = 1;
        loop {
            match self.send_once(Method::GET, url, params, headers) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.get_attempts => {
                    let delay = retry_delay(attempt);
                    warn!(
                        url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying GET"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn post(&self, url: &str, params: &Params, headers: &Headers) -> Result<Value> {
        self.send_once(Method::POST, url, params, headers)
    }

    fn delete(&self, url: &str, params: &Params, headers: &Headers) -> Result<Value> {
        self.send_once(Method::DELETE, url, params, headers)
    }
}

/// Parses a response body, turning exchange error objects into errors.
pub fn decode_body(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| Error::malformed(format!("json parse failed: {err}"), text))?;
    match exchange_error(&value) {
        Some(err) => Err(err),
        None => Ok(value),
    }
}

/// `{"code": <n>, "msg": ...}` with a code other than 0 or 200.
pub fn exchange_error(value: &Value) -> Option<Error> {
    let object = value.as_object()?;
    let code = object.get("code")?.as_i64()?;
    if code == 0 || code == 200 {
        return None;
    }
    let msg = object
        .get("msg")
        .and_then(|msg| msg.as_str())
        .unwrap_or("")
        .to_string();
    Some(Error::exchange(code, msg))
}
