use crate::exchange::params::Params;
use crate::{Error, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_KEY: &str = "timestamp";
pub const RECV_WINDOW_KEY: &str = "recvWindow";
pub const SIGNATURE_KEY: &str = "signature";

pub fn timestamp_ms() -> Result<i64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::new("system time before unix epoch"))?;
    Ok(now.as_millis() as i64)
}

pub fn hmac_sha256_hex(secret: &str, message: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| Error::configuration("invalid secret key"))?;
    mac.update(message.as_bytes());
    let result = mac.finalize().into_bytes();
    Ok(bytes_to_hex(&result))
}

/// HMAC-SHA256 of the parameters' query string, hex encoded. `params` is left as is.
pub fn sign(params: &Params, secret: &str) -> Result<String> {
    hmac_sha256_hex(secret, &params.query_string())
}

/// Appends `recvWindow` (unless the caller already set one) and `timestamp`, then
/// the signature over everything before it.
pub fn authenticate(
    mut params: Params,
    secret: &str,
    recv_window_ms: u64,
    timestamp: i64,
) -> Result<Params> {
    if params.contains(SIGNATURE_KEY) {
        return Err(Error::invalid_input("params are already signed"));
    }
    if !params.contains(RECV_WINDOW_KEY) {
        params.push(RECV_WINDOW_KEY, recv_window_ms);
    }
    params.remove(TIMESTAMP_KEY);
    params.push(TIMESTAMP_KEY, timestamp);
    let signature = sign(&params, secret)?;
    params.push(SIGNATURE_KEY, signature);
    Ok(params)
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut output = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        output.push_str(&format!("{:02x}", byte));
    }
    output
}
