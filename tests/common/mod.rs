#![allow(dead_code)]

use binapi::data::KlineSource;
use binapi::exchange::{Params, Transport};
use binapi::models::{Candle, CandleSeries, Interval};
use binapi::{Error, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub params: Params,
    pub headers: Vec<(String, String)>,
}

impl RecordedCall {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Replies with queued responses in order and records every call.
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<Value>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, value: Value) -> &Self {
        self.responses.borrow_mut().push_back(Ok(value));
        self
    }

    pub fn fail(&self, err: Error) -> &Self {
        self.responses.borrow_mut().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    fn record(
        &self,
        method: &'static str,
        url: &str,
        params: &Params,
        headers: &[(&str, &str)],
    ) -> Result<Value> {
        self.calls.borrow_mut().push(RecordedCall {
            method,
            url: url.to_string(),
            params: params.clone(),
            headers: headers
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::new(format!("no response queued for {method} {url}"))))
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, params: &Params, headers: &[(&str, &str)]) -> Result<Value> {
        self.record("GET", url, params, headers)
    }

    fn post(&self, url: &str, params: &Params, headers: &[(&str, &str)]) -> Result<Value> {
        self.record("POST", url, params, headers)
    }

    fn delete(&self, url: &str, params: &Params, headers: &[(&str, &str)]) -> Result<Value> {
        self.record("DELETE", url, params, headers)
    }
}

pub const MINUTE_MS: i64 = 60_000;
pub const HISTORY_START: i64 = 1_700_000_000_000 - 1_700_000_000_000 % MINUTE_MS;

pub fn candle(open_time: i64) -> Candle {
    let price = (open_time / MINUTE_MS % 1000) as f64;
    Candle::new(open_time, price, price + 1.0, price - 1.0, price, 10.0).expect("candle")
}

/// One-minute history served the way the exchange does: `endTime` is an inclusive
/// bound on open time and the newest `limit` rows are returned.
pub struct FakeHistory {
    pub cap: u32,
    pub open_times: Vec<i64>,
    /// Pretends the bound is one minute later, so pages overlap the held series.
    pub sloppy_end_time: bool,
    pub fail_on_call: Option<usize>,
    pub calls: RefCell<Vec<(u32, Option<i64>)>>,
}

impl FakeHistory {
    pub fn new(cap: u32, rows: usize) -> Self {
        Self {
            cap,
            open_times: (0..rows as i64)
                .map(|index| HISTORY_START + index * MINUTE_MS)
                .collect(),
            sloppy_end_time: false,
            fail_on_call: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn latest(&self) -> i64 {
        *self.open_times.last().expect("history")
    }

    pub fn calls(&self) -> Vec<(u32, Option<i64>)> {
        self.calls.borrow().clone()
    }
}

impl KlineSource for FakeHistory {
    fn page_cap(&self) -> u32 {
        self.cap
    }

    fn fetch_page(
        &self,
        _symbol: &str,
        interval: Interval,
        limit: u32,
        end_time: Option<i64>,
    ) -> Result<CandleSeries> {
        assert_eq!(interval, Interval::Minute1);
        assert!(limit <= self.cap, "page limit {limit} above cap {}", self.cap);
        self.calls.borrow_mut().push((limit, end_time));
        if self.fail_on_call == Some(self.calls.borrow().len()) {
            return Err(Error::transport(Some(503), "exchange response status: 503"));
        }

        let bound = match end_time {
            Some(end) if self.sloppy_end_time => end + MINUTE_MS,
            Some(end) => end,
            None => i64::MAX,
        };
        let eligible: Vec<i64> = self
            .open_times
            .iter()
            .copied()
            .filter(|open_time| *open_time <= bound)
            .collect();
        let skip = eligible.len().saturating_sub(limit as usize);
        CandleSeries::from_candles(eligible[skip..].iter().map(|time| candle(*time)).collect())
    }
}

pub fn assert_strictly_ascending(series: &CandleSeries) {
    for pair in series.as_slice().windows(2) {
        assert!(
            pair[0].open_time < pair[1].open_time,
            "{} is not before {}",
            pair[0].open_time,
            pair[1].open_time
        );
    }
}

/// Loopback HTTP server that answers every request with the same status and body
/// and counts the requests it saw.
pub struct StubServer {
    pub url: String,
    hits: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl StubServer {
    pub fn start(status_line: &'static str, body: &'static str) -> Self {
        use std::io::{Read, Write};
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let url = format!("http://{}/fapi/v1/", listener.local_addr().expect("addr"));
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                let mut request = Vec::new();
                let mut buffer = [0_u8; 1024];
                while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                    match stream.read(&mut buffer) {
                        Ok(0) | Err(_) => break,
                        Ok(read) => request.extend_from_slice(&buffer[..read]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });
        Self { url, hits }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(std::sync::atomic::Ordering::SeqCst)
    }
}
