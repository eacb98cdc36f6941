use tracing_subscriber::EnvFilter;

/// Our own events at info, the HTTP stack only when it warns.
const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,rustls=warn";

/// Logs go to stderr; stdout carries the JSON lines the CLI prints.
pub fn init() {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests, embedding programs).
    let _ = match log_format().as_deref() {
        Some("json") => builder.json().try_init(),
        _ => builder.try_init(),
    };
}

fn env_filter() -> EnvFilter {
    ["BINAPI_LOG", "RUST_LOG"]
        .into_iter()
        .find_map(non_empty_env)
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn log_format() -> Option<String> {
    non_empty_env("BINAPI_LOG_FORMAT").map(|value| value.trim().to_ascii_lowercase())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
