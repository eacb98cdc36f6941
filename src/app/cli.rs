use crate::config::ClientConfig;
use crate::credentials::Credentials;
use crate::exchange::FuturesClient;
use crate::models::{Interval, StatusFilter};
use crate::{Error, Result};
use serde::Serialize;
use std::env;
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Ping,
    Symbols {
        quote_assets: Vec<String>,
    },
    Klines {
        symbol: String,
        interval: Interval,
        limit: u32,
        end_time: Option<i64>,
    },
    SubKlines {
        symbol: String,
        interval: Interval,
        subinterval: Interval,
        start_time: i64,
    },
    Ticker {
        symbol: String,
    },
    Account,
    Position {
        symbol: String,
    },
    Orders {
        symbol: String,
        filter: StatusFilter,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CliArgs {
    pub config_path: Option<String>,
    pub keys_path: Option<String>,
    pub command: Option<Command>,
    pub show_help: bool,
}

pub fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;

    let Some(command) = cli.command.filter(|_| !cli.show_help) else {
        print_usage();
        return Ok(());
    };

    let mut config = match &cli.config_path {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::from_env()?,
    };
    if let Some(path) = cli.keys_path {
        config.keys_path = Some(path);
    }
    let credentials = load_credentials(&config)?;
    let client = FuturesClient::connect(config, credentials)?;

    match command {
        Command::Ping => {
            let connected = client.test_connectivity();
            print_json(&serde_json::json!({ "connected": connected }))?;
            if !connected {
                return Err(Error::transport(None, "exchange api unreachable"));
            }
        }
        Command::Symbols { quote_assets } => {
            let quotes: Vec<&str> = quote_assets.iter().map(String::as_str).collect();
            print_json(&client.all_symbols(&quotes)?)?;
        }
        Command::Klines {
            symbol,
            interval,
            limit,
            end_time,
        } => {
            let series = client.symbol_klines(&symbol, interval, limit, end_time)?;
            info!(symbol = %symbol, rows = series.len(), "klines fetched");
            for candle in &series {
                print_json(candle)?;
            }
        }
        Command::SubKlines {
            symbol,
            interval,
            subinterval,
            start_time,
        } => {
            let series = client.symbol_sub_klines(&symbol, interval, start_time, subinterval)?;
            for candle in &series {
                print_json(candle)?;
            }
        }
        Command::Ticker { symbol } => print_json(&client.ticker_24h(&symbol)?)?,
        Command::Account => print_json(&client.account()?)?,
        Command::Position { symbol } => {
            for position in client.positions(&symbol)? {
                print_json(&position)?;
            }
        }
        Command::Orders { symbol, filter } => {
            for order in client.all_orders(&symbol, filter)? {
                print_json(&order)?;
            }
        }
    }
    Ok(())
}

fn load_credentials(config: &ClientConfig) -> Result<Credentials> {
    if let Some(path) = &config.keys_path {
        return Credentials::from_file(path);
    }
    Credentials::from_env()?.ok_or_else(|| {
        Error::configuration(
            "no credentials: pass --keys or set BINAPI_API_KEY and BINAPI_SECRET_KEY",
        )
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let line = serde_json::to_string(value)
        .map_err(|err| Error::new(format!("failed to encode output: {err}")))?;
    println!("{line}");
    Ok(())
}

#[derive(Default)]
struct Options {
    symbol: Option<String>,
    interval: Option<Interval>,
    subinterval: Option<Interval>,
    limit: Option<u32>,
    end_time: Option<i64>,
    start_time: Option<i64>,
    quote_assets: Vec<String>,
    status: Option<StatusFilter>,
}

pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut config_path = None;
    let mut keys_path = None;
    let mut show_help = false;
    let mut command_name: Option<String> = None;
    let mut options = Options::default();

    let mut index = 1;
    while index < args.len() {
        let flag = args[index].as_str();
        let value = || {
            args.get(index + 1)
                .ok_or_else(|| Error::invalid_input(format!("missing value for {flag}")))
        };
        match flag {
            "--help" | "-h" => {
                show_help = true;
                index += 1;
                continue;
            }
            "--config" | "-c" => config_path = Some(value()?.to_string()),
            "--keys" | "-k" => keys_path = Some(value()?.to_string()),
            "--symbol" | "-s" => options.symbol = Some(value()?.to_string()),
            "--interval" | "-i" => options.interval = Some(value()?.parse()?),
            "--subinterval" => options.subinterval = Some(value()?.parse()?),
            "--limit" | "-l" => options.limit = Some(parse_number(flag, value()?)?),
            "--end-time" => options.end_time = Some(parse_number(flag, value()?)?),
            "--start-time" => options.start_time = Some(parse_number(flag, value()?)?),
            "--quote" | "-q" => options.quote_assets.push(value()?.to_string()),
            "--status" => options.status = Some(value()?.parse()?),
            other if other.starts_with('-') => {
                return Err(Error::invalid_input(format!("unknown argument: {other}")));
            }
            other => {
                if command_name.is_some() {
                    return Err(Error::invalid_input(format!("unexpected argument: {other}")));
                }
                command_name = Some(other.to_string());
                index += 1;
                continue;
            }
        }
        index += 2;
    }

    let command = match command_name {
        Some(name) if !show_help => Some(build_command(&name, options)?),
        _ => None,
    };
    Ok(CliArgs {
        config_path,
        keys_path,
        command,
        show_help,
    })
}

fn build_command(name: &str, options: Options) -> Result<Command> {
    let symbol = || {
        options
            .symbol
            .clone()
            .ok_or_else(|| Error::invalid_input(format!("{name} requires --symbol")))
    };
    let interval = || {
        options
            .interval
            .ok_or_else(|| Error::invalid_input(format!("{name} requires --interval")))
    };
    let command = match name {
        "ping" => Command::Ping,
        "symbols" => Command::Symbols {
            quote_assets: options.quote_assets.clone(),
        },
        "klines" => Command::Klines {
            symbol: symbol()?,
            interval: interval()?,
            limit: options
                .limit
                .ok_or_else(|| Error::invalid_input("klines requires --limit"))?,
            end_time: options.end_time,
        },
        "sub-klines" => Command::SubKlines {
            symbol: symbol()?,
            interval: interval()?,
            subinterval: options
                .subinterval
                .ok_or_else(|| Error::invalid_input("sub-klines requires --subinterval"))?,
            start_time: options
                .start_time
                .ok_or_else(|| Error::invalid_input("sub-klines requires --start-time"))?,
        },
        "ticker" => Command::Ticker { symbol: symbol()? },
        "account" => Command::Account,
        "position" => Command::Position { symbol: symbol()? },
        "orders" => Command::Orders {
            symbol: symbol()?,
            filter: options.status.unwrap_or_default(),
        },
        _ => return Err(Error::invalid_input(format!("unknown command: {name}"))),
    };
    Ok(command)
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|err| Error::invalid_input(format!("invalid value for {flag}: {err}")))
}

fn print_usage() {
    println!("binapi [--config path] [--keys path] <command> [options]");
    println!();
    println!("commands:");
    println!("  ping");
    println!("  symbols [--quote USDT]...");
    println!("  klines --symbol BTCUSDT --interval 1h --limit 3000 [--end-time ms]");
    println!("  sub-klines --symbol BTCUSDT --interval 1h --subinterval 5m --start-time ms");
    println!("  ticker --symbol BTCUSDT");
    println!("  account");
    println!("  position --symbol BTCUSDT");
    println!("  orders --symbol BTCUSDT [--status NEW|FILLED|...|ALL]");
    println!();
    println!("env: BINAPI_API_KEY, BINAPI_SECRET_KEY, BINAPI_KEYS_PATH, BINAPI_LOG");
}
