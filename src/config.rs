use anyhow::{anyhow, Result};
use clap::Parser;
use std::time::Duration;

use crate::app::ListView;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_REFRESH_SECS: u64 = 30;

/// Pivex - lightweight EVM block explorer
///
/// Renders one explorer page (or a search result) as text.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "pivex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lightweight EVM block explorer", long_about = None)]
pub struct CliArgs {
    /// Route to render: /, /address/<addr>, /tx/<hash> or /block/<n>
    #[arg(default_value = "/")]
    pub path: String,

    /// Search for an address, transaction hash or block number instead of a route
    #[arg(short, long, conflicts_with = "list")]
    pub search: Option<String>,

    /// Show a list page instead of a route
    #[arg(short, long, value_enum)]
    pub list: Option<ListView>,

    /// Keep re-rendering the home page on the refresh timer
    #[arg(short, long)]
    pub watch: bool,

    /// JSON-RPC endpoint URL
    #[arg(long, env = "PIVEX_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Auto refresh interval in seconds (1-3600)
    #[arg(long, env = "PIVEX_REFRESH_SECS")]
    pub refresh_secs: Option<u64>,

    /// RPC request timeout in milliseconds (1000-60000)
    #[arg(long, env = "PIVEX_RPC_TIMEOUT_MS")]
    pub rpc_timeout_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub rpc_url: String,
    pub refresh_interval: Duration,
    /// None leaves the HTTP client's default
    pub rpc_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            rpc_timeout_ms: None,
        }
    }
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

impl Config {
    pub fn from_args(args: &CliArgs) -> Result<Config> {
        let rpc_url = args
            .rpc_url
            .clone()
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        validate_url(&rpc_url, "PIVEX_RPC_URL")?;

        let refresh_secs = args.refresh_secs.unwrap_or(DEFAULT_REFRESH_SECS);
        let refresh_secs = validate_in_range(refresh_secs, 1, 3600, "PIVEX_REFRESH_SECS")?;

        let rpc_timeout_ms = args
            .rpc_timeout_ms
            .map(|ms| validate_in_range(ms, 1000, 60000, "PIVEX_RPC_TIMEOUT_MS"))
            .transpose()?;

        Ok(Config {
            rpc_url,
            refresh_interval: Duration::from_secs(refresh_secs),
            rpc_timeout_ms,
        })
    }

    /// Browser configuration: an endpoint handed over by the page, if any.
    /// An unusable URL falls back to the default with a warning.
    pub fn for_browser(rpc_url: Option<String>) -> Config {
        let rpc_url = match rpc_url {
            Some(url) => match validate_url(url.trim(), "rpc url") {
                Ok(()) => url.trim().to_string(),
                Err(e) => {
                    log::warn!("⚠️ {e}, using {DEFAULT_RPC_URL}");
                    DEFAULT_RPC_URL.to_string()
                }
            },
            None => DEFAULT_RPC_URL.to_string(),
        };
        Config {
            rpc_url,
            ..Config::default()
        }
    }

    pub fn print_summary(&self) {
        eprintln!("Pivex Configuration:");
        eprintln!("  RPC URL: {}", self.rpc_url);
        eprintln!("  Refresh Interval: {}s", self.refresh_interval.as_secs());
        if let Some(ms) = self.rpc_timeout_ms {
            eprintln!("  RPC Timeout: {ms}ms");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["pivex"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_validate_in_range() {
        assert_eq!(validate_in_range(30, 1, 3600, "X").unwrap(), 30);
        let err = validate_in_range(0, 1, 3600, "X").unwrap_err();
        assert_eq!(err.to_string(), "X must be in range [1, 3600], got 0");
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://rpc.example.org", "U").is_ok());
        assert!(validate_url("", "U").is_err());
        assert!(validate_url("ws://127.0.0.1:8546", "U").is_err());
    }

    #[test]
    fn test_from_args_explicit_values() {
        let cfg = Config::from_args(&args(&[
            "--rpc-url",
            "https://rpc.example.org",
            "--refresh-secs",
            "5",
            "--rpc-timeout-ms",
            "2000",
        ]))
        .unwrap();
        assert_eq!(cfg.rpc_url, "https://rpc.example.org");
        assert_eq!(cfg.refresh_interval, Duration::from_secs(5));
        assert_eq!(cfg.rpc_timeout_ms, Some(2000));
    }

    #[test]
    fn test_from_args_rejects_out_of_range() {
        assert!(Config::from_args(&args(&["--rpc-url", DEFAULT_RPC_URL, "--refresh-secs", "0"])).is_err());
        assert!(Config::from_args(&args(&["--rpc-url", DEFAULT_RPC_URL, "--rpc-timeout-ms", "10"])).is_err());
        assert!(Config::from_args(&args(&["--rpc-url", "localhost:8545"])).is_err());
    }

    #[test]
    fn test_cli_route_and_list() {
        let a = args(&["/block/12", "--watch"]);
        assert_eq!(a.path, "/block/12");
        assert!(a.watch);
        let a = args(&["--list", "txs"]);
        assert_eq!(a.list, Some(ListView::AllTransactions));
        assert_eq!(a.path, "/");
    }

    #[test]
    fn test_for_browser() {
        assert_eq!(Config::for_browser(None), Config::default());
        assert_eq!(
            Config::for_browser(Some(" https://rpc.example.org ".into())).rpc_url,
            "https://rpc.example.org"
        );
        assert_eq!(
            Config::for_browser(Some("javascript:alert(1)".into())).rpc_url,
            DEFAULT_RPC_URL
        );
    }
}
