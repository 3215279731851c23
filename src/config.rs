//! Command-line configuration of the server binary.

use crate::lifecycle::DEFAULT_BUFFER_SIZE;
use clap::Parser;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "cheese-api")]
#[command(about = "Cheese listing REST API (JSON-LD, JSON, HAL, HTML, CSV)")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// HTTP port
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,

    /// Items per collection page
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub page_size: u64,

    /// Capacity of each store's request channel
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default filter directive when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::parse_from(["cheese-api"]);
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.buffer_size, 32);
        assert_eq!(config.log_directive(), "info");
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::parse_from([
            "cheese-api",
            "--host",
            "0.0.0.0",
            "-p",
            "9000",
            "--page-size",
            "25",
            "--verbose",
        ]);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log_directive(), "debug");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(ServerConfig::try_parse_from(["cheese-api", "--page-size", "0"]).is_err());
    }
}
