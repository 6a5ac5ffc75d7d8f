//! CLI argument parsing for the stats binary

use clap::Parser;
use std::path::PathBuf;

/// In-process metrics aggregator
#[derive(Parser, Debug, Clone)]
#[command(name = "stats")]
#[command(about = "Collects samples over JSON-RPC and serves them as JSON")]
#[command(version)]
pub struct Cli {
    /// HTTP listen address (":port" listens on all interfaces)
    #[arg(long = "http", default_value = ":8090")]
    pub http: String,

    /// Max points to retain per series
    #[arg(long = "max", default_value_t = 60)]
    pub max: usize,

    /// Directory holding index.html and flotr/
    #[arg(long, default_value = "static")]
    pub static_dir: PathBuf,

    /// Do not serve dashboard assets
    #[arg(long)]
    pub no_static: bool,

    /// Maximum RPC request body size in bytes
    #[arg(long, default_value = "1048576")]
    pub max_body_size: usize,

    /// Disable permissive CORS headers
    #[arg(long)]
    pub no_cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["stats"]);
        assert_eq!(cli.http, ":8090");
        assert_eq!(cli.max, 60);
        assert_eq!(cli.static_dir, PathBuf::from("static"));
        assert!(!cli.no_static);
        assert_eq!(cli.max_body_size, 1_048_576);
        assert!(!cli.no_cors);
        assert_eq!(cli.log_level, "info");
        assert!(!cli.log_json);
    }

    #[test]
    fn test_cli_custom_values() {
        let cli = Cli::parse_from([
            "stats",
            "--http", "127.0.0.1:9000",
            "--max", "120",
            "--static-dir", "/srv/stats",
            "--max-body-size", "4096",
            "--no-cors",
            "--log-level", "debug",
            "--log-json",
        ]);
        assert_eq!(cli.http, "127.0.0.1:9000");
        assert_eq!(cli.max, 120);
        assert_eq!(cli.static_dir, PathBuf::from("/srv/stats"));
        assert_eq!(cli.max_body_size, 4096);
        assert!(cli.no_cors);
        assert_eq!(cli.log_level, "debug");
        assert!(cli.log_json);
    }

    #[test]
    fn test_cli_rejects_non_numeric_max() {
        assert!(Cli::try_parse_from(["stats", "--max", "lots"]).is_err());
    }
}
