use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fiction-gen-proxy",
    version,
    about = "Text-generation proxy for the fiction-writing backend, with Gemini API key rotation",
    long_about = "Forwards text-generation requests to the Gemini API, spreading them across a pool of API keys and failing over to the next key on rate limits, quota errors and upstream outages."
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "FICTION_PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server bind address (overrides the config file)
    #[arg(long, env = "FICTION_PROXY_HOST")]
    pub host: Option<String>,

    /// Server port (overrides the config file and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Default log filter when RUST_LOG is unset
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "FICTION_PROXY_JSON_LOGS")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the proxy server (default)
    Serve,

    /// Validate configuration and report the usable key pool
    CheckConfig,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::try_parse_from(["fiction-gen-proxy"]).unwrap();
        assert_eq!(cli.command(), Commands::Serve);
        assert_eq!(cli.log_level, "info");
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_parses_overrides_and_subcommand() {
        let cli = Cli::try_parse_from([
            "fiction-gen-proxy",
            "--config",
            "custom.yaml",
            "--port",
            "4000",
            "--host",
            "127.0.0.1",
            "check-config",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert_eq!(cli.port, Some(4000));
        assert_eq!(cli.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(cli.command(), Commands::CheckConfig);
    }
}
