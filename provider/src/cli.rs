//! CLI定義

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use twinreg_common::config::ProviderConfig;

/// Twin provider - serves submodels and keeps their registration alive
#[derive(Parser, Debug)]
#[command(name = "twinreg-provider")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    TWINREG_REGISTRY_URL            Registry base URL (default: http://localhost:4999)
    TWINREG_PROVIDER_HOST           Bind address (default: 0.0.0.0)
    TWINREG_PROVIDER_PORT           Listen port (default: 5111)
    TWINREG_PUBLIC_URL              Address advertised to the registry
    TWINREG_RENEWAL_INTERVAL_SECS   Registration renewal interval, 0 disables (default: 30)
    TWINREG_REQUEST_TIMEOUT_SECS    Timeout for registry calls (default: 5)
    TWINREG_LOG_LEVEL               Log level (default: info)
    TWINREG_LOG_DIR                 Directory for daily-rotated log files
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve submodels and register them
    Serve(ServeArgs),
}

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Submodel JSON file (repeatable)
    #[arg(short, long = "submodel", required = true, env = "TWINREG_SUBMODEL_FILE")]
    pub submodels: Vec<PathBuf>,

    /// Shell identifier to register (default: derived from the first submodel)
    #[arg(long, env = "TWINREG_AAS_ID")]
    pub aas_id: Option<String>,

    /// Shell idShort
    #[arg(long, default_value = "Shell", env = "TWINREG_AAS_ID_SHORT")]
    pub aas_id_short: String,

    /// Registry base URL
    #[arg(long, default_value = "http://localhost:4999", env = "TWINREG_REGISTRY_URL")]
    pub registry_url: String,

    /// Listen port
    #[arg(short, long, default_value = "5111", env = "TWINREG_PROVIDER_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "TWINREG_PROVIDER_HOST")]
    pub host: String,

    /// Renewal interval in seconds (0 disables renewal)
    #[arg(long, default_value = "30", env = "TWINREG_RENEWAL_INTERVAL_SECS")]
    pub renewal_interval_secs: u64,

    /// Timeout for registry calls in seconds
    #[arg(long, default_value = "5", env = "TWINREG_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,

    /// Address advertised in endpoints
    #[arg(long, env = "TWINREG_PUBLIC_URL")]
    pub public_url: Option<String>,
}

impl ServeArgs {
    /// 設定構造体に変換
    pub fn to_config(&self) -> ProviderConfig {
        ProviderConfig {
            registry_url: self.registry_url.clone(),
            host: self.host.clone(),
            port: self.port,
            renewal_interval_secs: self.renewal_interval_secs,
            request_timeout_secs: self.request_timeout_secs,
            public_url: self.public_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_parse_serve_args() {
        let cli = Cli::try_parse_from([
            "twinreg-provider",
            "serve",
            "--submodel",
            "a.json",
            "-s",
            "b.json",
            "--renewal-interval-secs",
            "0",
            "--public-url",
            "http://twin.local:5111",
        ])
        .unwrap();

        let Commands::Serve(args) = cli.command;
        assert_eq!(args.submodels.len(), 2);
        let config = args.to_config();
        assert_eq!(config.renewal_interval(), None);
        assert_eq!(config.advertised_url(), "http://twin.local:5111");
    }

    #[test]
    #[serial]
    fn test_submodel_is_required() {
        std::env::remove_var("TWINREG_SUBMODEL_FILE");
        assert!(Cli::try_parse_from(["twinreg-provider", "serve"]).is_err());
    }
}
