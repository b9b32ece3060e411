//! CLI定義

use clap::{Args, Parser, Subcommand};

/// Twin registry - central catalog of shell and submodel descriptors
#[derive(Parser, Debug)]
#[command(name = "twinreg-registry")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    TWINREG_HOST            Bind address (default: 0.0.0.0)
    TWINREG_PORT            Listen port (default: 4999)
    TWINREG_LOG_LEVEL       Log level (default: info)
    TWINREG_LOG_DIR         Directory for daily-rotated log files
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the registry server
    Serve(ServeArgs),
}

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value = "4999", env = "TWINREG_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "TWINREG_HOST")]
    pub host: String,
}
