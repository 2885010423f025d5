use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "relay-gateway")]
#[command(about = "HTTP gateway that validates, groups and paces outbound messages")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "gateway.toml")]
    pub config: String,

    /// Override server.port (takes precedence over PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Validate the configuration and exit
    #[arg(long)]
    pub check: bool,
}
