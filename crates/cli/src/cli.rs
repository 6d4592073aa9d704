use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Inspect the Azure Monitor OpenTelemetry distro configuration
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level (ERROR, WARN, INFO, DEBUG, TRACE)
    #[arg(short, long, global = true, default_value = "INFO", env = "AZMON_LOG_LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Print the resolved options, with every default applied
    Show(ShowArgs),

    /// Initialize the pipeline and print the published statsbeat masks
    Statsbeat(ConfigArgs),

    /// Print the distro version
    Version,
}

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Configuration file (JSON, or TOML with a .toml extension).
    /// Overrides APPLICATIONINSIGHTS_CONFIGURATION_FILE.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Toml,
}
