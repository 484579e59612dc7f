use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Deployment-config extractor for Ruby PaaS container builds
#[derive(Parser, Debug)]
#[command(
    name = "rackpack",
    about = "Deployment-config extractor for Ruby PaaS container builds",
    version,
    author,
    long_about = "rackpack reads a workspace's deployment manifest (app.yaml), applies \
                  defaults and injection-resistant validation, and emits the normalized \
                  configuration consumed by the Dockerfile generation stage."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Extract and validate deployment configuration from a workspace",
        long_about = "Loads the application manifest, applies defaults and validation, and \
                      prints the resulting configuration.\n\n\
                      Examples:\n  \
                      rackpack extract\n  \
                      rackpack extract /path/to/workspace\n  \
                      rackpack extract --format json\n  \
                      rackpack extract --format yaml -o config.yaml"
    )]
    Extract(ExtractArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the workspace (defaults to current directory)"
    )]
    pub workspace_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
