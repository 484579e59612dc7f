pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ExtractArgs, OutputFormatArg};
pub use handlers::handle_extract;
pub use output::{OutputFormat, OutputFormatter};
