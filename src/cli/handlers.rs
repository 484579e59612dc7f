//! Command handlers mapping CLI invocations to extraction and output
//!
//! Handlers return process exit codes rather than results: a fatal validation
//! error prints one diagnostic line to stderr and yields a non-zero status,
//! with no partial output on stdout.

use std::fs;
use std::path::PathBuf;
use tracing::debug;

use super::commands::ExtractArgs;
use super::output::OutputFormatter;
use crate::config::ConfigExtractor;

pub fn handle_extract(args: &ExtractArgs, _quiet: bool, _verbose: bool) -> i32 {
    let workspace_dir = args
        .workspace_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    debug!(workspace = %workspace_dir.display(), "starting extraction");

    let config = match ConfigExtractor::from_process_env(&workspace_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    let rendered = match formatter.format(&config) {
        Ok(rendered) => rendered,
        Err(err) => {
            eprintln!("{err:#}");
            return 1;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(err) = fs::write(path, &rendered) {
                eprintln!("Failed to write {}: {}", path.display(), err);
                return 1;
            }
            debug!(path = %path.display(), "configuration written");
        }
        None => print!("{rendered}"),
    }

    0
}
