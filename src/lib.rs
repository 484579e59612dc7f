//! rackpack - deployment-config extraction for Ruby PaaS container builds
//!
//! This library turns a workspace directory containing an application
//! manifest (`app.yaml`) into a normalized, validated configuration consumed
//! downstream to generate a container build file. The manifest is untrusted,
//! loosely structured user input; every extracted field is later interpolated
//! into a generated build script, so extraction doubles as a security
//! boundary with injection-resistant validation on each field.
//!
//! # Core Concepts
//!
//! - **Manifest**: the YAML deployment descriptor, loaded tolerantly (a
//!   missing or malformed file just means "all defaults")
//! - **Extraction**: a fixed sequence of independent defaulting and
//!   validation passes over the manifest tree and the workspace filesystem
//! - **Fatal validation error**: any field failing its acceptance rule aborts
//!   the entire extraction with no partial result
//!
//! # Example Usage
//!
//! ```no_run
//! use rackpack::ConfigExtractor;
//! use std::path::Path;
//!
//! let config = ConfigExtractor::from_process_env(Path::new("/workspace"))?;
//! println!("service: {}", config.service_name);
//! println!("entrypoint: {}", config.entrypoint);
//! # Ok::<(), rackpack::ConfigError>(())
//! ```

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod util;
pub mod validation;

// Re-export key types for convenient access
pub use config::{decorate_entrypoint, AppConfig, ConfigExtractor, RawEntrypoint};
pub use error::ConfigError;
pub use manifest::Manifest;
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_rackpack() {
        assert_eq!(NAME, "rackpack");
    }
}
