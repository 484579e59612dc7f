//! Fatal validation errors for extracted configuration fields
//!
//! Every extracted field ends up interpolated into a generated Dockerfile or
//! build script, so a value that fails its acceptance rule is treated as a
//! potential injection and aborts the whole extraction. There is no
//! warning-level outcome and no field-level skip-and-continue.

use thiserror::Error;

/// A configuration defect that halts extraction with no partial result.
///
/// The message names the offending field and, where one exists, quotes the
/// offending value so the user can fix their manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Illegal environment variable name: {name:?}")]
    IllegalEnvVarName { name: String },

    #[error("Illegal build command: newlines not permitted")]
    IllegalBuildScript,

    #[error("Illegal cloud sql instance name: {name:?}")]
    IllegalCloudSqlInstance { name: String },

    #[error("Illegal entrypoint: newlines not permitted")]
    IllegalEntrypoint,

    #[error("Illegal debian package name: {name:?}")]
    IllegalPackageName { name: String },

    #[error("Illegal ruby version: {version:?}")]
    IllegalRubyVersion { version: String },
}
