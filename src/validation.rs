//! Field acceptance rules
//!
//! Each rule guards one class of value that gets interpolated into the
//! generated Dockerfile or build script. The character classes are a fixed
//! part of the accepted input shape: tightening or loosening them changes
//! which manifests are valid, so they are spelled out as ASCII ranges rather
//! than `\w` (which is Unicode-aware in the `regex` crate).

use crate::error::ConfigError;
use regex::Regex;
use std::sync::OnceLock;

/// Shell/Dockerfile identifier: letters, digits, underscore, not starting
/// with a digit.
fn env_key_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap())
}

/// Cloud SQL connection name triple `project:region:instance`.
fn cloud_sql_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_:.\-]+$").unwrap())
}

/// Debian package name character set.
fn package_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap())
}

/// Ruby version string; the empty string (no `.ruby-version` file) is valid.
fn ruby_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]*$").unwrap())
}

/// Env var names become `ENV name=value` declarations.
pub fn check_env_var_name(name: &str) -> Result<(), ConfigError> {
    if env_key_re().is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::IllegalEnvVarName {
            name: name.to_string(),
        })
    }
}

/// Each build script becomes one line of the generated script; an embedded
/// newline would smuggle in an extra command.
pub fn check_build_script(script: &str) -> Result<(), ConfigError> {
    if script.contains('\n') {
        Err(ConfigError::IllegalBuildScript)
    } else {
        Ok(())
    }
}

pub fn check_cloud_sql_instance(name: &str) -> Result<(), ConfigError> {
    if cloud_sql_re().is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::IllegalCloudSqlInstance {
            name: name.to_string(),
        })
    }
}

/// Shell-form entrypoints are rendered on a single Dockerfile line.
pub fn check_entrypoint(entrypoint: &str) -> Result<(), ConfigError> {
    if entrypoint.contains('\n') {
        Err(ConfigError::IllegalEntrypoint)
    } else {
        Ok(())
    }
}

/// Package names are interpolated into an `apt-get install` command.
pub fn check_package_name(name: &str) -> Result<(), ConfigError> {
    if package_re().is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::IllegalPackageName {
            name: name.to_string(),
        })
    }
}

pub fn check_ruby_version(version: &str) -> Result<(), ConfigError> {
    if ruby_version_re().is_match(version) {
        Ok(())
    } else {
        Err(ConfigError::IllegalRubyVersion {
            version: version.to_string(),
        })
    }
}
