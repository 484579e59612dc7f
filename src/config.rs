//! Deployment configuration extraction
//!
//! [`ConfigExtractor`] turns a workspace directory plus an environment
//! snapshot into one validated, immutable [`AppConfig`] for the Dockerfile
//! templating stage. The manifest (`app.yaml`) is untrusted input and every
//! extracted field is later interpolated into a generated build script, so
//! this module is a security boundary: each defaulting rule and acceptance
//! check here is a control, not just data massaging.
//!
//! Extraction is a fixed sequence of independent passes over the manifest
//! tree and the workspace filesystem. A missing or malformed manifest is
//! tolerated (all defaults apply); a field that fails validation aborts the
//! whole extraction with a [`ConfigError`] and no partial result.
//!
//! # Environment Variables
//!
//! - `PROJECT_ID`: project identifier for display - default: `"(unknown)"`
//! - `GAE_APPLICATION_YAML_PATH`: manifest path relative to the workspace -
//!   default: `"./app.yaml"`

use crate::error::ConfigError;
use crate::manifest::{self, Manifest};
use crate::validation;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_MANIFEST_PATH: &str = "./app.yaml";
pub const DEFAULT_SERVICE_NAME: &str = "default";
pub const DEFAULT_PROJECT_ID: &str = "(unknown)";
pub const DEFAULT_ENTRYPOINT: &str = "bundle exec rackup -p $PORT";

/// Asset precompilation step used when the workspace looks like a Rails-style
/// app. Tolerant of failure so apps without an asset pipeline task still
/// build.
pub const RAILS_ASSETS_BUILD_SCRIPT: &str = "bundle exec rake assets:precompile || true";

/// An entrypoint as written in the manifest: shell form (a command string) or
/// exec form (an argv sequence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawEntrypoint {
    Shell(String),
    Exec(Vec<String>),
}

/// Validated deployment configuration for one workspace.
///
/// Constructed once per invocation by [`ConfigExtractor::extract`] and
/// read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Base directory for every relative lookup below.
    pub workspace_dir: PathBuf,
    /// Manifest location relative to `workspace_dir`.
    pub manifest_path: PathBuf,
    /// Display-only project identifier, never validated.
    pub project_id: String,
    pub service_name: String,
    /// Keys are safe shell identifiers; values pass through unvalidated and
    /// must be quoted by the templater.
    pub env_variables: BTreeMap<String, String>,
    pub cloud_sql_instances: Vec<String>,
    /// One generated script line per entry.
    pub build_scripts: Vec<String>,
    pub raw_entrypoint: RawEntrypoint,
    /// Rendered form of `raw_entrypoint`, see [`decorate_entrypoint`].
    pub entrypoint: String,
    pub install_packages: Vec<String>,
    /// Trimmed contents of `.ruby-version`, empty when the file is absent.
    pub ruby_version: String,
    /// Whether `Gemfile.lock` exists and is readable; drives the templater's
    /// dependency-install step.
    pub has_gemfile_lock: bool,
}

/// Stateless extractor; see the module docs for the pass structure.
pub struct ConfigExtractor;

impl ConfigExtractor {
    /// Extracts and validates the configuration for `workspace_dir` against
    /// an explicit environment snapshot.
    ///
    /// The snapshot makes extraction a pure function of its arguments, which
    /// keeps the precedence chains testable without touching process state.
    pub fn extract(
        workspace_dir: &Path,
        env: &HashMap<String, String>,
    ) -> Result<AppConfig, ConfigError> {
        let project_id = env
            .get("PROJECT_ID")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());
        let manifest_rel = env
            .get("GAE_APPLICATION_YAML_PATH")
            .cloned()
            .unwrap_or_else(|| DEFAULT_MANIFEST_PATH.to_string());

        let manifest = Manifest::load(&workspace_dir.join(&manifest_rel));
        let runtime_config = manifest.mapping("runtime_config");
        let beta_settings = manifest.mapping("beta_settings");
        let lifecycle = manifest.mapping("lifecycle");
        let service_name = manifest.string_or("service", DEFAULT_SERVICE_NAME);
        debug!(service = %service_name, manifest = %manifest_rel, "manifest loaded");

        let env_variables = extract_env_variables(&manifest)?;
        let build_scripts = extract_build_scripts(workspace_dir, &lifecycle, &runtime_config)?;
        let cloud_sql_instances = extract_cloud_sql_instances(&beta_settings)?;
        let raw_entrypoint = resolve_entrypoint(&runtime_config, &manifest)?;
        let entrypoint = decorate_entrypoint(&raw_entrypoint);
        let install_packages = extract_packages(&runtime_config, &manifest)?;
        let ruby_version = extract_ruby_version(workspace_dir)?;
        let has_gemfile_lock = fs::File::open(workspace_dir.join("Gemfile.lock")).is_ok();

        Ok(AppConfig {
            workspace_dir: workspace_dir.to_path_buf(),
            manifest_path: PathBuf::from(manifest_rel),
            project_id,
            service_name,
            env_variables,
            cloud_sql_instances,
            build_scripts,
            raw_entrypoint,
            entrypoint,
            install_packages,
            ruby_version,
            has_gemfile_lock,
        })
    }

    /// Convenience wrapper that snapshots the process environment.
    pub fn from_process_env(workspace_dir: &Path) -> Result<AppConfig, ConfigError> {
        let env = std::env::vars().collect();
        Self::extract(workspace_dir, &env)
    }
}

fn extract_env_variables(manifest: &Manifest) -> Result<BTreeMap<String, String>, ConfigError> {
    let vars = manifest.string_map("env_variables");
    for name in vars.keys() {
        validation::check_env_var_name(name)?;
    }
    Ok(vars)
}

/// A manifest build override (`lifecycle.build`, then `runtime_config.build`)
/// replaces the filesystem-derived default entirely; there is no merging.
fn extract_build_scripts(
    workspace_dir: &Path,
    lifecycle: &Manifest,
    runtime_config: &Manifest,
) -> Result<Vec<String>, ConfigError> {
    let scripts = lifecycle
        .string_list("build")
        .or_else(|| runtime_config.string_list("build"))
        .unwrap_or_else(|| default_build_scripts(workspace_dir));
    for script in &scripts {
        validation::check_build_script(script)?;
    }
    Ok(scripts)
}

/// Heuristic detection of a Rails-style asset pipeline: both an asset
/// directory and an application config file must be present.
fn default_build_scripts(workspace_dir: &Path) -> Vec<String> {
    if workspace_dir.join("app/assets").is_dir()
        && workspace_dir.join("config/application.rb").is_file()
    {
        debug!("asset pipeline detected, defaulting build to precompile step");
        vec![RAILS_ASSETS_BUILD_SCRIPT.to_string()]
    } else {
        Vec::new()
    }
}

fn extract_cloud_sql_instances(beta_settings: &Manifest) -> Result<Vec<String>, ConfigError> {
    let instances = beta_settings
        .string_list("cloud_sql_instances")
        .unwrap_or_default();
    for name in &instances {
        validation::check_cloud_sql_instance(name)?;
    }
    Ok(instances)
}

/// Precedence is an explicit ordered lookup chain, first non-absent value
/// wins: `runtime_config.entrypoint`, then root `entrypoint`, then the
/// built-in default.
fn resolve_entrypoint(
    runtime_config: &Manifest,
    manifest: &Manifest,
) -> Result<RawEntrypoint, ConfigError> {
    let lookups = [runtime_config, manifest];
    let raw = lookups
        .iter()
        .find_map(|m| entrypoint_value(m))
        .unwrap_or_else(|| RawEntrypoint::Shell(DEFAULT_ENTRYPOINT.to_string()));

    if let RawEntrypoint::Shell(command) = &raw {
        validation::check_entrypoint(command)?;
    }
    Ok(raw)
}

fn entrypoint_value(manifest: &Manifest) -> Option<RawEntrypoint> {
    match manifest.value("entrypoint")? {
        Value::Sequence(seq) => Some(RawEntrypoint::Exec(
            seq.iter().filter_map(manifest::scalar_to_string).collect(),
        )),
        value => manifest::scalar_to_string(value).map(RawEntrypoint::Shell),
    }
}

/// Renders the raw entrypoint for the generated Dockerfile.
///
/// Exec form is emitted as a JSON array literal: no shell is involved, so no
/// wrapping is needed. Shell form gets an `exec ` prefix so the application
/// process replaces the shell and receives signals directly. Commands that
/// already carry the prefix are left alone, as are compound commands
/// (`;`, `&&`, `|`) where a blind prefix would only apply to the first
/// clause.
pub fn decorate_entrypoint(raw: &RawEntrypoint) -> String {
    match raw {
        RawEntrypoint::Exec(args) => {
            serde_json::to_string(args).expect("a string sequence always serializes to JSON")
        }
        RawEntrypoint::Shell(command) => {
            if command.starts_with("exec ")
                || command.contains(';')
                || command.contains("&&")
                || command.contains('|')
            {
                command.clone()
            } else {
                format!("exec {command}")
            }
        }
    }
}

fn extract_packages(
    runtime_config: &Manifest,
    manifest: &Manifest,
) -> Result<Vec<String>, ConfigError> {
    let packages = runtime_config
        .string_list("packages")
        .or_else(|| manifest.string_list("packages"))
        .unwrap_or_default();
    for name in &packages {
        validation::check_package_name(name)?;
    }
    Ok(packages)
}

/// A missing `.ruby-version` means "use the runtime default"; any other read
/// failure also falls back to empty but stays visible in the log.
fn extract_ruby_version(workspace_dir: &Path) -> Result<String, ConfigError> {
    let path = workspace_dir.join(".ruby-version");
    let version = match fs::read_to_string(&path) {
        Ok(contents) => contents.trim().to_string(),
        Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "unreadable .ruby-version, using default");
            String::new()
        }
    };
    validation::check_ruby_version(&version)?;
    Ok(version)
}
