//! Output formatting for the extracted configuration
//!
//! Formatters for JSON and YAML (machine-readable, handed to the Dockerfile
//! generation stage) and a sectioned human-readable rendering for terminals.

use anyhow::{Context, Result};

use crate::config::AppConfig;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-friendly, version-control friendly)
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// Output formatter for extracted configurations
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a configuration according to the configured format
    pub fn format(&self, config: &AppConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(config)
                .context("Failed to serialize configuration to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(config)
                .context("Failed to serialize configuration to YAML"),
            OutputFormat::Human => Ok(self.format_human(config)),
        }
    }

    fn format_human(&self, config: &AppConfig) -> String {
        let mut output = String::new();

        output.push_str("Deployment Configuration\n");
        output.push_str(&"\u{2501}".repeat(40));
        output.push_str("\n\n");

        output.push_str(&format!("Service:      {}\n", config.service_name));
        output.push_str(&format!("Project:      {}\n", config.project_id));
        output.push_str(&format!(
            "Workspace:    {}\n",
            config.workspace_dir.display()
        ));
        output.push_str(&format!(
            "Manifest:     {}\n",
            config.manifest_path.display()
        ));
        if config.ruby_version.is_empty() {
            output.push_str("Ruby Version: (runtime default)\n");
        } else {
            output.push_str(&format!("Ruby Version: {}\n", config.ruby_version));
        }
        output.push_str(&format!(
            "Gemfile.lock: {}\n\n",
            if config.has_gemfile_lock {
                "present"
            } else {
                "absent"
            }
        ));

        output.push_str(&format!("Entrypoint:   {}\n\n", config.entrypoint));

        output.push_str("Environment Variables:\n");
        if config.env_variables.is_empty() {
            output.push_str("  (none)\n");
        } else {
            for (name, value) in &config.env_variables {
                output.push_str(&format!("  {}={}\n", name, value));
            }
        }
        output.push('\n');

        output.push_str("Build Scripts:\n");
        if config.build_scripts.is_empty() {
            output.push_str("  (none)\n");
        } else {
            for script in &config.build_scripts {
                output.push_str(&format!("  - {}\n", script));
            }
        }
        output.push('\n');

        output.push_str("Install Packages:\n");
        if config.install_packages.is_empty() {
            output.push_str("  (none)\n");
        } else {
            for package in &config.install_packages {
                output.push_str(&format!("  - {}\n", package));
            }
        }
        output.push('\n');

        output.push_str("Cloud SQL Instances:\n");
        if config.cloud_sql_instances.is_empty() {
            output.push_str("  (none)\n");
        } else {
            for instance in &config.cloud_sql_instances {
                output.push_str(&format!("  - {}\n", instance));
            }
        }

        output
    }
}
