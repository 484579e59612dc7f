//! End-to-end extraction tests against realistic workspace fixtures

use rackpack::{AppConfig, ConfigError, ConfigExtractor, RawEntrypoint};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(workspace: &Path, rel: &str, contents: &str) {
    let path = workspace.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn extract(workspace: &Path) -> Result<AppConfig, ConfigError> {
    ConfigExtractor::extract(workspace, &HashMap::new())
}

#[test]
fn bare_workspace_gets_all_defaults() {
    let dir = TempDir::new().unwrap();
    let config = extract(dir.path()).unwrap();

    assert_eq!(config.service_name, "default");
    assert_eq!(config.project_id, "(unknown)");
    assert!(config.env_variables.is_empty());
    assert!(config.cloud_sql_instances.is_empty());
    assert!(config.build_scripts.is_empty());
    assert!(config.install_packages.is_empty());
    assert_eq!(config.entrypoint, "exec bundle exec rackup -p $PORT");
    assert_eq!(config.ruby_version, "");
    assert!(!config.has_gemfile_lock);
}

#[test]
fn full_rails_style_workspace() {
    let dir = TempDir::new().unwrap();
    let ws = dir.path();

    write(
        ws,
        "app.yaml",
        r#"service: web
entrypoint: bundle exec puma -C config/puma.rb
env_variables:
  RAILS_ENV: production
  SECRET_PROVIDER: metadata
beta_settings:
  cloud_sql_instances:
    - my-project:us-central1:primary
    - my-project:us-central1:replica
runtime_config:
  packages:
    - libpq-dev
    - imagemagick
"#,
    );
    write(ws, ".ruby-version", "3.2.2\n");
    write(ws, "Gemfile.lock", "GEM\n  remote: https://rubygems.org/\n");
    write(ws, "config/application.rb", "module MyApp\nend\n");
    fs::create_dir_all(ws.join("app/assets/stylesheets")).unwrap();

    let config = extract(ws).unwrap();

    assert_eq!(config.service_name, "web");
    assert_eq!(
        config.env_variables.get("RAILS_ENV"),
        Some(&"production".to_string())
    );
    assert_eq!(
        config.cloud_sql_instances,
        vec![
            "my-project:us-central1:primary",
            "my-project:us-central1:replica"
        ]
    );
    // No manifest override, so the asset pipeline default kicks in.
    assert_eq!(
        config.build_scripts,
        vec!["bundle exec rake assets:precompile || true"]
    );
    assert_eq!(config.entrypoint, "exec bundle exec puma -C config/puma.rb");
    assert_eq!(config.install_packages, vec!["libpq-dev", "imagemagick"]);
    assert_eq!(config.ruby_version, "3.2.2");
    assert!(config.has_gemfile_lock);
}

#[test]
fn manifest_path_override_via_env() {
    let dir = TempDir::new().unwrap();
    let ws = dir.path();
    write(ws, "app.yaml", "service: ignored\n");
    write(ws, "deploy/prod.yaml", "service: prod\n");

    let mut env = HashMap::new();
    env.insert(
        "GAE_APPLICATION_YAML_PATH".to_string(),
        "deploy/prod.yaml".to_string(),
    );
    env.insert("PROJECT_ID".to_string(), "acme-prod".to_string());

    let config = ConfigExtractor::extract(ws, &env).unwrap();
    assert_eq!(config.service_name, "prod");
    assert_eq!(config.project_id, "acme-prod");
}

#[test]
fn malformed_manifest_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app.yaml", "{{{ not yaml at all");
    let config = extract(dir.path()).unwrap();
    assert_eq!(config.service_name, "default");
}

#[test]
fn env_variable_key_validation() {
    for key in ["GOOD_KEY", "Rails", "x1"] {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "app.yaml",
            &format!("env_variables:\n  {key}: value\n"),
        );
        assert!(extract(dir.path()).is_ok(), "expected {key} to be accepted");
    }

    for key in ["2BAD", "has space", "with-dash"] {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "app.yaml",
            &format!("env_variables:\n  {key:?}: value\n"),
        );
        let err = extract(dir.path()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::IllegalEnvVarName {
                name: key.to_string()
            }
        );
    }
}

#[test]
fn entrypoint_decoration_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app.yaml", "entrypoint: exec rackup -p 8080\n");
    let config = extract(dir.path()).unwrap();
    assert_eq!(config.entrypoint, "exec rackup -p 8080");
}

#[test]
fn compound_entrypoints_are_not_prefixed() {
    for command in [
        "rake db:migrate; rackup",
        "rake db:migrate && rackup",
        "rackup | tee server.log",
    ] {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "app.yaml",
            &format!("entrypoint: {command:?}\n"),
        );
        let config = extract(dir.path()).unwrap();
        assert_eq!(config.entrypoint, command);
    }
}

#[test]
fn exec_form_entrypoint_round_trips_through_json() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "app.yaml",
        "entrypoint:\n  - bundle\n  - exec\n  - puma -w 2\n",
    );
    let config = extract(dir.path()).unwrap();

    assert_eq!(
        config.raw_entrypoint,
        RawEntrypoint::Exec(vec![
            "bundle".to_string(),
            "exec".to_string(),
            "puma -w 2".to_string()
        ])
    );
    let parsed: Vec<String> = serde_json::from_str(&config.entrypoint).unwrap();
    assert_eq!(parsed, vec!["bundle", "exec", "puma -w 2"]);
}

#[test]
fn asset_pipeline_default_requires_both_probes() {
    // Both present: default precompile step.
    let both = TempDir::new().unwrap();
    fs::create_dir_all(both.path().join("app/assets")).unwrap();
    write(both.path(), "config/application.rb", "module App; end\n");
    assert_eq!(
        extract(both.path()).unwrap().build_scripts,
        vec!["bundle exec rake assets:precompile || true"]
    );

    // Assets dir only.
    let assets_only = TempDir::new().unwrap();
    fs::create_dir_all(assets_only.path().join("app/assets")).unwrap();
    assert!(extract(assets_only.path()).unwrap().build_scripts.is_empty());

    // application.rb only.
    let rb_only = TempDir::new().unwrap();
    write(rb_only.path(), "config/application.rb", "module App; end\n");
    assert!(extract(rb_only.path()).unwrap().build_scripts.is_empty());

    // app/assets exists but is a file, not a directory.
    let assets_file = TempDir::new().unwrap();
    write(assets_file.path(), "app/assets", "not a directory");
    write(assets_file.path(), "config/application.rb", "module App; end\n");
    assert!(extract(assets_file.path()).unwrap().build_scripts.is_empty());
}

#[test]
fn manifest_build_override_wins_over_default() {
    let dir = TempDir::new().unwrap();
    let ws = dir.path();
    fs::create_dir_all(ws.join("app/assets")).unwrap();
    write(ws, "config/application.rb", "module App; end\n");
    write(
        ws,
        "app.yaml",
        "lifecycle:\n  build:\n    - yarn install\n    - bundle exec rake assets:precompile\n",
    );

    let config = extract(ws).unwrap();
    assert_eq!(
        config.build_scripts,
        vec!["yarn install", "bundle exec rake assets:precompile"]
    );
}

#[test]
fn package_validation_cites_offender() {
    let good = TempDir::new().unwrap();
    write(
        good.path(),
        "app.yaml",
        "packages:\n  - curl\n  - libpq-dev\n",
    );
    assert_eq!(
        extract(good.path()).unwrap().install_packages,
        vec!["curl", "libpq-dev"]
    );

    let bad = TempDir::new().unwrap();
    write(bad.path(), "app.yaml", "packages:\n  - curl\n  - bad pkg\n");
    let err = extract(bad.path()).unwrap_err();
    assert!(err.to_string().contains("\"bad pkg\""));
}

#[test]
fn ruby_version_is_trimmed_and_optional() {
    let with_file = TempDir::new().unwrap();
    write(with_file.path(), ".ruby-version", "  3.2.0\n");
    assert_eq!(extract(with_file.path()).unwrap().ruby_version, "3.2.0");

    let without_file = TempDir::new().unwrap();
    assert_eq!(extract(without_file.path()).unwrap().ruby_version, "");
}

#[test]
fn fatal_errors_produce_no_partial_config() {
    let dir = TempDir::new().unwrap();
    // Several valid fields plus one fatal one.
    write(
        dir.path(),
        "app.yaml",
        "service: web\npackages:\n  - curl\nenv_variables:\n  bad key: 1\n",
    );
    assert!(extract(dir.path()).is_err());
}
