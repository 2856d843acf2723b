use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cloudpick_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

struct ConfigSource {
    doc: Option<Value>,
    path: Option<PathBuf>,
}

pub fn run() -> CommandResult {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => CommandResult { exit_code: 0, output: render(&config) },
        Err(error) => CommandResult {
            exit_code: EXIT_CONFIG,
            output: format!("config validation failed: {error}"),
        },
    }
}

fn render(config: &AppConfig) -> String {
    let path = resolve_config_path(None);
    let source = ConfigSource { doc: load_config_file_doc(path.as_deref()), path };

    let fields: [(&str, String, &[&str]); 7] = [
        ("database.url", config.database.url.clone(), &["CLOUDPICK_DATABASE_URL"]),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["CLOUDPICK_DATABASE_MAX_CONNECTIONS"],
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["CLOUDPICK_DATABASE_TIMEOUT_SECS"],
        ),
        ("dataset.path", config.dataset.path.display().to_string(), &["CLOUDPICK_DATASET_PATH"]),
        (
            "engine.strict_segments",
            config.engine.strict_segments.to_string(),
            &["CLOUDPICK_ENGINE_STRICT_SEGMENTS"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["CLOUDPICK_LOGGING_LEVEL", "CLOUDPICK_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            &["CLOUDPICK_LOGGING_FORMAT", "CLOUDPICK_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, value, env_keys) in fields {
        lines.push(render_line(key_path, &value, field_source(key_path, env_keys, &source)));
    }

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(key_path: &str, env_keys: &[&str], source: &ConfigSource) -> String {
    let env_key = env_keys
        .iter()
        .find(|key| env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false));
    if let Some(env_key) = env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = &source.doc {
        if contains_path(doc, key_path) {
            let file_path = source
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::{contains_path, field_source, ConfigSource};

    #[test]
    fn nested_keys_are_found_in_toml_doc() {
        let doc: toml::Value =
            "[engine]\nstrict_segments = true\n".parse().expect("toml should parse");

        assert!(contains_path(&doc, "engine.strict_segments"));
        assert!(!contains_path(&doc, "engine.missing"));
        assert!(!contains_path(&doc, "dataset.path"));
    }

    #[test]
    fn file_source_is_reported_when_env_is_unset() {
        let doc: toml::Value = "[dataset]\npath = \"x.csv\"\n".parse().expect("toml should parse");
        let source = ConfigSource { doc: Some(doc), path: Some("cloudpick.toml".into()) };

        assert_eq!(
            field_source("dataset.path", &["CLOUDPICK_TEST_UNSET_DATASET_KEY"], &source),
            "file (cloudpick.toml)"
        );
        assert_eq!(
            field_source("logging.level", &["CLOUDPICK_TEST_UNSET_LEVEL_KEY"], &source),
            "default"
        );
    }

    #[test]
    fn blank_env_value_does_not_claim_the_source() {
        let key = "CLOUDPICK_TEST_BLANK_DATASET_KEY";
        let doc: toml::Value = "[dataset]\npath = \"x.csv\"\n".parse().expect("toml should parse");
        let source = ConfigSource { doc: Some(doc), path: Some("cloudpick.toml".into()) };

        env::set_var(key, "  ");
        let blank = field_source("dataset.path", &[key], &source);
        env::set_var(key, "y.csv");
        let set = field_source("dataset.path", &[key], &source);
        env::remove_var(key);

        assert_eq!(blank, "file (cloudpick.toml)");
        assert_eq!(set, format!("env ({key})"));
    }
}
