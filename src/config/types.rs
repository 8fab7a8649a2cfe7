// Configuration type definitions

use std::path::PathBuf;

use serde::Deserialize;

/// Story service used when no URL is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Title printed on the first page of exported PDFs
pub const DEFAULT_EXPORT_TITLE: &str = "My Story";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_title() -> String {
    DEFAULT_EXPORT_TITLE.to_string()
}

/// Story service connection section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: default_base_url(),
        }
    }
}

/// PDF export section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportConfig {
    /// Directory exported files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            output_dir: default_output_dir(),
            title: default_title(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(config.export.title, "My Story");
        assert_eq!(config.export.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
[server]
base_url = "http://story.internal:9000"

[export]
output_dir = "/tmp/stories"
title = "Night Train"
"#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "http://story.internal:9000");
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/stories"));
        assert_eq!(config.export.title, "Night Train");
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let result: Result<Config, _> = toml::from_str("[server]\nbase_url = 42\n");
        assert!(result.is_err());
    }

    // Any subset of sections and fields parses, with defaults filling the gaps
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_missing_fields_use_defaults(
            include_server in prop::bool::ANY,
            include_base_url in prop::bool::ANY,
            include_export in prop::bool::ANY,
            include_title in prop::bool::ANY,
        ) {
            let mut toml_content = String::new();
            if include_server {
                toml_content.push_str("[server]\n");
                if include_base_url {
                    toml_content.push_str("base_url = \"http://example.test\"\n");
                }
            }
            if include_export {
                toml_content.push_str("[export]\n");
                if include_title {
                    toml_content.push_str("title = \"Draft\"\n");
                }
            }

            let config: Result<Config, _> = toml::from_str(&toml_content);
            prop_assert!(config.is_ok(), "Failed to parse config with missing fields");
            let config = config.unwrap();

            let expected_url = if include_server && include_base_url {
                "http://example.test"
            } else {
                DEFAULT_BASE_URL
            };
            prop_assert_eq!(config.server.base_url.as_str(), expected_url);

            let expected_title = if include_export && include_title {
                "Draft"
            } else {
                DEFAULT_EXPORT_TITLE
            };
            prop_assert_eq!(config.export.title.as_str(), expected_title);
            prop_assert_eq!(config.export.output_dir, PathBuf::from("."));
        }
    }
}
