//! Configuration file handling
//!
//! The tool reads its database credentials and source file path from a TOML
//! file with `[DATABASE]` and `[FILES]` sections. On first run a template is
//! written for the operator to fill in.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(rename = "DATABASE")]
    pub database: DatabaseConfig,
    #[serde(rename = "FILES")]
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub table: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    pub excel_file: String,
}

const TEMPLATE: &str = r#"[DATABASE]
host = "localhost"
database = "your_database"
user = "your_username"
password = "your_password"
table = "form_responses"

[FILES]
excel_file = "google_form_responses.xlsx"
"#;

impl Config {
    /// Parse the configuration file. A missing required key is a hard error;
    /// the pipeline must not start with partial credentials.
    pub fn load(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the placeholder template for the operator to edit.
    pub fn write_template(path: &Path) -> Result<()> {
        fs::write(path, TEMPLATE)
            .with_context(|| format!("Failed to write config template: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        let config: Config = toml::from_str(TEMPLATE).unwrap();
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.database, "your_database");
        assert_eq!(config.database.user, "your_username");
        assert_eq!(config.database.password, "your_password");
        assert_eq!(config.database.table, "form_responses");
        assert_eq!(config.files.excel_file, "google_form_responses.xlsx");
    }

    #[test]
    fn test_missing_key_rejected() {
        // No password key: parsing must fail rather than proceed partially
        let raw = r#"
            [DATABASE]
            host = "localhost"
            database = "db"
            user = "u"
            table = "t"

            [FILES]
            excel_file = "data.xlsx"
        "#;
        assert!(toml::from_str::<Config>(raw).is_err());
    }

    #[test]
    fn test_missing_section_rejected() {
        let raw = r#"
            [DATABASE]
            host = "localhost"
            database = "db"
            user = "u"
            password = "p"
            table = "t"
        "#;
        assert!(toml::from_str::<Config>(raw).is_err());
    }

    #[test]
    fn test_template_round_trip() {
        let path = std::env::temp_dir().join("excel2mysql_config_test.toml");
        Config::write_template(&path).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.database.table, "form_responses");
        std::fs::remove_file(&path).unwrap();
    }
}
