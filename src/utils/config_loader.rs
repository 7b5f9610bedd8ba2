use async_trait::async_trait;
use dotenvy::dotenv;
use regex::{Captures, Regex};
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use std::{env, fs};
use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("Error loading config: {0}")]
    ConfigError(String),
}

#[async_trait]
pub trait ArbConfigLoader {
    type SectionType;

    async fn load_section_from_file(file_name: String) -> Result<Self::SectionType, LoadConfigError>;
}

pub trait ArbConfigLoaderSync {
    type SectionType;

    fn load_section_from_file_sync(file_name: String) -> Result<Self::SectionType, LoadConfigError>;

    fn load_section_from_str(contents: &str) -> Result<Self::SectionType, LoadConfigError>;
}

pub async fn load_from_file<T: DeserializeOwned>(file_name: String) -> Result<T, LoadConfigError> {
    dotenv().ok();
    let contents = tokio::fs::read_to_string(file_name).await?;
    load_from_str(&contents)
}

pub fn load_from_file_sync<T: DeserializeOwned>(file_name: String) -> Result<T, LoadConfigError> {
    dotenv().ok();
    let contents = fs::read_to_string(file_name)?;
    load_from_str(&contents)
}

pub fn load_from_str<T: DeserializeOwned>(contents: &str) -> Result<T, LoadConfigError> {
    let contents = expand_vars(contents);
    let config: T = toml::from_str(&contents)?;
    Ok(config)
}

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([a-zA-Z_][0-9a-zA-Z_]*)\}").expect("env var pattern is valid"));

// Unknown variables are left in place so toml reports them at the offending key.
fn expand_vars(raw_config: &str) -> String {
    ENV_VAR_PATTERN
        .replace_all(raw_config, |caps: &Captures| match env::var(&caps[1]) {
            Ok(val) => val,
            Err(_) => caps[0].to_string(),
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        operator: String,
        limit: u32,
    }

    #[test]
    fn test_expand_known_and_unknown_vars() {
        let raw = "path = \"${PATH}\"\nother = \"${ARB_ENGINE_TEST_MISSING}\"";
        let expanded = expand_vars(raw);
        if let Ok(path) = env::var("PATH") {
            assert_eq!(expanded, format!("path = \"{path}\"\nother = \"${{ARB_ENGINE_TEST_MISSING}}\""));
        }
        assert!(expanded.contains("${ARB_ENGINE_TEST_MISSING}"));
    }

    #[test]
    fn test_load_from_str() -> eyre::Result<()> {
        let sample: Sample = load_from_str("operator = \"op\"\nlimit = 150")?;
        assert_eq!(sample.operator, "op");
        assert_eq!(sample.limit, 150);
        Ok(())
    }

    #[test]
    fn test_load_from_str_reports_toml_errors() {
        let result: Result<Sample, _> = load_from_str("operator = ");
        assert!(matches!(result, Err(LoadConfigError::TomlError(_))));
    }
}
