use std::{path::Path, time::Duration};

use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::query::Query;

pub const GOOGLE_CSE_ID_VAR: &str = "GOOGLE_CSE_ID";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Failed to determine the current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
    #[error("{0}")]
    Environment(String),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(
        "Missing required environment variable {0}. Please set GOOGLE_CSE_ID, OPENAI_API_KEY in your .env file."
    )]
    MissingCredential(&'static str),
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    #[serde(default)]
    pub api_keys: ApiKeySettings,
    pub target: TargetSettings,
    pub search: SearchSettings,
    pub scraper: ScraperSettings,
    pub extractor: ExtractorSettings,
}

#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct ApiKeySettings {
    #[serde(default)]
    pub google_cse_id: String,
    #[serde(default)]
    pub openai: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct TargetSettings {
    pub person_name: String,
    pub affiliation: String,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct SearchSettings {
    pub cse_url: String,
    pub webdriver_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub render_wait_secs: u64,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ScraperSettings {
    pub user_agent: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct ExtractorSettings {
    pub model: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub temperature: f32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_tokens: u32,
}

impl ApiKeySettings {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.google_cse_id.trim().is_empty() {
            return Err(ConfigurationError::MissingCredential(GOOGLE_CSE_ID_VAR));
        }
        if self.openai.trim().is_empty() {
            return Err(ConfigurationError::MissingCredential(OPENAI_API_KEY_VAR));
        }
        Ok(())
    }
}

impl TargetSettings {
    pub fn query(&self) -> Query {
        Query::new(&self.person_name, &self.affiliation)
    }
}

impl SearchSettings {
    pub fn render_wait(&self) -> Duration {
        Duration::from_secs(self.render_wait_secs)
    }
}

impl ScraperSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn get_configuration() -> Result<Settings, ConfigurationError> {
    let base_path = std::env::current_dir()?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigurationError::Environment)?;

    build_settings(
        &configuration_directory,
        environment,
        std::env::var(GOOGLE_CSE_ID_VAR).ok(),
        std::env::var(OPENAI_API_KEY_VAR).ok(),
    )
}

/// Layers the YAML files, `APP_*` variables and the two credentials, then
/// rejects the result if either credential is missing or blank.
pub fn build_settings(
    configuration_directory: &Path,
    environment: Environment,
    google_cse_id: Option<String>,
    openai_api_key: Option<String>,
) -> Result<Settings, ConfigurationError> {
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("api_keys.google_cse_id", google_cse_id)?
        .set_override_option("api_keys.openai", openai_api_key)?
        .build()?
        .try_deserialize::<Settings>()?;

    settings.api_keys.validate()?;

    Ok(settings)
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{build_settings, ConfigurationError, Environment};

    fn configuration_directory() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configuration")
    }

    #[test]
    fn credentials_present_loads_base_settings() {
        let settings = build_settings(
            &configuration_directory(),
            Environment::Local,
            Some("cse-123".to_string()),
            Some("sk-test".to_string()),
        )
        .unwrap();

        assert_eq!(settings.api_keys.google_cse_id, "cse-123");
        assert_eq!(settings.api_keys.openai, "sk-test");
        assert_eq!(settings.target.person_name, "Sai Teja Lekkala");
        assert_eq!(
            settings.target.affiliation,
            "National Institute of Technology, Silchar"
        );
        assert_eq!(settings.search.render_wait_secs, 3);
        assert_eq!(settings.scraper.timeout_secs, 10);
        assert_eq!(settings.extractor.max_tokens, 150);
        assert!((settings.extractor.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_cse_id_is_fatal() {
        let result = build_settings(
            &configuration_directory(),
            Environment::Local,
            None,
            Some("sk-test".to_string()),
        );

        assert!(matches!(
            result,
            Err(ConfigurationError::MissingCredential("GOOGLE_CSE_ID"))
        ));
    }

    #[test]
    fn blank_openai_key_is_fatal() {
        let result = build_settings(
            &configuration_directory(),
            Environment::Local,
            Some("cse-123".to_string()),
            Some("   ".to_string()),
        );

        assert!(matches!(
            result,
            Err(ConfigurationError::MissingCredential("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn only_missing_credentials_mention_env_file() {
        let missing = ConfigurationError::MissingCredential("OPENAI_API_KEY").to_string();
        let malformed = build_settings(
            &PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("no-such-directory"),
            Environment::Local,
            Some("cse-123".to_string()),
            Some("sk-test".to_string()),
        )
        .unwrap_err();

        assert!(missing.starts_with("Missing required environment variable OPENAI_API_KEY."));
        assert!(missing.contains(".env file"));
        assert!(matches!(malformed, ConfigurationError::Config(_)));
        assert!(!malformed.to_string().contains(".env file"));
    }

    #[test]
    fn unknown_environment_rejected() {
        let environment: Result<Environment, String> = "staging".to_string().try_into();

        assert!(environment.is_err());
    }
}
