use aws_sdk_ssm::Client;
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to read configuration parameter '{name}': {message}")]
    Ssm { name: String, message: String },
    #[error("Invalid configuration: {0}")]
    Extract(#[from] figment::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub bucket: String,
    #[serde(default)]
    pub debug: bool,
    pub short_domain: String,
}

impl Configuration {
    pub async fn load(ssm_client: &Client) -> Result<Self, ConfigurationError> {
        let mut config = Configuration::figment();

        if let Some(ssm_config) = Configuration::load_from_ssm(ssm_client).await? {
            // .merge lets the parameter override the file and the environment
            config = config.merge(Json::string(&ssm_config));
        }

        Ok(config.extract()?)
    }

    /// File and environment providers, without anything fetched from AWS.
    pub fn figment() -> Figment {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Figment::from(Serialized::default("debug", false))
            .merge(Json::file(config_file))
            .merge(Env::prefixed("APP_"))
    }

    async fn load_from_ssm(ssm_client: &Client) -> Result<Option<String>, ConfigurationError> {
        let name = match std::env::var("CONFIGURATION_PARAMETER_NAME") {
            Ok(name) if !name.is_empty() => name,
            _ => return Ok(None),
        };

        let output = ssm_client
            .get_parameter()
            .name(&name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| ConfigurationError::Ssm {
                name: name.clone(),
                message: aws_sdk_ssm::error::DisplayErrorContext(&e).to_string(),
            })?;

        Ok(output.parameter.and_then(|parameter| parameter.value))
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration {{ bucket: {}, debug: {}, short_domain: {} }}",
            self.bucket, self.debug, self.short_domain
        )
    }
}
