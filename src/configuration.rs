use crate::provider_client::ProviderClient;
use secrecy::{ExposeSecret, SecretBox};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::time::Duration;

#[derive(serde::Deserialize, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub provider: ProviderSettings,
}

#[derive(serde::Deserialize, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(serde::Deserialize, Debug)]
pub struct ProviderSettings {
    pub base_url: String,
    /// Left unset on purpose in the YAML files; supplied through
    /// `APP_PROVIDER__ACCESS_KEY`. A missing key is reported per request.
    #[serde(default)]
    pub access_key: Option<SecretBox<String>>,
    pub site_identifier: String,
    #[serde(
        default,
        rename = "timeout_millis",
        deserialize_with = "deserialize_optional_duration_from_millis"
    )]
    pub timeout: Option<Duration>,
}

impl ProviderSettings {
    pub fn client(&self) -> Result<ProviderClient, reqwest::Error> {
        ProviderClient::new(self.base_url.clone(), self.timeout)
    }

    pub fn relay_config(self) -> RelayConfig {
        RelayConfig {
            access_key: self.access_key,
            site_identifier: self.site_identifier,
        }
    }
}

/// Configuration the relay consults on every request.
#[derive(Debug)]
pub struct RelayConfig {
    pub access_key: Option<SecretBox<String>>,
    pub site_identifier: String,
}

impl RelayConfig {
    /// The provider access key, or `None` when it is absent or empty.
    pub fn access_key(&self) -> Option<&SecretBox<String>> {
        self.access_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
    }
}

fn deserialize_optional_duration_from_millis<'de, D>(
    deserializer: D,
) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let millis = Option::<u64>::deserialize(deserializer)?;
    Ok(millis.map(Duration::from_millis))
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
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!("{} is not a valid environment", other)),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.");

    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
