use std::{ops::RangeInclusive, path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub catalog: CatalogSettings,
    pub ocr: OcrSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct CatalogSettings {
    pub source_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_secs: u64,
    pub export_path: PathBuf,
    pub static_dir: PathBuf,
    pub rating_min: f64,
    pub rating_max: f64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub rating_bins: usize,
}

impl CatalogSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn rating_range(&self) -> RangeInclusive<f64> {
        self.rating_min..=self.rating_max
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct OcrSettings {
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub tesseract_command: String,
    pub language: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_upload_bytes: usize,
}

impl OcrSettings {
    /// URL prefix under which files in `upload_dir` are served, e.g. `/static/uploads`.
    pub fn upload_url_prefix(&self) -> Option<String> {
        let relative = self.upload_dir.strip_prefix(&self.static_dir).ok()?;
        let mut prefix = String::from("/static");
        for part in relative.iter() {
            prefix.push('/');
            prefix.push_str(part.to_str()?);
        }
        Some(prefix)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
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
