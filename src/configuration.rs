use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Config {
    pub api: Api,
    pub catalog: Catalog,
    pub storage: Storage,
    pub assets: Assets,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Api {
    pub base_url: String,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Catalog {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_size: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub search_limit: u32,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Storage {
    pub directory: PathBuf,
}

/// Where genre artwork is served from. Paths in the genre table are joined onto
/// `base_path`.
#[derive(serde::Deserialize, Debug, Clone, Default)]
pub struct Assets {
    #[serde(default)]
    pub base_path: String,
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

impl Config {
    pub fn new() -> Result<Self, anyhow::Error> {
        let base_path = std::env::current_dir()?;
        let environment = Environment::try_from(
            std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".into()),
        )
        .map_err(anyhow::Error::msg)?;

        Ok(Self::load(&base_path.join("configuration"), &environment)?)
    }

    pub fn load(
        config_directory: &std::path::Path,
        environment: &Environment,
    ) -> Result<Self, figment::Error> {
        let environment_filename = format!("{}.yaml", environment.as_str());

        Figment::new()
            .merge(Yaml::file(config_directory.join("base.yaml")))
            .merge(Yaml::file(config_directory.join(environment_filename)))
            .merge(Env::raw().split("__"))
            .extract()
    }
}
