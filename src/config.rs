use anyhow::Context;
use dotenv::dotenv;
use serde::Deserialize;
use tracing::warn;

#[derive(Deserialize)]
pub struct EnvironmentVariables {
    pub database_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
    pub front_base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub front_base_url: Option<String>,
}

impl Config {
    pub fn new() -> Result<Self, anyhow::Error> {
        let _ = dotenv().map_err(|err| warn!("error loading .env: {:?}", err));

        let envs =
            envy::from_env::<EnvironmentVariables>().context("invalid environment variables")?;

        return Ok(Config::from_envs(envs));
    }

    fn from_envs(envs: EnvironmentVariables) -> Self {
        Config {
            database_url: envs
                .database_url
                .unwrap_or_else(|| "sqlite://finance.db".to_owned()),
            database_max_connections: envs.database_max_connections.unwrap_or(5),
            host: envs.host.unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: envs.port.unwrap_or(8000),
            max_upload_bytes: envs.max_upload_bytes.unwrap_or(25 * 1024 * 1024),
            front_base_url: envs.front_base_url.filter(|url| !url.trim().is_empty()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
