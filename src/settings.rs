use std::env;

use serde::Deserialize;
use tracing::{info, Level};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub env: String, // file / server
    pub host: String,
    pub port: u16,
    pub prefix: Option<String>,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_exp: u16,
    pub jwt_refresh_exp: u16,
    pub redis_url: String,
    pub log_dir: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn log_dir(&self) -> String {
        self.log_dir.clone().unwrap_or("./logs".to_string())
    }

    /// Falls back to DEBUG when `log_level` is missing or not a tracing level
    pub fn log_level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|x| x.parse::<Level>().ok())
            .unwrap_or(Level::DEBUG)
    }
}

pub fn try_get_config() -> anyhow::Result<Config> {
    let env_var = env::var("env").unwrap_or("file".to_string());
    if env_var == "file" {
        info!("using .env file as environtment variable");
        let _ = dotenvy::dotenv();
    } else {
        info!("using server environtment as environtment variable");
    }
    Ok(envy::from_env::<Config>()?)
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use crate::core::test_utils::test_config;

    #[test]
    fn test_log_level_fallback() {
        let mut config = test_config();
        config.log_level = None;
        assert_eq!(config.log_level(), Level::DEBUG);
        config.log_level = Some("warn".to_string());
        assert_eq!(config.log_level(), Level::WARN);
        config.log_level = Some("not-a-level".to_string());
        assert_eq!(config.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_log_dir_default() {
        let mut config = test_config();
        config.log_dir = None;
        assert_eq!(config.log_dir(), "./logs");
        config.log_dir = Some("/var/log/cs_group".to_string());
        assert_eq!(config.log_dir(), "/var/log/cs_group");
    }
}
