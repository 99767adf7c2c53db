use crate::buckets::DisplayZone;
use crate::errors::ConfigError;
use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend_url: String,
    pub zone: DisplayZone,
    pub frontend_url: Option<String>,
}

impl Config {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let backend_url = lookup("BACKEND_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let zone = match lookup("DISPLAY_UTC_OFFSET_MINUTES") {
            Some(value) => value
                .trim()
                .parse::<i32>()
                .ok()
                .and_then(DisplayZone::from_offset_minutes)
                .ok_or(ConfigError::Invalid {
                    name: "DISPLAY_UTC_OFFSET_MINUTES",
                    value,
                })?,
            None => DisplayZone::default(),
        };

        let frontend_url = lookup("FRONTEND_URL").filter(|value| !value.trim().is_empty());

        Ok(Self {
            port,
            backend_url,
            zone,
            frontend_url,
        })
    }
}
