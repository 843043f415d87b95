use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Topic the readers publish candidate tag UIDs on.
pub const TAG_TOPIC: &str = "/topic/tag_uid";

/// Topic the verdict goes back out on, read by the reader firmware.
pub const RESPONSE_TOPIC: &str = "/topic/db_response";

pub struct Config {
    pub http_port: u16,
    pub redis_url: String,
    pub mqtt_host: String,
    pub mqtt_port: u16,
}

impl Config {
    pub fn load() -> Self {
        Self {
            http_port: try_load("HTTP_PORT", "5000"),
            redis_url: try_load("REDIS_URL", "redis://database:6379"),
            mqtt_host: try_load("MQTT_HOST", "broker"),
            mqtt_port: try_load("MQTT_PORT", "1883"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
