use std::env;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Deadline for a single payment gateway call.
    pub gateway_timeout: Duration,
    pub profile: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://circulib.db?mode=rwc".to_string()
            } else {
                format!("sqlite://circulib_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            gateway_timeout: env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(10)),
            profile,
        }
    }
}
