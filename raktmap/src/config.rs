//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `config.yaml` but can be specified
//! via `-f` flag or the `RAKTMAP_CONFIG` environment variable.
//!
//! ## Loading Priority
//!
//! Sources are merged in order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `RAKTMAP_`
//! 3. **DATABASE_URL** - Special case: overrides `database.url` if set
//!
//! For nested values, use double underscores: `RAKTMAP_GEOFENCE__RADIUS_KM=50`
//! sets `geofence.radius_km`.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "RAKTMAP_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Convenience override for `database.url` (populated from DATABASE_URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// PostgreSQL connection settings
    pub database: DatabaseConfig,
    /// Hospital geofence used to annotate confirmations with a distance
    pub geofence: GeofenceConfig,
    /// Donor identifier generation settings
    pub donor_ids: DonorIdConfig,
    /// CORS settings for the donor-facing frontend
    pub cors: CorsConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Connection pool settings
    pub pool: PoolSettings,
}

/// Connection pool settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
}

/// Fixed hospital coordinate and radius for the (informational) geofence.
///
/// Confirmations outside the radius are logged and flagged in the response
/// but never rejected.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeofenceConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

/// Donor identifier generation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DonorIdConfig {
    /// Maximum draws before giving up on finding an unused donor id
    pub max_attempts: u32,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests
    pub allowed_origins: Vec<CorsOrigin>,
    /// Allow credentials (cookies) in CORS requests
    pub allow_credentials: bool,
    /// Cache preflight requests for this many seconds
    pub max_age: Option<u64>,
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" { Ok(()) } else { Err(serde::de::Error::custom("Expected '*'")) }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: None,
            database: DatabaseConfig::default(),
            geofence: GeofenceConfig::default(),
            donor_ids: DonorIdConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/raktmap".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_secs: 30,
        }
    }
}

impl Default for GeofenceConfig {
    /// Default hospital coordinate (Anand, Gujarat) with a 100 km radius.
    fn default() -> Self {
        Self {
            latitude: 22.6023,
            longitude: 72.8205,
            radius_km: 100.0,
        }
    }
}

impl Default for DonorIdConfig {
    fn default() -> Self {
        Self { max_attempts: 8 }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                CorsOrigin::Url(Url::parse("http://localhost:3000").unwrap()), // Donor frontend (dev)
                CorsOrigin::Url(Url::parse("http://localhost:3001").unwrap()), // Hospital dashboard (dev)
            ],
            allow_credentials: true,
            max_age: Some(3600), // Cache preflight for 1 hour
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // DATABASE_URL takes precedence over the nested setting
        if let Some(url) = config.database_url.take() {
            config.database.url = url;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if self.cors.allowed_origins.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: CORS allowed_origins cannot be empty. Add at least one allowed origin.".to_string(),
            });
        }

        // Wildcard origin with credentials is rejected by browsers
        let has_wildcard = self.cors.allowed_origins.iter().any(|origin| matches!(origin, CorsOrigin::Wildcard));
        if has_wildcard && self.cors.allow_credentials {
            return Err(Error::Internal {
                operation: "Config validation: CORS cannot use wildcard origin '*' with allow_credentials=true. Specify explicit origins."
                    .to_string(),
            });
        }

        if !(-90.0..=90.0).contains(&self.geofence.latitude) || !(-180.0..=180.0).contains(&self.geofence.longitude) {
            return Err(Error::Internal {
                operation: "Config validation: geofence coordinates are out of range".to_string(),
            });
        }

        if self.geofence.radius_km <= 0.0 {
            return Err(Error::Internal {
                operation: "Config validation: geofence radius_km must be positive".to_string(),
            });
        }

        if self.donor_ids.max_attempts == 0 {
            return Err(Error::Internal {
                operation: "Config validation: donor_ids.max_attempts must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("RAKTMAP_").split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().expect("default config should validate");
        assert_eq!(config.port, 5000);
        assert_eq!(config.geofence.radius_km, 100.0);
        assert_eq!(config.donor_ids.max_attempts, 8);
    }

    #[test]
    fn yaml_and_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
port: 8080
geofence:
  latitude: 23.0225
  longitude: 72.5714
  radius_km: 50
"#,
            )?;

            jail.set_env("RAKTMAP_HOST", "127.0.0.1");
            jail.set_env("RAKTMAP_GEOFENCE__RADIUS_KM", "75");

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args)?;

            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 8080);
            assert_eq!(config.geofence.latitude, 23.0225);
            assert_eq!(config.geofence.radius_km, 75.0);

            Ok(())
        });
    }

    #[test]
    fn database_url_env_overrides_nested_setting() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
database:
  url: postgresql://yaml-host/raktmap
"#,
            )?;
            jail.set_env("DATABASE_URL", "postgresql://env-host/raktmap");

            let args = Args {
                config: "test.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args)?;

            assert_eq!(config.database.url, "postgresql://env-host/raktmap");
            Ok(())
        });
    }

    #[test]
    fn wildcard_origin_with_credentials_is_rejected() {
        let mut config = Config::default();
        config.cors.allowed_origins = vec![CorsOrigin::Wildcard];
        config.cors.allow_credentials = true;
        assert!(config.validate().is_err());

        config.cors.allow_credentials = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_id_attempts_is_rejected() {
        let mut config = Config::default();
        config.donor_ids.max_attempts = 0;
        assert!(config.validate().is_err());
    }
}
