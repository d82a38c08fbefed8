use std::env;
use std::fmt;

const DEFAULT_DATABASE: &str = "bracu-placement-hub";
const MAX_JWT_EXPIRY_HOURS: i64 = 24 * 365;

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    MissingVar(String),
    InvalidValue(String, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => write!(f, "{} must be set", name),
            ConfigError::InvalidValue(name, reason) => {
                write!(f, "Invalid value for {}: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Token signing settings shared by the login handler and the auth middleware.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub jwt: JwtConfig,
    pub allowed_email_domain: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue("PORT".into(), e.to_string()))?,
            None => 1350,
        };

        let database_url = lookup("MONGO_URI")
            .or_else(|| lookup("DATABASE_URL"))
            .ok_or_else(|| ConfigError::MissingVar("MONGO_URI".into()))?;
        let database_name = database_name_from_uri(&database_url);

        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("JWT_SECRET".into()))?;

        let expiry_hours = match lookup("JWT_EXPIRY_HOURS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(hours) if hours > 0 && hours <= MAX_JWT_EXPIRY_HOURS => hours,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "JWT_EXPIRY_HOURS".into(),
                        format!("'{}' is not between 1 and {} hours", raw, MAX_JWT_EXPIRY_HOURS),
                    ))
                }
            },
            None => 24,
        };

        let allowed_email_domain =
            lookup("ALLOWED_EMAIL_DOMAIN").unwrap_or_else(|| "@g.bracu.ac.bd".to_string());

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173,http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            database_url,
            database_name,
            jwt: JwtConfig { secret, expiry_hours },
            allowed_email_domain,
            cors_origins,
        })
    }
}

/// Extract database name from the URI path, falling back to the default.
fn database_name_from_uri(uri: &str) -> String {
    let without_scheme = uri.splitn(2, "://").nth(1).unwrap_or(uri);
    without_scheme
        .splitn(2, '/')
        .nth(1)
        .and_then(|s| s.split('?').next())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DATABASE)
        .to_string()
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 1350,
        database_url: "mongodb://localhost:27017/placement-test".into(),
        database_name: "placement-test".into(),
        jwt: JwtConfig {
            secret: "test-secret".into(),
            expiry_hours: 24,
        },
        allowed_email_domain: "@g.bracu.ac.bd".into(),
        cors_origins: vec!["http://localhost:5173".into()],
    }
}
