use crate::auth::MAX_TTL_HOURS;
use std::env;
use std::str::FromStr;

const DEFAULT_JWT_SECRET: &str = "default_secret";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: String,

    // Database
    pub database_url: String,
    pub db_max_connections: u32,

    // JWT
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,

    // Seeded admin account
    pub admin_email: String,
    pub admin_password: String,

    // Frontend origins allowed by CORS; empty means any
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            http_addr: "127.0.0.1:5000".to_string(),
            database_url: "sqlite://mario_service.db?mode=rwc".to_string(),
            db_max_connections: 5,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_ttl_hours: 24,
            admin_email: "admin@marioservice.com".to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let config = Config {
            http_addr: env::var("HTTP_ADDR").unwrap_or(defaults.http_addr),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            jwt_secret: env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.jwt_secret),
            jwt_ttl_hours: parse_var("JWT_TTL_HOURS", defaults.jwt_ttl_hours),
            admin_email: env::var("ADMIN_EMAIL")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or(defaults.admin_email),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or(defaults.cors_origins),
        };

        check_ttl(config.jwt_ttl_hours)?;
        if config.jwt_secret == DEFAULT_JWT_SECRET {
            tracing::warn!("JWT_SECRET not set, using the built-in development secret");
        }
        if config.admin_password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!("ADMIN_PASSWORD not set, the seeded admin uses the default password");
        }

        Ok(config)
    }
}

/// Token lifetime must be between one hour and `MAX_TTL_HOURS`.
fn check_ttl(hours: i64) -> Result<(), String> {
    if (1..=MAX_TTL_HOURS).contains(&hours) {
        Ok(())
    } else {
        Err(format!("JWT_TTL_HOURS must be between 1 and {MAX_TTL_HOURS}, got {hours}"))
    }
}

fn parse_var<T: FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {key} value {raw:?}, using default: {default}");
            default
        }),
        Err(_) => default,
    }
}

/// Splits a comma separated origin list. `*` yields an empty list (any origin).
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
