/// Configuration management for the API server
///
/// Loaded from environment variables, with a `.env` file honored in development.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string, or `memory://` (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `PORT`: port to bind to (default: 5000)
/// - `JWT_SECRET`: token signing secret, at least 32 characters (required)
/// - `JWT_EXPIRE`: token lifetime such as `30d`, `12h`, `90m`, `45s` or plain seconds (default: 30d)
/// - `CLIENT_URL`: allowed CORS origins, comma separated, `*` for any (default: http://localhost:5173)
/// - `APP_ENV`: `production` marks the session cookie `Secure` (default: development)
///
/// # Example
///
/// ```no_run
/// use taskflow_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

/// URL scheme selecting the in-process store
pub const MEMORY_DATABASE_URL: &str = "memory://";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed cross-origin clients; `*` allows any
    pub cors_origins: Vec<String>,

    /// Production mode sets the `Secure` cookie flag
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL or [`MEMORY_DATABASE_URL`]
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.starts_with(MEMORY_DATABASE_URL)
    }
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token and cookie lifetime in seconds
    pub expires_in_seconds: i64,
}

impl JwtConfig {
    pub fn expires_in(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.expires_in_seconds)
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("PORT is not a valid port: {}", e))?;

        let cors_origins = lookup("CLIENT_URL")
            .unwrap_or_else(|| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = lookup("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()?;

        let secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let expires_in_seconds =
            parse_lifetime(&lookup("JWT_EXPIRE").unwrap_or_else(|| "30d".to_string()))?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret,
                expires_in_seconds,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Parses `30d`, `12h`, `15m`, `45s` or a bare number of seconds
pub fn parse_lifetime(value: &str) -> anyhow::Result<i64> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&value[..i], c.to_ascii_lowercase()),
        _ => (value, 's'),
    };

    let amount: i64 = digits
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid JWT_EXPIRE value `{}`", value))?;

    let multiplier = match unit {
        'd' => 24 * 60 * 60,
        'h' => 60 * 60,
        'm' => 60,
        's' => 1,
        other => anyhow::bail!("Unknown JWT_EXPIRE unit `{}`", other),
    };

    if amount <= 0 {
        anyhow::bail!("JWT_EXPIRE must be positive");
    }

    let seconds = amount
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("JWT_EXPIRE `{}` is too large", value))?;

    // Tokens are stamped with `now + lifetime`; both must fit chrono's ranges
    chrono::Duration::try_seconds(seconds)
        .and_then(|lifetime| chrono::Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| anyhow::anyhow!("JWT_EXPIRE `{}` is too large", value))?;

    Ok(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "memory://"), ("JWT_SECRET", SECRET)]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.api.cors_origins, vec!["http://localhost:5173"]);
        assert!(!config.api.production);
        assert!(config.database.is_memory());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.expires_in_seconds, 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/taskflow"),
            ("JWT_SECRET", SECRET),
            ("PORT", "8080"),
            ("CLIENT_URL", "https://a.example, https://b.example"),
            ("APP_ENV", "production"),
            ("JWT_EXPIRE", "12h"),
        ])
        .unwrap();

        assert_eq!(config.api.port, 8080);
        assert_eq!(
            config.api.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.api.production);
        assert!(!config.database.is_memory());
        assert_eq!(config.jwt.expires_in(), chrono::Duration::hours(12));
    }

    #[test]
    fn test_required_values() {
        assert!(load(&[("JWT_SECRET", SECRET)]).is_err());
        assert!(load(&[("DATABASE_URL", "memory://")]).is_err());
        assert!(load(&[("DATABASE_URL", "memory://"), ("JWT_SECRET", "short")]).is_err());
    }

    #[test]
    fn test_parse_lifetime() {
        assert_eq!(parse_lifetime("30d").unwrap(), 2_592_000);
        assert_eq!(parse_lifetime("2h").unwrap(), 7200);
        assert_eq!(parse_lifetime("15m").unwrap(), 900);
        assert_eq!(parse_lifetime("45s").unwrap(), 45);
        assert_eq!(parse_lifetime("3600").unwrap(), 3600);
        assert!(parse_lifetime("soon").is_err());
        assert!(parse_lifetime("5w").is_err());
        assert!(parse_lifetime("0d").is_err());
    }

    #[test]
    fn test_parse_lifetime_rejects_unrepresentable_values() {
        assert!(parse_lifetime("999999999999999999d").is_err());
        assert!(parse_lifetime("100000000000d").is_err());
        assert_eq!(parse_lifetime("3650d").unwrap(), 3650 * 24 * 60 * 60);

        let err = load(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", SECRET),
            ("JWT_EXPIRE", "100000000000d"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
