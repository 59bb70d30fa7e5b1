//! Rental server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Default CORS origins (local frontend dev servers)
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173,http://localhost:8080";

/// Rental server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL (`sqlite:path.db` or `sqlite::memory:`)
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for admin tokens
    pub jwt_secret: String,
    /// Token validity in hours
    pub jwt_expiry_hours: i64,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
    /// Log level (overridden by RUST_LOG)
    pub log_level: String,
    /// Directory for rolling log files (stdout only when unset)
    pub log_dir: Option<String>,
    /// Username of the admin account created on first start
    pub bootstrap_admin_username: String,
    /// Password of the admin account created on first start
    pub bootstrap_admin_password: String,
    /// Period of the expired pre-order sweep in seconds, 0 disables it
    pub temp_order_cleanup_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:wheelchair_rental.db".into(),
            http_port: 5000,
            environment: "development".into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            jwt_expiry_hours: 24,
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            log_level: "info".into(),
            log_dir: None,
            bootstrap_admin_username: "admin".into(),
            bootstrap_admin_password: "admin123".into(),
            temp_order_cleanup_secs: 300,
        }
    }
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str, dev_default: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                dev_default.to_string()
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:wheelchair_rental.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: environment.clone(),
            jwt_secret: Self::require_secret(
                "JWT_SECRET",
                &environment,
                "dev-JWT_SECRET-not-for-production",
            )?,
            jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .filter(|h: &i64| *h > 0)
                .unwrap_or(24),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            bootstrap_admin_username: std::env::var("BOOTSTRAP_ADMIN_USERNAME")
                .unwrap_or_else(|_| "admin".into()),
            bootstrap_admin_password: Self::require_secret(
                "BOOTSTRAP_ADMIN_PASSWORD",
                &environment,
                "admin123",
            )?,
            temp_order_cleanup_secs: std::env::var("TEMP_ORDER_CLEANUP_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
