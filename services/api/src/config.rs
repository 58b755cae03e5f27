use std::env;

const DEFAULT_JWT_SECRET: &str = "default_secret";

/// API configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Database URL. Env var: `DATABASE_URL`, otherwise assembled from the `DB_*` variables.
    pub database_url: String,
    /// Pool size (default 10). Env var: `DB_MAX_CONNECTIONS`.
    pub db_max_connections: u32,
    pub jwt_secret: String,
    /// Allowed CORS origin. Env var: `FRONTEND_URL`.
    pub frontend_url: String,
    /// TCP port for the HTTP server (default 5000). Env var: `PORT`.
    pub port: u16,
    pub admin_email: String,
    pub admin_password: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            // Credentials may contain URL delimiters such as `@` or `/`.
            format!(
                "postgres://{}:{}@{}/{}",
                urlencoding::encode(&var_or("DB_USER", "postgres")),
                urlencoding::encode(&var_or("DB_PASSWORD", "")),
                var_or("DB_HOST", "localhost"),
                var_or("DB_NAME", "dashboard"),
            )
        });
        Self {
            database_url,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            jwt_secret: var_or("JWT_SECRET", DEFAULT_JWT_SECRET),
            frontend_url: var_or("FRONTEND_URL", "http://localhost:3000"),
            port: lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(5000),
            admin_email: var_or("ADMIN_EMAIL", "admin@example.com"),
            admin_password: var_or("ADMIN_PASSWORD", "admin123"),
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
