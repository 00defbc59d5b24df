use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token issuer domain, e.g. `example.us.auth0.com`
    pub domain: String,
    pub audience: String,
    /// Overrides the issuer derived from `domain`
    pub issuer: Option<String>,
    /// HS256 shared secret. When set, tokens are verified against it instead of the JWKS.
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AuthConfig {
    /// Issuer expected in the `iss` claim
    pub fn issuer(&self) -> String {
        match &self.issuer {
            Some(iss) => iss.clone(),
            None => format!("https://{}/", self.domain.trim_end_matches('/')),
        }
    }

    /// Location of the published signing keys for `domain`
    pub fn jwks_url(&self) -> Result<url::Url, url::ParseError> {
        url::Url::parse(&format!("https://{}/", self.domain.trim_end_matches('/')))?
            .join(".well-known/jwks.json")
    }
}

impl DatabaseConfig {
    /// Private in-memory database, mostly for tests
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH0_DOMAIN") {
            self.auth.domain = v;
        }
        if let Ok(v) = env::var("API_AUDIENCE") {
            self.auth.audience = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.auth.issuer = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = Some(v).filter(|s| !s.is_empty());
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite://database.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            auth: AuthConfig {
                domain: "localhost".to_string(),
                audience: "drinks".to_string(),
                issuer: None,
                jwt_secret: None,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite://database.db?mode=rwc".to_string(),
                max_connections: 10,
                connection_timeout: 10,
            },
            auth: AuthConfig {
                domain: String::new(),
                audience: "drinks".to_string(),
                issuer: None,
                jwt_secret: None,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: "sqlite://database.db?mode=rwc".to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            auth: AuthConfig {
                domain: String::new(),
                audience: "drinks".to_string(),
                issuer: None,
                jwt_secret: None,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 5000);
        assert!(config.database.url.starts_with("sqlite:"));
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.security.cors_origins.is_empty());
    }

    #[test]
    fn issuer_and_jwks_derive_from_domain() {
        let mut auth = AppConfig::development().auth;
        auth.domain = "coffee.us.auth0.com".to_string();

        assert_eq!(auth.issuer(), "https://coffee.us.auth0.com/");
        assert_eq!(
            auth.jwks_url().unwrap().as_str(),
            "https://coffee.us.auth0.com/.well-known/jwks.json"
        );

        auth.issuer = Some("https://issuer.test/".to_string());
        assert_eq!(auth.issuer(), "https://issuer.test/");
    }
}
