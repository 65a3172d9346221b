/*
 * Responsibility
 * - Load settings from the environment (.env is honoured in development)
 * - Validate them up front: a missing or malformed key fails startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Key material used to verify access tokens.
///
/// An Ed25519 public key wins over a shared secret when both are configured.
#[derive(Clone, PartialEq, Eq)]
pub enum AccessTokenKey {
    Ed25519PublicPem(String),
    HmacSecret(String),
}

impl fmt::Debug for AccessTokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Ed25519PublicPem(_) => f.write_str("Ed25519PublicPem(..)"),
            Self::HmacSecret(_) => f.write_str("HmacSecret(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub access_token_key: AccessTokenKey,
    pub auth_issuer: Option<String>,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,

    // Requests under these prefixes skip authentication entirely.
    pub public_path_prefixes: Vec<String>,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(get("PORT"), "PORT", 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV"));

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections: u32 =
            parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 5)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        let access_token_key = match (get("ACCESS_JWT_PUBLIC_KEY_PEM"), get("ACCESS_JWT_SECRET")) {
            (Some(pem), _) => AccessTokenKey::Ed25519PublicPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => AccessTokenKey::HmacSecret(secret),
            (None, None) => return Err(ConfigError::Missing("ACCESS_JWT_SECRET")),
        };

        let auth_issuer = get("AUTH_ISSUER");
        let auth_audience = get("AUTH_AUDIENCE");

        let access_token_leeway_seconds: u64 = parse_or(
            get("ACCESS_TOKEN_LEEWAY_SECONDS"),
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            60,
        )?;

        let public_path_prefixes = match get("PUBLIC_PATH_PREFIXES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>(),
            None => vec!["/auth".to_string()],
        };

        if public_path_prefixes.iter().any(|p| !p.starts_with('/')) {
            return Err(ConfigError::Invalid("PUBLIC_PATH_PREFIXES"));
        }

        let request_timeout_seconds: u64 =
            parse_or(get("REQUEST_TIMEOUT_SECONDS"), "REQUEST_TIMEOUT_SECONDS", 30)?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let request_body_limit_bytes: usize = parse_or(
            get("REQUEST_BODY_LIMIT_BYTES"),
            "REQUEST_BODY_LIMIT_BYTES",
            1024 * 1024,
        )?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            access_token_key,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            public_path_prefixes,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

// Unset → `default`; set but unparsable → `Invalid(key)`.
fn parse_or<T: FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn minimal_configuration_uses_defaults() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/rota"),
            ("ACCESS_JWT_SECRET", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(
            config.access_token_key,
            AccessTokenKey::HmacSecret("s3cret".into())
        );
        assert_eq!(config.auth_issuer, None);
        assert_eq!(config.auth_audience, None);
        assert_eq!(config.access_token_leeway_seconds, 60);
        assert_eq!(config.public_path_prefixes, vec!["/auth".to_string()]);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn database_url_is_required() {
        let err = load(&[("ACCESS_JWT_SECRET", "s3cret")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn some_verification_key_is_required() {
        let err = load(&[("DATABASE_URL", "postgres://localhost/rota")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("ACCESS_JWT_SECRET"));
    }

    #[test]
    fn public_key_takes_precedence_and_unescapes_newlines() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/rota"),
            ("ACCESS_JWT_SECRET", "s3cret"),
            (
                "ACCESS_JWT_PUBLIC_KEY_PEM",
                "-----BEGIN PUBLIC KEY-----\\nabc\\n-----END PUBLIC KEY-----",
            ),
        ])
        .unwrap();

        assert_eq!(
            config.access_token_key,
            AccessTokenKey::Ed25519PublicPem(
                "-----BEGIN PUBLIC KEY-----\nabc\n-----END PUBLIC KEY-----".into()
            )
        );
    }

    #[test]
    fn public_prefixes_are_split_and_trimmed() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/rota"),
            ("ACCESS_JWT_SECRET", "s3cret"),
            ("PUBLIC_PATH_PREFIXES", " /auth , /docs ,,"),
        ])
        .unwrap();

        assert_eq!(config.public_path_prefixes, vec!["/auth", "/docs"]);
    }

    #[test]
    fn relative_public_prefix_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/rota"),
            ("ACCESS_JWT_SECRET", "s3cret"),
            ("PUBLIC_PATH_PREFIXES", "auth"),
        ])
        .unwrap_err();

        assert_eq!(err, ConfigError::Invalid("PUBLIC_PATH_PREFIXES"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/rota"),
            ("ACCESS_JWT_SECRET", "s3cret"),
            ("PORT", "http"),
        ])
        .unwrap_err();

        assert_eq!(err, ConfigError::Invalid("PORT"));
    }

    #[test]
    fn unparsable_numbers_are_rejected_not_defaulted() {
        for key in [
            "DATABASE_MAX_CONNECTIONS",
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            "REQUEST_TIMEOUT_SECONDS",
            "REQUEST_BODY_LIMIT_BYTES",
        ] {
            let err = load(&[
                ("DATABASE_URL", "postgres://localhost/rota"),
                ("ACCESS_JWT_SECRET", "s3cret"),
                (key, "ten"),
            ])
            .unwrap_err();

            assert_eq!(err, ConfigError::Invalid(key));
        }
    }

    #[test]
    fn zero_pool_size_and_timeout_are_rejected() {
        for key in ["DATABASE_MAX_CONNECTIONS", "REQUEST_TIMEOUT_SECONDS"] {
            let err = load(&[
                ("DATABASE_URL", "postgres://localhost/rota"),
                ("ACCESS_JWT_SECRET", "s3cret"),
                (key, "0"),
            ])
            .unwrap_err();

            assert_eq!(err, ConfigError::Invalid(key));
        }
    }

    #[test]
    fn numeric_overrides_are_applied() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/rota"),
            ("ACCESS_JWT_SECRET", "s3cret"),
            ("DATABASE_MAX_CONNECTIONS", " 12 "),
            ("ACCESS_TOKEN_LEEWAY_SECONDS", "0"),
            ("REQUEST_BODY_LIMIT_BYTES", "2048"),
        ])
        .unwrap();

        assert_eq!(config.database_max_connections, 12);
        assert_eq!(config.access_token_leeway_seconds, 0);
        assert_eq!(config.request_body_limit_bytes, 2048);
    }

    #[test]
    fn production_aliases_are_recognised() {
        assert!(AppEnv::parse(Some("PROD".into())).is_production());
        assert!(AppEnv::parse(Some("production".into())).is_production());
        assert!(!AppEnv::parse(None).is_production());
    }

    #[test]
    fn key_material_is_not_printed() {
        let key = AccessTokenKey::HmacSecret("s3cret".into());
        assert!(!format!("{key:?}").contains("s3cret"));
    }
}
