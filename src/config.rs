//! Server configuration from environment variables

use std::time::Duration;

use uuid::Uuid;

/// Longest bearer-token lifetime accepted from the environment (one year)
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub layout_cache_ttl: Duration,
    pub layout_cache_capacity: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            jwt_secret: Uuid::new_v4().to_string(),
            token_ttl_secs: 24 * 60 * 60,
            layout_cache_ttl: Duration::from_secs(300),
            layout_cache_capacity: 10_000,
        }
    }
}

impl ServerConfig {
    /// Read `PORT`, `JWT_SECRET`, `TOKEN_TTL_SECS`, `LAYOUT_CACHE_TTL_SECS`
    /// and `LAYOUT_CACHE_CAPACITY`. Missing or unparsable values fall back to
    /// the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set, using a random secret (tokens will not survive restarts)");
                defaults.jwt_secret
            }
        };

        Self {
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            jwt_secret,
            token_ttl_secs: parsed("TOKEN_TTL_SECS")
                .filter(|&secs| secs > 0)
                .map(|secs| secs.min(MAX_TOKEN_TTL_SECS as u64) as i64)
                .unwrap_or(defaults.token_ttl_secs),
            layout_cache_ttl: parsed("LAYOUT_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.layout_cache_ttl),
            layout_cache_capacity: parsed("LAYOUT_CACHE_CAPACITY").unwrap_or(defaults.layout_cache_capacity),
        }
    }

    pub fn log(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  TOKEN_TTL_SECS: {}", self.token_ttl_secs);
        tracing::info!("  LAYOUT_CACHE_TTL_SECS: {}", self.layout_cache_ttl.as_secs());
        tracing::info!("  LAYOUT_CACHE_CAPACITY: {}", self.layout_cache_capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.token_ttl_secs, 86_400);
        assert_eq!(config.layout_cache_ttl, Duration::from_secs(300));
        assert!(!config.jwt_secret.is_empty());
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("TOKEN_TTL_SECS", "0"),
            ("LAYOUT_CACHE_CAPACITY", "many"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.token_ttl_secs, 86_400);
        assert_eq!(config.layout_cache_capacity, 10_000);
    }

    #[test]
    fn test_token_ttl_is_capped() {
        let config = ServerConfig::from_lookup(lookup(&[("TOKEN_TTL_SECS", "18446744073709551615")]));
        assert_eq!(config.token_ttl_secs, MAX_TOKEN_TTL_SECS);

        let config = ServerConfig::from_lookup(lookup(&[("TOKEN_TTL_SECS", "7200")]));
        assert_eq!(config.token_ttl_secs, 7200);
    }
}
