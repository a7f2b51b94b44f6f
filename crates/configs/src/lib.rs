use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Connection settings for the backing Redis store.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_host")]
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_redis_host(),
            port: default_redis_port(),
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout(),
            command_timeout_secs: default_command_timeout(),
        }
    }
}

fn default_redis_host() -> String { "localhost".to_string() }
fn default_redis_port() -> u16 { 6379 }
fn default_max_connections() -> u32 { 10 }
fn default_connect_timeout() -> u64 { 5 }
fn default_command_timeout() -> u64 { 5 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.redis.normalize_from_env();
        self.redis.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl RedisConfig {
    /// Build a config purely from environment variables with built-in
    /// fallbacks, for deployments that ship no config.toml.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.normalize_from_env();
        cfg
    }

    /// Fill host/port from `REDIS_HOST` / `REDIS_PORT` when set.
    pub fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("REDIS_HOST") {
            if !host.trim().is_empty() {
                self.host = host;
            }
        }
        if let Ok(port) = std::env::var("REDIS_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.port = port;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(anyhow!("redis.host is empty; provide it in config.toml or REDIS_HOST"));
        }
        if self.port == 0 {
            return Err(anyhow!("redis.port must be in 1..=65535"));
        }
        if self.max_connections == 0 {
            return Err(anyhow!("redis.max_connections must be >= 1"));
        }
        if self.command_timeout_secs == 0 {
            return Err(anyhow!("redis.command_timeout_secs must be >= 1"));
        }
        Ok(())
    }

    /// Connection URL in the form the redis client expects.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_redis() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.redis.host, "localhost");
        assert_eq!(cfg.redis.port, 6379);
        assert_eq!(cfg.redis.url(), "redis://localhost:6379/");
    }

    #[test]
    fn parses_partial_toml_with_section_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9090

            [redis]
            host = "redis.internal"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.redis.host, "redis.internal");
        assert_eq!(cfg.redis.port, 6379);
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut cfg = RedisConfig::default();
        cfg.command_timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }
}
