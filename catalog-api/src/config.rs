use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::Path;

use config::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// `url` 为空时由其余字段组装连接参数
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub seed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// 常用的裸环境变量, 优先级最高
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("STORAGE_BACKEND", "storage.backend"),
    ("LOG_LEVEL", "logging.level"),
];

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_env(&vars)
    }

    /// 默认值 < config/default.* < APP__* < 裸环境变量
    pub fn from_env(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let config_path = vars
            .get("CONFIG_PATH")
            .cloned()
            .unwrap_or_else(|| "config".to_string());

        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "")?
            .set_default("database.host", "")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "")?
            .set_default("database.password", "")?
            .set_default("database.name", "")?
            .set_default("database.max_connections", 5)?
            .set_default("storage.backend", "postgres")?
            .set_default("storage.seed", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(config::File::from(Path::new(&config_path).join("default")).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .source(Some(vars.clone().into_iter().collect())),
            );

        for (var, key) in ENV_OVERRIDES {
            let value = vars.get(*var).filter(|v| !v.is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        vars.entry("CONFIG_PATH".to_string())
            .or_insert_with(|| "does-not-exist".to_string());
        vars
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env(&vars(&[])).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert!(config.storage.seed);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_conventional_variables() {
        let config = Config::from_env(&vars(&[
            ("PORT", "3000"),
            ("DATABASE_URL", "postgres://localhost/catalog"),
            ("STORAGE_BACKEND", "memory"),
        ]))
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "postgres://localhost/catalog");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_discrete_database_variables() {
        let config = Config::from_env(&vars(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "shop"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "catalog"),
        ]))
        .unwrap();
        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.user, "shop");
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.database.name, "catalog");
    }

    #[test]
    fn test_prefixed_variables() {
        let config = Config::from_env(&vars(&[
            ("APP__LOGGING__FORMAT", "json"),
            ("APP__STORAGE__SEED", "false"),
        ]))
        .unwrap();
        assert_eq!(config.logging.format, "json");
        assert!(!config.storage.seed);
    }

    #[test]
    fn test_conventional_variable_wins_over_prefixed() {
        let config =
            Config::from_env(&vars(&[("APP__SERVER__PORT", "9000"), ("PORT", "9100")])).unwrap();
        assert_eq!(config.server.port, 9100);
    }

    #[test]
    fn test_invalid_backend() {
        let result = Config::from_env(&vars(&[("STORAGE_BACKEND", "redis")]));
        assert!(result.is_err());
    }
}
