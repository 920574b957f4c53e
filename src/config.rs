//! 配置加载
//!
//! 全部来自环境变量（配合 dotenvy），密钥类字段用 Secret 包装

use figment::{Figment, providers::Env};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 完整数据库连接串，优先于 DB_* 各部分
    #[serde(default)]
    pub database_url: Option<Secret<String>>,
    #[serde(default = "default_db_driver")]
    pub db_driver: String,
    #[serde(default)]
    pub db_host: Option<String>,
    #[serde(default)]
    pub db_port: Option<u16>,
    #[serde(default)]
    pub db_name: Option<String>,
    #[serde(default)]
    pub db_user: Option<String>,
    #[serde(default)]
    pub db_password: Option<Secret<String>>,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_page")]
    pub default_page: u32,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// 是否允许负数库存（欠货/预售场景），默认允许
    #[serde(default = "default_allow_negative_quantity")]
    pub allow_negative_quantity: bool,
}

fn default_db_driver() -> String {
    "postgres".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

fn default_allow_negative_quantity() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            db_driver: default_db_driver(),
            db_host: None,
            db_port: None,
            db_name: None,
            db_user: None,
            db_password: None,
            db_max_connections: default_db_max_connections(),
            host: default_host(),
            port: default_port(),
            debug: false,
            log_level: default_log_level(),
            default_page: default_page(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            allow_negative_quantity: default_allow_negative_quantity(),
        }
    }
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Figment::new().merge(Env::raw()).extract()?;
        Ok(config)
    }

    /// 计算数据库连接串
    ///
    /// 优先使用 DATABASE_URL，其次由 DB_* 各部分拼装；
    /// 两者都缺失时返回 None，由调用方回退到内存存储
    pub fn connection_url(&self) -> Option<Secret<String>> {
        if let Some(url) = &self.database_url {
            if !url.expose_secret().is_empty() {
                return Some(url.clone());
            }
        }

        match (&self.db_host, &self.db_port, &self.db_name, &self.db_user) {
            (Some(host), Some(port), Some(name), Some(user)) => {
                let url = match &self.db_password {
                    Some(password) => format!(
                        "{}://{}:{}@{}:{}/{}",
                        self.db_driver,
                        user,
                        password.expose_secret(),
                        host,
                        port,
                        name
                    ),
                    None => format!(
                        "{}://{}@{}:{}/{}",
                        self.db_driver, user, host, port, name
                    ),
                };
                Some(Secret::new(url))
            }
            _ => None,
        }
    }

    /// 生效的日志级别，DEBUG=true 时强制 debug
    pub fn effective_log_level(&self) -> &str {
        if self.debug { "debug" } else { &self.log_level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_url_prefers_full_url() {
        let config = AppConfig {
            database_url: Some(Secret::new("postgres://app@db:5432/products".to_string())),
            db_host: Some("ignored".to_string()),
            db_port: Some(5433),
            db_name: Some("ignored".to_string()),
            db_user: Some("ignored".to_string()),
            ..Default::default()
        };

        let url = config.connection_url().unwrap();
        assert_eq!(url.expose_secret(), "postgres://app@db:5432/products");
    }

    #[test]
    fn test_connection_url_from_parts() {
        let config = AppConfig {
            db_host: Some("db".to_string()),
            db_port: Some(5432),
            db_name: Some("products".to_string()),
            db_user: Some("app".to_string()),
            db_password: Some(Secret::new("s3cret".to_string())),
            ..Default::default()
        };

        let url = config.connection_url().unwrap();
        assert_eq!(url.expose_secret(), "postgres://app:s3cret@db:5432/products");
    }

    #[test]
    fn test_connection_url_without_password() {
        let config = AppConfig {
            db_host: Some("db".to_string()),
            db_port: Some(5432),
            db_name: Some("products".to_string()),
            db_user: Some("app".to_string()),
            ..Default::default()
        };

        let url = config.connection_url().unwrap();
        assert_eq!(url.expose_secret(), "postgres://app@db:5432/products");
    }

    #[test]
    fn test_connection_url_missing_parts_falls_back() {
        let config = AppConfig {
            db_host: Some("db".to_string()),
            ..Default::default()
        };
        assert!(config.connection_url().is_none());

        let empty_url = AppConfig {
            database_url: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(empty_url.connection_url().is_none());
    }

    #[test]
    fn test_secret_redaction() {
        let config = AppConfig {
            db_password: Some(Secret::new("s3cret".to_string())),
            database_url: Some(Secret::new("postgres://app:s3cret@db/products".to_string())),
            ..Default::default()
        };
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("s3cret"));
        assert!(debug_output.contains("Secret([REDACTED"));
    }

    #[test]
    fn test_effective_log_level() {
        let config = AppConfig::default();
        assert_eq!(config.effective_log_level(), "info");

        let debug = AppConfig {
            debug: true,
            ..Default::default()
        };
        assert_eq!(debug.effective_log_level(), "debug");
    }
}
