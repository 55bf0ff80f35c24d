//! 应用运行配置加载。

use std::env;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    /// JWT 对称签名密钥：签发与校验共用，密钥即信任锚。
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_token_ttl_minutes: u64,
    pub refresh_token_ttl_days: u64,
    pub sweep_interval_hours: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("TASKHUB_DATABASE_URL")
            .map_err(|_| ConfigError::Missing("TASKHUB_DATABASE_URL".to_string()))?;
        let jwt_secret = env::var("TASKHUB_JWT_SECRET")
            .map_err(|_| ConfigError::Missing("TASKHUB_JWT_SECRET".to_string()))?;
        let jwt_issuer =
            env::var("TASKHUB_JWT_ISSUER").unwrap_or_else(|_| "taskhub".to_string());
        let jwt_audience =
            env::var("TASKHUB_JWT_AUDIENCE").unwrap_or_else(|_| "taskhub".to_string());
        let access_token_ttl_minutes =
            read_u64_with_default("TASKHUB_ACCESS_TOKEN_TTL_MINUTES", 15)?;
        let refresh_token_ttl_days = read_u64_with_default("TASKHUB_REFRESH_TOKEN_TTL_DAYS", 7)?;
        let sweep_interval_hours = read_u64_with_default("TASKHUB_SWEEP_INTERVAL_HOURS", 6)?;
        let http_addr =
            env::var("TASKHUB_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        Ok(Self {
            http_addr,
            database_url,
            jwt_secret,
            jwt_issuer,
            jwt_audience,
            access_token_ttl_minutes,
            refresh_token_ttl_days,
            sweep_interval_hours,
        })
    }

    /// access token 有效期（秒）。
    pub fn access_token_ttl_seconds(&self) -> u64 {
        self.access_token_ttl_minutes * 60
    }

    /// refresh token 有效期（秒）。
    pub fn refresh_token_ttl_seconds(&self) -> u64 {
        self.refresh_token_ttl_days * 24 * 3600
    }

    /// 后台清扫周期。
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_hours * 3600)
    }
}

/// 读取带默认值的 u64 类型环境变量。
fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        Err(_) => Ok(default),
    }
}
