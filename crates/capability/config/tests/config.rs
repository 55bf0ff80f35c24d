use taskhub_config::{AppConfig, ConfigError};

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("TASKHUB_DATABASE_URL", "postgresql://taskhub@localhost/taskhub");
        std::env::set_var("TASKHUB_JWT_SECRET", "secret");
        std::env::set_var("TASKHUB_ACCESS_TOKEN_TTL_MINUTES", "30");
        std::env::set_var("TASKHUB_REFRESH_TOKEN_TTL_DAYS", "14");
        std::env::set_var("TASKHUB_HTTP_ADDR", "127.0.0.1:8081");
        std::env::remove_var("TASKHUB_SWEEP_INTERVAL_HOURS");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.access_token_ttl_seconds(), 30 * 60);
    assert_eq!(config.refresh_token_ttl_seconds(), 14 * 24 * 3600);
    // 未设置的清扫周期回退默认 6 小时
    assert_eq!(config.sweep_interval().as_secs(), 6 * 3600);
    assert_eq!(config.jwt_issuer, "taskhub");

    // 必填项缺失（同一测试内串行修改环境变量，避免并行测试相互干扰）
    unsafe {
        std::env::remove_var("TASKHUB_JWT_SECRET");
    }
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Missing(_))
    ));

    // 非法数值
    unsafe {
        std::env::set_var("TASKHUB_JWT_SECRET", "secret");
        std::env::set_var("TASKHUB_ACCESS_TOKEN_TTL_MINUTES", "soon");
    }
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid(_, _))
    ));
}
