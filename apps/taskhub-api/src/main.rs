//! Taskhub 认证 API 服务入口。
//!
//! 启动流程：
//! 1. 加载 .env（如存在）与环境变量配置
//! 2. 初始化结构化日志
//! 3. 建立 Postgres 连接池并装配存储实现
//! 4. 构建认证服务与 token 签发器
//! 5. 启动 refresh token 后台清扫任务
//! 6. 绑定 HTTP 端口并开始服务

mod handlers;
mod middleware;
mod routes;
mod utils;

use axum::middleware as axum_middleware;
use sqlx::PgPool;
use std::sync::Arc;
use taskhub_auth::{AuthService, TokenIssuer, spawn_sweeper};
use taskhub_config::AppConfig;
use taskhub_storage::{PgRefreshTokenStore, PgUserStore, RefreshTokenStore, connect_pool};
use taskhub_telemetry::init_tracing;

/// 应用共享状态。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    /// readyz 探针用的连接池（测试装配时可为 None）。
    pub db_pool: Option<PgPool>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    let pool = connect_pool(&config.database_url).await?;
    let user_store = Arc::new(PgUserStore::new(pool.clone()));
    let token_store: Arc<dyn RefreshTokenStore> = Arc::new(PgRefreshTokenStore::new(pool.clone()));

    let issuer = TokenIssuer::new(
        config.jwt_secret.clone(),
        config.jwt_issuer.clone(),
        config.jwt_audience.clone(),
        config.access_token_ttl_seconds(),
        config.refresh_token_ttl_seconds(),
    );
    let auth = Arc::new(AuthService::new(user_store, token_store.clone(), issuer));

    // 后台清扫与请求处理解耦，句柄不回收
    let _sweeper = spawn_sweeper(token_store, config.sweep_interval());

    let state = AppState {
        auth,
        db_pool: Some(pool),
    };
    let app = routes::create_api_router()
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(axum_middleware::from_fn(middleware::request_context));

    tracing::info!(addr = %config.http_addr, "taskhub api listening");
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
