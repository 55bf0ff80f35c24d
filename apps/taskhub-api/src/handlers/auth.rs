//! 认证相关 handlers：注册、登录、刷新、登出、当前用户
//!
//! ## 提供的端点
//!
//! ### 公开端点（无需认证）
//! - `GET /health` / `GET /livez` - 进程存活探针
//! - `GET /readyz` - 就绪探针（检查 Postgres 连接）
//! - `POST /api/auth/register` - 开通账户（不签发 token）
//! - `POST /api/auth/login` - 验证凭据并签发 access/refresh token
//! - `POST /api/auth/refresh` - 使用 refresh token 轮换出新 token 对
//!
//! ### 私有端点（需 Bearer access token）
//! - `POST /api/auth/logout` - 取消当前用户指定设备的 refresh token
//! - `GET /api/auth/me` - 返回 access token 对应的用户信息
//!
//! ## 错误形状
//!
//! 认证失败统一返回 `401 AUTH.UNAUTHORIZED`，不区分"用户不存在"、
//! "口令错误"、"token 已过期"等具体原因，避免探测。

use crate::AppState;
use crate::middleware::require_auth_context;
use crate::utils::response::{
    auth_error, bad_request_error, conflict_error, internal_auth_error, refresh_auth_error,
};
use api_contract::{
    ApiResponse, LoginRequest, LoginResponse, LogoutRequest, MeResponse, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest,
};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use taskhub_auth::AuthError;

/// 健康检查端点，等价于 livez。
pub async fn health() -> impl IntoResponse {
    livez().await
}

/// Liveness 探针：只反映进程存活，不做外部依赖检查。
pub async fn livez() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// Readiness 探针：用于反映关键依赖是否就绪（当前检查 Postgres 连接）。
pub async fn readyz(State(state): State<AppState>) -> Response {
    let Some(pool) = state.db_pool.as_ref() else {
        return (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response();
    };

    match sqlx::query_scalar::<_, i32>("select 1").fetch_one(pool).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readyz check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "ok": false })),
            )
                .into_response()
        }
    }
}

/// 注册接口
///
/// 开通账户，不签发任何 token；客户端注册后需走登录流程。
///
/// # Errors
///
/// - `400 INVALID.REQUEST`: 用户名或口令为空
/// - `409 AUTH.CONFLICT`: 用户名已被占用
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    match state.auth.register(&req.username, &req.password).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "ok": true }))),
        )
            .into_response(),
        Ok(false) => conflict_error("username already taken"),
        Err(AuthError::Validation(message)) => bad_request_error(message),
        Err(err) => internal_auth_error(err),
    }
}

/// 登录接口
///
/// 验证用户名口令，成功后返回 access token、refresh token 与
/// 服务端实际采用的设备 ID（客户端未提供时由服务端生成，客户端
/// 应持久化该值并在 logout 时回传）。
///
/// # Errors
///
/// - `401 AUTH.UNAUTHORIZED`: 用户名或口令错误（不区分具体原因）
/// - `500 INTERNAL.ERROR`: 认证服务内部错误
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state
        .auth
        .login(
            &req.identifier,
            &req.password,
            req.device_id.as_deref(),
            req.device_name.as_deref(),
        )
        .await
    {
        Ok((user, tokens)) => {
            let response = LoginResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                refresh_expires: tokens.refresh_expires_at,
                device_id: tokens.device_id,
                username: user.username,
                role: user.role.as_str().to_string(),
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(AuthError::InvalidCredentials) => auth_error(StatusCode::UNAUTHORIZED),
        Err(AuthError::Validation(message)) => bad_request_error(message),
        Err(err) => internal_auth_error(err),
    }
}

/// 刷新 access token
///
/// 使用 refresh token 换取新的 token 对，旧 refresh token 同时失效
/// （使用即轮换）。失败时客户端应丢弃本地 token 并重新登录。
///
/// # Errors
///
/// - `401 AUTH.UNAUTHORIZED`: refresh token 无效、已取消或已过期
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> Response {
    match state.auth.refresh(&req.refresh_token).await {
        Ok((_, tokens)) => {
            let response = RefreshTokenResponse {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                refresh_expires: tokens.refresh_expires_at,
            };
            (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
        }
        Err(AuthError::TokenInvalid | AuthError::TokenExpired) => refresh_auth_error(),
        Err(err) => internal_auth_error(err),
    }
}

/// 登出接口
///
/// 取消当前用户指定设备的 refresh token。设备 ID 缺失或记录不存在
/// 都按成功处理（幂等）；access token 本身无状态，到期自然失效。
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LogoutRequest>,
) -> Response {
    let ctx = match require_auth_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state
        .auth
        .cancel_device_token(ctx.user_id, req.device_id.as_deref())
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "ok": true }))),
        )
            .into_response(),
        Err(err) => internal_auth_error(err),
    }
}

/// 当前用户信息
///
/// 从 access token 中提取用户身份，不访问存储。
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ctx = match require_auth_context(&state, &headers) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let response = MeResponse {
        id: ctx.user_id,
        username: ctx.username,
        role: ctx.role.as_str().to_string(),
    };
    (StatusCode::OK, Json(ApiResponse::success(response))).into_response()
}

/// 单元测试模块
#[cfg(test)]
mod tests {
    use crate::middleware::bearer_token;
    use axum::http::{HeaderMap, HeaderValue, header};

    /// 测试 `bearer_token` 函数能正确从 Authorization 头提取 Bearer token
    #[test]
    fn bearer_token_extracts() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-1"),
        );
        assert_eq!(bearer_token(&headers), Some("token-1"));
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("token-1"));
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
