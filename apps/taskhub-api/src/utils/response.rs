//! HTTP 错误响应辅助函数
//!
//! 所有错误返回统一的 ApiResponse 格式，HTTP 状态码与错误码对应。

use api_contract::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use taskhub_auth::AuthError;

/// 认证错误响应
pub fn auth_error(status: StatusCode) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "unauthorized",
        )),
    )
        .into_response()
}

/// refresh 失败响应
///
/// 刷新失败意味着持有的 refresh token 已不可恢复（已轮换、已取消或已过期），
/// 响应体明确指示调用方丢弃本地 token 并重新登录。
pub fn refresh_auth_error() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(
            "AUTH.UNAUTHORIZED",
            "invalid refresh token; discard it and re-authenticate",
        )),
    )
        .into_response()
}

/// 资源冲突错误响应（用户名已占用）
pub fn conflict_error(message: impl Into<String>) -> Response {
    (
        StatusCode::CONFLICT,
        Json(ApiResponse::<()>::error("AUTH.CONFLICT", message.into())),
    )
        .into_response()
}

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 认证内部错误响应
pub fn internal_auth_error(err: AuthError) -> Response {
    let message = err.to_string();
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::error("INTERNAL.ERROR", message)),
    )
        .into_response()
}

/// 单元测试模块
#[cfg(test)]
mod tests {
    use super::{auth_error, refresh_auth_error};
    use axum::http::StatusCode;

    /// refresh 失败的响应体必须指示调用方丢弃持有的 token
    #[tokio::test]
    async fn refresh_failure_body_instructs_discard() {
        let response = refresh_auth_error();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value["error"]["code"], "AUTH.UNAUTHORIZED");
        let message = value["error"]["message"].as_str().expect("message");
        assert!(message.contains("discard"));
        assert!(message.contains("re-authenticate"));
    }

    /// 登录失败的 401 与 refresh 失败的 401 形状不同：前者不含丢弃指示
    #[tokio::test]
    async fn login_failure_body_has_no_discard_instruction() {
        let response = auth_error(StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value["error"]["message"], "unauthorized");
    }
}
