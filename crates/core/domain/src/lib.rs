//! 领域模型：角色、认证上下文与统一时钟。

use std::time::{SystemTime, UNIX_EPOCH};

/// 用户角色。
///
/// 注册产生的账户固定为 Guest，Admin 仅由管理面授予。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Guest,
    Admin,
}

impl Role {
    /// 角色的持久化/传输名称。
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "Guest",
            Role::Admin => "Admin",
        }
    }

    /// 从持久化名称解析角色，未知名称返回 None。
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Guest" => Some(Role::Guest),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 认证上下文：从校验通过的 access token 提取的请求身份。
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl AuthContext {
    /// 构造显式身份的认证上下文。
    pub fn new(user_id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
        }
    }
}

/// 当前 Unix 时间（秒）。
///
/// 所有过期时间统一以 epoch 秒表示，避免各 crate 各自取时。
pub fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
