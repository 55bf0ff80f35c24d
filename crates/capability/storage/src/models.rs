//! 数据模型
//!
//! 定义认证存储相关的数据模型：
//! - 用户模型：UserRecord, UserCreate
//! - refresh token 模型：RefreshTokenRecord, RefreshTokenCreate

use domain::Role;

/// 用户记录。
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    /// 创建时间（Unix 秒）。
    pub created_at: u64,
}

/// 用户创建输入。
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: u64,
}

/// refresh token 记录。
///
/// 每个 (user_id, device_id) 至多一行有效记录；行内 token 值随轮换替换。
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub id: i64,
    /// 不透明随机 token 值（唯一索引）。
    pub token: String,
    pub user_id: i64,
    pub device_id: String,
    pub device_name: String,
    /// 过期时间（Unix 秒）。
    pub expires_at: u64,
    pub is_canceled: bool,
}

impl RefreshTokenRecord {
    /// 是否已过期（now 到达 expires_at 即视为过期）。
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    /// 是否仍然有效（未取消且未过期）。
    pub fn is_active(&self, now: u64) -> bool {
        !self.is_canceled && !self.is_expired(now)
    }
}

/// refresh token 创建输入。
#[derive(Debug, Clone)]
pub struct RefreshTokenCreate {
    pub token: String,
    pub user_id: i64,
    pub device_id: String,
    pub device_name: String,
    pub expires_at: u64,
}
