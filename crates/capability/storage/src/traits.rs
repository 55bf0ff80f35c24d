//! 存储接口 Trait 定义
//!
//! 定义认证子系统的异步存储接口：
//! - UserStore：用户存储
//! - RefreshTokenStore：refresh token 存储
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发
//! - 时间以 Unix 秒显式传入，存储层不自行取时

use crate::error::StorageError;
use crate::models::{RefreshTokenCreate, RefreshTokenRecord, UserCreate, UserRecord};
use async_trait::async_trait;

/// 用户存储接口。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 根据用户名查找用户。
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;

    /// 根据用户 ID 查找用户。
    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError>;

    /// 插入新用户。
    ///
    /// 用户名唯一性在写入时强制：重复用户名返回 [`StorageError::Conflict`]。
    async fn insert(&self, create: UserCreate) -> Result<UserRecord, StorageError>;

    /// 更新口令哈希（旧格式哈希升级用）。
    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, StorageError>;
}

/// refresh token 存储接口。
///
/// 行生命周期：login 创建/原地覆盖 -> refresh 轮换 -> logout 取消 -> 清扫删除。
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// 根据 token 值查找记录。
    async fn find_by_token(&self, token: &str)
    -> Result<Option<RefreshTokenRecord>, StorageError>;

    /// 查找 (user_id, device_id) 对应的记录。
    async fn find_by_user_and_device(
        &self,
        user_id: i64,
        device_id: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError>;

    /// 插入新记录（login 时该设备尚无记录）。
    async fn insert(
        &self,
        create: RefreshTokenCreate,
    ) -> Result<RefreshTokenRecord, StorageError>;

    /// 原地覆盖记录（同一设备重复登录）：替换 token 值与过期时间，清除取消标记。
    async fn replace(
        &self,
        id: i64,
        token: &str,
        expires_at: u64,
    ) -> Result<bool, StorageError>;

    /// 轮换记录（refresh 使用）：单行 CAS。
    ///
    /// 仅当该行仍持有 `presented`、未取消且未过期时，才写入新 token 值与过期时间。
    /// 返回 false 表示行已被并发轮换、取消或过期，调用方必须按认证失败处理。
    async fn rotate(
        &self,
        id: i64,
        presented: &str,
        token: &str,
        expires_at: u64,
        now: u64,
    ) -> Result<bool, StorageError>;

    /// 取消 (user_id, device_id) 对应的记录（logout 使用）。
    ///
    /// 记录不存在或已取消时返回 false（幂等）。
    async fn cancel(&self, user_id: i64, device_id: &str) -> Result<bool, StorageError>;

    /// 批量删除失效记录（已取消或已过期），返回删除数量（清扫任务使用）。
    async fn delete_inactive(&self, now: u64) -> Result<u64, StorageError>;
}
