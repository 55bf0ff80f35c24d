//! 用户内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 功能：
//! - 注册插入（用户名唯一性在写入时强制）
//! - 按用户名/ID 查找

use crate::error::StorageError;
use crate::models::{UserCreate, UserRecord};
use crate::traits::UserStore;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// 用户内存存储
///
/// 使用 RwLock + HashMap（以用户名为键）提供线程安全的内存存储。
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// 当前用户数（测试断言用）。
    pub fn len(&self) -> usize {
        self.users.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let map = self
            .users
            .read()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        Ok(map.get(username).cloned())
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError> {
        let map = self
            .users
            .read()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        Ok(map
            .values()
            .find(|user| user.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, create: UserCreate) -> Result<UserRecord, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        if map.contains_key(&create.username) {
            return Err(StorageError::conflict("username exists"));
        }
        let record = UserRecord {
            user_id: self.next_id.fetch_add(1, Ordering::Relaxed),
            username: create.username.clone(),
            password_hash: create.password_hash,
            role: create.role,
            created_at: create.created_at,
        };
        map.insert(create.username, record.clone());
        Ok(record)
    }

    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .users
            .write()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        let Some(user) = map.values_mut().find(|user| user.user_id == user_id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_string();
        Ok(true)
    }
}
