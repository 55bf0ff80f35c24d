//! refresh token 内存存储实现
//!
//! 仅用于本地演示和测试。
//!
//! 轮换语义与 Postgres 实现保持一致：rotate 在写锁内完成比较与替换，
//! 并发重放中只有一个调用方能赢得该行。

use crate::error::StorageError;
use crate::models::{RefreshTokenCreate, RefreshTokenRecord};
use crate::traits::RefreshTokenStore;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// refresh token 内存存储
///
/// 使用 RwLock + HashMap（以行 ID 为键）提供线程安全的内存存储。
pub struct InMemoryRefreshTokenStore {
    rows: RwLock<HashMap<i64, RefreshTokenRecord>>,
    next_id: AtomicI64,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// 当前行数（测试断言用）。
    pub fn len(&self) -> usize {
        self.rows.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryRefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        let map = self
            .rows
            .read()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        Ok(map.values().find(|row| row.token == token).cloned())
    }

    async fn find_by_user_and_device(
        &self,
        user_id: i64,
        device_id: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        let map = self
            .rows
            .read()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        Ok(map
            .values()
            .find(|row| row.user_id == user_id && row.device_id == device_id)
            .cloned())
    }

    async fn insert(
        &self,
        create: RefreshTokenCreate,
    ) -> Result<RefreshTokenRecord, StorageError> {
        let mut map = self
            .rows
            .write()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        if map
            .values()
            .any(|row| row.user_id == create.user_id && row.device_id == create.device_id)
        {
            return Err(StorageError::conflict("device row exists"));
        }
        let record = RefreshTokenRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            token: create.token,
            user_id: create.user_id,
            device_id: create.device_id,
            device_name: create.device_name,
            expires_at: create.expires_at,
            is_canceled: false,
        };
        map.insert(record.id, record.clone());
        Ok(record)
    }

    async fn replace(
        &self,
        id: i64,
        token: &str,
        expires_at: u64,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .rows
            .write()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        let Some(row) = map.get_mut(&id) else {
            return Ok(false);
        };
        row.token = token.to_string();
        row.expires_at = expires_at;
        row.is_canceled = false;
        Ok(true)
    }

    async fn rotate(
        &self,
        id: i64,
        presented: &str,
        token: &str,
        expires_at: u64,
        now: u64,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .rows
            .write()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        let Some(row) = map.get_mut(&id) else {
            return Ok(false);
        };
        // 写锁内的比较与替换：行已被并发轮换、取消或过期时不得成功
        if row.token != presented || !row.is_active(now) {
            return Ok(false);
        }
        row.token = token.to_string();
        row.expires_at = expires_at;
        row.is_canceled = false;
        Ok(true)
    }

    async fn cancel(&self, user_id: i64, device_id: &str) -> Result<bool, StorageError> {
        let mut map = self
            .rows
            .write()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        let Some(row) = map
            .values_mut()
            .find(|row| row.user_id == user_id && row.device_id == device_id)
        else {
            return Ok(false);
        };
        if row.is_canceled {
            return Ok(false);
        }
        row.is_canceled = true;
        Ok(true)
    }

    async fn delete_inactive(&self, now: u64) -> Result<u64, StorageError> {
        let mut map = self
            .rows
            .write()
            .map_err(|_| StorageError::unavailable("lock failed"))?;
        let before = map.len();
        map.retain(|_, row| row.is_active(now));
        Ok((before - map.len()) as u64)
    }
}
