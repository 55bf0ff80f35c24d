//! Postgres refresh token 存储实现
//!
//! 设计要点：
//! - token 列唯一索引，查找 O(log n)
//! - rotate 是单条 update 的行级 CAS，取消与重签在一个原子单元内完成，
//!   并发重放同一旧值时至多一个事务的 rows_affected 为 1
//! - 清扫删除不持长锁，单条语句独立提交

use crate::error::StorageError;
use crate::models::{RefreshTokenCreate, RefreshTokenRecord};
use crate::traits::RefreshTokenStore;
use sqlx::{PgPool, Row};

pub struct PgRefreshTokenStore {
    pub pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn token_from_row(row: &sqlx::postgres::PgRow) -> Result<RefreshTokenRecord, StorageError> {
    let id: i64 = row.try_get("id")?;
    let token: String = row.try_get("token")?;
    let user_id: i64 = row.try_get("user_id")?;
    let device_id: String = row.try_get("device_id")?;
    let device_name: String = row.try_get("device_name")?;
    let expires_at: i64 = row.try_get("expires_at")?;
    let is_canceled: bool = row.try_get("is_canceled")?;
    Ok(RefreshTokenRecord {
        id,
        token,
        user_id,
        device_id,
        device_name,
        expires_at: expires_at.max(0) as u64,
        is_canceled,
    })
}

#[async_trait::async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        let row = sqlx::query(
            "select id, token, user_id, device_id, device_name, expires_at, is_canceled \
             from refresh_tokens where token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(token_from_row(&row)?))
    }

    async fn find_by_user_and_device(
        &self,
        user_id: i64,
        device_id: &str,
    ) -> Result<Option<RefreshTokenRecord>, StorageError> {
        let row = sqlx::query(
            "select id, token, user_id, device_id, device_name, expires_at, is_canceled \
             from refresh_tokens where user_id = $1 and device_id = $2",
        )
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(token_from_row(&row)?))
    }

    async fn insert(
        &self,
        create: RefreshTokenCreate,
    ) -> Result<RefreshTokenRecord, StorageError> {
        let id: i64 = sqlx::query_scalar(
            "insert into refresh_tokens (token, user_id, device_id, device_name, expires_at, is_canceled) \
             values ($1, $2, $3, $4, $5, false) returning id",
        )
        .bind(&create.token)
        .bind(create.user_id)
        .bind(&create.device_id)
        .bind(&create.device_name)
        .bind(create.expires_at as i64)
        .fetch_one(&self.pool)
        .await?;

        Ok(RefreshTokenRecord {
            id,
            token: create.token,
            user_id: create.user_id,
            device_id: create.device_id,
            device_name: create.device_name,
            expires_at: create.expires_at,
            is_canceled: false,
        })
    }

    async fn replace(
        &self,
        id: i64,
        token: &str,
        expires_at: u64,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "update refresh_tokens set token = $2, expires_at = $3, is_canceled = false \
             where id = $1",
        )
        .bind(id)
        .bind(token)
        .bind(expires_at as i64)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn rotate(
        &self,
        id: i64,
        presented: &str,
        token: &str,
        expires_at: u64,
        now: u64,
    ) -> Result<bool, StorageError> {
        // 行级 CAS：旧值仍在位且行有效时才替换
        let result = sqlx::query(
            "update refresh_tokens set token = $2, expires_at = $3, is_canceled = false \
             where id = $1 and token = $4 and is_canceled = false and expires_at > $5",
        )
        .bind(id)
        .bind(token)
        .bind(expires_at as i64)
        .bind(presented)
        .bind(now as i64)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn cancel(&self, user_id: i64, device_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "update refresh_tokens set is_canceled = true \
             where user_id = $1 and device_id = $2 and is_canceled = false",
        )
        .bind(user_id)
        .bind(device_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_inactive(&self, now: u64) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "delete from refresh_tokens where is_canceled or expires_at <= $1",
        )
        .bind(now as i64)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
