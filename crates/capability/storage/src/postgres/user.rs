//! Postgres 用户存储实现
//!
//! 通过 SQL 查询实现用户查找与插入。
//!
//! 设计要点：
//! - 用户名唯一约束由数据库强制，冲突映射为 StorageError::Conflict
//! - 角色以文本列存储，读取时解析为 domain::Role

use crate::error::StorageError;
use crate::models::{UserCreate, UserRecord};
use crate::traits::UserStore;
use domain::Role;
use sqlx::{PgPool, Row};

pub struct PgUserStore {
    pub pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<UserRecord, StorageError> {
    let user_id: i64 = row.try_get("id")?;
    let username: String = row.try_get("username")?;
    let password_hash: String = row.try_get("password_hash")?;
    let role_name: String = row.try_get("role")?;
    let created_at: i64 = row.try_get("created_at")?;
    let role = Role::parse(&role_name)
        .ok_or_else(|| StorageError::unavailable(format!("unknown role: {role_name}")))?;
    Ok(UserRecord {
        user_id,
        username,
        password_hash,
        role,
        created_at: created_at.max(0) as u64,
    })
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            "select id, username, password_hash, role, created_at \
             from users where username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(user_from_row(&row)?))
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            "select id, username, password_hash, role, created_at \
             from users where id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(user_from_row(&row)?))
    }

    async fn insert(&self, create: UserCreate) -> Result<UserRecord, StorageError> {
        let user_id: i64 = sqlx::query_scalar(
            "insert into users (username, password_hash, role, created_at) \
             values ($1, $2, $3, $4) returning id",
        )
        .bind(&create.username)
        .bind(&create.password_hash)
        .bind(create.role.as_str())
        .bind(create.created_at as i64)
        .fetch_one(&self.pool)
        .await?;

        Ok(UserRecord {
            user_id,
            username: create.username,
            password_hash: create.password_hash,
            role: create.role,
            created_at: create.created_at,
        })
    }

    async fn update_password_hash(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query("update users set password_hash = $2 where id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
