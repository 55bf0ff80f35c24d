//! 存储层错误类型
//!
//! 定义统一的存储错误类型，用于封装底层错误：
//! - Conflict：唯一约束冲突（用户名重复等）
//! - Unavailable：SQL 执行错误、连接错误、锁异常

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict(db_err.to_string());
            }
        }
        Self::Unavailable(err.to_string())
    }
}
