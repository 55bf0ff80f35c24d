//! PostgreSQL 存储实现模块
//!
//! 生产环境使用。所有 SQL 查询使用参数化，防止 SQL 注入。
//!
//! 包含以下实现：
//! - UserStore: PgUserStore
//! - RefreshTokenStore: PgRefreshTokenStore

pub mod refresh_token;
pub mod user;

pub use refresh_token::*;
pub use user::*;
