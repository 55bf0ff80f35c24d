//! # Taskhub Storage 模块
//!
//! 本模块提供认证子系统的数据存储抽象层，支持多种存储后端实现。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：定义用户与 refresh token 存储的异步 Trait 接口
//! 2. **数据模型层** (`models.rs`)：定义存储相关的数据结构
//! 3. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 4. **连接管理层** (`connection.rs`)：数据库连接池管理
//! 5. **实现层**：
//!    - `in_memory/`：内存存储实现（用于测试和演示）
//!    - `postgres/`：PostgreSQL 存储实现（生产环境使用）
//!
//! ## 核心约束
//!
//! - **用户名唯一**：`users.username` 唯一索引在写入时强制，重复插入返回
//!   [`StorageError::Conflict`]
//! - **设备唯一行**：`refresh_tokens(user_id, device_id)` 唯一，同一设备重复登录
//!   原地轮换而非新增行
//! - **轮换原子性**：[`RefreshTokenStore::rotate`] 是单行 CAS，并发重放中只有
//!   一个调用方能赢得该行
//! - **禁止直接 SQL**：Handler 层禁止直接写 SQL，统一通过 storage 层
//!
//! ## 预期表结构（Postgres）
//!
//! ```sql
//! create table users (
//!     id bigint generated always as identity primary key,
//!     username text not null unique,
//!     password_hash text not null,
//!     role text not null,
//!     created_at bigint not null
//! );
//!
//! create table refresh_tokens (
//!     id bigint generated always as identity primary key,
//!     token text not null unique,
//!     user_id bigint not null references users(id),
//!     device_id text not null,
//!     device_name text not null,
//!     expires_at bigint not null,
//!     is_canceled boolean not null default false,
//!     unique (user_id, device_id)
//! );
//! create index refresh_tokens_sweep_idx on refresh_tokens (expires_at, is_canceled);
//! ```

pub mod connection;
pub mod error;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use traits::*;

pub use in_memory::{InMemoryRefreshTokenStore, InMemoryUserStore};
pub use postgres::{PgRefreshTokenStore, PgUserStore};
