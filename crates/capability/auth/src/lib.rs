//! 认证能力：注册、登录、refresh token 轮换与设备登出。
//!
//! ## 会话模型
//!
//! - access token：短时效、无状态、签名 JWT，服务端不存储，到期前无法撤销
//!   （接受的设计权衡，时效由配置控制）
//! - refresh token：长时效、有状态、按 (用户, 设备) 绑定一行存储记录；
//!   使用即轮换，登出即取消，失效行由后台清扫删除
//!
//! ## 轮换的原子性
//!
//! refresh 的"取消旧值 + 写入新值"合并为存储层的单行 CAS
//! （[`taskhub_storage::RefreshTokenStore::rotate`]）：并发重放同一旧值时
//! 至多一个调用方成功，输掉的一方统一得到认证失败（fail closed）。

mod jwt;
mod password;
mod sweeper;

pub use jwt::{IssuedRefreshToken, TokenIssuer};
pub use password::{PasswordCheck, hash_password, verify_password_and_maybe_upgrade};
pub use sweeper::{spawn_sweeper, sweep_once};

use domain::{AuthContext, Role, now_epoch_seconds};
use std::sync::Arc;
use taskhub_storage::{
    RefreshTokenCreate, RefreshTokenStore, StorageError, UserCreate, UserRecord, UserStore,
};
use uuid::Uuid;

/// 认证相关错误。
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

/// 登录/刷新返回的会话 token 组。
#[derive(Debug)]
pub struct SessionTokens {
    pub access_token: String,
    /// 原始 refresh token 值：仅用于传输给客户端，禁止写日志。
    pub refresh_token: String,
    pub refresh_expires_at: u64,
    /// 本次会话归属的设备 ID（客户端未提供时由服务端生成）。
    pub device_id: String,
}

/// 认证服务实现（基于 UserStore + RefreshTokenStore + TokenIssuer）。
pub struct AuthService {
    users: Arc<dyn UserStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    issuer: TokenIssuer,
}

impl AuthService {
    /// 创建认证服务实例。
    pub fn new(
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        issuer: TokenIssuer,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            issuer,
        }
    }

    /// 注册新账户，只开通账户不发 token。
    ///
    /// 用户名已存在返回 Ok(false)；成功创建 Guest 角色用户并返回 Ok(true)。
    /// 只持久化口令哈希，绝不存明文。
    pub async fn register(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "username and password are required".to_string(),
            ));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let password_hash = hash_password(password)?;
        match self
            .users
            .insert(UserCreate {
                username: username.to_string(),
                password_hash,
                role: Role::Guest,
                created_at: now_epoch_seconds(),
            })
            .await
        {
            Ok(_) => Ok(true),
            // 并发注册输给唯一索引，等同用户名已存在
            Err(StorageError::Conflict(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// 登录校验并签发会话 token 组。
    ///
    /// 未知用户与口令错误返回同一错误形状，防止用户名枚举。
    /// 同一 (用户, 设备) 重复登录时原地轮换既有行，不新增行；
    /// 客户端未提供设备 ID 时生成随机设备 ID，保证每次登录都按设备隔离。
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        device_id: Option<&str>,
        device_name: Option<&str>,
    ) -> Result<(UserRecord, SessionTokens), AuthError> {
        let Some(user) = self.users.find_by_username(identifier.trim()).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        let check = verify_password_and_maybe_upgrade(&user.password_hash, password)?;
        if !check.verified {
            return Err(AuthError::InvalidCredentials);
        }
        if let Some(password_hash) = check.upgrade_hash {
            let updated = self
                .users
                .update_password_hash(user.user_id, &password_hash)
                .await?;
            if !updated {
                return Err(AuthError::Internal(
                    "password migration update failed".to_string(),
                ));
            }
        }

        let device_id = match device_id.map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        let device_name = device_name.unwrap_or_default().trim().to_string();

        let issued = self.issuer.generate_refresh_token(&device_id, &device_name);
        self.persist_login_token(user.user_id, &issued).await?;

        let access_token =
            self.issuer
                .generate_access_token(user.user_id, &user.username, user.role)?;
        let tokens = SessionTokens {
            access_token,
            refresh_token: issued.token,
            refresh_expires_at: issued.expires_at,
            device_id,
        };
        Ok((user, tokens))
    }

    /// 使用 refresh token 换取新 token 组（轮换）。
    ///
    /// 记录缺失、已取消、已过期或输掉并发轮换，统一返回 TokenInvalid，
    /// 不泄露具体原因；调用方此时应丢弃持有的 refresh token。
    pub async fn refresh(&self, presented: &str) -> Result<(UserRecord, SessionTokens), AuthError> {
        let now = now_epoch_seconds();
        let Some(row) = self.refresh_tokens.find_by_token(presented).await? else {
            return Err(AuthError::TokenInvalid);
        };
        if !row.is_active(now) {
            return Err(AuthError::TokenInvalid);
        }
        let Some(user) = self.users.find_by_id(row.user_id).await? else {
            return Err(AuthError::TokenInvalid);
        };

        let issued = self
            .issuer
            .generate_refresh_token(&row.device_id, &row.device_name);
        // 单行 CAS 同时完成旧值作废与新值写入；0 行即并发方已轮换或行已失效
        let rotated = self
            .refresh_tokens
            .rotate(row.id, presented, &issued.token, issued.expires_at, now)
            .await?;
        if !rotated {
            return Err(AuthError::TokenInvalid);
        }

        let access_token =
            self.issuer
                .generate_access_token(user.user_id, &user.username, user.role)?;
        let tokens = SessionTokens {
            access_token,
            refresh_token: issued.token,
            refresh_expires_at: issued.expires_at,
            device_id: row.device_id,
        };
        Ok((user, tokens))
    }

    /// 取消指定设备的 refresh token（登出）。
    ///
    /// 设备 ID 为空、记录不存在或已取消都是无操作（幂等）。
    pub async fn cancel_device_token(
        &self,
        user_id: i64,
        device_id: Option<&str>,
    ) -> Result<(), AuthError> {
        let Some(device_id) = device_id.map(str::trim).filter(|value| !value.is_empty()) else {
            return Ok(());
        };
        let _ = self.refresh_tokens.cancel(user_id, device_id).await?;
        Ok(())
    }

    /// 校验 access token 并提取 AuthContext。
    pub fn verify_access_token(&self, token: &str) -> Result<AuthContext, AuthError> {
        self.issuer.decode_access_token(token)
    }

    /// 登录时持久化 refresh token：既有设备行原地覆盖，否则插入新行。
    async fn persist_login_token(
        &self,
        user_id: i64,
        issued: &IssuedRefreshToken,
    ) -> Result<(), AuthError> {
        match self
            .refresh_tokens
            .find_by_user_and_device(user_id, &issued.device_id)
            .await?
        {
            Some(row) => {
                let replaced = self
                    .refresh_tokens
                    .replace(row.id, &issued.token, issued.expires_at)
                    .await?;
                if !replaced {
                    return Err(AuthError::Internal(
                        "refresh token replace failed".to_string(),
                    ));
                }
                Ok(())
            }
            None => {
                let create = RefreshTokenCreate {
                    token: issued.token.clone(),
                    user_id,
                    device_id: issued.device_id.clone(),
                    device_name: issued.device_name.clone(),
                    expires_at: issued.expires_at,
                };
                match self.refresh_tokens.insert(create).await {
                    Ok(_) => Ok(()),
                    // 并发登录同一新设备：输给唯一索引后改为原地覆盖
                    Err(StorageError::Conflict(_)) => {
                        let Some(row) = self
                            .refresh_tokens
                            .find_by_user_and_device(user_id, &issued.device_id)
                            .await?
                        else {
                            return Err(AuthError::Internal(
                                "refresh token row vanished".to_string(),
                            ));
                        };
                        let replaced = self
                            .refresh_tokens
                            .replace(row.id, &issued.token, issued.expires_at)
                            .await?;
                        if !replaced {
                            return Err(AuthError::Internal(
                                "refresh token replace failed".to_string(),
                            ));
                        }
                        Ok(())
                    }
                    Err(err) => Err(err.into()),
                }
            }
        }
    }
}
