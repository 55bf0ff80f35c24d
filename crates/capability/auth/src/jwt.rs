use crate::AuthError;
use domain::{AuthContext, Role, now_epoch_seconds};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// refresh token 随机值长度（字节），32 字节即 256 位熵
const REFRESH_TOKEN_BYTES: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
/// JWT 内部 claims。
struct Claims {
    sub: String,
    username: String,
    role: String,
    jti: String,
    iss: String,
    aud: String,
    exp: usize,
}

/// Token 签发器：access token 签发/校验与 refresh token 随机值生成。
///
/// 签名密钥、issuer、audience 与 TTL 都在构造时显式传入，签发与校验共用
/// 同一对称密钥（密钥即信任锚），不读取任何全局状态。
pub struct TokenIssuer {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

/// 尚未持久化的 refresh token：持久化由 AuthService 负责。
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub token: String,
    pub expires_at: u64,
    pub device_id: String,
    pub device_name: String,
}

impl TokenIssuer {
    /// 创建 token 签发器。
    pub fn new(
        secret: String,
        issuer: String,
        audience: String,
        access_ttl_seconds: u64,
        refresh_ttl_seconds: u64,
    ) -> Self {
        Self {
            secret: secret.into_bytes(),
            issuer,
            audience,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    /// 签发 access token（HS256）。
    ///
    /// claims 携带用户 ID、用户名、角色与随机 jti，过期时间为 now + access TTL。
    pub fn generate_access_token(
        &self,
        user_id: i64,
        username: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: (now_epoch_seconds() + self.access_ttl_seconds) as usize,
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|err| AuthError::Internal(err.to_string()))
    }

    /// 校验 access token 并提取 AuthContext。
    ///
    /// 校验签名、过期时间、issuer 与 audience；过期返回 TokenExpired，
    /// 其余一切问题（含未知角色）返回 TokenInvalid。
    pub fn decode_access_token(&self, token: &str) -> Result<AuthContext, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let decoded = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        })?;

        let claims = decoded.claims;
        let user_id = claims.sub.parse::<i64>().map_err(|_| AuthError::TokenInvalid)?;
        let role = Role::parse(&claims.role).ok_or(AuthError::TokenInvalid)?;
        Ok(AuthContext::new(user_id, claims.username, role))
    }

    /// 生成 refresh token 随机值与过期时间。
    ///
    /// 值来自 OsRng 的 32 字节随机数（十六进制编码），本方法不落库。
    pub fn generate_refresh_token(
        &self,
        device_id: &str,
        device_name: &str,
    ) -> IssuedRefreshToken {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        IssuedRefreshToken {
            token: hex::encode(bytes),
            expires_at: now_epoch_seconds() + self.refresh_ttl_seconds,
            device_id: device_id.to_string(),
            device_name: device_name.to_string(),
        }
    }
}
