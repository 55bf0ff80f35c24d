use domain::Role;
use std::sync::Arc;
use taskhub_auth::{AuthError, AuthService, TokenIssuer};
use taskhub_storage::{InMemoryRefreshTokenStore, InMemoryUserStore, RefreshTokenStore, UserStore};

fn service() -> (
    AuthService,
    Arc<InMemoryUserStore>,
    Arc<InMemoryRefreshTokenStore>,
) {
    let users = Arc::new(InMemoryUserStore::new());
    let tokens = Arc::new(InMemoryRefreshTokenStore::new());
    let issuer = TokenIssuer::new(
        "secret".to_string(),
        "taskhub".to_string(),
        "taskhub".to_string(),
        3600,
        7200,
    );
    let auth = AuthService::new(users.clone(), tokens.clone(), issuer);
    (auth, users, tokens)
}

#[tokio::test]
async fn register_rejects_duplicate_username() {
    let (auth, users, _) = service();

    assert!(auth.register("alice", "Secret123").await.expect("register"));
    assert!(!auth.register("alice", "Other456").await.expect("register"));
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn register_requires_username_and_password() {
    let (auth, _, _) = service();

    let missing_name = auth.register("", "Secret123").await;
    assert!(matches!(missing_name, Err(AuthError::Validation(_))));
    let missing_password = auth.register("alice", "").await;
    assert!(matches!(missing_password, Err(AuthError::Validation(_))));
}

#[tokio::test]
async fn register_stores_hash_not_plaintext() {
    let (auth, users, _) = service();
    auth.register("alice", "Secret123").await.expect("register");

    let user = users
        .find_by_username("alice")
        .await
        .expect("find")
        .expect("user");
    assert_eq!(user.role, Role::Guest);
    assert_ne!(user.password_hash, "Secret123");
    assert!(user.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn login_failure_shape_hides_which_part_was_wrong() {
    let (auth, _, _) = service();
    auth.register("alice", "Secret123").await.expect("register");

    let unknown_user = auth.login("nobody", "x", Some("d1"), None).await;
    let wrong_password = auth.login("alice", "wrongpass", Some("d1"), None).await;

    // 未知用户与口令错误必须不可区分
    assert!(matches!(unknown_user, Err(AuthError::InvalidCredentials)));
    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn login_returns_tokens_and_role() {
    let (auth, _, _) = service();
    auth.register("alice", "Secret123").await.expect("register");

    let (user, tokens) = auth
        .login("alice", "Secret123", Some("d1"), Some("My Laptop"))
        .await
        .expect("login");
    assert_eq!(user.username, "alice");
    assert_eq!(user.role, Role::Guest);
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
    assert_eq!(tokens.device_id, "d1");

    let ctx = auth
        .verify_access_token(&tokens.access_token)
        .expect("verify");
    assert_eq!(ctx.user_id, user.user_id);
    assert_eq!(ctx.role, Role::Guest);
}

#[tokio::test]
async fn repeat_login_same_device_keeps_one_row() {
    let (auth, _, token_store) = service();
    auth.register("alice", "Secret123").await.expect("register");

    let (_, first) = auth
        .login("alice", "Secret123", Some("d1"), None)
        .await
        .expect("first login");
    let (_, second) = auth
        .login("alice", "Secret123", Some("d1"), None)
        .await
        .expect("second login");

    assert_eq!(token_store.len(), 1);
    assert_ne!(first.refresh_token, second.refresh_token);
    // 旧值已被覆盖，不再可用
    assert!(
        token_store
            .find_by_token(&first.refresh_token)
            .await
            .expect("find")
            .is_none()
    );
}

#[tokio::test]
async fn distinct_devices_get_distinct_rows() {
    let (auth, _, token_store) = service();
    auth.register("alice", "Secret123").await.expect("register");

    auth.login("alice", "Secret123", Some("d1"), None)
        .await
        .expect("login d1");
    auth.login("alice", "Secret123", Some("d2"), None)
        .await
        .expect("login d2");

    assert_eq!(token_store.len(), 2);
}

#[tokio::test]
async fn missing_device_id_gets_generated() {
    let (auth, _, _) = service();
    auth.register("alice", "Secret123").await.expect("register");

    let (_, tokens) = auth
        .login("alice", "Secret123", None, None)
        .await
        .expect("login");
    assert!(uuid::Uuid::parse_str(&tokens.device_id).is_ok());

    let (_, blank) = auth
        .login("alice", "Secret123", Some("  "), None)
        .await
        .expect("login blank device");
    assert!(uuid::Uuid::parse_str(&blank.device_id).is_ok());
    assert_ne!(tokens.device_id, blank.device_id);
}

#[tokio::test]
async fn legacy_plaintext_hash_upgraded_on_login() {
    let (auth, users, _) = service();
    users
        .insert(taskhub_storage::UserCreate {
            username: "legacy".to_string(),
            password_hash: "OldPlain1".to_string(),
            role: Role::Guest,
            created_at: 0,
        })
        .await
        .expect("seed");

    auth.login("legacy", "OldPlain1", Some("d1"), None)
        .await
        .expect("login");

    let user = users
        .find_by_username("legacy")
        .await
        .expect("find")
        .expect("user");
    assert!(user.password_hash.starts_with("$argon2"));
}
