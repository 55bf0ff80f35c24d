use domain::{Role, now_epoch_seconds};
use taskhub_auth::{AuthError, TokenIssuer};

fn issuer() -> TokenIssuer {
    TokenIssuer::new(
        "secret".to_string(),
        "taskhub".to_string(),
        "taskhub".to_string(),
        3600,
        7200,
    )
}

#[test]
fn access_token_issue_and_decode() {
    let issuer = issuer();
    let token = issuer
        .generate_access_token(42, "alice", Role::Admin)
        .expect("token");

    let ctx = issuer.decode_access_token(&token).expect("decode");
    assert_eq!(ctx.user_id, 42);
    assert_eq!(ctx.username, "alice");
    assert_eq!(ctx.role, Role::Admin);
}

#[test]
fn access_token_rejected_with_wrong_key() {
    let token = issuer()
        .generate_access_token(1, "alice", Role::Guest)
        .expect("token");

    let other = TokenIssuer::new(
        "other-secret".to_string(),
        "taskhub".to_string(),
        "taskhub".to_string(),
        3600,
        7200,
    );
    let result = other.decode_access_token(&token);
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[test]
fn access_token_rejected_with_wrong_audience() {
    let token = issuer()
        .generate_access_token(1, "alice", Role::Guest)
        .expect("token");

    let other = TokenIssuer::new(
        "secret".to_string(),
        "taskhub".to_string(),
        "another-app".to_string(),
        3600,
        7200,
    );
    let result = other.decode_access_token(&token);
    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[test]
fn refresh_token_values_are_long_and_unique() {
    let issuer = issuer();
    let first = issuer.generate_refresh_token("d1", "laptop");
    let second = issuer.generate_refresh_token("d1", "laptop");

    // 32 字节熵，十六进制即 64 字符
    assert_eq!(first.token.len(), 64);
    assert_ne!(first.token, second.token);
    assert_eq!(first.device_id, "d1");
    assert!(first.expires_at >= now_epoch_seconds() + 7200 - 1);
}
