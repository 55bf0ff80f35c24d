use api_contract::{LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse};

#[test]
fn login_response_is_camel_case() {
    let response = LoginResponse {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        refresh_expires: 1_700_000_000,
        device_id: "d1".to_string(),
        username: "alice".to_string(),
        role: "Guest".to_string(),
    };
    let value = serde_json::to_value(response).expect("serialize");
    assert!(value.get("accessToken").is_some());
    assert!(value.get("refreshToken").is_some());
    assert!(value.get("refreshExpires").is_some());
    assert!(value.get("deviceId").is_some());
    assert!(value.get("access_token").is_none());
    assert!(value.get("refresh_token").is_none());
}

#[test]
fn login_request_accepts_missing_device_fields() {
    let req: LoginRequest =
        serde_json::from_str(r#"{"identifier":"alice","password":"pw"}"#).expect("parse");
    assert_eq!(req.identifier, "alice");
    assert!(req.device_id.is_none());
    assert!(req.device_name.is_none());
}

#[test]
fn refresh_token_request_accepts_both_casings() {
    let camel: RefreshTokenRequest =
        serde_json::from_str(r#"{"refreshToken":"t1"}"#).expect("camel");
    let snake: RefreshTokenRequest =
        serde_json::from_str(r#"{"refresh_token":"t2"}"#).expect("snake");
    assert_eq!(camel.refresh_token, "t1");
    assert_eq!(snake.refresh_token, "t2");
}

#[test]
fn refresh_token_response_is_camel_case() {
    let response = RefreshTokenResponse {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        refresh_expires: 1_700_000_000,
    };
    let value = serde_json::to_value(response).expect("serialize");
    assert!(value.get("accessToken").is_some());
    assert!(value.get("refreshExpires").is_some());
}
