use domain::{AuthContext, Role};

#[test]
fn auth_context_builds() {
    let ctx = AuthContext::new(42, "alice", Role::Admin);

    assert_eq!(ctx.user_id, 42);
    assert_eq!(ctx.username, "alice");
    assert_eq!(ctx.role, Role::Admin);
}

#[test]
fn role_displays_as_its_name() {
    assert_eq!(Role::Guest.to_string(), "Guest");
    assert_eq!(Role::Admin.to_string(), "Admin");
}
