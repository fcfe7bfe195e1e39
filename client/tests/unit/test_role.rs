//! 角色权限测试
//!
//! 权限判断全部为穷尽匹配,这里逐个角色确认能力矩阵。

use satoyama_dogrun::models::{AdminUser, Role};

#[test]
fn test_capability_matrix() {
    let cases = [
        (Role::User, false, false, false),
        (Role::Admin, true, false, true),
        (Role::SuperAdmin, true, true, true),
    ];

    for (role, admin, manage_admins, review) in cases {
        assert_eq!(role.is_admin(), admin, "{:?}", role);
        assert_eq!(role.can_manage_admins(), manage_admins, "{:?}", role);
        assert_eq!(role.can_review_applications(), review, "{:?}", role);
    }
}

#[test]
fn test_admin_user_parses_persisted_json() {
    let raw = r#"{"id":3,"username":"hanako","email":"h@example.jp","role":"admin"}"#;
    let user: AdminUser = serde_json::from_str(raw).unwrap();
    assert_eq!(user.id, 3);
    assert_eq!(user.role, Role::Admin);
}

#[test]
fn test_admin_user_with_unknown_role_fails() {
    let raw = r#"{"id":3,"username":"hanako","role":"owner"}"#;
    assert!(serde_json::from_str::<AdminUser>(raw).is_err());
}
