#[cfg(test)]
mod tests {
    use crate::api::helpers::*;
    use crate::errors::internal::{CredentialError, InternalError};
    use crate::test::utils::{create_test_user, setup_test_app_data};
    use crate::types::db::Role;
    use poem::Request;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_extract_ip_from_x_forwarded_for() {
        let req = Request::builder()
            .header("X-Forwarded-For", "192.168.1.1, 10.0.0.1")
            .finish();

        let ip = extract_ip_address(&req);
        assert_eq!(ip, Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))));
    }

    #[test]
    fn test_extract_ip_from_x_real_ip() {
        let req = Request::builder().header("X-Real-IP", "192.168.1.2").finish();

        let ip = extract_ip_address(&req);
        assert_eq!(ip, Some(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 2))));
    }

    #[test]
    fn test_extract_ip_fallback_to_remote_addr() {
        // No headers and no socket peer in a built request
        let req = Request::builder().finish();

        assert_eq!(extract_ip_address(&req), None);
    }

    #[test]
    fn test_extract_user_agent() {
        let req = Request::builder().header("User-Agent", "curl/8.0").finish();

        assert_eq!(extract_user_agent(&req).as_deref(), Some("curl/8.0"));
    }

    #[tokio::test]
    async fn test_create_request_context_with_valid_jwt() {
        let (app_data, _dir) = setup_test_app_data().await;
        let user = create_test_user(&app_data.db, "buyer", Role::User).await;
        let (token, _) = app_data.token_provider.issue_token(&user).unwrap();
        let req = Request::builder().header("X-Real-IP", "10.1.1.1").finish();

        let ctx = create_request_context(&req, Some(&token), &app_data.token_provider).unwrap();

        assert!(ctx.authenticated);
        assert_eq!(ctx.user_id(), Some(user.id));
        assert_eq!(ctx.actor_id, format!("user:{}", user.id));
        assert_eq!(ctx.ip_address, Some(IpAddr::V4(Ipv4Addr::new(10, 1, 1, 1))));
    }

    #[tokio::test]
    async fn test_create_request_context_with_invalid_jwt() {
        let (app_data, _dir) = setup_test_app_data().await;
        let req = Request::builder().finish();

        let err = create_request_context(&req, Some("invalid-jwt-token"), &app_data.token_provider)
            .unwrap_err();

        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidToken { .. })));
    }

    #[tokio::test]
    async fn test_create_request_context_without_auth() {
        let (app_data, _dir) = setup_test_app_data().await;
        let req = Request::builder().finish();

        let ctx = create_request_context(&req, None, &app_data.token_provider).unwrap();

        assert!(!ctx.authenticated);
        assert!(ctx.claims.is_none());
        assert_eq!(ctx.actor_id, "unknown");
    }

    #[tokio::test]
    async fn test_refresh_account_takes_current_role() {
        let (app_data, _dir) = setup_test_app_data().await;
        let staff = create_test_user(&app_data.db, "staff", Role::Admin).await;
        let (token, _) = app_data.token_provider.issue_token(&staff).unwrap();
        let req = Request::builder().finish();
        let ctx = create_request_context(&req, Some(&token), &app_data.token_provider).unwrap();
        assert!(ctx.is_staff());

        app_data
            .user_store
            .update_role(&app_data.db, staff.id, Role::User)
            .await
            .unwrap();
        let ctx = refresh_account(ctx, &app_data).await.unwrap();

        assert_eq!(ctx.role(), Some(Role::User));
        assert!(!ctx.is_staff());
    }

    #[tokio::test]
    async fn test_refresh_account_refuses_inactive_user() {
        let (app_data, _dir) = setup_test_app_data().await;
        let buyer = create_test_user(&app_data.db, "buyer", Role::User).await;
        let (token, _) = app_data.token_provider.issue_token(&buyer).unwrap();
        let req = Request::builder().finish();
        let ctx = create_request_context(&req, Some(&token), &app_data.token_provider).unwrap();

        app_data
            .user_store
            .set_active(&app_data.db, buyer.id, false)
            .await
            .unwrap();
        let err = refresh_account(ctx, &app_data).await.unwrap_err();

        assert!(matches!(err, InternalError::Credential(CredentialError::InvalidToken { .. })));
    }

    #[tokio::test]
    async fn test_refresh_account_leaves_anonymous_context() {
        let (app_data, _dir) = setup_test_app_data().await;
        let req = Request::builder().finish();
        let ctx = create_request_context(&req, None, &app_data.token_provider).unwrap();

        let ctx = refresh_account(ctx, &app_data).await.unwrap();

        assert!(ctx.claims.is_none());
    }
}
