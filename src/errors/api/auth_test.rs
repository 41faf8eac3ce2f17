#[cfg(test)]
mod tests {
    use crate::errors::AuthError;
    use crate::errors::internal::{AccountError, CatalogError, CredentialError, InternalError};
    use crate::types::db::Role;
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let internal_err = InternalError::database("find_user", DbErr::Custom("disk I/O error".to_string()));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.message(), "An internal error occurred");
        assert_eq!(auth_err.status_code(), 500);
    }

    #[test]
    fn test_invalid_credentials_is_generic() {
        let auth_err = AuthError::from_internal_error(CredentialError::InvalidCredentials.into());

        assert_eq!(auth_err.message(), "Invalid credentials");
        assert_eq!(auth_err.status_code(), 401);
    }

    #[test]
    fn test_duplicate_username_does_not_echo_username() {
        let internal_err = InternalError::from(CredentialError::DuplicateUsername("alice".to_string()));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert_eq!(auth_err.message(), "Username already exists");
        assert_eq!(auth_err.status_code(), 400);
    }

    #[test]
    fn test_reserved_username_is_bad_request() {
        let internal_err = InternalError::from(CredentialError::ReservedUsername("owner".to_string()));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert!(matches!(auth_err, AuthError::ReservedUsername(_)));
        assert_eq!(auth_err.status_code(), 400);
    }

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        let invalid = AuthError::from_internal_error(CredentialError::invalid_token("jwt", "bad signature").into());
        let expired = AuthError::from_internal_error(CredentialError::ExpiredToken("jwt".to_string()).into());

        assert!(matches!(invalid, AuthError::InvalidToken(_)));
        assert!(matches!(expired, AuthError::ExpiredToken(_)));
        assert_eq!(expired.status_code(), 401);
    }

    #[test]
    fn test_admin_request_errors_map_to_bad_request() {
        let elevated = AuthError::from_internal_error(AccountError::AlreadyElevated(Role::Admin).into());
        let pending = AuthError::from_internal_error(AccountError::RequestAlreadyPending(3).into());

        assert_eq!(elevated.status_code(), 400);
        assert_eq!(pending.message(), "Admin request already pending");
    }

    #[test]
    fn test_validation_error_keeps_message() {
        let auth_err = AuthError::from_internal_error(InternalError::validation("username", "must not be empty"));

        assert_eq!(auth_err.status_code(), 400);
        assert_eq!(auth_err.message(), "Invalid username: must not be empty");
    }

    #[test]
    fn test_unrelated_domain_error_is_internal() {
        let auth_err = AuthError::from_internal_error(CatalogError::ProductNotFound(1).into());

        assert_eq!(auth_err.status_code(), 500);
    }
}
