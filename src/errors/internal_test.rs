#[cfg(test)]
mod tests {
    use crate::errors::internal::{
        AccountError, CatalogError, CredentialError, DatabaseError, InternalError, UploadError,
    };
    use sea_orm::DbErr;

    #[test]
    fn test_database_helper_records_operation() {
        let err = InternalError::database("find_product", DbErr::Custom("boom".to_string()));

        match &err {
            InternalError::Database(DatabaseError::Operation { operation, .. }) => {
                assert_eq!(operation, "find_product");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
        assert!(err.to_string().contains("find_product"));
    }

    #[test]
    fn test_infrastructure_classification() {
        assert!(InternalError::parse("json", "eof").is_infrastructure());
        assert!(InternalError::crypto("hash_password", "bad params").is_infrastructure());
        assert!(!InternalError::validation("name", "empty").is_infrastructure());
        assert!(!InternalError::from(CredentialError::InvalidCredentials).is_infrastructure());
        assert!(!InternalError::from(CatalogError::ProductNotFound(1)).is_infrastructure());
    }

    #[test]
    fn test_domain_errors_are_transparent() {
        let err = InternalError::from(AccountError::UserNotFound(12));
        assert_eq!(err.to_string(), "User not found: 12");

        let err = InternalError::from(UploadError::TooLarge { size: 6, max: 5 });
        assert_eq!(err.to_string(), "File too large: 6 bytes (max 5)");
    }
}
