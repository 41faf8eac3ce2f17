// Providers layer - Work performers
//
// Providers hold the crypto, token and file-system work that coordinators
// compose. They never touch the database.
pub mod crypto_provider;
pub mod token_provider;
pub mod upload_provider;

pub use crypto_provider::CryptoProvider;
pub use token_provider::TokenProvider;
pub use upload_provider::UploadProvider;
