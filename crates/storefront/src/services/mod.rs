//! External service clients for the storefront.

pub mod google;

pub use google::{GoogleClient, GoogleOAuthError, id_token_nonce};
