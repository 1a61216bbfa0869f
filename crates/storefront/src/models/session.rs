//! Session-related types.
//!
//! Types stored in the session: the logged-in user (with their backend
//! bearer token) and the transient cart.

use serde::{Deserialize, Serialize};

use velvet_loom_core::{Email, User, UserId};

/// Session-stored user identity.
///
/// Carries the backend bearer token so authenticated calls can be made on
/// the user's behalf. Discarded wholesale when the backend answers 401.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's backend ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// `"customer"` or `"admin"`.
    pub role: String,
    /// Bearer token for backend API calls.
    pub access_token: String,
}

impl CurrentUser {
    /// Build session identity from a backend user plus its token.
    #[must_use]
    pub fn from_user(user: User, access_token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            access_token,
        }
    }
}

/// Session keys for storefront session data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for storing the shopping cart.
    pub const CART: &str = "cart";

    /// Key for Google OAuth state (CSRF protection).
    pub const GOOGLE_OAUTH_STATE: &str = "google_oauth_state";

    /// Key for Google OAuth nonce (`OpenID` Connect replay protection).
    pub const GOOGLE_OAUTH_NONCE: &str = "google_oauth_nonce";
}
