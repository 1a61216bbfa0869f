//! Session state for signed-in admins.

use serde::{Deserialize, Serialize};

use velvet_loom_core::{Email, User, UserId};

/// The admin stored in the session after a successful login.
///
/// Only users with `role == "admin"` ever reach the session; the login
/// route checks the role before storing. The bearer token is forwarded on
/// every proxied backend call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    /// Backend bearer token for privileged API calls.
    pub access_token: String,
}

impl CurrentAdmin {
    /// Build session state from a backend user record and its token.
    #[must_use]
    pub fn from_user(user: &User, access_token: String) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            access_token,
        }
    }
}

/// Session key constants.
pub mod session_keys {
    /// The signed-in admin (`CurrentAdmin`).
    pub const CURRENT_ADMIN: &str = "current_admin";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_user_carries_identity_and_token() {
        let user: User = serde_json::from_str(
            r#"{"id": 7, "name": "Asha", "email": "asha@velvetloom.example", "is_active": 1, "role": "admin"}"#,
        )
        .expect("deserialize");

        let admin = CurrentAdmin::from_user(&user, "tok-abc".to_owned());
        assert_eq!(admin.id, user.id);
        assert_eq!(admin.email, user.email);
        assert_eq!(admin.email.as_str(), "asha@velvetloom.example");
        assert_eq!(admin.access_token, "tok-abc");
    }
}
