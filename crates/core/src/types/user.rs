//! User account wire type.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// A user account as returned by the backend auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    /// Backend uses an integer flag, not a bool.
    pub is_active: i32,
    /// `"customer"` or `"admin"`.
    pub role: String,
}

impl User {
    /// Whether this account may use the back-office.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_roles() {
        let user: User = serde_json::from_str(
            r#"{"id": 1, "name": "Asha", "email": "asha@example.com", "is_active": 1, "role": "admin"}"#,
        )
        .expect("deserialize");
        assert!(user.is_admin());

        let shopper = User {
            role: "customer".to_owned(),
            ..user
        };
        assert!(!shopper.is_admin());
    }
}
