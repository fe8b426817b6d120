//! Staff User Model

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Waiter,
}

/// Staff member
///
/// `pin` is a plain 4-digit code living in the same synchronized document as
/// operational data; it identifies staff on a trusted device, it is not a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    pub pin: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "name": "Manager",
            "role": "admin",
            "pin": "1234"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert!(user.is_active);
        assert_eq!(serde_json::to_value(Role::Waiter).unwrap(), "waiter");
    }
}
