//! Staff PIN login and admin gating
//!
//! PINs are plain 4-digit codes stored with the rest of the synchronized data;
//! they identify staff on a trusted device. No hashing, no rate limiting.

use std::sync::Arc;

use ayala_sync::SyncedStore;
use shared::models::{Role, User};
use shared::util::now_millis;
use thiserror::Error;

use crate::security_log;

pub const PIN_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid PIN")]
    InvalidPin,

    #[error("Admin role required for {0}")]
    Forbidden(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("PIN already in use")]
    DuplicatePin,

    #[error("User not found: {0}")]
    UserNotFound(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Exactly four ASCII digits
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == PIN_LENGTH && pin.bytes().all(|b| b.is_ascii_digit())
}

/// Logged-in staff member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffSession {
    user: User,
}

impl StaffSession {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    /// Gate for shift end, data reset and user management
    pub fn require_admin(&self, action: &'static str) -> AuthResult<()> {
        if self.is_admin() {
            return Ok(());
        }
        security_log!(
            "WARN",
            "permission_denied",
            user_id = self.user.id.as_str(),
            action = action
        );
        Err(AuthError::Forbidden(action))
    }
}

/// Login and user management over the synchronized `users` collection
#[derive(Debug, Clone)]
pub struct StaffService {
    users: SyncedStore<Vec<User>>,
}

impl StaffService {
    pub fn new(users: SyncedStore<Vec<User>>) -> Self {
        Self { users }
    }

    pub fn users(&self) -> Arc<Vec<User>> {
        self.users.get()
    }

    pub fn store(&self) -> &SyncedStore<Vec<User>> {
        &self.users
    }

    /// Match a PIN against active users
    pub fn login(&self, pin: &str) -> AuthResult<StaffSession> {
        if !is_valid_pin(pin) {
            security_log!("WARN", "login_failed", reason = "malformed_pin");
            return Err(AuthError::InvalidPin);
        }
        let users = self.users.get();
        match users.iter().find(|u| u.is_active && u.pin == pin) {
            Some(user) => {
                security_log!("INFO", "login", user_id = user.id.as_str());
                Ok(StaffSession { user: user.clone() })
            }
            None => {
                security_log!("WARN", "login_failed", reason = "unknown_pin");
                Err(AuthError::InvalidPin)
            }
        }
    }

    /// Admin only. Name required, PIN must be 4 digits and unused.
    pub fn add_user(
        &self,
        session: &StaffSession,
        name: &str,
        pin: &str,
        role: Role,
    ) -> AuthResult<User> {
        session.require_admin("add_user")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::Validation("name is required".into()));
        }
        if !is_valid_pin(pin) {
            return Err(AuthError::Validation("PIN must be exactly 4 digits".into()));
        }

        let user = User {
            id: format!("u_{}", now_millis()),
            name: name.to_string(),
            role,
            pin: pin.to_string(),
            is_active: true,
        };
        let created = user.clone();
        self.users.try_update(move |users| {
            if users.iter().any(|u| u.pin == user.pin) {
                return Err(AuthError::DuplicatePin);
            }
            let mut next = users.clone();
            next.push(user);
            Ok(Some(next))
        })?;

        security_log!(
            "INFO",
            "user_added",
            user_id = created.id.as_str(),
            by = session.user.id.as_str()
        );
        Ok(created)
    }

    /// Admin only.
    pub fn remove_user(&self, session: &StaffSession, user_id: &str) -> AuthResult<()> {
        session.require_admin("remove_user")?;
        self.users.try_update(|users| {
            if !users.iter().any(|u| u.id == user_id) {
                return Err(AuthError::UserNotFound(user_id.to_string()));
            }
            Ok(Some(users.iter().filter(|u| u.id != user_id).cloned().collect()))
        })?;
        security_log!(
            "INFO",
            "user_removed",
            user_id = user_id,
            by = session.user.id.as_str()
        );
        Ok(())
    }
}
