//! Login support: password obfuscation and user lookup.

mod password;

pub use password::{obfuscate, verify};

use tracing::{debug, info};

use crate::common::Role;
use crate::record::User;
use crate::repository::UserRepo;
use crate::Result;

/// Returns the user if the username exists and the password matches.
///
/// An unknown username and a wrong password are both `Ok(None)`; only storage
/// failures are errors.
pub fn authenticate(users: &UserRepo, username: &str, password: &str) -> Result<Option<User>> {
    let Some((_, user)) = users.find(username)? else {
        debug!(username, "login for unknown user");
        return Ok(None);
    };

    if verify(&user.password, password) {
        info!(username, role = %user.role, "login succeeded");
        Ok(Some(user))
    } else {
        debug!(username, "login with wrong password");
        Ok(None)
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
}

impl Session {
    /// Authenticates and opens a session.
    pub fn login(users: &UserRepo, username: &str, password: &str) -> Result<Option<Self>> {
        Ok(authenticate(users, username, password)?.map(|user| Self { user }))
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    /// Student or faculty id this session acts for; `None` for admins.
    pub fn ref_id(&self) -> Option<&str> {
        if self.user.ref_id.is_empty() {
            None
        } else {
            Some(&self.user.ref_id)
        }
    }
}
