use thiserror::Error;

use super::{Role, User};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session token must not be empty")]
    EmptyToken,
}

/// An authenticated session: a bearer token plus the signed-in user.
///
/// Only constructible from both halves, so a half-set session cannot be
/// represented in memory. Persistence stores the halves under separate keys;
/// the load path yields no session at all when either half is missing or
/// unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    user: User,
}

impl Session {
    /// Build a session from a token and user record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyToken` if the token is empty or whitespace.
    pub fn new(token: impl Into<String>, user: User) -> Result<Self, SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Self { token, user })
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Convenience accessor for the signed-in user's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.user.role()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;

    fn user() -> User {
        User::new(UserId::new(1), "Ada", "ada@example.org", Role::Student)
    }

    #[test]
    fn rejects_empty_token() {
        assert_eq!(Session::new("", user()).unwrap_err(), SessionError::EmptyToken);
        assert_eq!(Session::new("   ", user()).unwrap_err(), SessionError::EmptyToken);
    }

    #[test]
    fn exposes_token_and_role() {
        let session = Session::new("tok-1", user()).unwrap();
        assert_eq!(session.token(), "tok-1");
        assert_eq!(session.role(), Role::Student);
    }
}
