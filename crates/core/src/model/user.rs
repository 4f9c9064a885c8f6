use serde::{Deserialize, Serialize};

use super::{Role, UserId};

/// The profile fields the client relies on.
///
/// Backend user records carry more; anything beyond these is ignored when a
/// persisted record is parsed, and unknown role strings make the whole parse
/// fail (the caller treats that as an absent user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: Role,
}

impl User {
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_extra_fields_when_parsing() {
        let json = r#"{"id":3,"name":"Dana","email":"dana@example.org","role":"Admin","avatar":"x.png"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role(), Role::Admin);
        assert_eq!(user.name(), "Dana");
    }

    #[test]
    fn unknown_role_fails_the_whole_parse() {
        let json = r#"{"id":3,"name":"Dana","email":"dana@example.org","role":"superuser"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }
}
