use crate::filter::Filterable;
use crate::validation::{Constraint, FieldValue, Ruleset};
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(pub u32);

impl UserId {
    pub fn iri(&self) -> String {
        format!("/api/users/{}", self.0)
    }

    /// Accepts an IRI (`/api/users/3`) or a bare id (`3`).
    pub fn parse(reference: &str) -> Option<Self> {
        let raw = reference.strip_prefix("/api/users/").unwrap_or(reference);
        raw.parse().ok().map(Self)
    }
}

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account that owns cheese listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserCreate {
    pub email: String,
    pub username: String,
}

impl Filterable for User {
    fn text_property(&self, name: &str) -> Option<String> {
        match name {
            "id" => Some(self.id.to_string()),
            "email" => Some(self.email.clone()),
            "username" => Some(self.username.clone()),
            _ => None,
        }
    }
}

static USER_RULES: LazyLock<Ruleset<User>> = LazyLock::new(|| {
    Ruleset::<User>::new()
        .field(
            "email",
            |u| FieldValue::Text(Some(&u.email)),
            vec![Constraint::NotBlank, Constraint::Email],
        )
        .field(
            "username",
            |u| FieldValue::Text(Some(&u.username)),
            vec![Constraint::NotBlank],
        )
});

pub fn user_rules() -> &'static Ruleset<User> {
    &USER_RULES
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, username: &str) -> User {
        User {
            id: UserId(1),
            email: email.into(),
            username: username.into(),
        }
    }

    #[test]
    fn parses_iri_and_bare_id() {
        assert_eq!(UserId::parse("/api/users/12"), Some(UserId(12)));
        assert_eq!(UserId::parse("12"), Some(UserId(12)));
        assert_eq!(UserId::parse("/api/cheeses/12"), None);
        assert_eq!(UserId::parse("/api/users/abc"), None);
    }

    #[test]
    fn user_rules_check_email_and_username() {
        assert!(user_rules().validate(&user("ryan@example.com", "ryan")).is_empty());
        let violations = user_rules().validate(&user("not-an-email", ""));
        let paths: Vec<_> = violations.iter().map(|v| v.property_path.as_str()).collect();
        assert_eq!(paths, vec!["email", "username"]);
    }
}
