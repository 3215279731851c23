//! # Validation Rulesets
//!
//! Field constraints are plain data: a [`Ruleset`] is a list of [`FieldRule`]s, each
//! pairing a property path and an accessor with the [`Constraint`]s to check. Rulesets are
//! built once (see [`crate::model::cheese_listing_rules`]) and evaluated by the entity
//! hooks before any write is committed.
//!
//! Messages follow the wording API clients already know from Symfony's validator, e.g.
//! `"This value should not be blank."`.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

pub const NOT_BLANK_MESSAGE: &str = "This value should not be blank.";
pub const NOT_NULL_MESSAGE: &str = "This value should not be null.";
pub const INVALID_EMAIL_MESSAGE: &str = "This value is not a valid email address.";

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// One failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub property_path: String,
    pub message: String,
}

impl Violation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }
}

/// Every violation found in one evaluation, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    /// Appends `other`, prefixing each property path with `prefix.`.
    pub fn extend_nested(&mut self, prefix: &str, other: Violations) {
        self.0.extend(other.0.into_iter().map(|v| Violation {
            property_path: format!("{prefix}.{}", v.property_path),
            message: v.message,
        }));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// `Ok(())` when nothing failed.
    pub fn into_result(self) -> Result<(), Violations> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", v.property_path, v.message)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The value a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Integer(Option<i64>),
    Reference(Option<u32>),
}

impl FieldValue<'_> {
    fn is_null(&self) -> bool {
        matches!(
            self,
            FieldValue::Text(None) | FieldValue::Integer(None) | FieldValue::Reference(None)
        )
    }

    fn is_blank(&self) -> bool {
        self.is_null() || matches!(self, FieldValue::Text(Some(s)) if s.is_empty())
    }

    /// Non-empty text, the only input `Length` and `Email` look at.
    fn text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(Some(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Rejects null and empty values.
    NotBlank,
    NotNull,
    /// Inclusive bounds on the character count. Null and empty text are skipped.
    Length {
        min: usize,
        max: usize,
        max_message: Option<&'static str>,
    },
    Email,
}

impl Constraint {
    pub fn length(min: usize, max: usize) -> Self {
        Constraint::Length {
            min,
            max,
            max_message: None,
        }
    }

    fn check(&self, value: &FieldValue<'_>) -> Option<String> {
        match self {
            Constraint::NotBlank => value.is_blank().then(|| NOT_BLANK_MESSAGE.to_string()),
            Constraint::NotNull => value.is_null().then(|| NOT_NULL_MESSAGE.to_string()),
            Constraint::Length {
                min,
                max,
                max_message,
            } => {
                let count = value.text()?.chars().count();
                if count < *min {
                    Some(format!(
                        "This value is too short. It should have {min} characters or more."
                    ))
                } else if count > *max {
                    Some(max_message.map(str::to_string).unwrap_or_else(|| {
                        format!("This value is too long. It should have {max} characters or less.")
                    }))
                } else {
                    None
                }
            }
            Constraint::Email => {
                let text = value.text()?;
                (!is_email(text)).then(|| INVALID_EMAIL_MESSAGE.to_string())
            }
        }
    }
}

fn is_email(value: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

pub struct FieldRule<T> {
    pub property_path: &'static str,
    pub accessor: fn(&T) -> FieldValue<'_>,
    pub constraints: Vec<Constraint>,
}

/// Ordered rules for one entity type.
pub struct Ruleset<T> {
    rules: Vec<FieldRule<T>>,
}

impl<T> Default for Ruleset<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> Ruleset<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        property_path: &'static str,
        accessor: fn(&T) -> FieldValue<'_>,
        constraints: Vec<Constraint>,
    ) -> Self {
        self.rules.push(FieldRule {
            property_path,
            accessor,
            constraints,
        });
        self
    }

    /// Runs every constraint of every rule; a field may report several violations.
    pub fn validate(&self, entity: &T) -> Violations {
        let mut violations = Violations::new();
        for rule in &self.rules {
            let value = (rule.accessor)(entity);
            for constraint in &rule.constraints {
                if let Some(message) = constraint.check(&value) {
                    violations.push(Violation::new(rule.property_path, message));
                }
            }
        }
        violations
    }
}
