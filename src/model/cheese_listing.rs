use super::derived::{normalize_description_input, relative_age, short_description};
use super::user::UserId;
use crate::filter::Filterable;
use crate::validation::{Constraint, FieldValue, Ruleset};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::LazyLock;

pub const TITLE_MAX_MESSAGE: &str = "Describe your cheese in 50 characters or less";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CheeseListingId(pub u32);

impl CheeseListingId {
    pub fn iri(&self) -> String {
        format!("/api/cheeses/{}", self.0)
    }
}

impl From<u32> for CheeseListingId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for CheeseListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cheese offered for sale.
///
/// Fields are private so the invariants hold: `created_at` is fixed at construction and the
/// stored description is always the normalised (`<br />`) form of what a client sent.
#[derive(Debug, Clone, PartialEq)]
pub struct CheeseListing {
    id: CheeseListingId,
    title: Option<String>,
    description: Option<String>,
    price: Option<i64>,
    created_at: DateTime<Utc>,
    is_published: bool,
    owner: Option<UserId>,
}

impl CheeseListing {
    /// An unpublished listing created at `created_at`, with only a title.
    pub fn new(id: CheeseListingId, title: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            description: None,
            price: None,
            created_at,
            is_published: false,
            owner: None,
        }
    }

    pub fn id(&self) -> CheeseListingId {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Stored description, with line breaks already turned into `<br />`.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Price in cents.
    pub fn price(&self) -> Option<i64> {
        self.price
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Stores the normalised form of client-supplied text.
    pub fn set_text_description(&mut self, raw: &str) {
        self.description = Some(normalize_description_input(raw));
    }

    pub fn set_price(&mut self, price: i64) {
        self.price = Some(price);
    }

    pub fn set_is_published(&mut self, is_published: bool) {
        self.is_published = is_published;
    }

    pub fn set_owner(&mut self, owner: UserId) {
        self.owner = Some(owner);
    }

    /// `None` while there is no description.
    pub fn short_description(&self) -> Option<String> {
        self.description.as_deref().map(short_description)
    }

    pub fn created_at_ago(&self, now: DateTime<Utc>) -> String {
        relative_age(self.created_at, now)
    }
}

/// Payload of a create request. `description` is raw client text.
#[derive(Debug, Clone, Default)]
pub struct CheeseListingCreate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub owner: Option<UserId>,
}

/// Fields to replace; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct CheeseListingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub owner: Option<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheeseListingAction {
    Publish,
    Unpublish,
}

impl Filterable for CheeseListing {
    fn text_property(&self, name: &str) -> Option<String> {
        match name {
            "title" => self.title.clone(),
            "description" => self.description.clone(),
            "owner" => self.owner.map(|o| o.to_string()),
            _ => None,
        }
    }

    fn bool_property(&self, name: &str) -> Option<bool> {
        (name == "isPublished").then_some(self.is_published)
    }

    fn int_property(&self, name: &str) -> Option<i64> {
        match name {
            "price" => self.price,
            _ => None,
        }
    }
}

static CHEESE_LISTING_RULES: LazyLock<Ruleset<CheeseListing>> = LazyLock::new(|| {
    Ruleset::<CheeseListing>::new()
        .field(
            "title",
            |c| FieldValue::Text(c.title()),
            vec![
                Constraint::NotBlank,
                Constraint::Length {
                    min: 2,
                    max: 50,
                    max_message: Some(TITLE_MAX_MESSAGE),
                },
            ],
        )
        .field(
            "description",
            |c| FieldValue::Text(c.description()),
            vec![Constraint::NotBlank],
        )
        .field(
            "price",
            |c| FieldValue::Integer(c.price()),
            vec![Constraint::NotBlank],
        )
        .field(
            "owner",
            |c| FieldValue::Reference(c.owner().map(|o| o.0)),
            vec![Constraint::NotNull],
        )
});

/// Field rules of a listing. The owner's own rules are cascaded by the store hooks.
pub fn cheese_listing_rules() -> &'static Ruleset<CheeseListing> {
    &CHEESE_LISTING_RULES
}
