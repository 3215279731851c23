//! # Normalization
//!
//! Turns stored records into format-independent [`Document`]s holding only the fields the
//! active serialization groups (and the optional property filter) expose. Encoders in
//! [`super::encoder`] then render documents as JSON-LD, JSON, HAL, CSV or HTML.

use super::descriptor::{Operation, ResourceDescriptor};
use crate::model::{CheeseListing, CheeseListingId, User};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Value(Value),
    /// IRI of a related resource, `None` when unset.
    Link(Option<String>),
    Links(Vec<String>),
    Embedded(Box<Document>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub iri: String,
    pub type_name: &'static str,
    pub attributes: Vec<(&'static str, Attribute)>,
}

impl Document {
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// What to expose for one resource type in one response.
#[derive(Debug, Clone)]
pub struct NormalizationContext {
    pub fields: Vec<&'static str>,
    /// Fields of the related resource to embed; empty means link by IRI.
    pub embedded_fields: Vec<&'static str>,
    pub now: DateTime<Utc>,
}

impl NormalizationContext {
    /// Readable fields of `descriptor` for `operation`, narrowed by `properties` when the
    /// client used the property filter. `related` decides which of its fields get embedded.
    pub fn new(
        descriptor: &ResourceDescriptor,
        related: &ResourceDescriptor,
        operation: Operation,
        properties: Option<&[String]>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut fields = descriptor.read_fields(operation);
        if let Some(properties) = properties {
            fields.retain(|field| properties.iter().any(|p| p.as_str() == *field));
        }
        Self {
            fields,
            embedded_fields: related.groups.fields(&descriptor.read_groups(operation)),
            now,
        }
    }
}

pub fn normalize_listing(
    listing: &CheeseListing,
    owner: Option<&User>,
    descriptor: &ResourceDescriptor,
    ctx: &NormalizationContext,
) -> Document {
    let attributes = ctx
        .fields
        .iter()
        .filter_map(|&field| {
            let attribute = match field {
                "id" => Attribute::Value(json!(listing.id().0)),
                "title" => Attribute::Value(json!(listing.title())),
                "description" => Attribute::Value(json!(listing.description())),
                "shortDescription" => Attribute::Value(json!(listing.short_description())),
                "price" => Attribute::Value(json!(listing.price())),
                "createdAtAgo" => Attribute::Value(json!(listing.created_at_ago(ctx.now))),
                "owner" => match owner {
                    Some(user) if !ctx.embedded_fields.is_empty() => {
                        Attribute::Embedded(Box::new(embed_user(user, &ctx.embedded_fields)))
                    }
                    _ => Attribute::Link(listing.owner().map(|id| id.iri())),
                },
                _ => return None,
            };
            Some((field, attribute))
        })
        .collect();

    Document {
        iri: listing.id().iri(),
        type_name: descriptor.short_name,
        attributes,
    }
}

fn embed_user(user: &User, fields: &[&'static str]) -> Document {
    Document {
        iri: user.id.iri(),
        type_name: "User",
        attributes: fields
            .iter()
            .filter_map(|&field| user_attribute(user, field, &[]).map(|a| (field, a)))
            .collect(),
    }
}

fn user_attribute(user: &User, field: &str, listings: &[CheeseListingId]) -> Option<Attribute> {
    Some(match field {
        "id" => Attribute::Value(json!(user.id.0)),
        "email" => Attribute::Value(json!(user.email)),
        "username" => Attribute::Value(json!(user.username)),
        "cheeseListings" => Attribute::Links(listings.iter().map(|id| id.iri()).collect()),
        _ => return None,
    })
}

/// `listings` are the ids of the listings the user owns.
pub fn normalize_user(
    user: &User,
    listings: &[CheeseListingId],
    descriptor: &ResourceDescriptor,
    ctx: &NormalizationContext,
) -> Document {
    Document {
        iri: user.id.iri(),
        type_name: descriptor.short_name,
        attributes: ctx
            .fields
            .iter()
            .filter_map(|&field| user_attribute(user, field, listings).map(|a| (field, a)))
            .collect(),
    }
}
