//! # Resource Descriptors
//!
//! A [`ResourceDescriptor`] is the route table, serialization group map, filter list,
//! pagination size and format list of one resource, built at startup. The router, the
//! query parser and the normalizer all read from it instead of hard-coding per-resource
//! behaviour.

use super::format::Format;
use crate::filter::SearchStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CollectionGet,
    CollectionPost,
    ItemGet,
    ItemPut,
}

impl Operation {
    pub fn is_item(&self) -> bool {
        matches!(self, Operation::ItemGet | Operation::ItemPut)
    }
}

/// A query-string filter accepted on the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSpec {
    /// `property=value` or `property[]=value`. A dotted property (`owner.username`) is
    /// matched on the related resource.
    Search {
        property: &'static str,
        strategy: SearchStrategy,
    },
    /// `property=<iri>` or `property[]=<iri>`, exact match on the id of a resource under
    /// `target`. Bare ids are accepted too.
    Reference {
        property: &'static str,
        target: &'static str,
    },
    /// `property=true|false|1|0`
    Boolean { property: &'static str },
    /// `property[gt|gte|lt|lte]=n` and `property[between]=a..b`
    Range { property: &'static str },
    /// `parameter[]=field` restricts the serialized fields.
    Property { parameter: &'static str },
}

pub const RANGE_OPERATORS: [&str; 5] = ["between", "gt", "gte", "lt", "lte"];

/// Serialization group name to the fields it exposes, in output order.
#[derive(Debug, Clone, Default)]
pub struct GroupMap(Vec<(&'static str, Vec<&'static str>)>);

impl GroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, name: &'static str, fields: &[&'static str]) -> Self {
        self.0.push((name, fields.to_vec()));
        self
    }

    /// Union of the fields of `groups`, each listed once, in first-seen order.
    pub fn fields(&self, groups: &[&str]) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for wanted in groups {
            for (name, members) in &self.0 {
                if name == wanted {
                    for field in members {
                        if !fields.contains(field) {
                            fields.push(field);
                        }
                    }
                }
            }
        }
        fields
    }
}

#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    /// Used for `@type` and the JSON-LD context IRI.
    pub short_name: &'static str,
    pub collection_path: &'static str,
    pub operations: Vec<Operation>,
    pub normalization_groups: Vec<&'static str>,
    pub denormalization_groups: Vec<&'static str>,
    /// Added to the normalization groups on item retrieval.
    pub item_get_groups: Vec<&'static str>,
    pub groups: GroupMap,
    pub filters: Vec<FilterSpec>,
    pub items_per_page: usize,
    /// Supported formats; the first one is the default.
    pub formats: Vec<Format>,
}

impl ResourceDescriptor {
    /// Axum route pattern for one item, e.g. `/api/cheeses/{id}`.
    pub fn item_path(&self) -> String {
        format!("{}/{{id}}", self.collection_path)
    }

    pub fn context_iri(&self) -> String {
        format!("/api/contexts/{}", self.short_name)
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page.max(1);
        self
    }

    /// Groups active when normalizing the response of `operation`.
    pub fn read_groups(&self, operation: Operation) -> Vec<&'static str> {
        let mut groups = self.normalization_groups.clone();
        if operation == Operation::ItemGet {
            groups.extend(self.item_get_groups.iter().copied());
        }
        groups
    }

    pub fn read_fields(&self, operation: Operation) -> Vec<&'static str> {
        self.groups.fields(&self.read_groups(operation))
    }

    pub fn write_fields(&self) -> Vec<&'static str> {
        self.groups.fields(&self.denormalization_groups)
    }
}

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

pub fn cheese_listing_descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        short_name: "cheeses",
        collection_path: "/api/cheeses",
        operations: vec![
            Operation::CollectionGet,
            Operation::CollectionPost,
            Operation::ItemGet,
            Operation::ItemPut,
        ],
        normalization_groups: vec!["cheese_listing:read"],
        denormalization_groups: vec!["cheese_listing:write"],
        item_get_groups: vec!["cheese_listing:item:get"],
        groups: GroupMap::new()
            .group(
                "cheese_listing:read",
                &[
                    "id",
                    "title",
                    "description",
                    "shortDescription",
                    "price",
                    "createdAtAgo",
                    "owner",
                ],
            )
            .group(
                "cheese_listing:write",
                &["title", "description", "price", "owner"],
            ),
        filters: vec![
            FilterSpec::Search {
                property: "title",
                strategy: SearchStrategy::Partial,
            },
            FilterSpec::Search {
                property: "description",
                strategy: SearchStrategy::Partial,
            },
            FilterSpec::Reference {
                property: "owner",
                target: "/api/users",
            },
            FilterSpec::Search {
                property: "owner.username",
                strategy: SearchStrategy::Partial,
            },
            FilterSpec::Boolean {
                property: "isPublished",
            },
            FilterSpec::Range { property: "price" },
            FilterSpec::Property {
                parameter: "properties",
            },
        ],
        items_per_page: DEFAULT_ITEMS_PER_PAGE,
        formats: vec![
            Format::JsonLd,
            Format::Json,
            Format::JsonHal,
            Format::Html,
            Format::Csv,
        ],
    }
}

pub fn user_descriptor() -> ResourceDescriptor {
    ResourceDescriptor {
        short_name: "User",
        collection_path: "/api/users",
        operations: vec![
            Operation::CollectionGet,
            Operation::CollectionPost,
            Operation::ItemGet,
        ],
        normalization_groups: vec!["user:read"],
        denormalization_groups: vec!["user:write"],
        item_get_groups: Vec::new(),
        groups: GroupMap::new()
            .group("user:read", &["email", "username", "cheeseListings"])
            .group("user:write", &["email", "username"])
            .group("cheese_listing:item:get", &["username"]),
        filters: vec![FilterSpec::Property {
            parameter: "properties",
        }],
        items_per_page: DEFAULT_ITEMS_PER_PAGE,
        formats: vec![Format::JsonLd, Format::Json, Format::JsonHal],
    }
}
