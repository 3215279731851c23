//! # Collection Filters
//!
//! A [`ResourceQuery`] is the `Query` type of every store: a conjunction of
//! [`Criterion`]s evaluated against entities through the [`Filterable`] trait. The HTTP
//! layer builds queries from query-string parameters; tests build them directly.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Case-insensitive substring.
    Partial,
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Lt(i64),
    Lte(i64),
    Gt(i64),
    Gte(i64),
    /// Inclusive on both ends.
    Between(i64, i64),
}

impl RangeBound {
    pub fn contains(&self, value: i64) -> bool {
        match *self {
            RangeBound::Lt(n) => value < n,
            RangeBound::Lte(n) => value <= n,
            RangeBound::Gt(n) => value > n,
            RangeBound::Gte(n) => value >= n,
            RangeBound::Between(low, high) => low <= value && value <= high,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Matches when the property matches any of `values`. An empty list matches nothing.
    Search {
        property: String,
        strategy: SearchStrategy,
        values: Vec<String>,
    },
    Boolean {
        property: String,
        value: bool,
    },
    Range {
        property: String,
        bound: RangeBound,
    },
}

impl Criterion {
    pub fn partial(property: impl Into<String>, value: impl Into<String>) -> Self {
        Criterion::Search {
            property: property.into(),
            strategy: SearchStrategy::Partial,
            values: vec![value.into()],
        }
    }

    pub fn exact<I, S>(property: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Criterion::Search {
            property: property.into(),
            strategy: SearchStrategy::Exact,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn boolean(property: impl Into<String>, value: bool) -> Self {
        Criterion::Boolean {
            property: property.into(),
            value,
        }
    }

    pub fn range(property: impl Into<String>, bound: RangeBound) -> Self {
        Criterion::Range {
            property: property.into(),
            bound,
        }
    }

    /// A null property never matches.
    pub fn matches<T: Filterable + ?Sized>(&self, entity: &T) -> bool {
        match self {
            Criterion::Search {
                property,
                strategy,
                values,
            } => entity.text_property(property).is_some_and(|actual| {
                values.iter().any(|wanted| match strategy {
                    SearchStrategy::Exact => actual == *wanted,
                    SearchStrategy::Partial => actual
                        .to_lowercase()
                        .contains(&wanted.to_lowercase()),
                })
            }),
            Criterion::Boolean { property, value } => {
                entity.bool_property(property) == Some(*value)
            }
            Criterion::Range { property, bound } => entity
                .int_property(property)
                .is_some_and(|actual| bound.contains(actual)),
        }
    }
}

/// Property access used by filters. Unknown names return `None`.
pub trait Filterable {
    fn text_property(&self, name: &str) -> Option<String>;

    fn bool_property(&self, _name: &str) -> Option<bool> {
        None
    }

    fn int_property(&self, _name: &str) -> Option<i64> {
        None
    }
}

/// All criteria must match. The empty query selects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    criteria: Vec<Criterion>,
}

impl ResourceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn push(&mut self, criterion: Criterion) {
        self.criteria.push(criterion);
    }

    pub fn matches<T: Filterable + ?Sized>(&self, entity: &T) -> bool {
        self.criteria.iter().all(|c| c.matches(entity))
    }
}

impl fmt::Display for ResourceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} criteria", self.criteria.len())
    }
}
