//! Query-string parsing for collection and item requests.
//!
//! Parameters not declared by the resource's [`FilterSpec`]s are ignored, and so are
//! declared parameters with malformed values (`isPublished=maybe`, `price[gt]=cheap`).

use super::descriptor::{FilterSpec, RANGE_OPERATORS};
use crate::filter::{Criterion, RangeBound};

/// A criterion on a related resource, e.g. `owner.username=ry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationCriterion {
    pub relation: String,
    pub criterion: Criterion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// 1-based.
    pub page: usize,
    pub criteria: Vec<Criterion>,
    pub relations: Vec<RelationCriterion>,
    /// Fields requested through the property filter; `None` keeps every readable field.
    pub properties: Option<Vec<String>>,
}

/// Decodes a raw query string into key/value pairs. Undecodable input yields no pairs.
pub fn decode_pairs(raw: Option<&str>) -> Vec<(String, String)> {
    raw.and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default()
}

fn values<'a>(pairs: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    let list = format!("{name}[]");
    pairs
        .iter()
        .filter(|(key, _)| key == name || *key == list)
        .map(|(_, value)| value.as_str())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_bound(operator: &str, value: &str) -> Option<RangeBound> {
    let number = |v: &str| v.trim().parse::<i64>().ok();
    match operator {
        "between" => {
            let (low, high) = value.split_once("..")?;
            Some(RangeBound::Between(number(low)?, number(high)?))
        }
        "gt" => number(value).map(RangeBound::Gt),
        "gte" => number(value).map(RangeBound::Gte),
        "lt" => number(value).map(RangeBound::Lt),
        "lte" => number(value).map(RangeBound::Lte),
        _ => None,
    }
}

/// Id of `value` when it is an IRI under `target` (`/api/users/3`) or a bare id (`3`).
fn reference_id(value: &str, target: &str) -> Option<String> {
    let raw = value
        .strip_prefix(target)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(value);
    raw.parse::<u32>().ok().map(|id| id.to_string())
}

pub fn parse_params(pairs: &[(String, String)], filters: &[FilterSpec]) -> RequestParams {
    let page = pairs
        .iter()
        .rev()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);

    let mut criteria = Vec::new();
    let mut relations = Vec::new();
    let mut properties = None;

    for filter in filters {
        match *filter {
            FilterSpec::Search { property, strategy } => {
                let wanted: Vec<String> = values(pairs, property)
                    .into_iter()
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                if wanted.is_empty() {
                    continue;
                }
                let build = |property: &str| Criterion::Search {
                    property: property.to_string(),
                    strategy,
                    values: wanted.clone(),
                };
                match property.split_once('.') {
                    Some((relation, nested)) => relations.push(RelationCriterion {
                        relation: relation.to_string(),
                        criterion: build(nested),
                    }),
                    None => criteria.push(build(property)),
                }
            }
            FilterSpec::Reference { property, target } => {
                let given: Vec<&str> = values(pairs, property)
                    .into_iter()
                    .filter(|v| !v.is_empty())
                    .collect();
                if given.is_empty() {
                    continue;
                }
                // Unresolvable references leave no ids, and an empty id list matches nothing.
                let ids: Vec<String> = given
                    .into_iter()
                    .filter_map(|v| reference_id(v, target))
                    .collect();
                criteria.push(Criterion::exact(property, ids));
            }
            FilterSpec::Boolean { property } => {
                if let Some(value) = values(pairs, property)
                    .into_iter()
                    .rev()
                    .find_map(parse_bool)
                {
                    criteria.push(Criterion::boolean(property, value));
                }
            }
            FilterSpec::Range { property } => {
                for operator in RANGE_OPERATORS {
                    let key = format!("{property}[{operator}]");
                    let bound = pairs
                        .iter()
                        .filter(|(k, _)| *k == key)
                        .find_map(|(_, v)| parse_bound(operator, v));
                    if let Some(bound) = bound {
                        criteria.push(Criterion::range(property, bound));
                    }
                }
            }
            FilterSpec::Property { parameter } => {
                let fields = values(pairs, parameter);
                if !fields.is_empty() {
                    properties = Some(fields.into_iter().map(str::to_string).collect());
                }
            }
        }
    }

    RequestParams {
        page,
        criteria,
        relations,
        properties,
    }
}
