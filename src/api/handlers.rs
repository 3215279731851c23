//! Axum handlers for the cheese listing and user resources.
//!
//! Each handler negotiates the format first, so an unacceptable `Accept` header is
//! answered with 406 before any store is touched.

use super::descriptor::{Operation, ResourceDescriptor};
use super::encoder::{encode_collection, encode_item, CollectionView};
use super::error::ApiError;
use super::format::{negotiate, Format};
use super::normalizer::{normalize_listing, normalize_user, NormalizationContext};
use super::query::{decode_pairs, parse_params, RequestParams};
use super::AppState;
use crate::clients::ActorClient;
use crate::filter::{Criterion, ResourceQuery};
use crate::model::{
    CheeseListing, CheeseListingCreate, CheeseListingId, CheeseListingUpdate, User, UserCreate,
    UserId,
};
use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use resource_actor::PageRequest;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Write-group view of a listing body. `description` is raw text; `owner` is an IRI.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CheeseListingInput {
    title: Option<String>,
    description: Option<String>,
    price: Option<i64>,
    owner: Option<String>,
}

impl CheeseListingInput {
    fn owner_id(&self) -> Result<Option<UserId>, ApiError> {
        self.owner
            .as_deref()
            .map(|iri| {
                UserId::parse(iri)
                    .ok_or_else(|| ApiError::BadRequest(format!("Invalid IRI \"{iri}\".")))
            })
            .transpose()
    }
}

fn negotiate_format(
    headers: &HeaderMap,
    descriptor: &ResourceDescriptor,
) -> Result<Format, ApiError> {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    negotiate(accept, &descriptor.formats).ok_or_else(|| {
        let supported: Vec<&str> = descriptor.formats.iter().map(Format::mime_type).collect();
        ApiError::NotAcceptable(format!(
            "Requested format \"{}\" is not supported. Supported MIME types are \"{}\".",
            accept.unwrap_or_default(),
            supported.join("\", \"")
        ))
    })
}

fn respond(format: Format, status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, format.content_type())], body).into_response()
}

/// Ids that are not numbers cannot exist.
fn parse_id(raw: &str) -> Result<u32, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Parses a JSON object body, keeping only the writable, non-null fields.
fn decode_body<T: DeserializeOwned>(body: &[u8], writable: &[&str]) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Syntax error: {e}")))?;
    let Value::Object(object) = value else {
        return Err(ApiError::BadRequest("The input data is misformatted.".into()));
    };
    let fields: Map<String, Value> = object
        .into_iter()
        .filter(|(key, value)| writable.contains(&key.as_str()) && !value.is_null())
        .collect();
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Owners of `listings`, fetched only when the response embeds them.
async fn embedded_owners(
    state: &AppState,
    listings: &[CheeseListing],
    ctx: &NormalizationContext,
) -> Result<HashMap<UserId, User>, ApiError> {
    if ctx.embedded_fields.is_empty() || !ctx.fields.contains(&"owner") {
        return Ok(HashMap::new());
    }
    let ids: Vec<String> = listings
        .iter()
        .filter_map(|l| l.owner())
        .map(|id| id.to_string())
        .collect();
    let owners = state
        .users
        .list(ResourceQuery::new().with(Criterion::exact("id", ids)), PageRequest::all())
        .await?;
    Ok(owners.items.into_iter().map(|u| (u.id, u)).collect())
}

/// Listings owned by each of `users`, fetched only when the response shows them.
async fn owned_listings(
    state: &AppState,
    users: &[User],
    ctx: &NormalizationContext,
) -> Result<HashMap<UserId, Vec<CheeseListingId>>, ApiError> {
    if !ctx.fields.contains(&"cheeseListings") {
        return Ok(HashMap::new());
    }
    let ids: Vec<String> = users.iter().map(|u| u.id.to_string()).collect();
    let listings = state
        .cheeses
        .list(
            ResourceQuery::new().with(Criterion::exact("owner", ids)),
            PageRequest::all(),
        )
        .await?;
    let mut owned: HashMap<UserId, Vec<CheeseListingId>> = HashMap::new();
    for listing in &listings.items {
        if let Some(owner) = listing.owner() {
            owned.entry(owner).or_default().push(listing.id());
        }
    }
    Ok(owned)
}

/// Turns criteria on related resources into criteria on the listing itself.
async fn listing_query(state: &AppState, params: RequestParams) -> Result<ResourceQuery, ApiError> {
    let mut query = ResourceQuery::new();
    for criterion in params.criteria {
        query.push(criterion);
    }
    for relation in params.relations {
        match relation.relation.as_str() {
            "owner" => {
                let owners = state
                    .users
                    .list(
                        ResourceQuery::new().with(relation.criterion),
                        PageRequest::all(),
                    )
                    .await?;
                let ids = owners.items.iter().map(|u| u.id.to_string());
                query.push(Criterion::exact("owner", ids));
            }
            other => debug!(relation = other, "Ignoring filter on unknown relation"),
        }
    }
    Ok(query)
}

fn render_listing(
    state: &AppState,
    format: Format,
    status: StatusCode,
    listing: &CheeseListing,
    owners: &HashMap<UserId, User>,
    ctx: &NormalizationContext,
) -> Result<Response, ApiError> {
    let descriptor = &state.listing_resource;
    let owner = listing.owner().and_then(|id| owners.get(&id));
    let doc = normalize_listing(listing, owner, descriptor, ctx);
    Ok(respond(format, status, encode_item(format, descriptor, &doc)?))
}

// --- Cheese listings ---

pub async fn list_cheeses(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
    let descriptor = state.listing_resource.clone();
    let format = negotiate_format(&headers, &descriptor)?;
    let pairs = decode_pairs(raw.as_deref());
    let params = parse_params(&pairs, &descriptor.filters);
    let page_request = PageRequest::new(params.page, descriptor.items_per_page);
    let ctx = NormalizationContext::new(
        &descriptor,
        &state.user_resource,
        Operation::CollectionGet,
        params.properties.as_deref(),
        (state.clock)(),
    );

    let query = listing_query(&state, params).await?;
    debug!(%query, page = page_request.page, "Listing cheeses");
    let page = state.cheeses.list(query, page_request).await?;
    let owners = embedded_owners(&state, &page.items, &ctx).await?;

    let members = page
        .items
        .iter()
        .map(|listing| {
            let owner = listing.owner().and_then(|id| owners.get(&id));
            normalize_listing(listing, owner, &descriptor, &ctx)
        })
        .collect();
    let view = CollectionView::new(&descriptor, &page, members, &pairs);
    Ok(respond(format, StatusCode::OK, encode_collection(format, &view)?))
}

pub async fn get_cheese(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
    let descriptor = state.listing_resource.clone();
    let format = negotiate_format(&headers, &descriptor)?;
    let id = CheeseListingId(parse_id(&id)?);
    let listing = state.cheeses.get(id).await?.ok_or(ApiError::NotFound)?;

    let params = parse_params(&decode_pairs(raw.as_deref()), &descriptor.filters);
    let ctx = NormalizationContext::new(
        &descriptor,
        &state.user_resource,
        Operation::ItemGet,
        params.properties.as_deref(),
        (state.clock)(),
    );
    let owners = embedded_owners(&state, std::slice::from_ref(&listing), &ctx).await?;
    render_listing(&state, format, StatusCode::OK, &listing, &owners, &ctx)
}

pub async fn create_cheese(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let descriptor = state.listing_resource.clone();
    let format = negotiate_format(&headers, &descriptor)?;
    let input: CheeseListingInput = decode_body(&body, &descriptor.write_fields())?;
    let owner = input.owner_id()?;

    let id = state
        .cheeses
        .create_listing(CheeseListingCreate {
            title: input.title,
            description: input.description,
            price: input.price,
            owner,
        })
        .await?;
    let listing = state.cheeses.get(id).await?.ok_or(ApiError::NotFound)?;

    let ctx = NormalizationContext::new(
        &descriptor,
        &state.user_resource,
        Operation::CollectionPost,
        None,
        (state.clock)(),
    );
    let owners = embedded_owners(&state, std::slice::from_ref(&listing), &ctx).await?;
    let mut response =
        render_listing(&state, format, StatusCode::CREATED, &listing, &owners, &ctx)?;
    if let Ok(location) = id.iri().parse::<HeaderValue>() {
        response.headers_mut().insert(header::LOCATION, location);
    }
    Ok(response)
}

pub async fn put_cheese(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let descriptor = state.listing_resource.clone();
    let format = negotiate_format(&headers, &descriptor)?;
    let id = CheeseListingId(parse_id(&id)?);
    let input: CheeseListingInput = decode_body(&body, &descriptor.write_fields())?;
    let owner = input.owner_id()?;

    let listing = state
        .cheeses
        .update_listing(
            id,
            CheeseListingUpdate {
                title: input.title,
                description: input.description,
                price: input.price,
                owner,
            },
        )
        .await?;

    let ctx = NormalizationContext::new(
        &descriptor,
        &state.user_resource,
        Operation::ItemPut,
        None,
        (state.clock)(),
    );
    let owners = embedded_owners(&state, std::slice::from_ref(&listing), &ctx).await?;
    render_listing(&state, format, StatusCode::OK, &listing, &owners, &ctx)
}

// --- Users ---

pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
    let descriptor = state.user_resource.clone();
    let format = negotiate_format(&headers, &descriptor)?;
    let pairs = decode_pairs(raw.as_deref());
    let params = parse_params(&pairs, &descriptor.filters);
    let ctx = NormalizationContext::new(
        &descriptor,
        &state.listing_resource,
        Operation::CollectionGet,
        params.properties.as_deref(),
        (state.clock)(),
    );

    let mut query = ResourceQuery::new();
    for criterion in params.criteria {
        query.push(criterion);
    }
    let page = state
        .users
        .list(query, PageRequest::new(params.page, descriptor.items_per_page))
        .await?;
    let owned = owned_listings(&state, &page.items, &ctx).await?;

    let members = page
        .items
        .iter()
        .map(|user| {
            let listings = owned.get(&user.id).map(Vec::as_slice).unwrap_or_default();
            normalize_user(user, listings, &descriptor, &ctx)
        })
        .collect();
    let view = CollectionView::new(&descriptor, &page, members, &pairs);
    Ok(respond(format, StatusCode::OK, encode_collection(format, &view)?))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Result<Response, ApiError> {
    let descriptor = state.user_resource.clone();
    let format = negotiate_format(&headers, &descriptor)?;
    let id = UserId(parse_id(&id)?);
    let user = state.users.get(id).await?.ok_or(ApiError::NotFound)?;

    let params = parse_params(&decode_pairs(raw.as_deref()), &descriptor.filters);
    let ctx = NormalizationContext::new(
        &descriptor,
        &state.listing_resource,
        Operation::ItemGet,
        params.properties.as_deref(),
        (state.clock)(),
    );
    let owned = owned_listings(&state, std::slice::from_ref(&user), &ctx).await?;
    let listings = owned.get(&user.id).map(Vec::as_slice).unwrap_or_default();
    let doc = normalize_user(&user, listings, &descriptor, &ctx);
    Ok(respond(format, StatusCode::OK, encode_item(format, &descriptor, &doc)?))
}

pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let descriptor = state.user_resource.clone();
    let format = negotiate_format(&headers, &descriptor)?;
    let params: UserCreate = decode_body(&body, &descriptor.write_fields())?;

    let id = state.users.create_user(params).await?;
    let user = state.users.get(id).await?.ok_or(ApiError::NotFound)?;

    let ctx = NormalizationContext::new(
        &descriptor,
        &state.listing_resource,
        Operation::CollectionPost,
        None,
        (state.clock)(),
    );
    // A new user owns nothing yet.
    let doc = normalize_user(&user, &[], &descriptor, &ctx);
    let mut response = respond(
        format,
        StatusCode::CREATED,
        encode_item(format, &descriptor, &doc)?,
    );
    if let Ok(location) = id.iri().parse::<HeaderValue>() {
        response.headers_mut().insert(header::LOCATION, location);
    }
    Ok(response)
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
