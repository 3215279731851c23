//! # HTTP API
//!
//! The router is generated from the [`ResourceDescriptor`]s: every declared operation of a
//! resource is mounted on its collection or item path. Handlers talk to the stores through
//! the clients held in [`AppState`].
//!
//! ```text
//! GET  /api/cheeses        list (filters, pagination)
//! POST /api/cheeses        create
//! GET  /api/cheeses/{id}   retrieve, owner embedded
//! PUT  /api/cheeses/{id}   replace
//! GET  /api/users          list
//! POST /api/users          create
//! GET  /api/users/{id}     retrieve
//! ```

pub mod descriptor;
pub mod encoder;
pub mod error;
pub mod format;
pub mod handlers;
pub mod normalizer;
pub mod query;

use crate::clients::{CheeseClient, UserClient};
use crate::lifecycle::CheeseSystem;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::MethodRouter;
use axum::Router;
use chrono::{DateTime, Utc};
use descriptor::{cheese_listing_descriptor, user_descriptor, Operation, ResourceDescriptor};
use std::sync::Arc;
use tracing::{info, warn};

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub cheeses: CheeseClient,
    pub users: UserClient,
    pub listing_resource: Arc<ResourceDescriptor>,
    pub user_resource: Arc<ResourceDescriptor>,
    /// Source of "now" for relative ages.
    pub clock: fn() -> DateTime<Utc>,
}

impl AppState {
    pub fn new(cheeses: CheeseClient, users: UserClient, items_per_page: usize) -> Self {
        Self {
            cheeses,
            users,
            listing_resource: Arc::new(
                cheese_listing_descriptor().with_items_per_page(items_per_page),
            ),
            user_resource: Arc::new(user_descriptor().with_items_per_page(items_per_page)),
            clock: Utc::now,
        }
    }

    /// State backed by the stores of `system`.
    pub fn from_system(system: &CheeseSystem, items_per_page: usize) -> Self {
        Self::new(
            system.cheese_client.clone(),
            system.user_client.clone(),
            items_per_page,
        )
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }
}

fn cheese_routes(resource: &ResourceDescriptor) -> Router<AppState> {
    let mut collection: MethodRouter<AppState> = MethodRouter::new();
    let mut item: MethodRouter<AppState> = MethodRouter::new();
    for operation in &resource.operations {
        match operation {
            Operation::CollectionGet => collection = collection.get(handlers::list_cheeses),
            Operation::CollectionPost => collection = collection.post(handlers::create_cheese),
            Operation::ItemGet => item = item.get(handlers::get_cheese),
            Operation::ItemPut => item = item.put(handlers::put_cheese),
        }
    }
    mount(resource, collection, item)
}

fn user_routes(resource: &ResourceDescriptor) -> Router<AppState> {
    let mut collection: MethodRouter<AppState> = MethodRouter::new();
    let mut item: MethodRouter<AppState> = MethodRouter::new();
    for operation in &resource.operations {
        match operation {
            Operation::CollectionGet => collection = collection.get(handlers::list_users),
            Operation::CollectionPost => collection = collection.post(handlers::create_user),
            Operation::ItemGet => item = item.get(handlers::get_user),
            Operation::ItemPut => warn!(resource = resource.short_name, "PUT has no handler"),
        }
    }
    mount(resource, collection, item)
}

fn mount(
    resource: &ResourceDescriptor,
    collection: MethodRouter<AppState>,
    item: MethodRouter<AppState>,
) -> Router<AppState> {
    let mut router = Router::new();
    if resource.operations.iter().any(|op| !op.is_item()) {
        router = router.route(resource.collection_path, collection);
    }
    if resource.operations.iter().any(Operation::is_item) {
        router = router.route(&resource.item_path(), item);
    }
    router
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    info!(%method, %uri, status = response.status().as_u16(), "Handled");
    response
}

/// Builds the application router for `state`.
pub fn build_router(state: AppState) -> Router {
    let listing = state.listing_resource.clone();
    let user = state.user_resource.clone();
    Router::new()
        .merge(cheese_routes(&listing))
        .merge(user_routes(&user))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
