//! # Cheese API
//!
//! > **Cheese listings over REST, in JSON-LD, JSON, HAL, HTML and CSV.**
//!
//! Sellers (users) publish cheese listings; buyers browse them with filters. Each listing
//! carries derived read-only fields (a short description and a human relative age), and
//! every write is validated, including the owner it points to.
//!
//! ## 🏗️ Layers
//!
//! ### 1. Domain ([`model`], [`validation`], [`filter`])
//! Plain records, the pure derived-field functions in [`model::derived`], the rule lists
//! checked before every write, and the query criteria used by collection filters.
//!
//! ### 2. Stores ([`cheese_actor`], [`user_actor`])
//! Each resource lives in its own [`resource_actor::ResourceActor`] task. The listing
//! store is started with a [`clients::UserClient`] so its hooks can resolve and validate
//! owners. Writes are all-or-nothing: a rejected create is never stored and a rejected
//! update leaves the listing as it was.
//!
//! ### 3. Clients ([`clients`])
//! Typed wrappers that turn store errors back into `CheeseListingError` / `UserError`.
//!
//! ### 4. HTTP ([`api`])
//! Routes, serialization groups, filters, page size and formats are declared once per
//! resource in a [`api::descriptor::ResourceDescriptor`]; the router, the query parser and
//! the normalizer read everything from there.
//!
//! ### 5. Runtime ([`lifecycle`], [`config`])
//! [`lifecycle::CheeseSystem`] spawns and shuts down the stores; [`config::ServerConfig`]
//! is the command line of the `cheese-api` binary.
//!
//! ## 🚀 Example
//!
//! ```rust,no_run
//! use cheese_api::api::{build_router, AppState};
//! use cheese_api::lifecycle::CheeseSystem;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let system = CheeseSystem::new();
//!     let app = build_router(AppState::from_system(&system, 10));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await
//! }
//! ```

pub mod api;
pub mod cheese_actor;
pub mod clients;
pub mod config;
pub mod filter;
pub mod lifecycle;
pub mod model;
pub mod user_actor;
pub mod validation;
