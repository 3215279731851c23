//! # Resource Actor
//!
//! Building blocks for type-safe, in-memory resource stores. Every resource type (cheese
//! listings, users, …) is owned by one [`ResourceActor`] running in its own Tokio task and
//! reached through a cloneable [`ResourceClient`]. The actor processes requests one at a
//! time, so entity state needs no locks.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain model, validation hooks, list predicate
//! 2. **Runtime Layer** ([`ResourceActor`]) - message loop, id generation, store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed requests
//!
//! Supported requests are create, get, update, list (filtered and paginated, see
//! [`PageRequest`]) and custom actions.
//!
//! ## Writes are all-or-nothing
//!
//! `on_create` runs before the entity is inserted; `on_update` runs on a copy that only
//! replaces the stored entity when the hook succeeds. A rejected write leaves the store as
//! it was.
//!
//! ## Context Injection
//!
//! Dependencies are injected when the actor is started (`actor.run(context)`), not when it
//! is created. A listing actor can therefore be handed the user client after both actors
//! exist:
//!
//! ```rust,ignore
//! let (user_actor, user_client) = ResourceActor::<User>::new(32);
//! let (listing_actor, listing_client) = ResourceActor::<CheeseListing>::new(32);
//! tokio::spawn(user_actor.run(()));
//! tokio::spawn(listing_actor.run(user_client.clone()));
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from a queue of expectations, which lets an actor
//! be tested against scripted dependencies.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod page;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use page::{Page, PageRequest};
