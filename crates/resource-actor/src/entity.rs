//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every stored resource (CheeseListing, User, …)
//! implements to be managed by the generic `ResourceActor`. It names the associated types
//! for identifiers, write DTOs, list queries, actions, context and errors, and provides the
//! lifecycle hooks (`on_create`, `on_update`, `handle_action`) the actor calls around every
//! write.
//!
//! # Write Semantics
//! Hooks run *before* the store is touched. A create is only inserted once `on_create`
//! succeeded, and an update is applied to a copy of the stored entity which replaces the
//! original only when `on_update` returned `Ok`. A failing hook therefore never leaves a
//! partially written entity behind.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] defaults to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// This trait is `#[async_trait]` so hooks can await other actors (e.g. resolving the owner
/// of a listing). The `Context` type is injected into every hook when the actor is started,
/// which allows late binding of dependencies (passing clients to `run()` instead of `new()`).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation and ordered so that
    /// listings come back in insertion order.
    type Id: Ord + Clone + Send + Sync + Display + Debug + From<u32> + 'static;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug + 'static;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug + 'static;

    /// Criteria used to select entities in a `List` request.
    type Query: Send + Sync + Debug + 'static;

    /// Enum representing resource-specific operations (e.g., `Publish`).
    type Action: Send + Sync + Debug + 'static;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug + 'static;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync + 'static;

    /// The error type for this entity.
    ///
    /// One error enum per actor rather than one per message: clients match on a single
    /// `CheeseListingError`, at the price of every operation sharing the same variants.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Returns true when this entity is selected by `query`.
    fn matches(&self, query: &Self::Query) -> bool;

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is constructed and before it is stored.
    /// Use this hook for validation or lookups in other actors.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called on a copy of the stored entity when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
