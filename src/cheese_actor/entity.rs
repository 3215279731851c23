//! [`ActorEntity`] implementation for [`CheeseListing`].
//!
//! Every write resolves the owner through the [`UserClient`] injected at startup. An owner
//! that does not exist is a referential error; an owner that exists but is itself invalid
//! adds its violations under `owner.`.

use super::CheeseListingError;
use crate::clients::UserClient;
use crate::filter::ResourceQuery;
use crate::model::{
    cheese_listing_rules, user_rules, CheeseListing, CheeseListingAction, CheeseListingCreate,
    CheeseListingId, CheeseListingUpdate,
};
use async_trait::async_trait;
use chrono::Utc;
use resource_actor::{ActorClient, ActorEntity};
use tracing::debug;

async fn validate(listing: &CheeseListing, users: &UserClient) -> Result<(), CheeseListingError> {
    let owner = match listing.owner() {
        Some(owner_id) => {
            let owner = users
                .get(owner_id)
                .await
                .map_err(|e| CheeseListingError::ActorCommunicationError(e.to_string()))?;
            match owner {
                Some(owner) => Some(owner),
                None => {
                    return Err(CheeseListingError::Referential(format!(
                        "Item not found for \"{}\".",
                        owner_id.iri()
                    )))
                }
            }
        }
        None => None,
    };

    let mut violations = cheese_listing_rules().validate(listing);
    if let Some(owner) = owner {
        violations.extend_nested("owner", user_rules().validate(&owner));
    }
    debug!(id = %listing.id(), violations = violations.len(), "Validated");
    violations
        .into_result()
        .map_err(CheeseListingError::Validation)
}

#[async_trait]
impl ActorEntity for CheeseListing {
    type Id = CheeseListingId;
    type Create = CheeseListingCreate;
    type Update = CheeseListingUpdate;
    type Query = ResourceQuery;
    type Action = CheeseListingAction;
    type ActionResult = bool;
    type Context = UserClient;
    type Error = CheeseListingError;

    fn from_create_params(
        id: CheeseListingId,
        params: CheeseListingCreate,
    ) -> Result<Self, Self::Error> {
        let mut listing = CheeseListing::new(id, params.title, Utc::now());
        if let Some(description) = params.description {
            listing.set_text_description(&description);
        }
        if let Some(price) = params.price {
            listing.set_price(price);
        }
        if let Some(owner) = params.owner {
            listing.set_owner(owner);
        }
        Ok(listing)
    }

    fn matches(&self, query: &ResourceQuery) -> bool {
        query.matches(self)
    }

    async fn on_create(&mut self, ctx: &UserClient) -> Result<(), Self::Error> {
        validate(self, ctx).await
    }

    async fn on_update(
        &mut self,
        update: CheeseListingUpdate,
        ctx: &UserClient,
    ) -> Result<(), Self::Error> {
        if let Some(title) = update.title {
            self.set_title(title);
        }
        if let Some(description) = update.description {
            self.set_text_description(&description);
        }
        if let Some(price) = update.price {
            self.set_price(price);
        }
        if let Some(owner) = update.owner {
            self.set_owner(owner);
        }
        validate(self, ctx).await
    }

    /// Returns the publication state after the action.
    async fn handle_action(
        &mut self,
        action: CheeseListingAction,
        _ctx: &UserClient,
    ) -> Result<bool, Self::Error> {
        match action {
            CheeseListingAction::Publish => self.set_is_published(true),
            CheeseListingAction::Unpublish => self.set_is_published(false),
        }
        Ok(self.is_published())
    }
}
