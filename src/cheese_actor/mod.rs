//! CheeseListing store. Depends on the user store for owner resolution.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CheeseClient;
use crate::model::CheeseListing;
use resource_actor::ResourceActor;

/// Creates a new CheeseListing actor and its client.
///
/// The actor needs a [`UserClient`](crate::clients::UserClient) as context when it is run.
pub fn new(buffer_size: usize) -> (ResourceActor<CheeseListing>, CheeseClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, CheeseClient::new(generic_client))
}
