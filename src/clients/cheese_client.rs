use crate::cheese_actor::CheeseListingError;
use crate::model::{
    CheeseListing, CheeseListingAction, CheeseListingCreate, CheeseListingId, CheeseListingUpdate,
};
use async_trait::async_trait;
use resource_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the CheeseListing actor.
#[derive(Clone)]
pub struct CheeseClient {
    inner: ResourceClient<CheeseListing>,
}

impl CheeseClient {
    pub fn new(inner: ResourceClient<CheeseListing>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<CheeseListing> for CheeseClient {
    type Error = CheeseListingError;

    fn inner(&self) -> &ResourceClient<CheeseListing> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => CheeseListingError::NotFound(id),
            other => other
                .into_entity_error::<CheeseListingError>()
                .unwrap_or_else(|e| CheeseListingError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl CheeseClient {
    #[instrument(skip(self))]
    pub async fn create_listing(
        &self,
        params: CheeseListingCreate,
    ) -> Result<CheeseListingId, CheeseListingError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Replaces the fields set in `update` and returns the stored result.
    #[instrument(skip(self))]
    pub async fn update_listing(
        &self,
        id: CheeseListingId,
        update: CheeseListingUpdate,
    ) -> Result<CheeseListing, CheeseListingError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn publish(&self, id: CheeseListingId) -> Result<bool, CheeseListingError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, CheeseListingAction::Publish)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn unpublish(&self, id: CheeseListingId) -> Result<bool, CheeseListingError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, CheeseListingAction::Unpublish)
            .await
            .map_err(Self::map_error)
    }
}
