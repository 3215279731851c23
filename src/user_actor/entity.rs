//! [`ActorEntity`] implementation for [`User`].

use super::UserError;
use crate::filter::ResourceQuery;
use crate::model::{user_rules, User, UserCreate, UserId};
use async_trait::async_trait;
use resource_actor::ActorEntity;

impl User {
    fn validate(&self) -> Result<(), UserError> {
        user_rules()
            .validate(self)
            .into_result()
            .map_err(UserError::Validation)
    }
}

#[async_trait]
impl ActorEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = ();
    type Query = ResourceQuery;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = UserError;

    fn from_create_params(id: UserId, params: UserCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            email: params.email,
            username: params.username,
        })
    }

    fn matches(&self, query: &ResourceQuery) -> bool {
        query.matches(self)
    }

    async fn on_create(&mut self, _ctx: &()) -> Result<(), Self::Error> {
        self.validate()
    }

    /// Users are write-once: create, list and retrieve only.
    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Err(UserError::ReadOnly(self.id.to_string()))
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
