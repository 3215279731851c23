//! Startup and shutdown of the stores.

use crate::clients::{CheeseClient, UserClient};
use tracing::{error, info};

/// Default capacity of every store's request channel.
pub const DEFAULT_BUFFER_SIZE: usize = 32;

/// Owns the running stores and hands out their clients.
///
/// The user store has no dependencies. The listing store is started with a clone of the
/// user client so its hooks can resolve owners.
///
/// ```ignore
/// let system = CheeseSystem::new();
/// let owner = system.user_client.create_user(params).await?;
/// // ...
/// system.shutdown().await?;
/// ```
pub struct CheeseSystem {
    pub cheese_client: CheeseClient,
    pub user_client: UserClient,
    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Default for CheeseSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl CheeseSystem {
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Spawns both stores. Must be called inside a Tokio runtime.
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        let (user_actor, user_client) = crate::user_actor::new(buffer_size);
        let (cheese_actor, cheese_client) = crate::cheese_actor::new(buffer_size);

        let user_handle = tokio::spawn(user_actor.run(()));
        let cheese_handle = tokio::spawn(cheese_actor.run(user_client.clone()));

        info!(buffer_size, "Stores started");
        Self {
            cheese_client,
            user_client,
            handles: vec![user_handle, cheese_handle],
        }
    }

    /// Drops the clients and waits for every store to drain.
    ///
    /// Clients cloned elsewhere (e.g. into HTTP state) must be dropped first, otherwise the
    /// stores keep running and this waits for them.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        // The listing store holds a user client, so it has to finish before the user
        // store can see its channel close.
        drop(self.cheese_client);
        drop(self.user_client);

        for handle in self.handles.into_iter().rev() {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
