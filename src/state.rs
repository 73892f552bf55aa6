use std::{process, sync::Arc};

use tracing::error;

use crate::{
    config::Config,
    database::{MenuStore, MongoMenuStore},
    menu::seed_if_empty,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn MenuStore>,
}

impl AppState {
    /// Connects to the store and seeds an empty one. The service never runs
    /// without a backing store, so either failure here ends the process.
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store = match MongoMenuStore::connect(&config.mongodb_uri).await {
            Ok(store) => Arc::new(store),
            Err(err) => {
                error!("MongoDB connection failed: {err}");
                process::exit(1);
            }
        };

        if let Err(err) = seed_if_empty(store.as_ref()).await {
            error!("Menu seeding failed: {err}");
            process::exit(1);
        }

        Arc::new(Self { config, store })
    }

    pub fn with_store(config: Config, store: Arc<dyn MenuStore>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
