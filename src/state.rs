use std::sync::Arc;

use super::{config::Config, store::RedisStore};

pub struct AppState {
    pub config: Config,
    pub store: RedisStore,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store = RedisStore::connect(&config)
            .await
            .expect("Store unreachable at startup");

        Arc::new(Self { config, store })
    }
}
