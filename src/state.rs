use std::sync::Arc;
use std::time::Duration;

use crate::adapters::rest_store::PostgrestStore;
use crate::core::news_insert::NewsInsertService;
use crate::core::subsidy_search::SubsidyQueryService;
use crate::core::{ConfigProvider, NewsStore, SubsidyStore};

pub struct AppState {
    pub subsidies: SubsidyQueryService<dyn SubsidyStore>,
    pub news: NewsInsertService<dyn NewsStore>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, passphrase: &str, timeout: Option<Duration>) -> Arc<Self>
    where
        S: SubsidyStore + NewsStore + 'static,
    {
        let subsidy_store: Arc<dyn SubsidyStore> = store.clone();
        let news_store: Arc<dyn NewsStore> = store;

        Arc::new(Self {
            subsidies: SubsidyQueryService::new(subsidy_store).with_timeout(timeout),
            news: NewsInsertService::new(news_store, passphrase),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Arc<Self> {
        let store = Arc::new(PostgrestStore::from_config(config));
        tracing::info!(
            "Using backend {} (tables: {}, {})",
            config.backend_url(),
            config.subsidies_table(),
            config.news_table()
        );

        Self::new(store, config.admin_passphrase(), config.request_timeout())
    }
}
