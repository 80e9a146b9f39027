pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod state;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{lambda::LambdaConfig, toml_config::TomlConfig};

pub use adapters::{local_storage::LocalStorage, memory_store::InMemoryStore, rest_store::PostgrestStore};
pub use core::{news_insert::NewsInsertService, region::RegionContext, subsidy_search::SubsidyQueryService};
pub use state::AppState;
pub use utils::error::{ApiError, Result};
