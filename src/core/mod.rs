pub mod news_insert;
pub mod pagination;
pub mod query;
pub mod region;
pub mod subsidy_search;

pub use crate::domain::model::{DetailItem, Region, Subsidy};
pub use crate::domain::ports::{ConfigProvider, NewsStore, Storage, SubsidyStore};
pub use crate::utils::error::Result;
