use crate::core::query::{SubsidyFilter, SubsidyQuery};
use crate::domain::model::Subsidy;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

/// 小型鍵值儲存 (地區選擇的持久化)
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn backend_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn subsidies_table(&self) -> &str;
    fn news_table(&self) -> &str;
    fn admin_passphrase(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}

#[async_trait]
pub trait SubsidyStore: Send + Sync {
    /// 依篩選、排序、範圍取出一頁資料
    async fn fetch_rows(&self, query: &SubsidyQuery) -> Result<Vec<Subsidy>>;

    /// 符合篩選條件的總筆數，不套用排序與範圍
    async fn count_rows(&self, filter: &SubsidyFilter) -> Result<u64>;
}

#[async_trait]
pub trait NewsStore: Send + Sync {
    /// 新增一筆新聞並回傳其識別碼
    async fn insert_news(&self, record: Map<String, Value>) -> Result<Value>;
}
