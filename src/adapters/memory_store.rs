use crate::core::query::{SubsidyFilter, SubsidyQuery};
use crate::core::{NewsStore, Subsidy, SubsidyStore};
use crate::utils::error::{ApiError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::Path;
use tokio::sync::RwLock;

/// 記憶體中的資料集，供本機 fixture 模式與測試使用。
///
/// 查詢語意與 PostgREST 端相同：`SubsidyQuery::apply` 評估同一份查詢計畫。
#[derive(Default)]
pub struct InMemoryStore {
    subsidies: RwLock<Vec<Subsidy>>,
    news: RwLock<Vec<Map<String, Value>>>,
    failure: Option<String>,
}

impl InMemoryStore {
    pub fn with_subsidies(subsidies: Vec<Subsidy>) -> Self {
        Self {
            subsidies: RwLock::new(subsidies),
            ..Default::default()
        }
    }

    /// 每個操作都回傳 `StoreError` 的儲存層
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// 從 JSON 陣列檔案載入補助金資料
    pub async fn from_fixture_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read(path.as_ref()).await?;
        let subsidies: Vec<Subsidy> = serde_json::from_slice(&content)?;
        tracing::info!(
            "📁 Loaded {} subsidies from {}",
            subsidies.len(),
            path.as_ref().display()
        );
        Ok(Self::with_subsidies(subsidies))
    }

    pub async fn news(&self) -> Vec<Map<String, Value>> {
        self.news.read().await.clone()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(ApiError::StoreError {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SubsidyStore for InMemoryStore {
    async fn fetch_rows(&self, query: &SubsidyQuery) -> Result<Vec<Subsidy>> {
        self.check()?;
        let subsidies = self.subsidies.read().await;
        Ok(query.apply(subsidies.iter()))
    }

    async fn count_rows(&self, filter: &SubsidyFilter) -> Result<u64> {
        self.check()?;
        let subsidies = self.subsidies.read().await;
        Ok(subsidies.iter().filter(|s| filter.matches(s)).count() as u64)
    }
}

#[async_trait]
impl NewsStore for InMemoryStore {
    async fn insert_news(&self, mut record: Map<String, Value>) -> Result<Value> {
        self.check()?;
        let mut news = self.news.write().await;
        let id = Value::from(news.len() as u64 + 1);
        record.insert("id".to_string(), id.clone());
        news.push(record);
        Ok(id)
    }
}
