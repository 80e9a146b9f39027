use crate::core::pagination::Pagination;
use crate::core::query::{SubsidyFilter, SubsidyQuery, SubsidySearchParams};
use crate::domain::model::Subsidy;
use crate::domain::ports::SubsidyStore;
use crate::utils::error::{ApiError, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub data: Vec<Subsidy>,
    pub pagination: Pagination,
    pub filters: SubsidyFilter,
}

pub struct SubsidyQueryService<S: SubsidyStore + ?Sized> {
    store: Arc<S>,
    timeout: Option<Duration>,
}

impl<S: SubsidyStore + ?Sized> SubsidyQueryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// 整個搜尋 (列查詢與計數查詢) 的時間上限
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn search(&self, params: &SubsidySearchParams) -> Result<SearchResponse> {
        let filter = SubsidyFilter::from_params(params);
        let page = params.page_request();
        let query = SubsidyQuery::new(filter.clone(), page);

        tracing::debug!(
            "Searching subsidies: filters={:?}, page={}, limit={}",
            filter,
            page.page(),
            page.limit()
        );

        // 兩個查詢並行送出，兩者都完成才組合回應
        let both = async {
            tokio::try_join!(
                self.store.fetch_rows(&query),
                self.store.count_rows(&filter)
            )
        };

        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, both).await.map_err(|_| {
                ApiError::QueryError {
                    message: format!("subsidy search timed out after {:?}", limit),
                }
            })?,
            None => both.await,
        };

        let (mut rows, total_count) = joined.map_err(|e| {
            tracing::error!("❌ Subsidy query failed: {}", e);
            e.into_query_failure()
        })?;

        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        if rows.len() > limit {
            tracing::warn!(
                "Store returned {} rows for a page of {}, truncating",
                rows.len(),
                limit
            );
            rows.truncate(limit);
        }

        let pagination = Pagination::compute(page, total_count);
        tracing::info!(
            "✅ Subsidy search returned {} of {} rows (page {}/{})",
            rows.len(),
            total_count,
            pagination.current_page,
            pagination.total_pages
        );

        Ok(SearchResponse {
            data: rows,
            pagination,
            filters: filter,
        })
    }
}
