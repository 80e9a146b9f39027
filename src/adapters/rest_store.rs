use crate::core::query::{SubsidyFilter, SubsidyQuery};
use crate::core::{ConfigProvider, NewsStore, Subsidy, SubsidyStore};
use crate::utils::error::{ApiError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};

/// 託管後端的 PostgREST 介面 (`{backend_url}/rest/v1/{table}`)
#[derive(Debug, Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    api_key: String,
    subsidies_table: String,
    news_table: String,
}

impl PostgrestStore {
    pub fn new(
        backend_url: &str,
        api_key: impl Into<String>,
        subsidies_table: impl Into<String>,
        news_table: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/rest/v1", backend_url.trim_end_matches('/')),
            api_key: api_key.into(),
            subsidies_table: subsidies_table.into(),
            news_table: news_table.into(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(
            config.backend_url(),
            config.api_key(),
            config.subsidies_table(),
            config.news_table(),
        )
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&self.api_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", self.api_key))?,
        );
        Ok(request.headers(headers))
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| ApiError::ConfigError {
        message: format!("API key is not a valid header value: {}", e),
    })
}

/// 非 2xx 回應轉為 `StoreError`，盡量取出後端的 `message`
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    let message = if detail.is_empty() {
        format!("backend responded with {}", status)
    } else {
        format!("backend responded with {}: {}", status, detail)
    };
    Err(ApiError::StoreError { message })
}

/// `Content-Range: 0-19/125` 或 `*/0` 的總筆數
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[async_trait]
impl SubsidyStore for PostgrestStore {
    async fn fetch_rows(&self, query: &SubsidyQuery) -> Result<Vec<Subsidy>> {
        let url = self.table_url(&self.subsidies_table);
        let params = query.to_postgrest_params();
        tracing::debug!("GET {} {:?}", url, params);

        let request = self.authorized(self.client.get(&url).query(&params))?;
        let response = ensure_success(request.send().await?).await?;
        let rows: Vec<Subsidy> = response.json().await?;
        Ok(rows)
    }

    async fn count_rows(&self, filter: &SubsidyFilter) -> Result<u64> {
        let url = self.table_url(&self.subsidies_table);
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(filter.to_postgrest_params());
        tracing::debug!("HEAD {} {:?}", url, params);

        let request = self.authorized(
            self.client
                .head(&url)
                .query(&params)
                .header("Prefer", "count=exact"),
        )?;
        let response = ensure_success(request.send().await?).await?;

        let header = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::StoreError {
                message: "count response is missing Content-Range".to_string(),
            })?;

        parse_content_range_total(header).ok_or_else(|| ApiError::StoreError {
            message: format!("unexpected Content-Range: {}", header),
        })
    }
}

#[async_trait]
impl NewsStore for PostgrestStore {
    async fn insert_news(&self, record: Map<String, Value>) -> Result<Value> {
        let url = self.table_url(&self.news_table);
        tracing::debug!("POST {}", url);

        let request = self.authorized(
            self.client
                .post(&url)
                .header("Prefer", "return=representation")
                .json(&record),
        )?;
        let response = ensure_success(request.send().await?).await?;

        let inserted: Vec<Map<String, Value>> = response.json().await?;
        inserted
            .into_iter()
            .next()
            .and_then(|row| row.get("id").cloned())
            .ok_or_else(|| ApiError::StoreError {
                message: "insert returned no row id".to_string(),
            })
    }
}
