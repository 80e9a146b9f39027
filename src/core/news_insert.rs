use crate::domain::ports::NewsStore;
use crate::utils::error::{ApiError, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// 新增新聞的內容；具名欄位之外的欄位原樣寫入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// RFC 3339 或 `YYYY-MM-DD`；空白視為未指定
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `post-news` 的 request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsertNewsRequest {
    #[serde(default)]
    pub passphrase: Option<String>,
    #[serde(default)]
    pub news: NewsDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertOutcome {
    pub success: bool,
    pub id: Value,
}

pub struct NewsInsertService<S: NewsStore + ?Sized> {
    store: Arc<S>,
    passphrase: String,
}

impl<S: NewsStore + ?Sized> NewsInsertService<S> {
    pub fn new(store: Arc<S>, passphrase: impl Into<String>) -> Self {
        Self {
            store,
            passphrase: passphrase.into(),
        }
    }

    pub async fn insert(&self, request: InsertNewsRequest) -> Result<InsertOutcome> {
        self.insert_at(request, Utc::now()).await
    }

    /// 以 `now` 作為 created_at / updated_at 以及預設的 published_at
    pub async fn insert_at(
        &self,
        request: InsertNewsRequest,
        now: DateTime<Utc>,
    ) -> Result<InsertOutcome> {
        self.authorize(request.passphrase.as_deref())?;

        let draft = request.news;
        check_required(&draft)?;
        let published_at = parse_published_at(draft.published_at.as_deref())?;

        let record = stamp(draft, published_at.unwrap_or(now), now)?;
        let id = self.store.insert_news(record).await.map_err(|e| {
            tracing::error!("❌ News insert failed: {}", e);
            match e {
                ApiError::StoreError { .. } => e,
                other => ApiError::StoreError {
                    message: other.details(),
                },
            }
        })?;

        tracing::info!("✅ News inserted with id {}", id);
        Ok(InsertOutcome { success: true, id })
    }

    fn authorize(&self, passphrase: Option<&str>) -> Result<()> {
        // 未設定密語時一律拒絕
        if self.passphrase.is_empty() || passphrase != Some(self.passphrase.as_str()) {
            tracing::warn!("Rejected news insert: passphrase mismatch");
            return Err(ApiError::AuthError {
                message: "invalid passphrase".to_string(),
            });
        }
        Ok(())
    }
}

fn check_required(draft: &NewsDraft) -> Result<()> {
    let missing: Vec<&str> = [
        ("prefecture", draft.prefecture.as_deref()),
        ("name", draft.name.as_deref()),
    ]
    .into_iter()
    .filter(|(_, value)| value.map(str::trim).unwrap_or("").is_empty())
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(ApiError::ValidationError {
            message: format!("missing required fields: {}", missing.join(", ")),
        });
    }
    Ok(())
}

/// 只有日期時取當天 00:00 UTC
fn parse_published_at(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(at.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| Some(at.and_utc()))
        .ok_or_else(|| ApiError::ValidationError {
            message: format!(
                "published_at must be an RFC 3339 timestamp or YYYY-MM-DD date, got {:?}",
                value
            ),
        })
}

fn stamp(
    draft: NewsDraft,
    published_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Map<String, Value>> {
    let timestamp = |at: DateTime<Utc>| Value::String(at.to_rfc3339_opts(SecondsFormat::Millis, true));

    let mut record = match serde_json::to_value(&draft)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    record.insert("published_at".to_string(), timestamp(published_at));
    record.insert("created_at".to_string(), timestamp(now));
    record.insert("updated_at".to_string(), timestamp(now));
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_store::InMemoryStore;
    use chrono::TimeZone;
    use serde_json::json;

    fn request(passphrase: &str, news: Value) -> InsertNewsRequest {
        InsertNewsRequest {
            passphrase: Some(passphrase.to_string()),
            news: serde_json::from_value(news).unwrap(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_passphrase_mismatch_is_rejected_without_insert() {
        let store = Arc::new(InMemoryStore::default());
        let service = NewsInsertService::new(store.clone(), "correct horse");

        let err = service
            .insert(request("wrong", json!({"prefecture": "北海道", "name": "除雪情報"})))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
        assert!(store.news().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_passphrase_is_rejected() {
        let store = Arc::new(InMemoryStore::default());
        let service = NewsInsertService::new(store.clone(), "correct horse");

        let err = service
            .insert(InsertNewsRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.category(), "auth_failure");
    }

    #[tokio::test]
    async fn test_missing_name_is_rejected_without_insert() {
        let store = Arc::new(InMemoryStore::default());
        let service = NewsInsertService::new(store.clone(), "correct horse");

        let err = service
            .insert(request("correct horse", json!({"prefecture": "北海道", "name": "  "})))
            .await
            .unwrap_err();

        assert_eq!(err.category(), "validation_failure");
        assert!(err.details().contains("name"));
        assert!(!err.details().contains("prefecture"));
        assert!(store.news().await.is_empty());
    }

    #[tokio::test]
    async fn test_insert_stamps_timestamps() {
        let store = Arc::new(InMemoryStore::default());
        let service = NewsInsertService::new(store.clone(), "correct horse");

        let outcome = service
            .insert_at(
                request(
                    "correct horse",
                    json!({"prefecture": "北海道", "name": "除雪情報", "source": "札幌市"}),
                ),
                fixed_now(),
            )
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.id, json!(1));

        let saved = store.news().await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0]["created_at"], "2025-06-01T09:30:00.000Z");
        assert_eq!(saved[0]["updated_at"], "2025-06-01T09:30:00.000Z");
        assert_eq!(saved[0]["published_at"], "2025-06-01T09:30:00.000Z");
        assert_eq!(saved[0]["source"], "札幌市");
    }

    #[tokio::test]
    async fn test_explicit_published_at_is_kept() {
        let store = Arc::new(InMemoryStore::default());
        let service = NewsInsertService::new(store.clone(), "correct horse");

        service
            .insert_at(
                request(
                    "correct horse",
                    json!({
                        "prefecture": "沖縄県",
                        "name": "台風情報",
                        "published_at": "2025-05-20T00:00:00Z"
                    }),
                ),
                fixed_now(),
            )
            .await
            .unwrap();

        let saved = store.news().await;
        assert_eq!(saved[0]["published_at"], "2025-05-20T00:00:00.000Z");
        assert_eq!(saved[0]["created_at"], "2025-06-01T09:30:00.000Z");
    }

    #[tokio::test]
    async fn test_date_only_published_at_is_midnight_utc() {
        let store = Arc::new(InMemoryStore::default());
        let service = NewsInsertService::new(store.clone(), "correct horse");

        service
            .insert_at(
                request(
                    "correct horse",
                    json!({"prefecture": "沖縄県", "name": "台風情報", "published_at": "2025-05-20"}),
                ),
                fixed_now(),
            )
            .await
            .unwrap();

        let saved = store.news().await;
        assert_eq!(saved[0]["published_at"], "2025-05-20T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_blank_published_at_defaults_to_now() {
        let store = Arc::new(InMemoryStore::default());
        let service = NewsInsertService::new(store.clone(), "correct horse");

        service
            .insert_at(
                request(
                    "correct horse",
                    json!({"prefecture": "沖縄県", "name": "台風情報", "published_at": "  "}),
                ),
                fixed_now(),
            )
            .await
            .unwrap();

        let saved = store.news().await;
        assert_eq!(saved[0]["published_at"], "2025-06-01T09:30:00.000Z");
    }

    #[tokio::test]
    async fn test_offset_published_at_is_normalized_to_utc() {
        let store = Arc::new(InMemoryStore::default());
        let service = NewsInsertService::new(store.clone(), "correct horse");

        service
            .insert_at(
                request(
                    "correct horse",
                    json!({
                        "prefecture": "沖縄県",
                        "name": "台風情報",
                        "published_at": "2025-05-20T09:00:00+09:00"
                    }),
                ),
                fixed_now(),
            )
            .await
            .unwrap();

        let saved = store.news().await;
        assert_eq!(saved[0]["published_at"], "2025-05-20T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_unparseable_published_at_names_the_field() {
        let store = Arc::new(InMemoryStore::default());
        let service = NewsInsertService::new(store.clone(), "correct horse");

        let err = service
            .insert(request(
                "correct horse",
                json!({"prefecture": "沖縄県", "name": "台風情報", "published_at": "来週"}),
            ))
            .await
            .unwrap_err();

        assert_eq!(err.category(), "validation_failure");
        assert!(err.details().contains("published_at"));
        assert!(store.news().await.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_store_failure() {
        let store = Arc::new(InMemoryStore::failing("insert rejected by policy"));
        let service = NewsInsertService::new(store, "correct horse");

        let err = service
            .insert(request("correct horse", json!({"prefecture": "北海道", "name": "除雪情報"})))
            .await
            .unwrap_err();

        assert_eq!(err.category(), "store_failure");
        assert_eq!(err.details(), "insert rejected by policy");
    }
}
