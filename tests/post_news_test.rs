use anyhow::Result;
use chiiki_api::core::news_insert::{InsertNewsRequest, NewsDraft};
use chiiki_api::utils::error::ApiError;
use chiiki_api::{AppState, TomlConfig};
use httpmock::prelude::*;
use serde_json::json;

fn state_for(server: &MockServer) -> Result<std::sync::Arc<AppState>> {
    let content = format!(
        r#"
[backend]
url = "{}"
api_key = "service-role"

[admin]
passphrase = "open sesame"
"#,
        server.base_url()
    );
    let config = TomlConfig::from_toml_str(&content)?;
    Ok(AppState::from_config(&config))
}

fn request(passphrase: Option<&str>, prefecture: Option<&str>) -> InsertNewsRequest {
    InsertNewsRequest {
        passphrase: passphrase.map(str::to_string),
        news: NewsDraft {
            prefecture: prefecture.map(str::to_string),
            name: Some("地域防災フォーラム開催".to_string()),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn test_insert_posts_stamped_record() -> Result<()> {
    let server = MockServer::start();
    let insert_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/rest/v1/local_news")
            .header("apikey", "service-role")
            .header("prefer", "return=representation")
            .json_body_partial(r#"{"prefecture": "静岡県", "name": "地域防災フォーラム開催"}"#)
            .body_contains("created_at")
            .body_contains("updated_at")
            .body_contains("published_at");
        then.status(201)
            .json_body(json!([{"id": 42, "prefecture": "静岡県"}]));
    });

    let state = state_for(&server)?;
    let outcome = state
        .news
        .insert(request(Some("open sesame"), Some("静岡県")))
        .await?;

    insert_mock.assert();
    assert!(outcome.success);
    assert_eq!(outcome.id, json!(42));

    Ok(())
}

#[tokio::test]
async fn test_rejected_requests_never_reach_backend() -> Result<()> {
    let server = MockServer::start();
    let insert_mock = server.mock(|when, then| {
        when.method(POST).path("/rest/v1/local_news");
        then.status(201).json_body(json!([{"id": 1}]));
    });

    let state = state_for(&server)?;

    let wrong = state
        .news
        .insert(request(Some("letmein"), Some("静岡県")))
        .await;
    assert!(matches!(wrong, Err(ApiError::AuthError { .. })));

    let missing = state.news.insert(request(None, Some("静岡県"))).await;
    assert!(matches!(missing, Err(ApiError::AuthError { .. })));

    let invalid = state
        .news
        .insert(request(Some("open sesame"), Some("  ")))
        .await;
    assert!(matches!(invalid, Err(ApiError::ValidationError { .. })));

    insert_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_backend_rejection_is_store_failure() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/rest/v1/local_news");
        then.status(400)
            .json_body(json!({"message": "Could not find the 'headline' column"}));
    });

    let state = state_for(&server)?;
    let err = state
        .news
        .insert(request(Some("open sesame"), Some("静岡県")))
        .await
        .unwrap_err();

    assert_eq!(err.category(), "store_failure");
    assert_eq!(err.status_code().as_u16(), 500);
    assert!(err.details().contains("headline"));

    Ok(())
}
