use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use reviewboard_frontend::api::ApiClient;
use reviewboard_frontend::auth::{MemoryTokenStore, TokenStore};
use reviewboard_frontend::error::ApiError;
use reviewboard_frontend::models::{CreateCommentInput, ReviewType};
use reviewboard_frontend::review_query::{ReviewListQuery, SortOrder};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runs `call` against a real blocking client off the async runtime; the
/// blocking client must be built and dropped outside it.
async fn with_client<T, F>(server: &MockServer, tokens: Arc<MemoryTokenStore>, call: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&ApiClient) -> T + Send + 'static,
{
    let base = format!("{}/api/v1", server.uri());
    tokio::task::spawn_blocking(move || {
        let client = ApiClient::new(base, Duration::from_secs(5), tokens).unwrap();
        call(&client)
    })
    .await
    .unwrap()
}

fn review_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "reviewType": "NEGATIVE",
        "title": "Long hours",
        "contentHtml": "<p>Too many meetings</p>",
        "companyName": "Initech",
        "createdAt": "2024-02-01T09:00:00Z",
        "updatedAt": "2024-02-01T09:00:00Z",
        "isEmployee": true,
        "workStartDate": "2020-01-01T00:00:00.000Z"
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn bearer_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reviews/stats"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalReviews": 12, "totalCompanies": 4, "activeUsers": 9, "reviewsThisMonth": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token("s3cret"));
    let stats = with_client(&server, tokens, |api| api.get_stats())
        .await
        .unwrap();
    assert_eq!(stats.total_reviews, 12);
    assert_eq!(stats.reviews_this_month, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn unauthorized_clears_the_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reviews/3"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::with_token("expired"));
    let result = with_client(&server, tokens.clone(), |api| api.get_review(3)).await;
    assert_eq!(result, Err(ApiError::Unauthorized));
    assert_eq!(tokens.load(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_query_is_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/reviews"))
        .and(query_param("companyName", "Acme & Sons"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .and(query_param("sort", "likeCount,desc"))
        .and(query_param("reviewType", "NEGATIVE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [review_json(8)],
            "totalElements": 1, "totalPages": 1, "size": 10, "number": 0,
            "first": true, "last": true, "empty": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = ReviewListQuery::for_company("Acme & Sons");
    query.set_sort(SortOrder::MostLiked);
    query.set_review_type(Some(ReviewType::Negative));
    let tokens = Arc::new(MemoryTokenStore::default());
    let page = with_client(&server, tokens, move |api| api.list_reviews(&query.to_filters()))
        .await
        .unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].id, 8);
    assert_eq!(page.content[0].review_type, ReviewType::Negative);
}

#[tokio::test(flavor = "multi_thread")]
async fn validation_errors_carry_field_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/reviews/4/comments"))
        .and(body_json(json!({"content": "", "parentId": 2})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Validation failed",
            "errors": {"content": "must not be blank"}
        })))
        .mount(&server)
        .await;

    let input = CreateCommentInput {
        content: String::new(),
        parent_id: Some(2),
    };
    let tokens = Arc::new(MemoryTokenStore::default());
    let err = with_client(&server, tokens, move |api| api.create_comment(4, &input))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Validation failed");
    assert_eq!(
        err.field_errors().get("content").map(String::as_str),
        Some("must not be blank")
    );
    assert!(!err.is_retryable());
}

#[tokio::test(flavor = "multi_thread")]
async fn like_uses_put_and_ignores_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/reviews/6/like"))
        .respond_with(ResponseTemplate::new(200).set_body_string("liked"))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(MemoryTokenStore::default());
    let result = with_client(&server, tokens, |api| api.like_review(6)).await;
    assert_eq!(result, Ok(()));
}

#[test]
fn unreachable_server_is_a_retryable_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let tokens = Arc::new(MemoryTokenStore::default());
    let client = ApiClient::new(
        format!("http://127.0.0.1:{port}/api/v1"),
        Duration::from_secs(2),
        tokens,
    )
    .unwrap();

    let err = client.get_stats().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.is_retryable());
}
