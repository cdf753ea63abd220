use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, error, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::TokenStore;
use crate::error::ApiError;
use crate::models::{
    Comment, CreateCommentInput, CreateReviewPayload, Page, Review, ReviewFilters, ReviewStats,
};
use crate::transport::{ApiRequest, HttpTransport, Method, Transport};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        let transport = HttpTransport::new(timeout)?;
        Self::with_transport(base_url, Arc::new(transport), tokens)
    }

    pub fn with_transport(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        Ok(Self {
            base_url: sanitize_base_url(base_url.into())?,
            transport,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn list_reviews(&self, filters: &ReviewFilters) -> Result<Page<Review>, ApiError> {
        self.get_json("/reviews", &filters.to_query())
    }

    pub fn get_review(&self, id: i64) -> Result<Review, ApiError> {
        self.get_json(&format!("/reviews/{id}"), &[])
    }

    pub fn create_review(&self, payload: &CreateReviewPayload) -> Result<Review, ApiError> {
        let body = self.request(Method::Post, "/reviews", &[], Some(encode(payload)?))?;
        decode(&body)
    }

    pub fn like_review(&self, id: i64) -> Result<(), ApiError> {
        self.request(Method::Put, &format!("/reviews/{id}/like"), &[], None)
            .map(|_| ())
    }

    pub fn dislike_review(&self, id: i64) -> Result<(), ApiError> {
        self.request(Method::Put, &format!("/reviews/{id}/dislike"), &[], None)
            .map(|_| ())
    }

    pub fn get_stats(&self) -> Result<ReviewStats, ApiError> {
        self.get_json("/reviews/stats", &[])
    }

    /// Raw JSON of a GET, for the API test page which inspects shapes itself.
    pub fn get_value(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value, ApiError> {
        self.get_json(path, query)
    }

    pub fn list_comments(
        &self,
        review_id: i64,
        page: u32,
        limit: u32,
    ) -> Result<Page<Comment>, ApiError> {
        let query = [
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        self.get_json(&format!("/reviews/{review_id}/comments"), &query)
    }

    pub fn list_replies(
        &self,
        review_id: i64,
        comment_id: i64,
        page: u32,
        size: u32,
    ) -> Result<Page<Comment>, ApiError> {
        let query = [
            ("page".to_string(), page.to_string()),
            ("size".to_string(), size.to_string()),
        ];
        self.get_json(
            &format!("/reviews/{review_id}/comments/{comment_id}/replies"),
            &query,
        )
    }

    pub fn create_comment(
        &self,
        review_id: i64,
        input: &CreateCommentInput,
    ) -> Result<Comment, ApiError> {
        let body = self.request(
            Method::Post,
            &format!("/reviews/{review_id}/comments"),
            &[],
            Some(encode(input)?),
        )?;
        decode(&body)
    }

    pub fn like_comment(&self, review_id: i64, comment_id: i64) -> Result<Comment, ApiError> {
        let path = format!("/reviews/{review_id}/comments/{comment_id}/like");
        let body = self.request(Method::Post, &path, &[], None)?;
        decode(&body)
    }

    pub fn dislike_comment(&self, review_id: i64, comment_id: i64) -> Result<Comment, ApiError> {
        let path = format!("/reviews/{review_id}/comments/{comment_id}/dislike");
        let body = self.request(Method::Post, &path, &[], None)?;
        decode(&body)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let body = self.request(Method::Get, path, query, None)?;
        decode(&body)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path, query)?;
        debug!("API request {} {}", method.as_str(), url);
        let request = ApiRequest {
            method,
            url,
            bearer: self.tokens.load(),
            body,
        };

        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(err) => {
                error!("API error {} {}: {err}", method.as_str(), path);
                return Err(err);
            }
        };

        if response.is_success() {
            debug!(
                "API response {} {} -> {} ({} bytes)",
                method.as_str(),
                path,
                response.status,
                response.body.len()
            );
            return Ok(response.body);
        }

        let err = ApiError::from_status(response.status, &response.body);
        error!("API error {} {}: {err}", method.as_str(), path);
        if err == ApiError::Unauthorized {
            warn!("clearing stored token after 401");
            self.tokens.clear();
        }
        Err(err)
    }

    fn url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|err| ApiError::Transport(err.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|err| ApiError::Decode(err.to_string()))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|err| ApiError::Decode(err.to_string()))
}

fn sanitize_base_url(mut base: String) -> Result<String> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}
