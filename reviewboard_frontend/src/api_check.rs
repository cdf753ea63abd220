//! Smoke checks the API test page runs against a live server.

use log::{info, warn};
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::ReviewFilters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiCheck {
    FeaturedReviews,
    RecentReviews,
    Stats,
}

/// Finished check: the raw response plus anything wrong with its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub response: Value,
    pub warnings: Vec<String>,
}

impl CheckReport {
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.response).unwrap_or_else(|_| self.response.to_string())
    }
}

impl ApiCheck {
    pub const ALL: [ApiCheck; 3] = [
        ApiCheck::FeaturedReviews,
        ApiCheck::RecentReviews,
        ApiCheck::Stats,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ApiCheck::FeaturedReviews => "Featured Reviews",
            ApiCheck::RecentReviews => "Recent Reviews",
            ApiCheck::Stats => "Stats",
        }
    }

    fn request(&self) -> (&'static str, ReviewFilters) {
        match self {
            ApiCheck::FeaturedReviews => (
                "/reviews",
                ReviewFilters {
                    featured: Some(true),
                    size: Some(3),
                    ..ReviewFilters::default()
                },
            ),
            ApiCheck::RecentReviews => (
                "/reviews",
                ReviewFilters {
                    sort: Some("createdAt,desc".to_string()),
                    size: Some(6),
                    ..ReviewFilters::default()
                },
            ),
            ApiCheck::Stats => ("/reviews/stats", ReviewFilters::default()),
        }
    }

    /// Runs the check once. Bypasses the query cache so every run hits the server.
    pub fn run(&self, api: &ApiClient) -> Result<CheckReport, ApiError> {
        let (path, filters) = self.request();
        let response = api.get_value(path, &filters.to_query())?;
        let warnings = self.validate(&response);
        if warnings.is_empty() {
            info!("{} test completed successfully", self.name());
        } else {
            warn!(
                "{} test completed with validation warnings: {:?}",
                self.name(),
                warnings
            );
        }
        Ok(CheckReport { response, warnings })
    }

    pub fn validate(&self, data: &Value) -> Vec<String> {
        let mut warnings = Vec::new();
        if data.is_null() {
            warnings.push("Response is empty".to_string());
            return warnings;
        }
        match self {
            ApiCheck::FeaturedReviews | ApiCheck::RecentReviews => {
                match data.get("content").and_then(Value::as_array) {
                    None => warnings.push("Response should have a content array".to_string()),
                    Some(items) if items.is_empty() => {
                        warnings.push("Content array is empty".to_string())
                    }
                    Some(items) => {
                        for (index, review) in items.iter().enumerate() {
                            for (field, label) in
                                [("id", "id"), ("title", "title"), ("contentHtml", "content")]
                            {
                                if !present(review.get(field)) {
                                    warnings.push(format!(
                                        "Review at index {index} is missing {label}"
                                    ));
                                }
                            }
                        }
                    }
                }
            }
            ApiCheck::Stats => {
                for stat in ["totalReviews", "totalCompanies", "activeUsers"] {
                    if !data.get(stat).is_some_and(Value::is_number) {
                        warnings.push(format!("Stats response is missing or invalid {stat}"));
                    }
                }
            }
        }
        warnings
    }
}

fn present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}
