use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewType {
    Positive,
    Negative,
    Mixed,
}

impl ReviewType {
    pub const ALL: [ReviewType; 3] = [ReviewType::Positive, ReviewType::Mixed, ReviewType::Negative];

    /// Wire name, as sent in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewType::Positive => "POSITIVE",
            ReviewType::Negative => "NEGATIVE",
            ReviewType::Mixed => "MIXED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReviewType::Positive => "Positive",
            ReviewType::Negative => "Negative",
            ReviewType::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for ReviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmploymentStatus {
    Current,
    Former,
}

impl EmploymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EmploymentStatus::Current => "Employee",
            EmploymentStatus::Former => "Former Employee",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub review_type: ReviewType,
    pub title: String,
    #[serde(default)]
    pub content_html: String,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub dislike_count: i64,
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    #[serde(default)]
    pub is_employee: bool,
    #[serde(default)]
    pub dept: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub company_name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub work_start_date: Option<String>,
    #[serde(default)]
    pub work_end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub total_comments: i64,
}

impl Review {
    pub fn is_updated(&self) -> bool {
        self.updated_at != self.created_at
    }

    /// Derived from the employment fields; never stored.
    pub fn employment_status(&self) -> Option<EmploymentStatus> {
        if !self.is_employee {
            return None;
        }
        if self.work_end_date.is_some() {
            Some(EmploymentStatus::Former)
        } else {
            Some(EmploymentStatus::Current)
        }
    }

    pub fn reviewer(&self) -> &str {
        self.reviewer_name.as_deref().unwrap_or("Anonymous")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub review_id: Option<i64>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub has_replies: bool,
    #[serde(default)]
    pub commenter_name: Option<String>,
    #[serde(default)]
    pub total_replies: i64,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub dislike_count: i64,
}

/// Position of a comment in the two-tier thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    TopLevel,
    Reply { parent_id: i64 },
}

impl Comment {
    pub fn kind(&self) -> CommentKind {
        match self.parent_id {
            Some(parent_id) => CommentKind::Reply { parent_id },
            None => CommentKind::TopLevel,
        }
    }

    pub fn commenter(&self) -> &str {
        self.commenter_name.as_deref().unwrap_or("Anonymous")
    }
}

/// One server-delimited page of a larger ordered result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.empty || self.content.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    #[serde(default)]
    pub total_reviews: u64,
    #[serde(default)]
    pub total_companies: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub reviews_this_month: u64,
    #[serde(default)]
    pub total_likes: u64,
    #[serde(default)]
    pub total_dislikes: u64,
    #[serde(default)]
    pub average_likes_per_review: f64,
    #[serde(default)]
    pub count_by_review_type: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewPayload {
    pub review_type: ReviewType,
    pub title: String,
    pub content: String,
    pub ip_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub is_employee: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_end_date: Option<String>,
    pub reviewer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

/// Company chosen in a search box. There is no company directory, so a
/// pick is just the trimmed name the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyPick {
    pub name: String,
}

impl CompanyPick {
    pub fn from_input(input: &str) -> Option<Self> {
        let name = input.trim();
        (!name.is_empty()).then(|| Self {
            name: name.to_string(),
        })
    }
}

/// Filters accepted by `GET /reviews`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilters {
    pub company_name: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub featured: Option<bool>,
    pub review_type: Option<ReviewType>,
}

impl ReviewFilters {
    /// Query pairs in wire form; absent filters are left out entirely.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(name) = &self.company_name {
            params.push(("companyName".to_string(), name.clone()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        if let Some(size) = self.size {
            params.push(("size".to_string(), size.to_string()));
        }
        if let Some(featured) = self.featured {
            params.push(("featured".to_string(), featured.to_string()));
        }
        if let Some(review_type) = self.review_type {
            params.push(("reviewType".to_string(), review_type.as_str().to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(is_employee: bool, end: Option<&str>) -> Review {
        Review {
            id: 1,
            review_type: ReviewType::Mixed,
            title: "Decent place".into(),
            content_html: "<p>ok</p>".into(),
            like_count: 0,
            dislike_count: 0,
            status: None,
            is_employee,
            dept: None,
            role: None,
            company_name: "Acme".into(),
            website: None,
            work_start_date: Some("2020-01-01T00:00:00.000Z".into()),
            work_end_date: end.map(str::to_string),
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: "2024-01-01T00:00:00Z".into(),
            reviewer_name: None,
            total_comments: 0,
        }
    }

    #[test]
    fn employment_status_ignores_dates_for_non_employees() {
        assert_eq!(review(false, Some("2022-01-01")).employment_status(), None);
        assert_eq!(review(false, None).employment_status(), None);
    }

    #[test]
    fn employment_status_for_employees() {
        assert_eq!(
            review(true, None).employment_status(),
            Some(EmploymentStatus::Current)
        );
        assert_eq!(
            review(true, Some("2022-01-01")).employment_status(),
            Some(EmploymentStatus::Former)
        );
        assert_eq!(EmploymentStatus::Former.label(), "Former Employee");
    }

    #[test]
    fn updated_flag_compares_timestamps() {
        let mut r = review(false, None);
        assert!(!r.is_updated());
        r.updated_at = "2024-02-01T00:00:00Z".into();
        assert!(r.is_updated());
    }

    #[test]
    fn review_decodes_from_camel_case() {
        let json = r#"{
            "id": 7, "reviewType": "NEGATIVE", "title": "Bad", "contentHtml": "<p>x</p>",
            "ipAddress": "1.2.3.4", "likeCount": 3, "dislikeCount": 1, "hasComment": true,
            "status": "APPROVED", "isEmployee": true, "companyName": "Initech",
            "createdAt": "2024-01-01", "updatedAt": "2024-01-02",
            "reviewerName": "Peter", "totalComments": 2
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.review_type, ReviewType::Negative);
        assert_eq!(review.status, Some(ReviewStatus::Approved));
        assert_eq!(review.total_comments, 2);
        assert!(review.is_updated());
    }

    #[test]
    fn page_ignores_spring_metadata() {
        let json = r#"{"content":[],"totalElements":0,"totalPages":0,"size":10,"number":0,
            "first":true,"last":true,"empty":true,"numberOfElements":0,
            "pageable":{"pageNumber":0,"pageSize":10},"sort":{"empty":true}}"#;
        let page: Page<Comment> = serde_json::from_str(json).unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn comment_kind_follows_parent() {
        let json = r#"{"id":2,"content":"me too","parentId":1,"createdAt":"2024-01-01"}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.kind(), CommentKind::Reply { parent_id: 1 });
        assert_eq!(comment.commenter(), "Anonymous");
    }

    #[test]
    fn payload_omits_absent_employment_fields() {
        let payload = CreateReviewPayload {
            review_type: ReviewType::Positive,
            title: "Great".into(),
            content: "<p>fine</p>".into(),
            ip_address: "127.0.0.1".into(),
            dept: None,
            role: None,
            company_name: "Acme".into(),
            website: None,
            is_employee: false,
            work_start_date: None,
            work_end_date: None,
            reviewer_name: "Anonymous".into(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["reviewType"], "POSITIVE");
        assert_eq!(value["companyName"], "Acme");
        assert!(value.get("dept").is_none());
        assert!(value.get("workEndDate").is_none());
    }

    #[test]
    fn blank_company_search_is_no_pick() {
        assert_eq!(CompanyPick::from_input("   "), None);
        assert_eq!(
            CompanyPick::from_input(" Acme "),
            Some(CompanyPick {
                name: "Acme".into()
            })
        );
    }

    #[test]
    fn filters_skip_absent_review_type() {
        let filters = ReviewFilters {
            sort: Some("createdAt,desc".into()),
            size: Some(6),
            page: Some(0),
            ..Default::default()
        };
        let query = filters.to_query();
        assert!(query.iter().all(|(k, _)| k != "reviewType"));
        assert!(query.contains(&("size".to_string(), "6".to_string())));
    }
}
