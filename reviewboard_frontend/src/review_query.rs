use serde::{Deserialize, Serialize};

use crate::models::{ReviewFilters, ReviewType};
use crate::query::QueryKey;

pub const REVIEW_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    MostLiked,
    MostDisliked,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::MostLiked,
        SortOrder::MostDisliked,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Newest => "createdAt,desc",
            SortOrder::Oldest => "createdAt,asc",
            SortOrder::MostLiked => "likeCount,desc",
            SortOrder::MostDisliked => "dislikeCount,desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest First",
            SortOrder::Oldest => "Oldest First",
            SortOrder::MostLiked => "Most Liked",
            SortOrder::MostDisliked => "Most Disliked",
        }
    }
}

/// Filter and position state of the review list.
///
/// Every filter setter puts the list back on the first page, so a narrower
/// result set can never be requested at a page it no longer has.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReviewListQuery {
    company_name: String,
    page: u32,
    sort: SortOrder,
    review_type: Option<ReviewType>,
}

impl ReviewListQuery {
    pub fn for_company(name: impl Into<String>) -> Self {
        Self {
            company_name: name.into().trim().to_string(),
            ..Self::default()
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn review_type(&self) -> Option<ReviewType> {
        self.review_type
    }

    pub fn set_company_name(&mut self, name: &str) {
        self.company_name = name.trim().to_string();
        self.page = 0;
    }

    pub fn clear_search(&mut self) {
        self.set_company_name("");
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page = 0;
    }

    pub fn set_review_type(&mut self, review_type: Option<ReviewType>) {
        self.review_type = review_type;
        self.page = 0;
    }

    /// Moves to `page`, clamped to the last page when `total_pages` is known.
    pub fn set_page(&mut self, page: u32, total_pages: u32) {
        self.page = if total_pages == 0 {
            0
        } else {
            page.min(total_pages - 1)
        };
    }

    pub fn to_filters(&self) -> ReviewFilters {
        ReviewFilters {
            company_name: Some(self.company_name.clone()),
            sort: Some(self.sort.as_param().to_string()),
            page: Some(self.page),
            size: Some(REVIEW_PAGE_SIZE),
            featured: None,
            review_type: self.review_type,
        }
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::new("reviews")
            .with(&self.company_name)
            .with(self.page)
            .with(self.sort.as_param())
            .with(REVIEW_PAGE_SIZE)
            .with(self.review_type.map(|t| t.as_str()).unwrap_or(""))
    }

    pub fn heading(&self) -> String {
        if self.company_name.is_empty() {
            "All Reviews".to_string()
        } else {
            format!("Reviews for {}", self.company_name)
        }
    }
}
