use std::fmt;

/// Composite identity of a cached read: entity name followed by parameters.
///
/// Keys compare segment-wise, so `["comments", "4"]` is a prefix of every
/// page of review 4's comments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(entity: &str) -> Self {
        Self(vec![entity.to_string()])
    }

    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn stats() -> Self {
        Self::new("stats")
    }

    pub fn recent_reviews() -> Self {
        Self::new("recentReviews")
    }

    /// Prefix of every review list page.
    pub fn review_lists() -> Self {
        Self::new("reviews")
    }

    pub fn review(id: i64) -> Self {
        Self::new("review").with(id)
    }

    /// Prefix of every comment read belonging to one review.
    pub fn comments_of(review_id: i64) -> Self {
        Self::new("comments").with(review_id)
    }

    pub fn comments(review_id: i64, page: u32, limit: u32) -> Self {
        Self::comments_of(review_id).with(page).with(limit)
    }

    pub fn replies(review_id: i64, comment_id: i64, page: u32, size: u32) -> Self {
        Self::comments_of(review_id)
            .with("replies")
            .with(comment_id)
            .with(page)
            .with(size)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_matching_is_segment_wise() {
        let page = QueryKey::comments(4, 0, 10);
        assert!(page.starts_with(&QueryKey::comments_of(4)));
        assert!(!page.starts_with(&QueryKey::comments_of(40)));
        assert!(QueryKey::replies(4, 7, 0, 10).starts_with(&QueryKey::comments_of(4)));
        assert!(!QueryKey::review(4).starts_with(&QueryKey::review_lists()));
    }

    #[test]
    fn display_lists_segments() {
        assert_eq!(QueryKey::review(3).to_string(), "[review, 3]");
    }
}
