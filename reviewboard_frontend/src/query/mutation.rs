use crate::api::ApiClient;
use crate::error::ApiError;
use crate::models::{Comment, CreateCommentInput, CreateReviewPayload, Review};

use super::key::QueryKey;

/// A write against the API. Run once, never retried.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    LikeReview(i64),
    DislikeReview(i64),
    CreateReview(CreateReviewPayload),
    CreateComment {
        review_id: i64,
        input: CreateCommentInput,
    },
    LikeComment {
        review_id: i64,
        comment_id: i64,
    },
    DislikeComment {
        review_id: i64,
        comment_id: i64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutput {
    Done,
    Review(Review),
    Comment(Comment),
}

impl Mutation {
    pub fn execute(&self, api: &ApiClient) -> Result<MutationOutput, ApiError> {
        match self {
            Mutation::LikeReview(id) => api.like_review(*id).map(|_| MutationOutput::Done),
            Mutation::DislikeReview(id) => api.dislike_review(*id).map(|_| MutationOutput::Done),
            Mutation::CreateReview(payload) => api.create_review(payload).map(MutationOutput::Review),
            Mutation::CreateComment { review_id, input } => api
                .create_comment(*review_id, input)
                .map(MutationOutput::Comment),
            Mutation::LikeComment {
                review_id,
                comment_id,
            } => api
                .like_comment(*review_id, *comment_id)
                .map(MutationOutput::Comment),
            Mutation::DislikeComment {
                review_id,
                comment_id,
            } => api
                .dislike_comment(*review_id, *comment_id)
                .map(MutationOutput::Comment),
        }
    }

    /// Key prefixes whose cached reads this write makes stale.
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            Mutation::LikeReview(id) | Mutation::DislikeReview(id) => vec![QueryKey::review(*id)],
            Mutation::CreateReview(_) => vec![
                QueryKey::review_lists(),
                QueryKey::recent_reviews(),
                QueryKey::stats(),
            ],
            Mutation::CreateComment { review_id, .. }
            | Mutation::LikeComment { review_id, .. }
            | Mutation::DislikeComment { review_id, .. } => {
                vec![QueryKey::comments_of(*review_id)]
            }
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Mutation::LikeReview(_) => "Review liked",
            Mutation::DislikeReview(_) => "Review disliked",
            Mutation::CreateReview(_) => "Review submitted successfully!",
            Mutation::CreateComment { input, .. } if input.parent_id.is_some() => {
                "Reply posted successfully"
            }
            Mutation::CreateComment { .. } => "Comment posted successfully",
            Mutation::LikeComment { .. } => "Comment liked",
            Mutation::DislikeComment { .. } => "Comment disliked",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Mutation::LikeReview(_) => "Failed to like review",
            Mutation::DislikeReview(_) => "Failed to dislike review",
            Mutation::CreateReview(_) => "Failed to submit review",
            Mutation::CreateComment { .. } => "Failed to post comment",
            Mutation::LikeComment { .. } => "Failed to like comment",
            Mutation::DislikeComment { .. } => "Failed to dislike comment",
        }
    }

    /// Review the write belongs to, when there is one yet.
    pub fn review_id(&self) -> Option<i64> {
        match self {
            Mutation::LikeReview(id) | Mutation::DislikeReview(id) => Some(*id),
            Mutation::CreateReview(_) => None,
            Mutation::CreateComment { review_id, .. }
            | Mutation::LikeComment { review_id, .. }
            | Mutation::DislikeComment { review_id, .. } => Some(*review_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn review_votes_touch_only_the_detail() {
        assert_eq!(Mutation::LikeReview(3).invalidates(), vec![QueryKey::review(3)]);
        assert_eq!(Mutation::DislikeReview(3).invalidates(), vec![QueryKey::review(3)]);
    }

    #[test]
    fn comment_writes_touch_the_review_comments() {
        let create = Mutation::CreateComment {
            review_id: 8,
            input: CreateCommentInput {
                content: "hi".into(),
                parent_id: Some(1),
            },
        };
        assert_eq!(create.invalidates(), vec![QueryKey::comments_of(8)]);
        assert_eq!(create.success_message(), "Reply posted successfully");

        let like = Mutation::LikeComment {
            review_id: 8,
            comment_id: 2,
        };
        assert_eq!(like.invalidates(), vec![QueryKey::comments_of(8)]);
    }
}
