//! Two-tier comment threads: top-level comments and their direct replies.

use std::collections::HashSet;

use crate::models::{Comment, CommentKind};

/// Stable partition of one review's comments.
#[derive(Debug, Clone, Default)]
pub struct CommentTree {
    top_level: Vec<Comment>,
    replies: Vec<Comment>,
}

impl CommentTree {
    pub fn build(comments: &[Comment]) -> Self {
        let (top_level, replies) = comments
            .iter()
            .cloned()
            .partition(|c| c.kind() == CommentKind::TopLevel);
        Self { top_level, replies }
    }

    pub fn top_level(&self) -> &[Comment] {
        &self.top_level
    }

    pub fn replies(&self) -> &[Comment] {
        &self.replies
    }

    /// Replies to `id`, in the order the server returned them.
    pub fn replies_to(&self, id: i64) -> impl Iterator<Item = &Comment> + '_ {
        self.replies
            .iter()
            .filter(move |reply| reply.parent_id == Some(id))
    }

    pub fn has_replies(&self, id: i64) -> bool {
        self.replies_to(id).next().is_some()
    }

    /// Count shown on the "Show replies" toggle, or `None` when the toggle
    /// is hidden. Only replies present in this collection open the toggle;
    /// the server's `total_replies` can raise the count but never show it.
    pub fn reply_affordance(&self, comment: &Comment) -> Option<usize> {
        let local = self.replies_to(comment.id).count();
        if local == 0 {
            return None;
        }
        Some(local.max(comment.total_replies.max(0) as usize))
    }

    /// Replies whose parent is not a top-level comment in this collection.
    /// They are never rendered.
    pub fn orphans(&self) -> Vec<&Comment> {
        let parents: HashSet<i64> = self.top_level.iter().map(|c| c.id).collect();
        self.replies
            .iter()
            .filter(|reply| match reply.parent_id {
                Some(parent) => !parents.contains(&parent),
                None => false,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty() && self.replies.is_empty()
    }
}

/// Which top-level comments currently show their replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedReplies(HashSet<i64>);

impl ExpandedReplies {
    pub fn toggle(&mut self, id: i64) {
        if !self.0.remove(&id) {
            self.0.insert(id);
        }
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.0.contains(&id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn comment(id: i64, parent_id: Option<i64>) -> Comment {
        Comment {
            id,
            content: format!("comment {id}"),
            review_id: Some(1),
            parent_id,
            created_at: "2024-01-01T00:00:00Z".into(),
            updated_at: None,
            status: None,
            has_replies: false,
            commenter_name: None,
            total_replies: 0,
            like_count: 0,
            dislike_count: 0,
        }
    }

    fn ids<'a>(comments: impl IntoIterator<Item = &'a Comment>) -> Vec<i64> {
        comments.into_iter().map(|c| c.id).collect()
    }

    #[test]
    fn partition_is_stable_and_lossless() {
        let input = vec![
            comment(5, Some(1)),
            comment(1, None),
            comment(3, Some(1)),
            comment(2, None),
            comment(4, Some(2)),
        ];
        let tree = CommentTree::build(&input);

        assert_eq!(ids(tree.top_level()), vec![1, 2]);
        assert_eq!(ids(tree.replies()), vec![5, 3, 4]);

        let mut all = ids(tree.top_level().iter().chain(tree.replies()));
        all.sort();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn reply_toggle_needs_a_loaded_reply() {
        let mut busy = comment(1, None);
        busy.total_replies = 2;
        let tree = CommentTree::build(&[busy.clone()]);
        assert!(!tree.has_replies(1));
        assert_eq!(tree.reply_affordance(&busy), None);

        let tree = CommentTree::build(&[busy.clone(), comment(2, Some(1))]);
        assert_eq!(tree.reply_affordance(&busy), Some(2));

        let quiet = comment(3, None);
        let tree = CommentTree::build(&[quiet.clone(), comment(4, Some(3))]);
        assert_eq!(tree.reply_affordance(&quiet), Some(1));
    }

    #[test]
    fn replies_only_under_existing_parent() {
        let input = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, Some(99)),
            comment(4, Some(2)),
        ];
        let tree = CommentTree::build(&input);

        assert!(tree.has_replies(1));
        assert_eq!(ids(tree.replies_to(1)), vec![2]);
        assert_eq!(ids(tree.orphans()), vec![3, 4]);

        let rendered: Vec<i64> = tree
            .top_level()
            .iter()
            .flat_map(|top| tree.replies_to(top.id).map(|r| r.id))
            .collect();
        assert_eq!(rendered, vec![2]);
    }

    #[test]
    fn no_reply_affordance_without_replies() {
        let tree = CommentTree::build(&[comment(1, None), comment(2, None)]);
        assert!(!tree.has_replies(1));
        assert!(!tree.has_replies(2));
        assert!(tree.orphans().is_empty());
    }

    #[test]
    fn toggling_one_comment_leaves_others() {
        let mut expanded = ExpandedReplies::default();
        expanded.toggle(2);
        let before = expanded.clone();

        expanded.toggle(1);
        assert!(expanded.is_expanded(1));
        assert!(expanded.is_expanded(2));
        assert!(!expanded.is_expanded(3));

        expanded.toggle(1);
        assert_eq!(expanded, before);
    }

    #[test]
    fn empty_input() {
        let tree = CommentTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.orphans().is_empty());
    }
}
