use eframe::egui::{self, RichText};
use log::debug;

use crate::models::{Comment, CreateCommentInput, Page};
use crate::pagination::Pager;
use crate::query::{Lookup, Mutation, QueryKey, COMMENT_PAGE_SIZE};
use crate::threading::CommentTree;

use super::super::{DetailState, ReviewboardApp};
use super::{format_date, page_strip};

const REPLY_PAGE_SIZE: u32 = 50;
const EMPTY_COMMENT: &str = "Please enter a comment";

impl ReviewboardApp {
    pub(crate) fn render_comments(&mut self, ui: &mut egui::Ui, state: &mut DetailState) {
        let review_id = state.review_id;
        let page_no = state.comment_page;
        let key = QueryKey::comments(review_id, page_no, COMMENT_PAGE_SIZE);
        let lookup = self.ensure::<Page<Comment>, _>(&key, move |q| {
            q.comments(review_id, page_no, COMMENT_PAGE_SIZE)
        });

        let total = lookup.value().map_or(0, |page| page.total_elements);
        ui.heading(format!("Comments ({total})"));
        self.render_comment_form(ui, state);
        ui.add_space(8.0);

        let page = match lookup {
            Lookup::Fresh(page) | Lookup::Stale(page) => page,
            Lookup::Failed(err) => {
                ui.horizontal(|ui| {
                    ui.colored_label(
                        egui::Color32::LIGHT_RED,
                        format!("Could not load comments: {err}"),
                    );
                    if ui.button("Retry").clicked() {
                        self.retry(&key);
                    }
                });
                return;
            }
            Lookup::Missing => {
                ui.add(egui::Spinner::new());
                return;
            }
        };

        self.render_refresh_failure(ui, &key);
        let tree = CommentTree::build(&page.content);
        if !state.orphans_logged {
            let orphans = tree.orphans();
            if !orphans.is_empty() {
                debug!(
                    "review {review_id}: {} replies without a parent on page {page_no} are hidden",
                    orphans.len()
                );
            }
            state.orphans_logged = true;
        }

        if tree.top_level().is_empty() {
            ui.label(RichText::new("No comments yet. Start the conversation.").weak());
        }

        for comment in tree.top_level() {
            self.render_comment(ui, state, comment, false);
            if let Some(total_replies) = tree.reply_affordance(comment) {
                let local = tree.replies_to(comment.id).count();
                ui.indent(("replies", comment.id), |ui| {
                    let expanded = state.expanded.is_expanded(comment.id);
                    let label = if expanded {
                        "Hide replies".to_string()
                    } else {
                        format!("Show replies ({total_replies})")
                    };
                    if ui.small_button(label).clicked() {
                        state.expanded.toggle(comment.id);
                    }
                    if expanded {
                        if total_replies > local {
                            self.render_loaded_replies(ui, state, comment.id);
                        } else {
                            for reply in tree.replies_to(comment.id) {
                                self.render_comment(ui, state, reply, true);
                            }
                        }
                    }
                });
            }
            ui.add_space(6.0);
        }

        if page.total_pages > 1 {
            if let Some(target) = page_strip(ui, Pager::new(page_no, page.total_pages)) {
                state.comment_page = target.min(page.total_pages - 1);
                state.orphans_logged = false;
            }
        }
    }

    /// Replies that did not fit on the comment page come from the replies endpoint.
    fn render_loaded_replies(&mut self, ui: &mut egui::Ui, state: &mut DetailState, parent: i64) {
        let review_id = state.review_id;
        let key = QueryKey::replies(review_id, parent, 0, REPLY_PAGE_SIZE);
        match self.ensure::<Page<Comment>, _>(&key, move |q| {
            q.replies(review_id, parent, 0, REPLY_PAGE_SIZE)
        }) {
            Lookup::Fresh(replies) | Lookup::Stale(replies) => {
                for reply in replies.content.iter().filter(|r| r.parent_id == Some(parent)) {
                    self.render_comment(ui, state, reply, true);
                }
            }
            Lookup::Failed(err) => {
                ui.colored_label(egui::Color32::LIGHT_RED, format!("Could not load replies: {err}"));
                if ui.small_button("Retry").clicked() {
                    self.retry(&key);
                }
            }
            Lookup::Missing => {
                ui.add(egui::Spinner::new());
            }
        }
    }

    fn render_comment(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut DetailState,
        comment: &Comment,
        is_reply: bool,
    ) {
        let review_id = state.review_id;
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .inner_margin(egui::vec2(10.0, 6.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(RichText::new(comment.commenter()).strong());
                    ui.label(RichText::new(format_date(&comment.created_at)).weak());
                });
                ui.label(comment.content.as_str());
                ui.horizontal(|ui| {
                    let like = Mutation::LikeComment {
                        review_id,
                        comment_id: comment.id,
                    };
                    let busy = self.is_mutating(&like);
                    if ui
                        .add_enabled(!busy, egui::Button::new(format!("👍 {}", comment.like_count)).small())
                        .clicked()
                    {
                        self.mutate(like);
                    }
                    let dislike = Mutation::DislikeComment {
                        review_id,
                        comment_id: comment.id,
                    };
                    let busy = self.is_mutating(&dislike);
                    if ui
                        .add_enabled(
                            !busy,
                            egui::Button::new(format!("👎 {}", comment.dislike_count)).small(),
                        )
                        .clicked()
                    {
                        self.mutate(dislike);
                    }
                    if !is_reply && ui.small_button("Reply").clicked() {
                        state.replying_to = Some(comment.id);
                        state.reply_error = None;
                    }
                });
            });

        if !is_reply && state.replying_to == Some(comment.id) {
            self.render_reply_form(ui, state, comment.id);
        }
    }

    fn render_comment_form(&mut self, ui: &mut egui::Ui, state: &mut DetailState) {
        ui.add(
            egui::TextEdit::multiline(&mut state.comment_input)
                .hint_text("Write a comment...")
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        if let Some(err) = &state.comment_error {
            ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
        }
        let input = CreateCommentInput {
            content: state.comment_input.trim().to_string(),
            parent_id: None,
        };
        let mutation = Mutation::CreateComment {
            review_id: state.review_id,
            input,
        };
        let busy = self.is_posting(state.review_id, None);
        let label = if busy { "Posting..." } else { "Post Comment" };
        if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
            if state.comment_input.trim().is_empty() {
                state.comment_error = Some(EMPTY_COMMENT.to_string());
            } else {
                state.comment_error = None;
                self.mutate(mutation);
            }
        }
    }

    fn render_reply_form(&mut self, ui: &mut egui::Ui, state: &mut DetailState, parent: i64) {
        let review_id = state.review_id;
        ui.indent(("reply_form", parent), |ui| {
            let text = state.reply_inputs.entry(parent).or_default();
            ui.add(
                egui::TextEdit::multiline(text)
                    .hint_text("Write a reply...")
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );
            let content = text.trim().to_string();
            if let Some(err) = &state.reply_error {
                ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
            }
            ui.horizontal(|ui| {
                let busy = self.is_posting(review_id, Some(parent));
                let label = if busy { "Posting..." } else { "Post Reply" };
                if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
                    if content.is_empty() {
                        state.reply_error = Some(EMPTY_COMMENT.to_string());
                    } else {
                        state.reply_error = None;
                        self.mutate(Mutation::CreateComment {
                            review_id,
                            input: CreateCommentInput {
                                content,
                                parent_id: Some(parent),
                            },
                        });
                    }
                }
                if ui.button("Cancel").clicked() {
                    state.replying_to = None;
                    state.reply_error = None;
                }
            });
        });
    }

    /// Whether a comment (or a reply to `parent`) is being posted on this review.
    fn is_posting(&self, review_id: i64, parent: Option<i64>) -> bool {
        self.mutations.iter().any(|m| {
            matches!(m, Mutation::CreateComment { review_id: r, input }
                if *r == review_id && input.parent_id == parent)
        })
    }
}
