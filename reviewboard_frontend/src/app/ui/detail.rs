use eframe::egui::{self, Color32, RichText};

use crate::editor::html_to_text;
use crate::error::ApiError;
use crate::models::Review;
use crate::query::{Lookup, Mutation, QueryKey};
use crate::review_query::ReviewListQuery;

use super::super::{DetailState, ReviewboardApp, ViewState};
use super::{badge, error_panel, format_date, type_color};

impl ReviewboardApp {
    pub(crate) fn render_detail(&mut self, ui: &mut egui::Ui, state: &mut DetailState) {
        let id = state.review_id;
        let key = QueryKey::review(id);
        let review = match self.ensure::<Review, _>(&key, move |q| q.review(id)) {
            Lookup::Fresh(review) | Lookup::Stale(review) => review,
            Lookup::Failed(ApiError::NotFound) => {
                if error_panel(
                    ui,
                    "Review not found",
                    "The review you're looking for doesn't exist or has been removed.",
                    "Back to Reviews",
                ) {
                    self.navigate(ViewState::Reviews);
                }
                return;
            }
            Lookup::Failed(err) => {
                if error_panel(ui, "Could not load review", &err.to_string(), "Try again") {
                    self.retry(&key);
                }
                return;
            }
            Lookup::Missing => {
                ui.add(egui::Spinner::new());
                return;
            }
        };

        if ui.button("← Back to reviews").clicked() {
            self.navigate(ViewState::Reviews);
        }
        self.render_refresh_failure(ui, &key);
        ui.add_space(6.0);

        self.render_review_header(ui, &review);
        ui.separator();

        let width = (ui.available_width() / 7.0) as usize;
        ui.label(html_to_text(&review.content_html, width));

        if review.is_employee {
            if let (Some(dept), Some(role)) = (&review.dept, &review.role) {
                ui.add_space(8.0);
                render_employment_box(ui, &review, dept, role);
            }
        }

        ui.add_space(12.0);
        ui.separator();
        self.render_comments(ui, state);
    }

    fn render_review_header(&mut self, ui: &mut egui::Ui, review: &Review) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new(&review.title).size(22.0));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let dislike = Mutation::DislikeReview(review.id);
                let busy = self.is_mutating(&dislike);
                if ui
                    .add_enabled(
                        !busy,
                        egui::Button::new(format!("👎 {}", review.dislike_count)),
                    )
                    .clicked()
                {
                    self.mutate(dislike);
                }
                let like = Mutation::LikeReview(review.id);
                let busy = self.is_mutating(&like);
                if ui
                    .add_enabled(!busy, egui::Button::new(format!("👍 {}", review.like_count)))
                    .clicked()
                {
                    self.mutate(like);
                }
            });
        });

        ui.horizontal(|ui| {
            ui.label(RichText::new(review.reviewer()).strong());
            ui.label("·");
            ui.label(format_date(&review.created_at));
            if review.is_updated() {
                ui.label(RichText::new("(edited)").italics().weak());
            }
            badge(ui, review.review_type.label(), type_color(review.review_type));
            if let Some(status) = review.employment_status() {
                badge(ui, status.label(), Color32::from_rgb(90, 130, 200));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Company:");
            if ui.link(review.company_name.as_str()).clicked() {
                self.open_reviews(ReviewListQuery::for_company(review.company_name.clone()));
            }
            if let Some(site) = review.website.as_deref().filter(|s| !s.is_empty()) {
                ui.hyperlink(site);
            }
        });
    }
}

fn render_employment_box(ui: &mut egui::Ui, review: &Review, dept: &str, role: &str) {
    egui::Frame::group(ui.style())
        .fill(ui.visuals().faint_bg_color)
        .inner_margin(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            ui.label(RichText::new("Employment Details").strong());
            egui::Grid::new("employment_details")
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label("Department");
                    ui.label(dept);
                    ui.end_row();
                    ui.label("Role");
                    ui.label(role);
                    ui.end_row();
                    if let Some(start) = &review.work_start_date {
                        ui.label("Start Date");
                        ui.label(format_date(start));
                        ui.end_row();
                    }
                    if let Some(end) = &review.work_end_date {
                        ui.label("End Date");
                        ui.label(format_date(end));
                        ui.end_row();
                    }
                });
        });
}
