use eframe::egui::{self, Color32, RichText};

use crate::editor::excerpt;
use crate::models::Review;

use super::{badge, format_date, type_color};

const EXCERPT_CHARS: usize = 220;

pub(crate) enum CardAction {
    None,
    OpenReview(i64),
    OpenCompany(String),
}

pub(crate) fn review_card(ui: &mut egui::Ui, review: &Review) -> CardAction {
    let mut action = CardAction::None;
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                if ui
                    .link(RichText::new(&review.company_name).strong())
                    .on_hover_text("Show all reviews for this company")
                    .clicked()
                {
                    action = CardAction::OpenCompany(review.company_name.clone());
                }
                badge(ui, review.review_type.label(), type_color(review.review_type));
                if let Some(status) = review.employment_status() {
                    badge(ui, status.label(), Color32::from_rgb(90, 130, 200));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if review.is_updated() {
                        ui.label(RichText::new("(edited)").italics().weak());
                    }
                    ui.label(format_date(&review.created_at));
                });
            });

            ui.add_space(4.0);
            ui.label(RichText::new(&review.title).heading());
            ui.label(excerpt(&review.content_html, EXCERPT_CHARS));
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label(format!("👍 {}", review.like_count));
                ui.label(format!("👎 {}", review.dislike_count));
                ui.label(format!("💬 {}", review.total_comments));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Read more").clicked() {
                        action = CardAction::OpenReview(review.id);
                    }
                });
            });
        });
    action
}
