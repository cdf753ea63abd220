use chrono::{DateTime, NaiveDate, NaiveDateTime};
use eframe::egui::{self, Color32, RichText};

use crate::models::ReviewType;
use crate::pagination::{PageCell, Pager};
use crate::query::QueryKey;

pub mod api_test;
pub mod comments;
pub mod detail;
pub mod home;
pub mod input;
pub mod review_card;
pub mod reviews;
pub mod submit;

use super::{ReviewboardApp, ViewState};

impl ReviewboardApp {
    pub(crate) fn render_sign_in_required(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Sign-in required");
            ui.label("The server rejected the stored session token, so it has been cleared.");
            ui.label("Place a fresh token in the token file and try again.");
            ui.add_space(12.0);
            if ui.button("Go Home").clicked() {
                self.navigate(ViewState::Home);
            }
        });
    }
}

impl ReviewboardApp {
    /// One-line notice under data whose background refresh failed.
    pub(crate) fn render_refresh_failure(&mut self, ui: &mut egui::Ui, key: &QueryKey) {
        let Some(err) = self.queries.failure(key) else {
            return;
        };
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Showing saved data, refresh failed: {err}")).weak());
            if ui.small_button("Retry").clicked() {
                self.retry(key);
            }
        });
    }
}

/// "Mar 4, 2024" for API timestamps with or without an offset.
pub(crate) fn format_date(ts: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(ts, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    ts.to_string()
}

pub(crate) fn type_color(review_type: ReviewType) -> Color32 {
    match review_type {
        ReviewType::Positive => Color32::from_rgb(60, 160, 90),
        ReviewType::Negative => Color32::from_rgb(200, 70, 70),
        ReviewType::Mixed => Color32::from_rgb(210, 160, 40),
    }
}

pub(crate) fn badge(ui: &mut egui::Ui, text: &str, color: Color32) {
    egui::Frame::none()
        .fill(color.gamma_multiply(0.2))
        .rounding(6.0)
        .inner_margin(egui::vec2(6.0, 2.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).small().strong());
        });
}

pub(crate) fn field_error(ui: &mut egui::Ui, error: Option<&str>) {
    if let Some(message) = error {
        ui.colored_label(Color32::LIGHT_RED, message);
    }
}

/// Full-width failure box. Returns true when the action button was clicked.
pub(crate) fn error_panel(ui: &mut egui::Ui, title: &str, message: &str, action: &str) -> bool {
    let mut clicked = false;
    egui::Frame::group(ui.style())
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::vec2(16.0, 12.0))
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new(title).color(Color32::LIGHT_RED));
                ui.label(message);
                ui.add_space(6.0);
                clicked = ui.button(action).clicked();
            });
        });
    clicked
}

/// Previous / numbered cells / Next. Returns the page the user picked.
pub(crate) fn page_strip(ui: &mut egui::Ui, pager: Pager) -> Option<u32> {
    let mut picked = None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(pager.has_previous(), egui::Button::new("Previous"))
            .clicked()
        {
            picked = Some(pager.previous());
        }
        for cell in pager.cells() {
            match cell {
                PageCell::Page(page) => {
                    let label = (page + 1).to_string();
                    if ui.selectable_label(page == pager.page, label).clicked() && page != pager.page
                    {
                        picked = Some(page);
                    }
                }
                PageCell::Gap => {
                    ui.label("…");
                }
            }
        }
        if ui
            .add_enabled(pager.has_next(), egui::Button::new("Next"))
            .clicked()
        {
            picked = Some(pager.next());
        }
    });
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_in_api_shapes() {
        assert_eq!(format_date("2024-03-04T10:00:00Z"), "Mar 4, 2024");
        assert_eq!(format_date("2024-03-04T10:00:00.123456"), "Mar 4, 2024");
        assert_eq!(format_date("2024-03-04"), "Mar 4, 2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
