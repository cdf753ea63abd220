use eframe::egui::{self, RichText};

use crate::models::{Page, Review, ReviewStats};
use crate::query::{Lookup, QueryKey};
use crate::review_query::ReviewListQuery;

use super::super::{ReviewboardApp, SubmitState, ViewState};
use super::input::company_search;
use super::review_card::{review_card, CardAction};

impl ReviewboardApp {
    pub(crate) fn render_home(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            ui.heading(RichText::new("Honest reviews of real workplaces").size(26.0));
            ui.label("Search a company to see what people say about working there.");
        });
        ui.add_space(8.0);

        let search = company_search(ui, &mut self.home_search_input, None, true);
        if search.submitted {
            if let Some(pick) = search.pick {
                self.open_reviews(ReviewListQuery::for_company(pick.name));
            }
        }
        ui.separator();

        // Both reads are spawned before either is drawn, so they load together.
        let stats_key = QueryKey::stats();
        let recent_key = QueryKey::recent_reviews();
        let stats = self.ensure::<ReviewStats, _>(&stats_key, |q| q.stats());
        let recent = self.ensure::<Page<Review>, _>(&recent_key, |q| q.recent_reviews());

        self.render_stats(ui, &stats_key, stats);
        ui.add_space(12.0);
        self.render_recent(ui, &recent_key, recent);
        ui.add_space(16.0);
        self.render_call_to_action(ui);
    }

    fn render_stats(&mut self, ui: &mut egui::Ui, key: &QueryKey, stats: Lookup<ReviewStats>) {
        match stats {
            Lookup::Fresh(stats) | Lookup::Stale(stats) => {
                egui::Grid::new("stats_grid")
                    .num_columns(4)
                    .spacing(egui::vec2(32.0, 4.0))
                    .show(ui, |ui| {
                        for (label, value) in [
                            ("Total Reviews", stats.total_reviews),
                            ("Companies", stats.total_companies),
                            ("Active Users", stats.active_users),
                            ("Reviews This Month", stats.reviews_this_month),
                        ] {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(value.to_string()).size(24.0).strong());
                                ui.label(label);
                            });
                        }
                        ui.end_row();
                    });
            }
            Lookup::Failed(err) => {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::LIGHT_RED, format!("Stats unavailable: {err}"));
                    if ui.button("Retry").clicked() {
                        self.retry(key);
                    }
                });
            }
            Lookup::Missing => {
                ui.add(egui::Spinner::new());
            }
        }
    }

    fn render_recent(&mut self, ui: &mut egui::Ui, key: &QueryKey, recent: Lookup<Page<Review>>) {
        ui.heading("Recent Reviews");
        match recent {
            Lookup::Fresh(page) | Lookup::Stale(page) => {
                if page.is_empty() {
                    ui.label("No reviews yet. Be the first to write one.");
                }
                let mut action = CardAction::None;
                for review in &page.content {
                    match review_card(ui, review) {
                        CardAction::None => {}
                        picked => action = picked,
                    }
                    ui.add_space(6.0);
                }
                match action {
                    CardAction::OpenReview(id) => self.open_review(id),
                    CardAction::OpenCompany(name) => {
                        self.open_reviews(ReviewListQuery::for_company(name))
                    }
                    CardAction::None => {}
                }
                if self.is_loading(key) {
                    ui.add(egui::Spinner::new());
                }
            }
            Lookup::Failed(err) => {
                ui.horizontal(|ui| {
                    ui.colored_label(
                        egui::Color32::LIGHT_RED,
                        format!("Could not load recent reviews: {err}"),
                    );
                    if ui.button("Retry").clicked() {
                        self.retry(key);
                    }
                });
            }
            Lookup::Missing => {
                ui.add(egui::Spinner::new());
            }
        }
    }

    fn render_call_to_action(&mut self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().faint_bg_color)
            .inner_margin(egui::vec2(16.0, 12.0))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Worked somewhere? Share your experience.");
                    ui.label("Reviews can be anonymous and help others decide.");
                    if ui.button("Write a Review").clicked() {
                        self.navigate(ViewState::Submit(SubmitState::default()));
                    }
                });
            });
    }
}
