use eframe::egui::{self, RichText};

use crate::models::{Page, Review, ReviewType};
use crate::pagination::Pager;
use crate::query::Lookup;
use crate::review_query::{ReviewListQuery, SortOrder};

use super::super::{ReviewboardApp, ViewState};
use super::input::company_search;
use super::review_card::{review_card, CardAction};
use super::{error_panel, page_strip};

impl ReviewboardApp {
    pub(crate) fn render_reviews(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.list_query.heading());
        ui.add_space(4.0);
        self.render_list_filters(ui);
        ui.separator();

        let key = self.list_query.query_key();
        let lookup = self.ensure::<Page<Review>, _>(&key, {
            let query = self.list_query.clone();
            move |q| q.reviews(&query)
        });

        let page = match lookup {
            Lookup::Fresh(page) | Lookup::Stale(page) => page,
            Lookup::Failed(err) => {
                let go_home = error_panel(
                    ui,
                    "Could not load reviews",
                    &err.to_string(),
                    "Back to Home",
                );
                if go_home {
                    // Coming back to the list should fetch it again.
                    self.retry(&key);
                    self.navigate(ViewState::Home);
                }
                return;
            }
            Lookup::Missing => {
                ui.add(egui::Spinner::new());
                return;
            }
        };

        self.render_refresh_failure(ui, &key);

        if page.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.label(RichText::new("No reviews found").strong());
                ui.label("Try a different company or clear the filters.");
            });
            return;
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
            CardAction::OpenCompany(name) => self.open_reviews(ReviewListQuery::for_company(name)),
            CardAction::None => {}
        }

        ui.add_space(8.0);
        if let Some(target) = page_strip(ui, Pager::new(self.list_query.page(), page.total_pages)) {
            self.list_query.set_page(target, page.total_pages);
        }
    }

    fn render_list_filters(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let search = company_search(ui, &mut self.list_search_input, None, true);
            if search.submitted {
                match search.pick {
                    Some(pick) => self.list_query.set_company_name(&pick.name),
                    None => self.list_query.clear_search(),
                }
            }
            if !self.list_query.company_name().is_empty() && ui.button("Clear").clicked() {
                self.list_search_input.clear();
                self.list_query.clear_search();
            }
        });

        ui.horizontal(|ui| {
            let mut sort = self.list_query.sort();
            egui::ComboBox::from_label("Sort")
                .selected_text(sort.label())
                .show_ui(ui, |ui| {
                    for option in SortOrder::ALL {
                        ui.selectable_value(&mut sort, option, option.label());
                    }
                });
            if sort != self.list_query.sort() {
                self.list_query.set_sort(sort);
            }

            let mut review_type = self.list_query.review_type();
            egui::ComboBox::from_label("Type")
                .selected_text(review_type.map_or("All types", |t| t.label()))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut review_type, None, "All types");
                    for option in ReviewType::ALL {
                        ui.selectable_value(&mut review_type, Some(option), option.label());
                    }
                });
            if review_type != self.list_query.review_type() {
                self.list_query.set_review_type(review_type);
            }
        });
    }
}
