use eframe::egui::{self, Color32, Key, Stroke};

use crate::models::CompanyPick;

pub(crate) struct CompanySearchResponse {
    /// What the box currently holds; `None` while it is blank.
    pub pick: Option<CompanyPick>,
    /// Enter was pressed or the Search button clicked.
    pub submitted: bool,
}

/// Company name box with an optional Search button.
pub(crate) fn company_search(
    ui: &mut egui::Ui,
    text: &mut String,
    error: Option<&str>,
    with_button: bool,
) -> CompanySearchResponse {
    let mut submitted = false;
    ui.horizontal(|ui| {
        let edit = egui::TextEdit::singleline(text)
            .hint_text("Enter company name...")
            .desired_width(280.0);
        let response = egui::Frame::none()
            .stroke(if error.is_some() {
                Stroke::new(1.0, Color32::LIGHT_RED)
            } else {
                Stroke::NONE
            })
            .show(ui, |ui| ui.add(edit))
            .inner;
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            submitted = true;
        }
        if with_button && ui.button("Search").clicked() {
            submitted = true;
        }
    });
    super::field_error(ui, error);

    CompanySearchResponse {
        pick: CompanyPick::from_input(text),
        submitted,
    }
}
