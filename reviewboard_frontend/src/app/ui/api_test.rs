use eframe::egui::{self, Color32, RichText};

use crate::api_check::ApiCheck;

use super::super::{ApiTestState, CheckRun, ReviewboardApp};

impl ReviewboardApp {
    pub(crate) fn render_api_test(&mut self, ui: &mut egui::Ui, state: &mut ApiTestState) {
        ui.heading("API Tests");
        egui::Frame::group(ui.style())
            .fill(ui.visuals().faint_bg_color)
            .show(ui, |ui| {
                ui.label(RichText::new("API Configuration").strong());
                ui.label(format!("Base URL: {}", self.queries.api().base_url()));
            });
        ui.add_space(8.0);

        for check in ApiCheck::ALL {
            egui::Frame::group(ui.style())
                .inner_margin(egui::vec2(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(check.name()).strong().size(16.0));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let running = state.is_running(check);
                            let label = if running { "Running..." } else { "Run Test" };
                            if ui.add_enabled(!running, egui::Button::new(label)).clicked() {
                                self.run_check(state, check);
                            }
                        });
                    });
                    render_run(ui, check, state.runs.get(&check));
                });
            ui.add_space(6.0);
        }
    }
}

fn render_run(ui: &mut egui::Ui, check: ApiCheck, run: Option<&CheckRun>) {
    match run {
        None => {}
        Some(CheckRun::Running) => {
            ui.add(egui::Spinner::new());
        }
        Some(CheckRun::Failed(message)) => {
            ui.colored_label(Color32::LIGHT_RED, RichText::new("Error:").strong());
            ui.colored_label(Color32::LIGHT_RED, message.as_str());
        }
        Some(CheckRun::Done(report)) => {
            if !report.warnings.is_empty() {
                ui.colored_label(
                    Color32::from_rgb(210, 160, 40),
                    RichText::new("Validation Warnings:").strong(),
                );
                for warning in &report.warnings {
                    ui.colored_label(Color32::from_rgb(210, 160, 40), format!("• {warning}"));
                }
            }
            ui.label(RichText::new("Response:").strong());
            egui::ScrollArea::vertical()
                .id_salt(("api_check_response", check.name()))
                .max_height(320.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(report.pretty()).monospace());
                });
        }
    }
}
