use eframe::egui::{self, Color32, RichText};

use crate::editor::{Alignment, ToolbarAction};
use crate::models::{EmploymentStatus, ReviewType};
use crate::query::Mutation;
use crate::submission::{
    FormStep, StepOutcome, MAX_CONTENT_LENGTH, MAX_TITLE_LENGTH, MIN_CONTENT_LENGTH,
};

use super::super::{ReviewboardApp, SubmitState};
use super::field_error;
use super::input::company_search;

impl ReviewboardApp {
    pub(crate) fn render_submit(&mut self, ui: &mut egui::Ui, state: &mut SubmitState) {
        ui.heading("Write a Review");
        render_progress(ui, state.draft.step);
        ui.separator();

        match state.draft.step {
            FormStep::Basics => render_basics(ui, state),
            FormStep::Author => render_author(ui, state),
            FormStep::Content => render_content(ui, state),
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if state.draft.step != FormStep::Basics
                && ui
                    .add_enabled(!state.submitting, egui::Button::new("Back"))
                    .clicked()
            {
                state.draft.back();
            }
            let last = state.draft.step == FormStep::Content;
            let label = match (last, state.submitting) {
                (true, true) => "Submitting...",
                (true, false) => "Submit Review",
                _ => "Next",
            };
            if ui
                .add_enabled(!state.submitting, egui::Button::new(label))
                .clicked()
            {
                if let StepOutcome::Ready(payload) = state.draft.next() {
                    state.submitting = true;
                    self.mutate(Mutation::CreateReview(payload));
                }
            }
        });
    }
}

fn render_progress(ui: &mut egui::Ui, current: FormStep) {
    ui.horizontal(|ui| {
        for step in FormStep::ALL {
            let text = format!("{}. {}", step.number(), step.title());
            let text = if step == current {
                RichText::new(text).strong()
            } else if step.number() < current.number() {
                RichText::new(text).color(Color32::from_rgb(60, 160, 90))
            } else {
                RichText::new(text).weak()
            };
            ui.label(text);
            if step != FormStep::Content {
                ui.label("→");
            }
        }
    });
}

fn render_basics(ui: &mut egui::Ui, state: &mut SubmitState) {
    let draft = &mut state.draft;

    ui.label("Company");
    company_search(
        ui,
        &mut draft.company_name,
        draft.errors.get("companyName").map(String::as_str),
        false,
    );

    ui.add_space(6.0);
    ui.label("Website (optional)");
    ui.text_edit_singleline(&mut draft.website);
    field_error(ui, draft.error("website"));

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label("Title");
        ui.label(
            RichText::new(format!("{}/{}", draft.title_len(), MAX_TITLE_LENGTH)).weak(),
        );
    });
    ui.add(
        egui::TextEdit::singleline(&mut draft.title)
            .hint_text("Summarise your experience")
            .desired_width(f32::INFINITY),
    );
    field_error(ui, draft.error("title"));

    ui.add_space(6.0);
    ui.label("Overall experience");
    ui.horizontal(|ui| {
        for review_type in ReviewType::ALL {
            ui.radio_value(&mut draft.review_type, review_type, review_type.label());
        }
    });
}

fn render_author(ui: &mut egui::Ui, state: &mut SubmitState) {
    let draft = &mut state.draft;

    ui.checkbox(&mut draft.share_name, "Share my name with this review");
    if draft.share_name {
        ui.label("Your name");
        ui.text_edit_singleline(&mut draft.reviewer_name);
        field_error(ui, draft.error("reviewerName"));
    } else {
        ui.label(RichText::new("The review will be posted as Anonymous.").weak());
    }

    ui.add_space(8.0);
    ui.checkbox(&mut draft.is_employee, "I work or worked at this company");
    if !draft.is_employee {
        return;
    }

    ui.horizontal(|ui| {
        ui.label("Status");
        ui.radio_value(&mut draft.employment, EmploymentStatus::Current, "Current");
        ui.radio_value(&mut draft.employment, EmploymentStatus::Former, "Former");
    });

    egui::Grid::new("employment_fields")
        .num_columns(2)
        .spacing(egui::vec2(12.0, 6.0))
        .show(ui, |ui| {
            ui.label("Joining date");
            ui.add(egui::TextEdit::singleline(&mut draft.work_start_date).hint_text("YYYY-MM-DD"));
            ui.end_row();
            if draft.employment == EmploymentStatus::Former {
                ui.label("End date");
                ui.add(egui::TextEdit::singleline(&mut draft.work_end_date).hint_text("YYYY-MM-DD"));
                ui.end_row();
            }
            ui.label("Department");
            ui.text_edit_singleline(&mut draft.dept);
            ui.end_row();
            ui.label("Role");
            ui.text_edit_singleline(&mut draft.role);
            ui.end_row();
        });
    for field in ["workStartDate", "workEndDate", "dept", "role"] {
        field_error(ui, draft.error(field));
    }
}

fn render_content(ui: &mut egui::Ui, state: &mut SubmitState) {
    let selection = state.selection.clone();
    if let Some(action) = render_toolbar(ui, state) {
        state.draft.editor.apply(action, selection);
    }

    let before = state.draft.editor.text.clone();
    let output = egui::TextEdit::multiline(&mut state.draft.editor.text)
        .hint_text("Share the details. Blank lines separate paragraphs; toolbar buttons wrap the selection.")
        .desired_rows(14)
        .desired_width(f32::INFINITY)
        .code_editor()
        .show(ui);
    if output.response.changed() {
        state.draft.editor.record_edit(before);
    }
    if let Some(range) = output.cursor_range {
        let (a, b) = (range.primary.ccursor.index, range.secondary.ccursor.index);
        state.selection = a.min(b)..a.max(b);
    }

    let html_len = state.draft.content_html().chars().count();
    let visible = state.draft.editor.plain_len();
    let color = if (MIN_CONTENT_LENGTH..=MAX_CONTENT_LENGTH).contains(&html_len) {
        ui.visuals().weak_text_color()
    } else {
        Color32::from_rgb(210, 160, 40)
    };
    ui.label(
        RichText::new(format!(
            "{visible} characters (minimum {MIN_CONTENT_LENGTH}, maximum {MAX_CONTENT_LENGTH})"
        ))
        .color(color),
    );
    field_error(ui, state.draft.error("content"));
}

fn render_toolbar(ui: &mut egui::Ui, state: &mut SubmitState) -> Option<ToolbarAction> {
    let mut action = None;
    ui.horizontal_wrapped(|ui| {
        let mut button = |ui: &mut egui::Ui, label: RichText, hint: &str, value: ToolbarAction| {
            if ui.button(label).on_hover_text(hint).clicked() {
                action = Some(value);
            }
        };
        button(ui, RichText::new("B").strong(), "Bold", ToolbarAction::Bold);
        button(ui, RichText::new("I").italics(), "Italic", ToolbarAction::Italic);
        button(ui, RichText::new("U").underline(), "Underline", ToolbarAction::Underline);
        button(ui, RichText::new("S").strikethrough(), "Strikethrough", ToolbarAction::Strike);
        ui.separator();
        for level in 1..=3u8 {
            button(
                ui,
                RichText::new(format!("H{level}")),
                &format!("Heading {level}"),
                ToolbarAction::Heading(level),
            );
        }
        ui.separator();
        button(ui, RichText::new("⬅"), "Align left", ToolbarAction::Align(Alignment::Left));
        button(ui, RichText::new("↔"), "Align center", ToolbarAction::Align(Alignment::Center));
        button(ui, RichText::new("➡"), "Align right", ToolbarAction::Align(Alignment::Right));
        ui.separator();
        button(ui, RichText::new("•"), "Bullet list", ToolbarAction::BulletList);
        button(ui, RichText::new("1."), "Numbered list", ToolbarAction::OrderedList);
        button(ui, RichText::new("❝"), "Quote", ToolbarAction::Quote);
        button(ui, RichText::new("</>"), "Code block", ToolbarAction::CodeBlock);
        ui.separator();
        ui.add(
            egui::TextEdit::singleline(&mut state.link_input)
                .hint_text("https://")
                .desired_width(140.0),
        );
        let url = state.link_input.trim().to_string();
        if ui
            .add_enabled(!url.is_empty(), egui::Button::new("Link"))
            .on_hover_text("Link the selected text")
            .clicked()
        {
            action = Some(ToolbarAction::Link(url));
            state.link_input.clear();
        }
        ui.separator();
        let editor = &state.draft.editor;
        if ui.add_enabled(editor.can_undo(), egui::Button::new("↶")).on_hover_text("Undo").clicked() {
            action = Some(ToolbarAction::Undo);
        }
        if ui.add_enabled(editor.can_redo(), egui::Button::new("↷")).on_hover_text("Redo").clicked() {
            action = Some(ToolbarAction::Redo);
        }
    });
    action
}
