use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::editor::MarkupEditor;
use crate::models::{CreateReviewPayload, EmploymentStatus, ReviewType};

pub const MIN_TITLE_LENGTH: usize = 5;
pub const MAX_TITLE_LENGTH: usize = 100;
pub const MIN_CONTENT_LENGTH: usize = 50;
pub const MAX_CONTENT_LENGTH: usize = 5000;

const SUBMITTER_IP: &str = "127.0.0.1";
const ANONYMOUS: &str = "Anonymous";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field name (as the server spells it) to message.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStep {
    #[default]
    Basics,
    Author,
    Content,
}

impl FormStep {
    pub const ALL: [FormStep; 3] = [FormStep::Basics, FormStep::Author, FormStep::Content];

    pub fn number(&self) -> usize {
        match self {
            FormStep::Basics => 1,
            FormStep::Author => 2,
            FormStep::Content => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormStep::Basics => "Basic Information",
            FormStep::Author => "About You",
            FormStep::Content => "Your Review",
        }
    }
}

/// What pressing Next did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Invalid,
    Moved(FormStep),
    Ready(CreateReviewPayload),
}

#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub step: FormStep,
    pub company_name: String,
    pub website: String,
    pub title: String,
    pub review_type: ReviewType,
    pub share_name: bool,
    pub reviewer_name: String,
    pub is_employee: bool,
    pub employment: EmploymentStatus,
    /// `YYYY-MM-DD` as typed.
    pub work_start_date: String,
    pub work_end_date: String,
    pub dept: String,
    pub role: String,
    pub editor: MarkupEditor,
    pub errors: FieldErrors,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            step: FormStep::Basics,
            company_name: String::new(),
            website: String::new(),
            title: String::new(),
            review_type: ReviewType::Mixed,
            share_name: false,
            reviewer_name: String::new(),
            is_employee: false,
            employment: EmploymentStatus::Current,
            work_start_date: String::new(),
            work_end_date: String::new(),
            dept: String::new(),
            role: String::new(),
            editor: MarkupEditor::default(),
            errors: FieldErrors::new(),
        }
    }
}

impl ReviewDraft {
    pub fn content_html(&self) -> String {
        self.editor.to_html()
    }

    pub fn title_len(&self) -> usize {
        self.title.chars().count()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Validates the current step and either advances or yields the payload.
    pub fn next(&mut self) -> StepOutcome {
        self.errors = self.validate_step();
        if !self.errors.is_empty() {
            return StepOutcome::Invalid;
        }
        match self.step {
            FormStep::Basics => {
                self.step = FormStep::Author;
                StepOutcome::Moved(self.step)
            }
            FormStep::Author => {
                self.step = FormStep::Content;
                StepOutcome::Moved(self.step)
            }
            FormStep::Content => StepOutcome::Ready(self.to_payload()),
        }
    }

    pub fn back(&mut self) {
        self.step = match self.step {
            FormStep::Basics | FormStep::Author => FormStep::Basics,
            FormStep::Content => FormStep::Author,
        };
        self.errors.clear();
    }

    /// Places field errors returned by the server. Fields of earlier steps
    /// send the user back to the first step that has one.
    pub fn apply_server_errors(&mut self, fields: &BTreeMap<String, String>) {
        self.errors = fields.clone();
        if let Some(step) = FormStep::ALL
            .into_iter()
            .find(|step| fields.keys().any(|field| field_step(field) == Some(*step)))
        {
            self.step = step;
        }
    }

    pub fn validate_step(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match self.step {
            FormStep::Basics => {
                if self.company_name.trim().is_empty() {
                    errors.insert("companyName".into(), "Please enter a company name".into());
                }
                let len = self.title_len();
                if self.title.trim().is_empty() {
                    errors.insert("title".into(), "Title is required".into());
                } else if len < MIN_TITLE_LENGTH {
                    errors.insert(
                        "title".into(),
                        format!("Title must be at least {MIN_TITLE_LENGTH} characters long"),
                    );
                } else if len > MAX_TITLE_LENGTH {
                    errors.insert(
                        "title".into(),
                        format!("Title must not exceed {MAX_TITLE_LENGTH} characters"),
                    );
                }
            }
            FormStep::Author => {
                if self.share_name && self.reviewer_name.trim().is_empty() {
                    errors.insert("reviewerName".into(), "Please enter your name".into());
                }
                if self.is_employee {
                    self.validate_employment(&mut errors);
                }
            }
            FormStep::Content => {
                let html = self.content_html();
                let len = html.chars().count();
                if html.trim().is_empty() {
                    errors.insert("content".into(), "Content is required".into());
                } else if len < MIN_CONTENT_LENGTH {
                    errors.insert(
                        "content".into(),
                        format!(
                            "Review content must be at least {MIN_CONTENT_LENGTH} characters long"
                        ),
                    );
                } else if len > MAX_CONTENT_LENGTH {
                    errors.insert(
                        "content".into(),
                        format!("Review content must not exceed {MAX_CONTENT_LENGTH} characters"),
                    );
                }
            }
        }
        errors
    }

    fn validate_employment(&self, errors: &mut FieldErrors) {
        let start = parse_date(&self.work_start_date);
        let end = parse_date(&self.work_end_date);

        match start {
            DateField::Empty => {
                errors.insert("workStartDate".into(), "Please enter your joining date".into());
            }
            DateField::Invalid => {
                errors.insert("workStartDate".into(), "Use the format YYYY-MM-DD".into());
            }
            DateField::Valid(_) => {}
        }

        if self.employment == EmploymentStatus::Former {
            match end {
                DateField::Empty => {
                    errors.insert("workEndDate".into(), "Please enter your end date".into());
                }
                DateField::Invalid => {
                    errors.insert("workEndDate".into(), "Use the format YYYY-MM-DD".into());
                }
                DateField::Valid(end) => {
                    if let DateField::Valid(start) = start {
                        if end <= start {
                            errors.insert(
                                "workEndDate".into(),
                                "End date must be after start date".into(),
                            );
                        }
                    }
                }
            }
        }

        if self.dept.trim().is_empty() {
            errors.insert("dept".into(), "Department is required for employees".into());
        }
        if self.role.trim().is_empty() {
            errors.insert("role".into(), "Role is required for employees".into());
        }
    }

    /// Request body for the create-review call. Employment fields are only
    /// sent for employees, the end date only for former ones.
    pub fn to_payload(&self) -> CreateReviewPayload {
        let employee = |value: &str| self.is_employee.then(|| value.trim().to_string());
        let former = self.is_employee && self.employment == EmploymentStatus::Former;
        let website = self.website.trim();

        CreateReviewPayload {
            review_type: self.review_type,
            title: self.title.trim().to_string(),
            content: self.content_html(),
            ip_address: SUBMITTER_IP.to_string(),
            dept: employee(&self.dept),
            role: employee(&self.role),
            company_name: self.company_name.trim().to_string(),
            website: (!website.is_empty()).then(|| website.to_string()),
            is_employee: self.is_employee,
            work_start_date: if self.is_employee {
                start_of_day(&self.work_start_date)
            } else {
                None
            },
            work_end_date: if former {
                start_of_day(&self.work_end_date)
            } else {
                None
            },
            reviewer_name: if self.share_name {
                self.reviewer_name.trim().to_string()
            } else {
                ANONYMOUS.to_string()
            },
        }
    }
}

enum DateField {
    Empty,
    Invalid,
    Valid(NaiveDate),
}

fn parse_date(raw: &str) -> DateField {
    let raw = raw.trim();
    if raw.is_empty() {
        return DateField::Empty;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => DateField::Valid(date),
        Err(_) => DateField::Invalid,
    }
}

/// `2021-03-04` becomes `2021-03-04T00:00:00.000Z`.
fn start_of_day(raw: &str) -> Option<String> {
    match parse_date(raw) {
        DateField::Valid(date) => Some(format!("{}T00:00:00.000Z", date.format(DATE_FORMAT))),
        _ => None,
    }
}

fn field_step(field: &str) -> Option<FormStep> {
    match field {
        "companyName" | "website" | "title" | "reviewType" => Some(FormStep::Basics),
        "reviewerName" | "isEmployee" | "workStartDate" | "workEndDate" | "dept" | "role" => {
            Some(FormStep::Author)
        }
        "content" => Some(FormStep::Content),
        _ => None,
    }
}
