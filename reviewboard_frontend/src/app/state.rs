use std::collections::HashMap;

use crate::api_check::{ApiCheck, CheckReport};
use crate::submission::ReviewDraft;
use crate::threading::ExpandedReplies;

pub enum ViewState {
    Home,
    /// Filters live on the app so they survive navigation and restarts.
    Reviews,
    ReviewDetail(DetailState),
    Submit(SubmitState),
    ApiTest(ApiTestState),
    SignInRequired,
}

impl ViewState {
    pub fn title(&self) -> &'static str {
        match self {
            ViewState::Home => "Home",
            ViewState::Reviews => "Reviews",
            ViewState::ReviewDetail(_) => "Review",
            ViewState::Submit(_) => "Write a Review",
            ViewState::ApiTest(_) => "API Test",
            ViewState::SignInRequired => "Sign in",
        }
    }
}

pub struct DetailState {
    pub review_id: i64,
    pub comment_page: u32,
    pub expanded: ExpandedReplies,
    pub comment_input: String,
    pub comment_error: Option<String>,
    /// Comment whose reply form is open.
    pub replying_to: Option<i64>,
    pub reply_inputs: HashMap<i64, String>,
    pub reply_error: Option<String>,
    pub orphans_logged: bool,
}

impl DetailState {
    pub fn new(review_id: i64) -> Self {
        Self {
            review_id,
            comment_page: 0,
            expanded: ExpandedReplies::default(),
            comment_input: String::new(),
            comment_error: None,
            replying_to: None,
            reply_inputs: HashMap::new(),
            reply_error: None,
            orphans_logged: false,
        }
    }
}

#[derive(Default)]
pub struct SubmitState {
    pub draft: ReviewDraft,
    pub submitting: bool,
    pub link_input: String,
    /// Last known selection in the editor, in characters.
    pub selection: std::ops::Range<usize>,
}

pub enum CheckRun {
    Running,
    Done(CheckReport),
    Failed(String),
}

#[derive(Default)]
pub struct ApiTestState {
    pub runs: HashMap<ApiCheck, CheckRun>,
}

impl ApiTestState {
    pub fn is_running(&self, check: ApiCheck) -> bool {
        matches!(self.runs.get(&check), Some(CheckRun::Running))
    }
}
