use log::{debug, error, info};

use crate::api_check::{ApiCheck, CheckReport};
use crate::error::ApiError;
use crate::query::{Mutation, MutationOutput, QueryKey};

use super::state::{CheckRun, ViewState};
use super::ReviewboardApp;

pub enum AppMessage {
    /// A background read finished; its value (or failure) is in the cache.
    QuerySettled {
        key: QueryKey,
        error: Option<ApiError>,
    },
    MutationFinished {
        mutation: Mutation,
        result: Result<MutationOutput, ApiError>,
    },
    CheckFinished {
        check: ApiCheck,
        result: Result<CheckReport, ApiError>,
    },
}

pub(super) fn process_messages(app: &mut ReviewboardApp) {
    while let Ok(message) = app.rx.try_recv() {
        match message {
            AppMessage::QuerySettled { key, error } => {
                app.pending.remove(&key);
                match error {
                    None => debug!("query {key} settled"),
                    Some(ApiError::Unauthorized) => app.require_sign_in(),
                    // Rendered by the view itself.
                    Some(ApiError::NotFound) => debug!("query {key}: not found"),
                    Some(err) => {
                        error!("query {key} failed: {err}");
                        app.notifications.error(format!("Failed to load data: {err}"));
                    }
                }
            }
            AppMessage::MutationFinished { mutation, result } => {
                app.mutations.retain(|m| m != &mutation);
                handle_mutation(app, mutation, result);
            }
            AppMessage::CheckFinished { check, result } => {
                if let ViewState::ApiTest(state) = &mut app.view {
                    let run = match result {
                        Ok(report) => CheckRun::Done(report),
                        Err(err) => {
                            error!("{} test failed: {err}", check.name());
                            CheckRun::Failed(err.to_string())
                        }
                    };
                    state.runs.insert(check, run);
                }
            }
        }
    }
}

fn handle_mutation(
    app: &mut ReviewboardApp,
    mutation: Mutation,
    result: Result<MutationOutput, ApiError>,
) {
    match result {
        Ok(_) => {
            app.notifications.success(mutation.success_message());
            match &mutation {
                Mutation::CreateReview(_) => {
                    let view = std::mem::replace(&mut app.view, ViewState::Home);
                    app.view = view_after_submission(view);
                }
                Mutation::CreateComment { review_id, input } => {
                    if let ViewState::ReviewDetail(state) = &mut app.view {
                        if state.review_id == *review_id {
                            match input.parent_id {
                                Some(parent) => {
                                    state.reply_inputs.remove(&parent);
                                    state.replying_to = None;
                                    state.reply_error = None;
                                    if !state.expanded.is_expanded(parent) {
                                        state.expanded.toggle(parent);
                                    }
                                }
                                None => {
                                    state.comment_input.clear();
                                    state.comment_error = None;
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        Err(ApiError::Unauthorized) => {
            app.notifications.error(mutation.failure_message());
            app.require_sign_in();
        }
        Err(err) => {
            error!("{}: {err}", mutation.failure_message());
            app.notifications.error(mutation.failure_message());
            match (&mutation, &mut app.view) {
                (Mutation::CreateReview(_), ViewState::Submit(state)) => {
                    state.submitting = false;
                    let fields = err.field_errors();
                    if !fields.is_empty() {
                        state.draft.apply_server_errors(&fields);
                    }
                }
                (Mutation::CreateComment { input, .. }, ViewState::ReviewDetail(state)) => {
                    let message = err.to_string();
                    if input.parent_id.is_some() {
                        state.reply_error = Some(message);
                    } else {
                        state.comment_error = Some(message);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Only a user still looking at the form is taken home once it is accepted.
fn view_after_submission(view: ViewState) -> ViewState {
    match view {
        ViewState::Submit(_) => {
            info!("review submitted, returning home");
            ViewState::Home
        }
        other => other,
    }
}
