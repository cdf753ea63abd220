use std::any::Any;
use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use eframe::egui::{self, Color32, Context, RichText};
use log::{info, warn};

use crate::api::ApiClient;
use crate::api_check::ApiCheck;
use crate::config::FrontendConfig;
use crate::error::ApiError;
use crate::query::{Clock, Lookup, Mutation, QueryClient, QueryKey, SystemClock};
use crate::review_query::ReviewListQuery;

mod messages;
mod notifications;
mod state;
mod tasks;
mod ui;

use messages::AppMessage;
use notifications::{Level, Notifications};
use state::{ApiTestState, CheckRun, DetailState, SubmitState, ViewState};

const BASE_URL_STORAGE_KEY: &str = "api_base_url";
const LIST_QUERY_STORAGE_KEY: &str = "review_list_query";

pub struct ReviewboardApp {
    queries: QueryClient,
    config: FrontendConfig,
    clock: Arc<dyn Clock>,
    ctx: Context,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    view: ViewState,
    /// Navigation requested while the current view was being drawn.
    next_view: Option<ViewState>,
    /// Reads spawned and not yet settled.
    pending: HashSet<QueryKey>,
    /// Writes spawned and not yet finished.
    mutations: Vec<Mutation>,
    notifications: Notifications,
    base_url_input: String,
    list_query: ReviewListQuery,
    list_search_input: String,
    home_search_input: String,
}

impl ReviewboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, api: ApiClient, config: FrontendConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let (tx, rx) = mpsc::channel();

        let stored_url = cc
            .storage
            .and_then(|s| eframe::get_value::<String>(s, BASE_URL_STORAGE_KEY));
        let list_query = cc
            .storage
            .and_then(|s| eframe::get_value::<ReviewListQuery>(s, LIST_QUERY_STORAGE_KEY))
            .unwrap_or_default();

        let mut api = api;
        if let Some(url) = stored_url {
            if let Err(err) = api.set_base_url(url.clone()) {
                warn!("ignoring stored API URL {url:?}: {err}");
            }
        }

        let queries = QueryClient::new(api, clock.clone(), config.stale_time, config.retry);
        let base_url_input = queries.api().base_url().to_string();
        let list_search_input = list_query.company_name().to_string();

        Self {
            queries,
            config,
            notifications: Notifications::new(clock.clone()),
            clock,
            ctx: cc.egui_ctx.clone(),
            tx,
            rx,
            view: ViewState::Home,
            next_view: None,
            pending: HashSet::new(),
            mutations: Vec::new(),
            base_url_input,
            list_query,
            list_search_input,
            home_search_input: String::new(),
        }
    }

    /// Cached value for `key`, spawning a background read when it is
    /// missing or stale, no read for it is running yet and its last read
    /// did not fail.
    fn ensure<T, F>(&mut self, key: &QueryKey, read: F) -> Lookup<T>
    where
        T: Any + Send + Sync,
        F: FnOnce(&QueryClient) -> Result<Arc<T>, ApiError> + Send + 'static,
    {
        let lookup = self.queries.read::<T>(key);
        if lookup.needs_fetch()
            && self.queries.failure(key).is_none()
            && self.pending.insert(key.clone())
        {
            tasks::load(
                self.queries.clone(),
                self.tx.clone(),
                self.ctx.clone(),
                key.clone(),
                read,
            );
        }
        lookup
    }

    fn is_loading(&self, key: &QueryKey) -> bool {
        self.pending.contains(key)
    }

    /// Forgets a failed read so the next frame fetches it again.
    fn retry(&mut self, key: &QueryKey) {
        self.queries.clear_error(key);
    }

    fn mutate(&mut self, mutation: Mutation) {
        if self.mutations.contains(&mutation) {
            return;
        }
        self.mutations.push(mutation.clone());
        tasks::mutate(
            self.queries.clone(),
            self.tx.clone(),
            self.ctx.clone(),
            mutation,
        );
    }

    fn is_mutating(&self, mutation: &Mutation) -> bool {
        self.mutations.contains(mutation)
    }

    fn run_check(&mut self, state: &mut ApiTestState, check: ApiCheck) {
        if state.is_running(check) {
            return;
        }
        state.runs.insert(check, CheckRun::Running);
        tasks::run_check(
            self.queries.clone(),
            self.tx.clone(),
            self.ctx.clone(),
            check,
        );
    }

    fn navigate(&mut self, view: ViewState) {
        self.next_view = Some(view);
    }

    fn open_review(&mut self, id: i64) {
        self.navigate(ViewState::ReviewDetail(DetailState::new(id)));
    }

    fn open_reviews(&mut self, query: ReviewListQuery) {
        self.list_search_input = query.company_name().to_string();
        self.list_query = query;
        self.navigate(ViewState::Reviews);
    }

    fn require_sign_in(&mut self) {
        if !matches!(self.view, ViewState::SignInRequired) {
            warn!("session rejected by the API; stored token cleared");
            self.view = ViewState::SignInRequired;
        }
    }

    /// Points the app at another server. Cached data belongs to the old one,
    /// so the query client starts over with an empty cache.
    fn apply_base_url(&mut self) {
        let mut api = self.queries.api().clone();
        match api.set_base_url(self.base_url_input.clone()) {
            Ok(()) => {
                info!("API base URL set to {}", api.base_url());
                self.base_url_input = api.base_url().to_string();
                self.queries = QueryClient::new(
                    api,
                    self.clock.clone(),
                    self.config.stale_time,
                    self.config.retry,
                );
                self.pending.clear();
                self.notifications.info("API URL updated");
            }
            Err(err) => {
                self.notifications
                    .error(format!("Failed to update URL: {err:#}"));
            }
        }
    }

    fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    fn render_top_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Reviewboard");
                ui.separator();
                let current = self.view.title();
                if ui.selectable_label(current == "Home", "Home").clicked() {
                    self.navigate(ViewState::Home);
                }
                if ui.selectable_label(current == "Reviews", "Reviews").clicked() {
                    let query = self.list_query.clone();
                    self.open_reviews(query);
                }
                if ui
                    .selectable_label(current == "Write a Review", "Write a Review")
                    .clicked()
                {
                    self.navigate(ViewState::Submit(SubmitState::default()));
                }
                if ui.selectable_label(current == "API Test", "API Test").clicked() {
                    self.navigate(ViewState::ApiTest(ApiTestState::default()));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Apply").clicked() {
                        self.apply_base_url();
                    }
                    ui.add(
                        egui::TextEdit::singleline(&mut self.base_url_input).desired_width(260.0),
                    );
                    ui.label("API Base URL");
                });
            });

            self.render_notifications(ui);
        });
    }

    fn render_notifications(&mut self, ui: &mut egui::Ui) {
        if let Some(next_expiry) = self.notifications.expire() {
            ui.ctx().request_repaint_after(next_expiry);
        }
        let mut dismissed = Vec::new();
        for note in self.notifications.items() {
            let color = match note.level {
                Level::Success => Color32::from_rgb(80, 170, 90),
                Level::Error => Color32::LIGHT_RED,
                Level::Info => ui.visuals().text_color(),
            };
            egui::Frame::group(ui.style())
                .fill(ui.visuals().extreme_bg_color)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(note.text.as_str()).color(color));
                        if ui.button("Dismiss").clicked() {
                            dismissed.push(note.id);
                        }
                    });
                });
        }
        for id in dismissed {
            self.notifications.dismiss(id);
        }
    }
}

impl eframe::App for ReviewboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();
        self.render_top_bar(ctx);

        let mut view = std::mem::replace(&mut self.view, ViewState::Home);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match &mut view {
                    ViewState::Home => self.render_home(ui),
                    ViewState::Reviews => self.render_reviews(ui),
                    ViewState::ReviewDetail(state) => self.render_detail(ui, state),
                    ViewState::Submit(state) => self.render_submit(ui, state),
                    ViewState::ApiTest(state) => self.render_api_test(ui, state),
                    ViewState::SignInRequired => self.render_sign_in_required(ui),
                });
        });
        self.view = self.next_view.take().unwrap_or(view);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, BASE_URL_STORAGE_KEY, &self.queries.api().base_url());
        eframe::set_value(storage, LIST_QUERY_STORAGE_KEY, &self.list_query);
    }
}
