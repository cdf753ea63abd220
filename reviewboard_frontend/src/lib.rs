pub mod api;
pub mod api_check;
pub mod app;
pub mod auth;
pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod pagination;
pub mod query;
pub mod review_query;
pub mod submission;
pub mod threading;
pub mod transport;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use eframe::{self, egui};
use log::info;

pub use app::ReviewboardApp;

use crate::api::ApiClient;
use crate::auth::FileTokenStore;
use crate::config::FrontendConfig;

/// Launches the egui application with default window options.
pub fn run_frontend() -> Result<()> {
    run_frontend_with_options(default_native_options())
}

/// Launches the egui app with caller-provided options.
pub fn run_frontend_with_options(options: eframe::NativeOptions) -> Result<()> {
    let _ = env_logger::builder().is_test(false).try_init();

    let config = FrontendConfig::from_env();
    info!(
        "starting with API {} (stale after {:?})",
        config.api_base_url, config.stale_time
    );
    let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let api = ApiClient::new(config.api_base_url.clone(), config.request_timeout, tokens)
        .context("failed to initialise API client")?;

    eframe::run_native(
        "Reviewboard",
        options,
        Box::new(move |cc| Ok(Box::new(ReviewboardApp::new(cc, api, config)))),
    )
    .map_err(|err| anyhow!("window closed with error: {err}"))
}

fn default_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([760.0, 560.0]),
        ..Default::default()
    }
}
