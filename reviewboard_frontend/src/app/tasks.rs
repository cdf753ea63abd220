use std::any::Any;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use eframe::egui::Context;
use log::error;

use crate::api_check::ApiCheck;
use crate::error::ApiError;
use crate::query::{Mutation, QueryClient, QueryKey};

use super::messages::AppMessage;

/// Runs a cached read on a worker thread. The value lands in the query
/// cache; the message only tells the UI the key has settled.
pub fn load<T, F>(
    queries: QueryClient,
    tx: Sender<AppMessage>,
    ctx: Context,
    key: QueryKey,
    read: F,
) where
    T: Any + Send + Sync,
    F: FnOnce(&QueryClient) -> Result<Arc<T>, ApiError> + Send + 'static,
{
    thread::spawn(move || {
        let error = read(&queries).err();
        if tx.send(AppMessage::QuerySettled { key, error }).is_err() {
            error!("failed to send QuerySettled message");
        }
        ctx.request_repaint();
    });
}

pub fn mutate(queries: QueryClient, tx: Sender<AppMessage>, ctx: Context, mutation: Mutation) {
    thread::spawn(move || {
        let result = queries.mutate(&mutation);
        if tx
            .send(AppMessage::MutationFinished { mutation, result })
            .is_err()
        {
            error!("failed to send MutationFinished message");
        }
        ctx.request_repaint();
    });
}

pub fn run_check(queries: QueryClient, tx: Sender<AppMessage>, ctx: Context, check: ApiCheck) {
    thread::spawn(move || {
        let result = check.run(queries.api());
        if tx.send(AppMessage::CheckFinished { check, result }).is_err() {
            error!("failed to send CheckFinished message");
        }
        ctx.request_repaint();
    });
}
