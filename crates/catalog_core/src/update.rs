use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_warn};

use crate::import::{PollOutcome, UploadOutcome};
use crate::{AppState, ConfirmAction, Effect, Msg, PageDirection, PendingConfirmation};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UploadRequested { file } => {
            let Some(file) = file.filter(|path| !path.as_os_str().is_empty()) else {
                return (state, vec![alert("Select a CSV file first")]);
            };
            let generation = state.import.begin_upload();
            state.mark_dirty();
            vec![Effect::UploadCsv { generation, file }]
        }
        Msg::UploadFinished { generation, result } => {
            match state.import.upload_finished(generation, result) {
                UploadOutcome::Ignored => Vec::new(),
                UploadOutcome::StartPolling(job) => {
                    state.mark_dirty();
                    vec![Effect::PollProgress {
                        job,
                        delay: Duration::ZERO,
                    }]
                }
                UploadOutcome::Failed => {
                    state.mark_dirty();
                    vec![alert("CSV upload failed. Please retry.")]
                }
            }
        }
        Msg::ProgressReported { job, result } => {
            let max_failures = state.settings().max_poll_failures;
            match state.import.progress_reported(&job, result, max_failures) {
                PollOutcome::Ignored => Vec::new(),
                PollOutcome::PollAgain(job) => {
                    state.mark_dirty();
                    vec![Effect::PollProgress {
                        job,
                        delay: state.settings().poll_interval,
                    }]
                }
                PollOutcome::Completed => {
                    let mut effects = vec![alert("Import completed successfully!")];
                    effects.push(show_all_products(&mut state));
                    effects
                }
                PollOutcome::GaveUp => {
                    state.mark_dirty();
                    vec![alert("Import progress could not be retrieved.")]
                }
            }
        }

        Msg::FilterChanged(filter) => {
            state.products.set_filter(filter);
            state.mark_dirty();
            Vec::new()
        }
        Msg::LoadProducts => vec![load_products(&mut state)],
        Msg::ShowAllProducts => vec![show_all_products(&mut state)],
        Msg::PageChanged(direction) => {
            let moved = match direction {
                PageDirection::Previous => state.products.step_back(),
                PageDirection::Next => state.products.step_forward(),
            };
            if moved {
                vec![load_products(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::ProductsLoaded { request, result } => {
            if !state.products.is_pending(request) {
                catalog_debug!("Ignoring product page for superseded load {}", request);
                return (state, Vec::new());
            }
            state.mark_dirty();
            match result {
                Ok(products) => {
                    if state.products.apply_page(products) {
                        Vec::new()
                    } else {
                        catalog_debug!(
                            "Empty trailing page; retrying at page {}",
                            state.products.current_page()
                        );
                        vec![load_products(&mut state)]
                    }
                }
                Err(failure) => {
                    catalog_warn!("Loading products failed: {}", failure);
                    state.products.load_failed();
                    vec![alert(format!(
                        "Failed to load products: {}",
                        failure.detail_or("Error loading products")
                    ))]
                }
            }
        }

        Msg::NewProduct => {
            state.product_edit.clear();
            state.mark_dirty();
            Vec::new()
        }
        Msg::EditProduct(id) => match state.products.find(id).cloned() {
            Some(product) => {
                state.product_edit.load(&product);
                state.mark_dirty();
                Vec::new()
            }
            None => vec![alert(format!("Product {id} is not on the current page"))],
        },
        Msg::ProductFieldChanged(field) => {
            state.product_edit.apply(field);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SaveProduct => {
            if !state.product_edit.is_complete() {
                return (state, vec![alert("SKU and Name are required!")]);
            }
            let fields = state.product_edit.fields().clone();
            match state.product_edit.id() {
                Some(id) => vec![Effect::UpdateProduct { id, fields }],
                None => vec![Effect::CreateProduct { fields }],
            }
        }
        Msg::ProductSaved { id, result } => match result {
            Ok(()) => {
                let text = if id.is_some() {
                    "Product updated successfully!"
                } else {
                    "Product created successfully!"
                };
                if state.product_edit.id() == id {
                    state.product_edit.forget_id();
                }
                vec![alert(text), show_all_products(&mut state)]
            }
            Err(failure) => vec![alert(format!(
                "Error {}",
                failure.detail_or("Error saving product")
            ))],
        },
        Msg::DeleteProduct(id) => ask(&mut state, ConfirmAction::DeleteProduct(id)),
        Msg::ProductDeleted { id, result } => match result {
            Ok(()) => {
                if state.product_edit.id() == Some(id) {
                    state.product_edit.clear();
                }
                vec![load_products(&mut state)]
            }
            Err(failure) => vec![alert(failure_text("Failed to delete product", &failure))],
        },
        Msg::DeleteAllProducts => ask(&mut state, ConfirmAction::DeleteAllProducts),
        Msg::AllProductsDeleted { result } => match result {
            Ok(()) => {
                state.product_edit.clear();
                vec![show_all_products(&mut state)]
            }
            Err(failure) => vec![alert(failure_text(
                "Failed to delete all products",
                &failure,
            ))],
        },

        Msg::LoadWebhooks => vec![load_webhooks(&mut state)],
        Msg::WebhooksLoaded { request, result } => {
            let (rows, failure) = match result {
                Ok(rows) => (Some(rows), None),
                Err(failure) => (None, Some(failure)),
            };
            if !state.webhooks.finish_load(request, rows) {
                catalog_debug!("Ignoring webhook list for superseded load {}", request);
                return (state, Vec::new());
            }
            state.mark_dirty();
            match failure {
                None => Vec::new(),
                Some(failure) => {
                    catalog_warn!("Loading webhooks failed: {}", failure);
                    vec![alert(failure_text("Failed to load webhooks", &failure))]
                }
            }
        }
        Msg::NewWebhook => {
            state.webhook_edit.clear();
            state.mark_dirty();
            Vec::new()
        }
        Msg::EditWebhook(id) => match state.webhooks.find(id).cloned() {
            Some(webhook) => {
                state.webhook_edit.load(&webhook);
                state.mark_dirty();
                Vec::new()
            }
            None => vec![alert(format!("Webhook {id} is not in the list"))],
        },
        Msg::WebhookFieldChanged(field) => {
            state.webhook_edit.apply(field);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SaveWebhook => {
            if !state.webhook_edit.is_complete() {
                return (state, vec![alert("Webhook URL is required!")]);
            }
            let fields = state.webhook_edit.fields().clone();
            match state.webhook_edit.id() {
                Some(id) => vec![Effect::UpdateWebhook { id, fields }],
                None => vec![Effect::CreateWebhook { fields }],
            }
        }
        Msg::WebhookSaved { id, result } => match result {
            Ok(()) => {
                if state.webhook_edit.id() == id {
                    state.webhook_edit.reset_after_save();
                }
                vec![load_webhooks(&mut state)]
            }
            Err(failure) => vec![alert(format!(
                "Error {}",
                failure.detail_or("Error saving webhook")
            ))],
        },
        Msg::DeleteWebhook(id) => ask(&mut state, ConfirmAction::DeleteWebhook(id)),
        Msg::WebhookDeleted { id, result } => match result {
            Ok(()) => {
                if state.webhook_edit.id() == Some(id) {
                    state.webhook_edit.clear();
                }
                vec![load_webhooks(&mut state)]
            }
            Err(failure) => vec![alert(failure_text("Failed to delete webhook", &failure))],
        },
        Msg::TestWebhook(id) => vec![Effect::TestWebhook { id }],
        Msg::WebhookTested { id, result } => match result {
            Ok(report) => vec![alert(format!("Test successful! {}", report.summary()))],
            Err(failure) => {
                catalog_warn!("Test of webhook {} failed: {}", id, failure);
                vec![alert(format!(
                    "Test failed: {}",
                    failure.detail_or("Error testing webhook")
                ))]
            }
        },

        Msg::ConfirmationAnswered(confirmed) => {
            let Some(pending) = state.confirmation.take() else {
                return (state, Vec::new());
            };
            state.mark_dirty();
            if !confirmed {
                return (state, Vec::new());
            }
            match pending.action {
                ConfirmAction::DeleteProduct(id) => vec![Effect::DeleteProduct { id }],
                ConfirmAction::DeleteAllProducts => vec![Effect::DeleteAllProducts],
                ConfirmAction::DeleteWebhook(id) => vec![Effect::DeleteWebhook { id }],
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn alert(text: impl Into<String>) -> Effect {
    Effect::Alert(text.into())
}

fn failure_text(generic: &str, failure: &crate::RequestFailure) -> String {
    match failure.detail() {
        Some(detail) => format!("{generic}: {detail}"),
        None => generic.to_string(),
    }
}

/// A newer prompt replaces one that was never answered.
fn ask(state: &mut AppState, action: ConfirmAction) -> Vec<Effect> {
    state.confirmation = Some(PendingConfirmation { action });
    state.mark_dirty();
    Vec::new()
}

fn load_products(state: &mut AppState) -> Effect {
    let (request, query) = state.products.issue_query();
    state.mark_dirty();
    Effect::FetchProducts { request, query }
}

fn show_all_products(state: &mut AppState) -> Effect {
    state.products.reset();
    load_products(state)
}

fn load_webhooks(state: &mut AppState) -> Effect {
    let request = state.webhooks.begin_load();
    state.mark_dirty();
    Effect::FetchWebhooks { request }
}
