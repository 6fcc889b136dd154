use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_warn};

use crate::api::{ApiSettings, CatalogApi, ReqwestCatalogApi};
use crate::{
    ApiError, EngineError, ProductListQuery, ProductPayload, ProductRecord, ProgressReport,
    UploadReceipt, WebhookPayload, WebhookRecord, WebhookTestResult,
};

/// A request for the engine. Each command yields exactly one [`EngineEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    UploadCsv {
        generation: u64,
        file: PathBuf,
    },
    /// Wait `delay`, then fetch progress for `task_id`.
    PollProgress {
        generation: u64,
        task_id: String,
        delay: Duration,
    },
    /// Fetch one product page; `request` is echoed in the answer.
    ListProducts {
        request: u64,
        query: ProductListQuery,
    },
    CreateProduct {
        payload: ProductPayload,
    },
    UpdateProduct {
        id: u64,
        payload: ProductPayload,
    },
    DeleteProduct {
        id: u64,
    },
    DeleteAllProducts,
    ListWebhooks {
        request: u64,
    },
    CreateWebhook {
        payload: WebhookPayload,
    },
    UpdateWebhook {
        id: u64,
        payload: WebhookPayload,
    },
    DeleteWebhook {
        id: u64,
    },
    TestWebhook {
        id: u64,
    },
}

/// Outcome of one [`EngineCommand`], echoing whatever identifies the request.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    UploadFinished {
        generation: u64,
        result: Result<UploadReceipt, ApiError>,
    },
    ProgressPolled {
        generation: u64,
        task_id: String,
        result: Result<ProgressReport, ApiError>,
    },
    ProductsListed {
        request: u64,
        result: Result<Vec<ProductRecord>, ApiError>,
    },
    ProductCreated {
        result: Result<(), ApiError>,
    },
    ProductUpdated {
        id: u64,
        result: Result<(), ApiError>,
    },
    ProductDeleted {
        id: u64,
        result: Result<(), ApiError>,
    },
    AllProductsDeleted {
        result: Result<(), ApiError>,
    },
    WebhooksListed {
        request: u64,
        result: Result<Vec<WebhookRecord>, ApiError>,
    },
    WebhookCreated {
        result: Result<(), ApiError>,
    },
    WebhookUpdated {
        id: u64,
        result: Result<(), ApiError>,
    },
    WebhookDeleted {
        id: u64,
        result: Result<(), ApiError>,
    },
    WebhookTested {
        id: u64,
        result: Result<WebhookTestResult, ApiError>,
    },
}

/// Sending side of the engine. Commands run concurrently on a private tokio
/// runtime; results come back on the receiver returned by [`EngineHandle::spawn`].
#[derive(Debug, Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(
        api: Arc<dyn CatalogApi>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("catalog-engine")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("catalog-engine-dispatch".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let api = api.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        let event = handle_command(api.as_ref(), command).await;
                        let _ = event_tx.send(event);
                    });
                }
                catalog_debug!("Engine command channel closed; shutting down runtime");
            })?;

        Ok((Self { cmd_tx }, event_rx))
    }

    /// Spawns an engine talking to the real backend.
    pub fn with_settings(
        settings: &ApiSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let api = ReqwestCatalogApi::new(settings)?;
        Self::spawn(Arc::new(api))
    }

    pub fn submit(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            catalog_warn!("Engine is gone; command dropped");
        }
    }
}

async fn handle_command(api: &dyn CatalogApi, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::UploadCsv { generation, file } => EngineEvent::UploadFinished {
            generation,
            result: api.upload_csv(&file).await,
        },
        EngineCommand::PollProgress {
            generation,
            task_id,
            delay,
        } => {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = api.upload_progress(&task_id).await;
            EngineEvent::ProgressPolled {
                generation,
                task_id,
                result,
            }
        }
        EngineCommand::ListProducts { request, query } => EngineEvent::ProductsListed {
            request,
            result: api.list_products(&query).await,
        },
        EngineCommand::CreateProduct { payload } => EngineEvent::ProductCreated {
            result: api.create_product(&payload).await,
        },
        EngineCommand::UpdateProduct { id, payload } => EngineEvent::ProductUpdated {
            id,
            result: api.update_product(id, &payload).await,
        },
        EngineCommand::DeleteProduct { id } => EngineEvent::ProductDeleted {
            id,
            result: api.delete_product(id).await,
        },
        EngineCommand::DeleteAllProducts => EngineEvent::AllProductsDeleted {
            result: api.delete_all_products().await,
        },
        EngineCommand::ListWebhooks { request } => EngineEvent::WebhooksListed {
            request,
            result: api.list_webhooks().await,
        },
        EngineCommand::CreateWebhook { payload } => EngineEvent::WebhookCreated {
            result: api.create_webhook(&payload).await,
        },
        EngineCommand::UpdateWebhook { id, payload } => EngineEvent::WebhookUpdated {
            id,
            result: api.update_webhook(id, &payload).await,
        },
        EngineCommand::DeleteWebhook { id } => EngineEvent::WebhookDeleted {
            id,
            result: api.delete_webhook(id).await,
        },
        EngineCommand::TestWebhook { id } => EngineEvent::WebhookTested {
            id,
            result: api.test_webhook(id).await,
        },
    }
}
