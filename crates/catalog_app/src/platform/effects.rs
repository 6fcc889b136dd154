use std::sync::mpsc;
use std::thread;

use catalog_core::{
    Effect, JobHandle, Msg, Product, ProductFields, ProductQuery, RequestFailure, Webhook,
    WebhookFields, WebhookTestReport,
};
use catalog_engine::{
    ApiError, ApiSettings, EngineCommand, EngineError, EngineEvent, EngineHandle, FailureKind,
    ProductListQuery, ProductPayload, ProductRecord, WebhookPayload, WebhookRecord,
};
use catalog_logging::{catalog_info, catalog_warn};

use super::app::LoopEvent;

/// Carries out core effects on the engine and feeds engine results back as [`Msg`]s.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(
        settings: &ApiSettings,
        msg_tx: mpsc::Sender<LoopEvent>,
    ) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::with_settings(settings)?;
        spawn_event_loop(events, msg_tx)?;
        Ok(Self { engine })
    }

    /// Submits every request effect and hands back the alert texts for display.
    pub fn enqueue(&self, effects: Vec<Effect>) -> Vec<String> {
        let mut alerts = Vec::new();
        for effect in effects {
            match effect {
                Effect::Alert(text) => alerts.push(text),
                other => {
                    catalog_info!("Effect {}", describe(&other));
                    if let Some(command) = to_command(other) {
                        self.engine.submit(command);
                    }
                }
            }
        }
        alerts
    }
}

fn spawn_event_loop(
    events: mpsc::Receiver<EngineEvent>,
    msg_tx: mpsc::Sender<LoopEvent>,
) -> Result<(), EngineError> {
    thread::Builder::new()
        .name("catalog-engine-events".to_string())
        .spawn(move || {
            for event in events {
                if msg_tx.send(LoopEvent::Engine(to_msg(event))).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

fn describe(effect: &Effect) -> String {
    match effect {
        Effect::UploadCsv { generation, file } => {
            format!("UploadCsv generation={} file={:?}", generation, file)
        }
        Effect::PollProgress { job, delay } => format!(
            "PollProgress generation={} task_id={} delay_ms={}",
            job.generation,
            job.task_id,
            delay.as_millis()
        ),
        Effect::FetchProducts { request, query } => format!(
            "FetchProducts request={} skip={} limit={}",
            request, query.skip, query.limit
        ),
        other => format!("{other:?}"),
    }
}

fn to_command(effect: Effect) -> Option<EngineCommand> {
    let command = match effect {
        Effect::Alert(_) => return None,
        Effect::UploadCsv { generation, file } => EngineCommand::UploadCsv { generation, file },
        Effect::PollProgress { job, delay } => EngineCommand::PollProgress {
            generation: job.generation,
            task_id: job.task_id,
            delay,
        },
        Effect::FetchProducts { request, query } => EngineCommand::ListProducts {
            request,
            query: to_list_query(query),
        },
        Effect::CreateProduct { fields } => EngineCommand::CreateProduct {
            payload: to_product_payload(fields),
        },
        Effect::UpdateProduct { id, fields } => EngineCommand::UpdateProduct {
            id,
            payload: to_product_payload(fields),
        },
        Effect::DeleteProduct { id } => EngineCommand::DeleteProduct { id },
        Effect::DeleteAllProducts => EngineCommand::DeleteAllProducts,
        Effect::FetchWebhooks { request } => EngineCommand::ListWebhooks { request },
        Effect::CreateWebhook { fields } => EngineCommand::CreateWebhook {
            payload: to_webhook_payload(fields),
        },
        Effect::UpdateWebhook { id, fields } => EngineCommand::UpdateWebhook {
            id,
            payload: to_webhook_payload(fields),
        },
        Effect::DeleteWebhook { id } => EngineCommand::DeleteWebhook { id },
        Effect::TestWebhook { id } => EngineCommand::TestWebhook { id },
    };
    Some(command)
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadFinished { generation, result } => Msg::UploadFinished {
            generation,
            result: result
                .map(|receipt| receipt.task_id)
                .map_err(|err| to_failure("upload", err)),
        },
        EngineEvent::ProgressPolled {
            generation,
            task_id,
            result,
        } => Msg::ProgressReported {
            job: JobHandle {
                generation,
                task_id,
            },
            result: result
                .map(|report| report.progress)
                .map_err(|err| to_failure("progress", err)),
        },
        EngineEvent::ProductsListed { request, result } => Msg::ProductsLoaded {
            request,
            result: result
                .map(|records| records.into_iter().map(to_product).collect())
                .map_err(|err| to_failure("list products", err)),
        },
        EngineEvent::ProductCreated { result } => Msg::ProductSaved {
            id: None,
            result: result.map_err(|err| to_failure("create product", err)),
        },
        EngineEvent::ProductUpdated { id, result } => Msg::ProductSaved {
            id: Some(id),
            result: result.map_err(|err| to_failure("update product", err)),
        },
        EngineEvent::ProductDeleted { id, result } => Msg::ProductDeleted {
            id,
            result: result.map_err(|err| to_failure("delete product", err)),
        },
        EngineEvent::AllProductsDeleted { result } => Msg::AllProductsDeleted {
            result: result.map_err(|err| to_failure("delete all products", err)),
        },
        EngineEvent::WebhooksListed { request, result } => Msg::WebhooksLoaded {
            request,
            result: result
                .map(|records| records.into_iter().map(to_webhook).collect())
                .map_err(|err| to_failure("list webhooks", err)),
        },
        EngineEvent::WebhookCreated { result } => Msg::WebhookSaved {
            id: None,
            result: result.map_err(|err| to_failure("create webhook", err)),
        },
        EngineEvent::WebhookUpdated { id, result } => Msg::WebhookSaved {
            id: Some(id),
            result: result.map_err(|err| to_failure("update webhook", err)),
        },
        EngineEvent::WebhookDeleted { id, result } => Msg::WebhookDeleted {
            id,
            result: result.map_err(|err| to_failure("delete webhook", err)),
        },
        EngineEvent::WebhookTested { id, result } => Msg::WebhookTested {
            id,
            result: result
                .map(|outcome| WebhookTestReport {
                    status_code: outcome.status_code,
                    response_time_ms: outcome.response_time_ms,
                })
                .map_err(|err| to_failure("test webhook", err)),
        },
    }
}

fn to_failure(request: &str, err: ApiError) -> RequestFailure {
    catalog_warn!("Request '{}' failed: {}", request, err);
    match err.kind {
        FailureKind::HttpStatus { status, detail } => RequestFailure::Rejected { status, detail },
        FailureKind::Decode => RequestFailure::Malformed {
            message: err.message,
        },
        FailureKind::InvalidUrl
        | FailureKind::File
        | FailureKind::Timeout
        | FailureKind::Network => RequestFailure::Transport {
            message: err.message,
        },
    }
}

fn to_list_query(query: ProductQuery) -> ProductListQuery {
    ProductListQuery {
        skip: query.skip,
        limit: query.limit,
        sku: query.sku,
        name: query.name,
        active: query.active,
    }
}

fn to_product(record: ProductRecord) -> Product {
    Product {
        id: record.id,
        sku: record.sku,
        name: record.name,
        description: record.description,
        active: record.active,
    }
}

fn to_webhook(record: WebhookRecord) -> Webhook {
    Webhook {
        id: record.id,
        url: record.url,
        event: record.event,
        enabled: record.enabled,
    }
}

fn to_product_payload(fields: ProductFields) -> ProductPayload {
    ProductPayload {
        sku: fields.sku,
        name: fields.name,
        description: fields.description,
        active: fields.active,
    }
}

fn to_webhook_payload(fields: WebhookFields) -> WebhookPayload {
    WebhookPayload {
        url: fields.url,
        event: fields.event,
        enabled: fields.enabled,
    }
}
