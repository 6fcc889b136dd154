//! Catalog console core: pure state machine and view-model helpers.
//!
//! Nothing in this crate performs IO or reads a clock. User actions and
//! backend responses arrive as [`Msg`] values, [`update`] folds them into
//! [`AppState`], and anything that needs the outside world is returned as an
//! [`Effect`] for the caller to execute.
mod effect;
mod failure;
mod import;
mod msg;
mod products;
mod records;
mod state;
mod update;
mod view_model;
mod webhooks;

pub use effect::Effect;
pub use failure::RequestFailure;
pub use import::{
    poll_transition, ImportPhase, ImportState, JobHandle, PollStep, COMPLETE_PERCENT,
    DEFAULT_POLL_INTERVAL,
};
pub use msg::{Msg, PageDirection};
pub use products::{ProductEditBuffer, ProductListState, DEFAULT_PAGE_SIZE};
pub use records::{
    Product, ProductField, ProductFields, ProductFilter, ProductId, ProductQuery, Webhook,
    WebhookField, WebhookFields, WebhookId, WebhookTestReport, DEFAULT_WEBHOOK_EVENT,
    WEBHOOK_EVENTS,
};
pub use state::{AppState, ConfirmAction, CoreSettings, PendingConfirmation};
pub use update::update;
pub use view_model::{
    AppViewModel, FormMode, ImportView, ProductFormView, ProductRowView, ProductTableView,
    WebhookFormView, WebhookRowView, WebhookTableView,
};
pub use webhooks::{WebhookEditBuffer, WebhookListState};
