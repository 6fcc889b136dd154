use std::path::PathBuf;

use crate::{
    JobHandle, Product, ProductField, ProductFilter, ProductId, RequestFailure,
    Webhook, WebhookField, WebhookId, WebhookTestReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked to import a CSV file; `None` when no file was chosen.
    UploadRequested { file: Option<PathBuf> },
    /// Upload endpoint answered for the loop started as `generation`.
    UploadFinished {
        generation: u64,
        result: Result<String, RequestFailure>,
    },
    /// One poll step finished for `job`.
    ProgressReported {
        job: JobHandle,
        result: Result<u32, RequestFailure>,
    },

    /// User edited the product filter inputs.
    FilterChanged(ProductFilter),
    /// Fetch the current page with the current filter.
    LoadProducts,
    /// Clear filters and fetch page 1.
    ShowAllProducts,
    PageChanged(PageDirection),
    /// Answer to the product load numbered `request`.
    ProductsLoaded {
        request: u64,
        result: Result<Vec<Product>, RequestFailure>,
    },

    /// Switch the product form to create mode.
    NewProduct,
    /// Load a rendered row into the product form.
    EditProduct(ProductId),
    ProductFieldChanged(ProductField),
    SaveProduct,
    ProductSaved {
        id: Option<ProductId>,
        result: Result<(), RequestFailure>,
    },
    /// Ask for confirmation, then delete one product.
    DeleteProduct(ProductId),
    ProductDeleted {
        id: ProductId,
        result: Result<(), RequestFailure>,
    },
    /// Ask for confirmation, then delete every product.
    DeleteAllProducts,
    AllProductsDeleted { result: Result<(), RequestFailure> },

    LoadWebhooks,
    WebhooksLoaded {
        request: u64,
        result: Result<Vec<Webhook>, RequestFailure>,
    },
    NewWebhook,
    EditWebhook(WebhookId),
    WebhookFieldChanged(WebhookField),
    SaveWebhook,
    WebhookSaved {
        id: Option<WebhookId>,
        result: Result<(), RequestFailure>,
    },
    DeleteWebhook(WebhookId),
    WebhookDeleted {
        id: WebhookId,
        result: Result<(), RequestFailure>,
    },
    TestWebhook(WebhookId),
    WebhookTested {
        id: WebhookId,
        result: Result<WebhookTestReport, RequestFailure>,
    },

    /// User answered the pending confirmation prompt.
    ConfirmationAnswered(bool),
    /// Fallback for input that maps to nothing.
    NoOp,
}
