use std::path::Path;
use std::time::Duration;

use bytes::BytesMut;
use catalog_logging::{catalog_debug, catalog_warn};
use futures_util::TryStreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio_util::codec::{BytesCodec, FramedRead};
use url::Url;

use crate::{
    ApiError, EngineError, FailureKind, ProductListQuery, ProductPayload, ProductRecord,
    ProgressReport, UploadReceipt, WebhookPayload, WebhookRecord, WebhookTestResult,
};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Root the endpoint paths are resolved against, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    /// Whole-request deadline. `None` lets every request run to completion.
    pub request_timeout: Option<Duration>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Some(Duration::from_secs(10)),
            request_timeout: None,
        }
    }
}

/// The importer backend's REST surface.
#[async_trait::async_trait]
pub trait CatalogApi: Send + Sync {
    async fn upload_csv(&self, file: &Path) -> Result<UploadReceipt, ApiError>;
    async fn upload_progress(&self, task_id: &str) -> Result<ProgressReport, ApiError>;

    async fn list_products(&self, query: &ProductListQuery)
        -> Result<Vec<ProductRecord>, ApiError>;
    async fn create_product(&self, payload: &ProductPayload) -> Result<(), ApiError>;
    async fn update_product(&self, id: u64, payload: &ProductPayload) -> Result<(), ApiError>;
    async fn delete_product(&self, id: u64) -> Result<(), ApiError>;
    async fn delete_all_products(&self) -> Result<(), ApiError>;

    async fn list_webhooks(&self) -> Result<Vec<WebhookRecord>, ApiError>;
    async fn create_webhook(&self, payload: &WebhookPayload) -> Result<(), ApiError>;
    async fn update_webhook(&self, id: u64, payload: &WebhookPayload) -> Result<(), ApiError>;
    async fn delete_webhook(&self, id: u64) -> Result<(), ApiError>;
    async fn test_webhook(&self, id: u64) -> Result<WebhookTestResult, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCatalogApi {
    base: Url,
    client: reqwest::Client,
}

impl ReqwestCatalogApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, EngineError> {
        let base = Url::parse(&settings.base_url).map_err(|err| EngineError::BaseUrl {
            url: settings.base_url.clone(),
            message: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(EngineError::BaseUrl {
                url: settings.base_url.clone(),
                message: "url cannot carry a path".to_string(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;

        Ok(Self { base, client })
    }

    /// Resolves `segments` below the base path; `trailing_slash` adds the
    /// final `/` the collection endpoints are declared with.
    fn endpoint(&self, segments: &[&str], trailing_slash: bool) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.set_query(None);
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::new(FailureKind::InvalidUrl, "base url cannot be a base"))?;
            path.pop_if_empty();
            path.extend(segments);
            if trailing_slash {
                path.push("");
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        catalog_debug!("{} {}", method, url);
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let detail = extract_detail(&body);
        catalog_warn!("Backend answered {} (detail: {:?})", status, detail);
        Err(ApiError::new(
            FailureKind::HttpStatus {
                status: status.as_u16(),
                detail,
            },
            status.to_string(),
        ))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|err| {
            if err.is_decode() {
                ApiError::new(FailureKind::Decode, err.to_string())
            } else {
                map_reqwest_error(err)
            }
        })
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl CatalogApi for ReqwestCatalogApi {
    async fn upload_csv(&self, file: &Path) -> Result<UploadReceipt, ApiError> {
        let url = self.endpoint(&["upload-csv"], true)?;
        let handle = tokio::fs::File::open(file)
            .await
            .map_err(|err| file_error(file, &err))?;
        let length = handle
            .metadata()
            .await
            .map_err(|err| file_error(file, &err))?
            .len();
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());

        let stream = FramedRead::new(handle, BytesCodec::new()).map_ok(BytesMut::freeze);
        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), length)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(|err| ApiError::new(FailureKind::File, err.to_string()))?;
        let form = Form::new().part("file", part);

        self.send_json(self.request(Method::POST, url).multipart(form))
            .await
    }

    async fn upload_progress(&self, task_id: &str) -> Result<ProgressReport, ApiError> {
        let url = self.endpoint(&["upload-progress", task_id], false)?;
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn list_products(
        &self,
        query: &ProductListQuery,
    ) -> Result<Vec<ProductRecord>, ApiError> {
        let mut url = self.endpoint(&["products"], true)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("skip", &query.skip.to_string());
            pairs.append_pair("limit", &query.limit.to_string());
            if let Some(sku) = &query.sku {
                pairs.append_pair("filter_sku", sku);
            }
            if let Some(name) = &query.name {
                pairs.append_pair("filter_name", name);
            }
            if let Some(active) = &query.active {
                pairs.append_pair("filter_active", active);
            }
        }
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn create_product(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&["products"], true)?;
        self.send_empty(self.request(Method::POST, url).json(payload))
            .await
    }

    async fn update_product(&self, id: u64, payload: &ProductPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&["products", &id.to_string()], false)?;
        self.send_empty(self.request(Method::PUT, url).json(payload))
            .await
    }

    async fn delete_product(&self, id: u64) -> Result<(), ApiError> {
        let url = self.endpoint(&["products", &id.to_string()], false)?;
        self.send_empty(self.request(Method::DELETE, url)).await
    }

    async fn delete_all_products(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["products"], true)?;
        self.send_empty(self.request(Method::DELETE, url)).await
    }

    async fn list_webhooks(&self) -> Result<Vec<WebhookRecord>, ApiError> {
        let url = self.endpoint(&["webhooks"], true)?;
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn create_webhook(&self, payload: &WebhookPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&["webhooks"], true)?;
        self.send_empty(self.request(Method::POST, url).json(payload))
            .await
    }

    async fn update_webhook(&self, id: u64, payload: &WebhookPayload) -> Result<(), ApiError> {
        let url = self.endpoint(&["webhooks", &id.to_string()], false)?;
        self.send_empty(self.request(Method::PUT, url).json(payload))
            .await
    }

    async fn delete_webhook(&self, id: u64) -> Result<(), ApiError> {
        let url = self.endpoint(&["webhooks", &id.to_string()], false)?;
        self.send_empty(self.request(Method::DELETE, url)).await
    }

    async fn test_webhook(&self, id: u64) -> Result<WebhookTestResult, ApiError> {
        let url = self.endpoint(&["webhooks", "test", &id.to_string()], false)?;
        self.send_json(self.request(Method::POST, url)).await
    }
}

/// Pulls a string `detail` out of an error body; validation errors carry a list and yield `None`.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

fn file_error(path: &Path, err: &std::io::Error) -> ApiError {
    ApiError::new(FailureKind::File, format!("{}: {}", path.display(), err))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> ReqwestCatalogApi {
        ReqwestCatalogApi::new(&ApiSettings {
            base_url: base.to_string(),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoints_keep_base_path_and_trailing_slashes() {
        let root = api("http://localhost:8000");
        assert_eq!(
            root.endpoint(&["products"], true).unwrap().as_str(),
            "http://localhost:8000/products/"
        );
        assert_eq!(
            root.endpoint(&["webhooks", "test", "7"], false)
                .unwrap()
                .as_str(),
            "http://localhost:8000/webhooks/test/7"
        );

        let nested = api("http://localhost:8000/importer/");
        assert_eq!(
            nested.endpoint(&["upload-csv"], true).unwrap().as_str(),
            "http://localhost:8000/importer/upload-csv/"
        );
    }

    #[test]
    fn task_ids_are_escaped_as_one_segment() {
        let root = api("http://localhost:8000");
        assert_eq!(
            root.endpoint(&["upload-progress", "a/b c"], false)
                .unwrap()
                .as_str(),
            "http://localhost:8000/upload-progress/a%2Fb%20c"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ReqwestCatalogApi::new(&ApiSettings {
            base_url: "not a url".to_string(),
            ..ApiSettings::default()
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::BaseUrl { .. }));
    }

    #[test]
    fn detail_is_read_only_when_it_is_text() {
        assert_eq!(
            extract_detail(br#"{"detail": "SKU already exists"}"#).as_deref(),
            Some("SKU already exists")
        );
        assert_eq!(
            extract_detail(br#"{"detail": [{"loc": ["body"], "msg": "bad"}]}"#),
            None
        );
        assert_eq!(extract_detail(b"Internal Server Error"), None);
    }
}
