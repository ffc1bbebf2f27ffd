//! HTTP client for the camera backend
//!
//! Every remote operation goes through [`ApiClient::call`], which builds the URL
//! from the current [`BaseUrl`], applies the per-call timeout and classifies any
//! failure into a [`ClientError`]. The client never retries; retry policy belongs
//! to the caller.
//!
//! ## Endpoints
//!
//! ```text
//! GET  /camera              current frame            { success, frame }
//! POST /camera              start/stop capture       { success, detail? }
//! POST /s3/bucket/delete    delete storage bucket    { success }
//! POST /db/cleanup?days=N   delete old records       { success, deleted_count }
//! POST /db/delete-file      delete the store file    { success }
//! GET  /db/image?limit=N    list stored images       { images: [...] }
//! ```

pub mod error;
pub mod types;

use std::time::Duration;

use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{instrument, trace};

use crate::config::{BaseUrl, Timeouts};

pub use error::{ClientError, ClientResult};
pub use types::{
    AckResponse, Acknowledged, BucketDeleteRequest, CameraAction, CameraCommandRequest,
    CameraFrame, CleanupResponse, FrameResponse, ImageFormat, ImageRecord, ImagesResponse,
};

pub const CAMERA_PATH: &str = "/camera";
pub const BUCKET_DELETE_PATH: &str = "/s3/bucket/delete";
pub const DB_CLEANUP_PATH: &str = "/db/cleanup";
pub const DB_DELETE_FILE_PATH: &str = "/db/delete-file";
pub const DB_IMAGE_PATH: &str = "/db/image";

/// A single request against the backend
#[derive(Debug, Clone)]
pub struct Call {
    method: Method,
    path: &'static str,
    body: Option<serde_json::Value>,
    query: Vec<(&'static str, String)>,
    timeout: Duration,
}

impl Call {
    pub fn get(path: &'static str, timeout: Duration) -> Self {
        Self::new(Method::GET, path, timeout)
    }

    pub fn post(path: &'static str, timeout: Duration) -> Self {
        Self::new(Method::POST, path, timeout)
    }

    fn new(method: Method, path: &'static str, timeout: Duration) -> Self {
        Self {
            method,
            path,
            body: None,
            query: Vec::new(),
            timeout,
        }
    }

    /// Attach a JSON body
    pub fn json<T: Serialize>(mut self, body: &T) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Append a query parameter
    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }
}

/// Client for the camera backend's REST API
///
/// Cheap to clone; clones share the connection pool and the base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: BaseUrl,
    timeouts: Timeouts,
}

impl ApiClient {
    pub fn new(base_url: BaseUrl, timeouts: Timeouts) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("camwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            timeouts,
        })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Send a request and decode the JSON response
    ///
    /// Non-2xx statuses fail before the body is read.
    #[instrument(skip(self, call), fields(method = %call.method, path = call.path))]
    pub async fn call<T: DeserializeOwned>(&self, call: Call) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url.resolve(), call.path);

        trace!("sending request to {url}");

        let mut request = self
            .http
            .request(call.method, &url)
            .timeout(call.timeout);

        if !call.query.is_empty() {
            request = request.query(&call.query);
        }

        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http { status });
        }

        let body = response.bytes().await?;
        let parsed = serde_json::from_slice(&body)?;

        trace!("received {} bytes from {url}", body.len());

        Ok(parsed)
    }

    /// Fetch the current camera frame
    pub async fn fetch_frame(&self) -> ClientResult<CameraFrame> {
        let response: FrameResponse = self
            .call(Call::get(CAMERA_PATH, self.timeouts.frame))
            .await?;

        match response {
            FrameResponse {
                success: true,
                frame: Some(frame),
                ..
            } if !frame.is_empty() => CameraFrame::decode(frame),
            FrameResponse { detail, .. } => Err(ClientError::Application(
                detail.unwrap_or_else(|| "Frame not available".to_string()),
            )),
        }
    }

    /// Tell the camera to start or stop capturing
    pub async fn camera_command(&self, action: CameraAction) -> ClientResult<()> {
        let call = Call::post(CAMERA_PATH, self.timeouts.command)
            .json(&CameraCommandRequest { action })?;

        self.call::<AckResponse>(call).await?.into_result()?;
        Ok(())
    }

    /// Delete the object storage bucket
    pub async fn delete_bucket(&self, bucket_name: &str) -> ClientResult<()> {
        let call = Call::post(BUCKET_DELETE_PATH, self.timeouts.bucket_delete)
            .json(&BucketDeleteRequest::new(bucket_name))?;

        self.call::<AckResponse>(call).await?.into_result()?;
        Ok(())
    }

    /// Delete records older than `days` days, returning how many were removed
    ///
    /// `days == 0` removes every record.
    pub async fn cleanup_records(&self, days: u32) -> ClientResult<u64> {
        let call = Call::post(DB_CLEANUP_PATH, self.timeouts.cleanup).query("days", days);

        let response = self.call::<CleanupResponse>(call).await?.into_result()?;
        Ok(response.deleted_count)
    }

    /// Delete the backend's persistent store file
    pub async fn delete_store_file(&self) -> ClientResult<()> {
        let call = Call::post(DB_DELETE_FILE_PATH, self.timeouts.delete_file);

        self.call::<AckResponse>(call).await?.into_result()?;
        Ok(())
    }

    /// List stored image records, newest first
    pub async fn list_images(&self, limit: u32) -> ClientResult<Vec<ImageRecord>> {
        let call = Call::get(DB_IMAGE_PATH, self.timeouts.images).query("limit", limit);

        let response: ImagesResponse = self.call(call).await?;

        if let Some(message) = response.error.or(response.detail) {
            return Err(ClientError::Application(message));
        }

        Ok(response.images)
    }
}
