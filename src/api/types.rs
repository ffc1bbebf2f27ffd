//! Wire types for the camera backend
//!
//! Request bodies and response envelopes for every endpoint the client talks to.
//! Every response that carries a `success` flag requires it: a body without the
//! flag fails to deserialize and is reported as a malformed response.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::error::{ClientError, ClientResult};

/// Token the backend requires before it deletes the bucket
pub const BUCKET_DELETE_CONFIRMATION: &str = "CONFIRM_DELETE";

// ============================================================================
// Requests
// ============================================================================

/// Camera capture command
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CameraAction {
    Start,
    Stop,
}

impl std::fmt::Display for CameraAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraAction::Start => write!(f, "start"),
            CameraAction::Stop => write!(f, "stop"),
        }
    }
}

/// Body of `POST /camera`
#[derive(Debug, Clone, Serialize)]
pub struct CameraCommandRequest {
    pub action: CameraAction,
}

/// Body of `POST /s3/bucket/delete`
#[derive(Debug, Clone, Serialize)]
pub struct BucketDeleteRequest {
    pub bucket_name: String,
    pub confirmation: String,
}

impl BucketDeleteRequest {
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            confirmation: BUCKET_DELETE_CONFIRMATION.to_string(),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Responses carrying the backend's `success` flag
pub trait Acknowledged {
    fn success(&self) -> bool;

    fn detail(&self) -> Option<&str>;

    /// Turn `success: false` into an application error
    fn into_result(self) -> ClientResult<Self>
    where
        Self: Sized,
    {
        if self.success() {
            Ok(self)
        } else {
            let detail = self.detail().unwrap_or("Unknown error").to_string();
            Err(ClientError::Application(detail))
        }
    }
}

/// Plain acknowledgement (`POST /camera`, bucket and file deletion)
#[derive(Debug, Clone, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Response of `GET /camera`
#[derive(Debug, Clone, Deserialize)]
pub struct FrameResponse {
    pub success: bool,
    #[serde(default)]
    pub frame: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Response of `POST /db/cleanup`
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupResponse {
    pub success: bool,
    #[serde(default)]
    pub deleted_count: u64,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Response of `GET /db/image`
///
/// This endpoint has no `success` flag; it signals failure through an
/// `error` or `detail` field instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// One stored image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub timestamp: String,
    pub filename: String,
    #[serde(default)]
    pub alert_count: u32,
}

macro_rules! acknowledged {
    ($($ty:ty),*) => {
        $(
            impl Acknowledged for $ty {
                fn success(&self) -> bool {
                    self.success
                }

                fn detail(&self) -> Option<&str> {
                    self.detail.as_deref()
                }
            }
        )*
    };
}

acknowledged!(AckResponse, FrameResponse, CleanupResponse);

// ============================================================================
// Frames
// ============================================================================

/// Image format sniffed from the decoded frame bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Unknown,
}

impl ImageFormat {
    fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            ImageFormat::Jpeg
        } else if bytes.starts_with(b"\x89PNG") {
            ImageFormat::Png
        } else {
            ImageFormat::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::Unknown => "unknown",
        }
    }
}

/// The latest camera frame published by the poller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraFrame {
    /// Base64 payload as received
    pub encoded: String,

    /// Size of the decoded image in bytes
    pub size: usize,

    pub format: ImageFormat,

    pub received_at: DateTime<Local>,
}

impl CameraFrame {
    /// Validate a base64 payload and wrap it as a frame
    pub fn decode(encoded: String) -> ClientResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ClientError::Malformed(format!("frame is not valid base64: {e}")))?;

        Ok(Self {
            size: bytes.len(),
            format: ImageFormat::sniff(&bytes),
            encoded,
            received_at: Local::now(),
        })
    }
}
