//! Transport contract for the REST backend.
//!
//! Operations are written against [`RestClient`]; they never see HTTP. Paths
//! are relative to the backend's base URL (e.g. `/tenant/0/spot/`), bodies and
//! responses are JSON values.
//!
//! Every method resolves or rejects exactly once. [`RestClient::delete`]
//! resolves with the backend's boolean business result: `false` means the
//! backend refused the deletion, which is not a transport failure.
//!
//! # Implementations
//!
//! - `HttpRestClient` (in `roster-client`): `reqwest`-backed production client
//! - `MockRestClient` (in `roster-testing`): canned answers for tests

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestError {
    /// The request could not be sent or no response was received.
    #[error("Request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("Backend error (status {status}): {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Response decoding failed: {0}")]
    Decode(String),

    /// The path could not be joined onto the base URL.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// A file to upload through [`RestClient::upload_file`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    /// File name sent with the multipart part
    pub file_name: String,
    /// MIME type, if known
    pub content_type: Option<String>,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Create an upload without a content type.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Set the MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Result of a transport call.
pub type RestResult<T> = Result<T, RestError>;

/// The transport contract consumed by operations.
///
/// Boxed futures keep the trait object safe so a client can be shared as
/// `Arc<dyn RestClient>`.
pub trait RestClient: Send + Sync {
    /// `GET path`, decoding the JSON body.
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, RestResult<Value>>;

    /// `POST path` with a JSON body.
    fn post<'a>(&'a self, path: &'a str, body: Value) -> BoxFuture<'a, RestResult<Value>>;

    /// `PUT path` with a JSON body.
    fn put<'a>(&'a self, path: &'a str, body: Value) -> BoxFuture<'a, RestResult<Value>>;

    /// `DELETE path`, resolving with the backend's boolean business result.
    fn delete<'a>(&'a self, path: &'a str) -> BoxFuture<'a, RestResult<bool>>;

    /// Multipart upload of a single file.
    fn upload_file<'a>(&'a self, path: &'a str, file: FileUpload)
    -> BoxFuture<'a, RestResult<Value>>;
}

impl<C> RestClient for Arc<C>
where
    C: RestClient + ?Sized,
{
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, RestResult<Value>> {
        (**self).get(path)
    }

    fn post<'a>(&'a self, path: &'a str, body: Value) -> BoxFuture<'a, RestResult<Value>> {
        (**self).post(path, body)
    }

    fn put<'a>(&'a self, path: &'a str, body: Value) -> BoxFuture<'a, RestResult<Value>> {
        (**self).put(path, body)
    }

    fn delete<'a>(&'a self, path: &'a str) -> BoxFuture<'a, RestResult<bool>> {
        (**self).delete(path)
    }

    fn upload_file<'a>(
        &'a self,
        path: &'a str,
        file: FileUpload,
    ) -> BoxFuture<'a, RestResult<Value>> {
        (**self).upload_file(path, file)
    }
}
