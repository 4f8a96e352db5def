//! In-memory transport for operation tests
//!
//! [`MockRestClient`] answers each `(method, path)` with a canned result and
//! records every call in order, so tests can assert both what an operation
//! dispatched and what it sent.

use futures::future::BoxFuture;
use roster_core::rest::{FileUpload, RestClient, RestError, RestResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A transport call, as recorded by [`MockRestClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestCall {
    /// `GET path`
    Get {
        /// Requested path
        path: String,
    },
    /// `POST path`
    Post {
        /// Requested path
        path: String,
        /// JSON body
        body: Value,
    },
    /// `PUT path`
    Put {
        /// Requested path
        path: String,
        /// JSON body
        body: Value,
    },
    /// `DELETE path`
    Delete {
        /// Requested path
        path: String,
    },
    /// Multipart upload
    UploadFile {
        /// Requested path
        path: String,
        /// Uploaded file
        file: FileUpload,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
    Upload,
}

impl Method {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Upload => "UPLOAD",
        }
    }
}

#[derive(Debug, Clone)]
enum Answer {
    Json(RestResult<Value>),
    Deleted(RestResult<bool>),
}

/// Canned-answer transport.
///
/// Answers are not consumed: the same `(method, path)` answers identically
/// every time. A call without an answer fails with a 404
/// [`RestError::Status`].
///
/// # Example
///
/// ```
/// use roster_testing::{MockRestClient, RestCall};
/// use roster_core::rest::RestClient;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), roster_core::rest::RestError> {
/// let client = MockRestClient::new();
/// client.on_delete("/tenant/0/spot/1", false);
///
/// assert!(!client.delete("/tenant/0/spot/1").await?);
/// assert_eq!(client.calls(), vec![RestCall::Delete { path: "/tenant/0/spot/1".into() }]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockRestClient {
    answers: Arc<RwLock<HashMap<(Method, String), Answer>>>,
    calls: Arc<RwLock<Vec<RestCall>>>,
}

impl MockRestClient {
    /// Create a client with no answers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn answer(&self, method: Method, path: impl Into<String>, answer: Answer) -> &Self {
        self.answers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, path.into()), answer);
        self
    }

    /// Answer `GET path` with `response`
    pub fn on_get(&self, path: impl Into<String>, response: Value) -> &Self {
        self.answer(Method::Get, path, Answer::Json(Ok(response)))
    }

    /// Fail `GET path` with `error`
    pub fn on_get_error(&self, path: impl Into<String>, error: RestError) -> &Self {
        self.answer(Method::Get, path, Answer::Json(Err(error)))
    }

    /// Answer `POST path` with `response`
    pub fn on_post(&self, path: impl Into<String>, response: Value) -> &Self {
        self.answer(Method::Post, path, Answer::Json(Ok(response)))
    }

    /// Fail `POST path` with `error`
    pub fn on_post_error(&self, path: impl Into<String>, error: RestError) -> &Self {
        self.answer(Method::Post, path, Answer::Json(Err(error)))
    }

    /// Answer `PUT path` with `response`
    pub fn on_put(&self, path: impl Into<String>, response: Value) -> &Self {
        self.answer(Method::Put, path, Answer::Json(Ok(response)))
    }

    /// Answer `DELETE path` with the business result `deleted`
    pub fn on_delete(&self, path: impl Into<String>, deleted: bool) -> &Self {
        self.answer(Method::Delete, path, Answer::Deleted(Ok(deleted)))
    }

    /// Fail `DELETE path` with `error`
    pub fn on_delete_error(&self, path: impl Into<String>, error: RestError) -> &Self {
        self.answer(Method::Delete, path, Answer::Deleted(Err(error)))
    }

    /// Answer uploads to `path` with `response`
    pub fn on_upload_file(&self, path: impl Into<String>, response: Value) -> &Self {
        self.answer(Method::Upload, path, Answer::Json(Ok(response)))
    }

    /// Every call so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RestCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: RestCall, method: Method, path: &str) -> Option<Answer> {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        self.answers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(method, path.to_string()))
            .cloned()
    }

    fn unanswered(method: Method, path: &str) -> RestError {
        RestError::Status {
            status: 404,
            body: format!("no mock answer for {} {path}", method.as_str()),
        }
    }

    fn json(&self, call: RestCall, method: Method, path: &str) -> RestResult<Value> {
        match self.record(call, method, path) {
            Some(Answer::Json(result)) => result,
            Some(Answer::Deleted(_)) | None => Err(Self::unanswered(method, path)),
        }
    }
}

impl RestClient for MockRestClient {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, RestResult<Value>> {
        let call = RestCall::Get {
            path: path.to_string(),
        };
        Box::pin(futures::future::ready(self.json(call, Method::Get, path)))
    }

    fn post<'a>(&'a self, path: &'a str, body: Value) -> BoxFuture<'a, RestResult<Value>> {
        let call = RestCall::Post {
            path: path.to_string(),
            body,
        };
        Box::pin(futures::future::ready(self.json(call, Method::Post, path)))
    }

    fn put<'a>(&'a self, path: &'a str, body: Value) -> BoxFuture<'a, RestResult<Value>> {
        let call = RestCall::Put {
            path: path.to_string(),
            body,
        };
        Box::pin(futures::future::ready(self.json(call, Method::Put, path)))
    }

    fn delete<'a>(&'a self, path: &'a str) -> BoxFuture<'a, RestResult<bool>> {
        let call = RestCall::Delete {
            path: path.to_string(),
        };
        let result = match self.record(call, Method::Delete, path) {
            Some(Answer::Deleted(result)) => result,
            Some(Answer::Json(_)) | None => Err(Self::unanswered(Method::Delete, path)),
        };
        Box::pin(futures::future::ready(result))
    }

    fn upload_file<'a>(
        &'a self,
        path: &'a str,
        file: FileUpload,
    ) -> BoxFuture<'a, RestResult<Value>> {
        let call = RestCall::UploadFile {
            path: path.to_string(),
            file,
        };
        Box::pin(futures::future::ready(self.json(call, Method::Upload, path)))
    }
}
