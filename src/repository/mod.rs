//! Access to the CRM REST API.
//!
//! The API is an external collaborator: JSON collections under conventional
//! endpoints (`GET`/`POST` on `/resource/`, `PATCH`/`DELETE` on
//! `/resource/{id}/`). View-models only see the reader/writer traits below,
//! which keeps them testable without a server.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::recording::UploadFile;
use crate::pagination::PagedList;
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::HttpRepository;

/// Multipart body carrying plain fields and at most one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormSubmission {
    pub fields: Vec<(String, String)>,
    pub file: Option<(String, UploadFile)>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: UploadFile) -> Self {
        self.file = Some((name.into(), file));
        self
    }
}

pub trait ResourceReader {
    /// Fetches `url` (absolute, or relative to the API base) as JSON.
    fn get_json(&self, url: &str) -> RepositoryResult<Value>;
}

pub trait ResourceWriter {
    fn post_json(&self, url: &str, body: &Value) -> RepositoryResult<Value>;
    fn patch_json(&self, url: &str, body: &Value) -> RepositoryResult<Value>;
    fn delete(&self, url: &str) -> RepositoryResult<()>;
    fn submit_form(&self, url: &str, form: &FormSubmission) -> RepositoryResult<Value>;
}

fn decode<T: DeserializeOwned>(value: Value) -> RepositoryResult<T> {
    serde_json::from_value(value).map_err(RepositoryError::from)
}

/// Fetches one page of a cursor-paginated collection.
pub fn fetch_page<T, R>(repo: &R, url: &str) -> RepositoryResult<PagedList<T>>
where
    T: DeserializeOwned,
    R: ResourceReader + ?Sized,
{
    decode(repo.get_json(url)?)
}

/// Fetches a collection that may come back paged or as a bare array.
///
/// Lookup endpoints (`?page_size=200`, `/all/`) answer either way.
pub fn fetch_all<T, R>(repo: &R, url: &str) -> RepositoryResult<Vec<T>>
where
    T: DeserializeOwned,
    R: ResourceReader + ?Sized,
{
    match repo.get_json(url)? {
        Value::Array(items) => decode(Value::Array(items)),
        other => Ok(decode::<PagedList<T>>(other)?.results),
    }
}

pub fn fetch_one<T, R>(repo: &R, url: &str) -> RepositoryResult<T>
where
    T: DeserializeOwned,
    R: ResourceReader + ?Sized,
{
    decode(repo.get_json(url)?)
}

pub fn create<T, P, R>(repo: &R, url: &str, payload: &P) -> RepositoryResult<T>
where
    T: DeserializeOwned,
    P: Serialize + ?Sized,
    R: ResourceWriter + ?Sized,
{
    let body = serde_json::to_value(payload)?;
    decode(repo.post_json(url, &body)?)
}

pub fn update<T, P, R>(repo: &R, url: &str, payload: &P) -> RepositoryResult<T>
where
    T: DeserializeOwned,
    P: Serialize + ?Sized,
    R: ResourceWriter + ?Sized,
{
    let body = serde_json::to_value(payload)?;
    decode(repo.patch_json(url, &body)?)
}
