//! `reqwest`-backed implementation of the repository traits.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response, multipart};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::dto::api::{parse_error_body, summarize_errors};
use crate::models::config::ClientConfig;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{FormSubmission, ResourceReader, ResourceWriter};

/// Header carrying the Django CSRF token on unsafe methods.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Shared HTTP client wrapper: every call returns the parsed payload or a
/// normalized [`RepositoryError`].
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
    csrf_token: Option<String>,
}

impl HttpRepository {
    pub fn new(base_url: &str, timeout: Duration) -> RepositoryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            csrf_token: None,
        })
    }

    pub fn from_config(config: &ClientConfig) -> RepositoryResult<Self> {
        let repo = Self::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(match &config.csrf_token {
            Some(token) => repo.with_csrf_token(token.clone()),
            None => repo,
        })
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Resolves a cursor or endpoint against the API base.
    ///
    /// Absolute cursors returned by the server are used as-is.
    pub fn resolve(&self, url: &str) -> RepositoryResult<Url> {
        Ok(self.base_url.join(url)?)
    }

    fn unsafe_request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.csrf_token {
            Some(token) => builder.header(CSRF_HEADER, token),
            None => builder,
        }
    }

    fn send(&self, builder: RequestBuilder) -> RepositoryResult<Value> {
        let response = builder.send()?;
        read_response(response)
    }
}

fn read_response(response: Response) -> RepositoryResult<Value> {
    let status = response.status();
    let text = response.text()?;

    if status.is_success() {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&text)?);
    }

    let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
    Err(error_for_status(status, &body))
}

/// Maps a non-2xx status and its body onto the error taxonomy.
pub(crate) fn error_for_status(status: StatusCode, body: &Value) -> RepositoryError {
    let errors = parse_error_body(body);
    let message = if errors.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        summarize_errors(&errors)
    };

    match status {
        StatusCode::BAD_REQUEST => RepositoryError::Validation(errors),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RepositoryError::PermissionDenied(message)
        }
        StatusCode::NOT_FOUND => RepositoryError::NotFound,
        other => RepositoryError::Server {
            status: other.as_u16(),
            message,
        },
    }
}

impl ResourceReader for HttpRepository {
    fn get_json(&self, url: &str) -> RepositoryResult<Value> {
        let url = self.resolve(url)?;
        log::debug!("GET {url}");
        self.send(self.client.get(url))
    }
}

impl ResourceWriter for HttpRepository {
    fn post_json(&self, url: &str, body: &Value) -> RepositoryResult<Value> {
        let url = self.resolve(url)?;
        log::debug!("POST {url}");
        self.send(self.unsafe_request(self.client.post(url).json(body)))
    }

    fn patch_json(&self, url: &str, body: &Value) -> RepositoryResult<Value> {
        let url = self.resolve(url)?;
        log::debug!("PATCH {url}");
        self.send(self.unsafe_request(self.client.patch(url).json(body)))
    }

    fn delete(&self, url: &str) -> RepositoryResult<()> {
        let url = self.resolve(url)?;
        log::debug!("DELETE {url}");
        self.send(self.unsafe_request(self.client.delete(url)))
            .map(|_| ())
    }

    fn submit_form(&self, url: &str, form: &FormSubmission) -> RepositoryResult<Value> {
        let url = self.resolve(url)?;

        let mut body = multipart::Form::new();
        for (name, value) in &form.fields {
            body = body.text(name.clone(), value.clone());
        }
        if let Some((name, file)) = &form.file {
            let part = multipart::Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime)?;
            body = body.part(name.clone(), part);
        }

        log::debug!("POST {url} (multipart, {} fields)", form.fields.len());
        self.send(self.unsafe_request(self.client.post(url).multipart(body)))
    }
}
