//! Shared fakes for the integration tests: an in-memory CRM REST API, a
//! recording UI and a scripted telephony device.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use serde_json::{Map, Value, json};

use ccc_console::domain::call::{CallDirection, DialParams};
use ccc_console::domain::notification::Notification;
use ccc_console::repository::errors::{RepositoryError, RepositoryResult};
use ccc_console::repository::{FormSubmission, ResourceReader, ResourceWriter};
use ccc_console::services::call::{CallConnection, CallUi, TelephonyDevice, TelephonyError};
use ccc_console::services::notify::Notifier;

/// In-memory stand-in for the CRM REST API.
///
/// Collections are registered by endpoint and paged DRF style
/// (`?page=N`). Query parameters other than `page`/`page_size` filter
/// rows: `search` matches `first_name` case-insensitively, anything else
/// must equal the row's field.
pub struct FakeApi {
    collections: RefCell<BTreeMap<String, Vec<Value>>>,
    page_size: usize,
    requests: RefCell<Vec<String>>,
    failures: RefCell<VecDeque<RepositoryError>>,
    next_id: Cell<i64>,
}

impl FakeApi {
    pub fn new(page_size: usize) -> Self {
        Self {
            collections: RefCell::new(BTreeMap::new()),
            page_size,
            requests: RefCell::new(Vec::new()),
            failures: RefCell::new(VecDeque::new()),
            next_id: Cell::new(1000),
        }
    }

    pub fn with_collection(self, endpoint: &str, rows: Vec<Value>) -> Self {
        self.collections
            .borrow_mut()
            .insert(endpoint.to_string(), rows);
        self
    }

    /// Makes the next request fail with `err`.
    pub fn fail_next(&self, err: RepositoryError) {
        self.failures.borrow_mut().push_back(err);
    }

    /// Every request as `"METHOD url"`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn rows(&self, endpoint: &str) -> Vec<Value> {
        self.collections
            .borrow()
            .get(endpoint)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, method: &str, url: &str) -> RepositoryResult<()> {
        self.requests.borrow_mut().push(format!("{method} {url}"));
        match self.failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn split(url: &str) -> (String, Vec<(String, String)>) {
        match url.split_once('?') {
            Some((path, query)) => (
                path.to_string(),
                serde_html_form::from_str(query).unwrap_or_default(),
            ),
            None => (url.to_string(), Vec::new()),
        }
    }

    /// Resolves `path` to `(collection endpoint, Some(id))` for detail URLs.
    fn route(&self, path: &str) -> Option<(String, Option<i64>)> {
        let collections = self.collections.borrow();
        if collections.contains_key(path) {
            return Some((path.to_string(), None));
        }
        collections.keys().find_map(|endpoint| {
            let rest = path.strip_prefix(endpoint.as_str())?;
            let id = rest.strip_suffix('/')?.parse().ok()?;
            Some((endpoint.clone(), Some(id)))
        })
    }

    fn matches(row: &Value, key: &str, value: &str) -> bool {
        match key {
            "search" => row["first_name"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(&value.to_lowercase())),
            _ => match &row[key] {
                Value::String(s) => s == value,
                Value::Number(n) => n.to_string() == value,
                Value::Array(items) => items.iter().any(|i| i.to_string() == value),
                _ => false,
            },
        }
    }

    fn filtered(&self, endpoint: &str, query: &[(String, String)]) -> Vec<Value> {
        let filters: Vec<&(String, String)> = query
            .iter()
            .filter(|(k, _)| k != "page" && k != "page_size")
            .collect();
        self.rows(endpoint)
            .into_iter()
            .filter(|row| filters.iter().all(|(k, v)| Self::matches(row, k, v)))
            .collect()
    }

    fn page(&self, endpoint: &str, query: &[(String, String)]) -> Value {
        let page: usize = query
            .iter()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(1);
        let page_size = query
            .iter()
            .find(|(k, _)| k == "page_size")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(self.page_size);
        let rows = self.filtered(endpoint, query);

        let base: Vec<(String, String)> = query
            .iter()
            .filter(|(k, _)| k != "page")
            .cloned()
            .collect();
        let link = |n: usize| {
            let mut params = base.clone();
            params.push(("page".to_string(), n.to_string()));
            format!(
                "{endpoint}?{}",
                serde_html_form::to_string(&params).unwrap_or_default()
            )
        };

        let count = rows.len();
        let start = (page - 1) * page_size;
        let results: Vec<Value> = rows.into_iter().skip(start).take(page_size).collect();
        let next = (start + page_size < count).then(|| link(page + 1));
        let previous = (page > 1).then(|| link(page - 1));

        json!({"count": count, "next": next, "previous": previous, "results": results})
    }

    fn validate(body: &Value) -> RepositoryResult<()> {
        match body.get("first_name") {
            Some(Value::String(name)) if name.trim().is_empty() => {
                Err(RepositoryError::Validation(BTreeMap::from([(
                    "first_name".to_string(),
                    vec!["This field may not be blank.".to_string()],
                )])))
            }
            _ => Ok(()),
        }
    }
}

impl ResourceReader for FakeApi {
    fn get_json(&self, url: &str) -> RepositoryResult<Value> {
        self.record("GET", url)?;
        let (path, query) = Self::split(url);

        // Unpaged helpers: `{endpoint}all/` lists rows, `{endpoint}ids/` ids.
        for suffix in ["all/", "ids/"] {
            let Some(endpoint) = path.strip_suffix(suffix) else {
                continue;
            };
            if !self.collections.borrow().contains_key(endpoint) {
                continue;
            }
            let rows = self.filtered(endpoint, &query);
            return Ok(if suffix == "ids/" {
                Value::Array(rows.iter().map(|row| row["id"].clone()).collect())
            } else {
                Value::Array(rows)
            });
        }

        match self.route(&path) {
            Some((endpoint, None)) => Ok(self.page(&endpoint, &query)),
            Some((endpoint, Some(id))) => self
                .rows(&endpoint)
                .into_iter()
                .find(|row| row["id"] == id)
                .ok_or(RepositoryError::NotFound),
            None => Err(RepositoryError::NotFound),
        }
    }
}

impl ResourceWriter for FakeApi {
    fn post_json(&self, url: &str, body: &Value) -> RepositoryResult<Value> {
        self.record("POST", url)?;
        let (path, _) = Self::split(url);
        let Some((endpoint, None)) = self.route(&path) else {
            // Action endpoints (`.../send/`) just acknowledge.
            return Ok(json!({"status": "ok"}));
        };
        Self::validate(body)?;

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let mut row = body.as_object().cloned().unwrap_or_else(Map::new);
        row.insert("id".to_string(), json!(id));
        let row = Value::Object(row);
        self.collections
            .borrow_mut()
            .entry(endpoint)
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    fn patch_json(&self, url: &str, body: &Value) -> RepositoryResult<Value> {
        self.record("PATCH", url)?;
        let Some((endpoint, Some(id))) = self.route(url) else {
            return Err(RepositoryError::NotFound);
        };
        Self::validate(body)?;

        let mut collections = self.collections.borrow_mut();
        let row = collections
            .get_mut(&endpoint)
            .and_then(|rows| rows.iter_mut().find(|row| row["id"] == id))
            .ok_or(RepositoryError::NotFound)?;
        if let (Some(target), Some(patch)) = (row.as_object_mut(), body.as_object()) {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(row.clone())
    }

    fn delete(&self, url: &str) -> RepositoryResult<()> {
        self.record("DELETE", url)?;
        let Some((endpoint, Some(id))) = self.route(url) else {
            return Err(RepositoryError::NotFound);
        };
        let mut collections = self.collections.borrow_mut();
        let rows = collections
            .get_mut(&endpoint)
            .ok_or(RepositoryError::NotFound)?;
        let before = rows.len();
        rows.retain(|row| row["id"] != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn submit_form(&self, url: &str, form: &FormSubmission) -> RepositoryResult<Value> {
        self.record("POST", url)?;
        let mut body: Map<String, Value> = form
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        if let Some((name, file)) = &form.file {
            body.insert(name.clone(), json!(file.name));
        }
        self.post_json_unrecorded(url, Value::Object(body))
    }
}

impl FakeApi {
    fn post_json_unrecorded(&self, url: &str, body: Value) -> RepositoryResult<Value> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let mut row = body.as_object().cloned().unwrap_or_else(Map::new);
        row.insert("id".to_string(), json!(id));
        let row = Value::Object(row);
        if let Some((endpoint, None)) = self.route(url) {
            self.collections
                .borrow_mut()
                .entry(endpoint)
                .or_default()
                .push(row.clone());
        }
        Ok(row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ShowModal(String, CallDirection),
    HideModal,
    Reload,
}

/// UI double recording everything shown to the user.
pub struct TestUi {
    pub notifications: RefCell<Vec<Notification>>,
    pub alerts: RefCell<Vec<String>>,
    pub confirms: RefCell<Vec<String>>,
    pub confirm_answer: Cell<bool>,
    pub events: RefCell<Vec<UiEvent>>,
}

impl Default for TestUi {
    fn default() -> Self {
        Self {
            notifications: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
            confirms: RefCell::new(Vec::new()),
            confirm_answer: Cell::new(true),
            events: RefCell::new(Vec::new()),
        }
    }
}

impl TestUi {
    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .borrow()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Notifier for TestUi {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.confirm_answer.get()
    }
}

impl CallUi for TestUi {
    fn show_calling_modal(&self, number: &str, direction: CallDirection) {
        self.events
            .borrow_mut()
            .push(UiEvent::ShowModal(number.to_string(), direction));
    }

    fn hide_calling_modal(&self) {
        self.events.borrow_mut().push(UiEvent::HideModal);
    }

    fn reload_page(&self) {
        self.events.borrow_mut().push(UiEvent::Reload);
    }
}

#[derive(Clone, Debug, Default)]
pub struct PhoneLine {
    pub actions: Rc<RefCell<Vec<String>>>,
}

impl CallConnection for PhoneLine {
    fn accept(&self) {
        self.actions.borrow_mut().push("accept".into());
    }

    fn reject(&self) {
        self.actions.borrow_mut().push("reject".into());
    }

    fn mute(&self, muted: bool) {
        self.actions.borrow_mut().push(format!("mute:{muted}"));
    }

    fn disconnect(&self) {
        self.actions.borrow_mut().push("disconnect".into());
    }
}

#[derive(Debug, Default)]
pub struct Softphone {
    pub token: Option<String>,
    pub dialed: Vec<DialParams>,
    pub line: PhoneLine,
    pub released: bool,
}

impl Softphone {
    pub fn dialed_numbers(&self) -> Vec<String> {
        self.dialed.iter().map(|p| p.to.clone()).collect()
    }
}

impl TelephonyDevice for Softphone {
    type Connection = PhoneLine;

    fn setup(&mut self, token: &str) -> Result<(), TelephonyError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn connect(&mut self, params: &DialParams) -> Result<PhoneLine, TelephonyError> {
        self.dialed.push(params.clone());
        Ok(self.line.clone())
    }

    fn disconnect_all(&mut self) {
        self.released = true;
    }
}

/// `n` contacts with ids `1..=n`, every third one without a phone.
pub fn contacts(n: i64) -> Vec<Value> {
    (1..=n)
        .map(|id| {
            let phone = if id % 3 == 0 {
                Value::Null
            } else {
                json!(format!("+1212555{:04}", id))
            };
            json!({
                "id": id,
                "first_name": format!("Contact{id}"),
                "last_name": "Doe",
                "phone": phone,
                "group": if id % 2 == 0 { 2 } else { 1 },
            })
        })
        .collect()
}
