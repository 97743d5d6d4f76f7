//! Shared behaviour of server-defined records shown in list views.

use std::fmt::Display;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record owned by a CRM collection endpoint.
///
/// Fields the client does not read are carried through untouched, so an
/// entity only has to expose its identifier and where its collection lives.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Display;

    /// Collection endpoint, with trailing slash (e.g. `/api/contacts/`).
    const ENDPOINT: &'static str;

    /// Human-readable name used in notifications.
    const LABEL: &'static str;

    fn id(&self) -> Self::Id;

    /// Detail endpoint for a single record.
    fn detail_url(id: Self::Id) -> String {
        format!("{}{id}/", Self::ENDPOINT)
    }
}
