//! Client core of the CRM console: cursor-paginated listings, row CRUD,
//! the browser phone and the auto-dialer, driven through the CRM REST API.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod pagination;

#[cfg(feature = "client")]
pub mod error_conversions;
#[cfg(feature = "client")]
pub mod models;
#[cfg(feature = "client")]
pub mod repository;
#[cfg(feature = "client")]
pub mod services;
