//! Domain model of the CRM console: records, filters and call/media state.

pub mod call;
pub mod campaign;
pub mod contact;
pub mod entity;
pub mod filter;
pub mod message;
pub mod notification;
pub mod number;
pub mod recording;
pub mod types;
