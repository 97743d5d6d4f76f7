//! DTOs that bridge the view-models with the REST API.

pub mod api;
