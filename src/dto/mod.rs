//! Data transfer objects shared by the API handlers and the HTTP gateway.

pub mod api;
