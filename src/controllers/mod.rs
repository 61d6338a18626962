//! Defines controller functions that correspond to individual routes

use axum::response::NoContent;

pub mod profile;
pub mod reservation;

/// Check if the webserver is functional
pub async fn healthcheck() -> NoContent { NoContent }
