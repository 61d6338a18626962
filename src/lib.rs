//! # Condominium portal backend library

#[macro_use]
extern crate tracing;

use std::sync::Arc;

use axum::extract::FromRef;
use profile::ProfileStore;
use reservation::ReservationStore;

mod config;
mod session;

pub mod controllers;
pub mod middleware;
pub mod routes;
pub mod schemas;

pub use config::*;
pub use session::*;

/// Shared handle to the reservation storage
pub type ReservationStoreRef = Arc<dyn ReservationStore>;

/// Shared handle to the profile storage
pub type ProfileStoreRef = Arc<dyn ProfileStore>;

/// Common state of the app
#[derive(Clone)]
pub struct AppState {
	pub config:            Config,
	pub reservation_store: ReservationStoreRef,
	pub profile_store:     ProfileStoreRef,
}

impl FromRef<AppState> for Config {
	fn from_ref(input: &AppState) -> Self { input.config.clone() }
}

impl FromRef<AppState> for ReservationStoreRef {
	fn from_ref(input: &AppState) -> Self { input.reservation_store.clone() }
}

impl FromRef<AppState> for ProfileStoreRef {
	fn from_ref(input: &AppState) -> Self { input.profile_store.clone() }
}
