use axum::Router;
use axum::routing::{delete, get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::controllers::healthcheck;
use crate::controllers::profile::get_current_profile;
use crate::controllers::reservation::{
	check_reservation,
	create_reservation,
	delete_any_reservation,
	delete_reservation,
	get_availability,
	get_reservations,
};
use crate::middleware::{AdminLayer, AuthLayer};

/// Get the app router
pub fn get_app_router(state: AppState) -> Router {
	let api_routes = Router::new()
		.route("/healthcheck", get(healthcheck))
		.nest("/profile", profile_routes(&state))
		.nest("/reservations", reservation_routes(&state))
		.nest("/admin", admin_routes(&state));

	Router::new()
		.merge(api_routes)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(TimeoutLayer::new(state.config.request_timeout))
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Profile routes
fn profile_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/me", get(get_current_profile))
		.route_layer(AuthLayer::new(state.clone()))
}

/// Reservation routes, scoped per bookable resource
fn reservation_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/{resource}", get(get_reservations).post(create_reservation))
		.route("/{resource}/availability", get(get_availability))
		.route("/{resource}/check", post(check_reservation))
		.route("/{resource}/{id}", delete(delete_reservation))
		.route_layer(AuthLayer::new(state.clone()))
}

/// Administrative routes
fn admin_routes(state: &AppState) -> Router<AppState> {
	Router::new()
		.route("/reservations/{id}", delete(delete_any_reservation))
		.route_layer(AdminLayer::new())
		.route_layer(AuthLayer::new(state.clone()))
}
