#[macro_use]
extern crate tracing;

use std::sync::Arc;

use condoportal::routes::get_app_router;
use condoportal::{AppState, Config};
use profile::PgProfileStore;
use reservation::PgReservationStore;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::signal::unix::SignalKind;
use tracing::Level;

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.pretty()
		.with_thread_names(true)
		.with_max_level(Level::INFO)
		.init();

	// Set up the configuration.
	let config = Config::from_env();

	// Set up the database connection pool.
	let pool = config.create_database_pool();

	let state = AppState {
		reservation_store: Arc::new(PgReservationStore::new(pool.clone())),
		profile_store: Arc::new(PgProfileStore::new(pool)),
		config: config.clone(),
	};

	let app = get_app_router(state);

	let listener = TcpListener::bind(&config.bind_address).await.unwrap();
	info!(
		"listening on {} with resources {:?}",
		listener.local_addr().unwrap(),
		config.resources
	);
	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_handler())
		.await
		.unwrap();
}

async fn shutdown_handler() {
	let ctrl_c = async {
		signal::ctrl_c().await.expect("COULD NOT INSTALL CTRL+C HANDLER");
	};

	let terminate = async {
		signal::unix::signal(SignalKind::terminate())
			.expect("COULD NOT INSTALL TERMINATE SIGNAL HANDLER")
			.recv()
			.await;
	};

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}
}
