use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::{Days, Local, NaiveDate, Utc};
use condoportal::{AppState, Config, ReservationStoreRef, routes};
use db::ProfileRole;
use profile::{MemoryProfileStore, PrimitiveProfile};
use reservation::{MemoryReservationStore, NewReservation, ReservationStore};
use slot::{Slot, SlotRules};
use uuid::Uuid;

pub const RESOURCE: &str = "barbecue_area";

const PROFILE_ID_HEADER: &str = "x-profile-id";

#[allow(dead_code)]
pub struct TestEnv {
	pub app:          TestServer,
	pub reservations: MemoryReservationStore,
	pub profiles:     MemoryProfileStore,
	pub bob:          PrimitiveProfile,
	pub alice:        PrimitiveProfile,
	pub admin:        PrimitiveProfile,
}

fn seed_profile(
	store: &MemoryProfileStore,
	name: &str,
	role: ProfileRole,
) -> PrimitiveProfile {
	let profile = PrimitiveProfile {
		id: Uuid::new_v4(),
		role,
		full_name: name.to_string(),
		block_number: "B".to_string(),
		apartment_number: Some("12".to_string()),
		created_at: Utc::now().naive_utc(),
	};

	store.insert(profile.clone());

	profile
}

#[allow(dead_code)]
impl TestEnv {
	/// Get a test environment backed by in-memory stores
	///
	/// # Panics
	/// Panics if building the test server fails
	pub fn new() -> Self {
		Self::with_store(|memory| -> ReservationStoreRef { Arc::new(memory) })
	}

	/// Get a test environment whose router talks to the in-memory
	/// reservations through `wrap`
	///
	/// # Panics
	/// Panics if building the test server fails
	pub fn with_store<F>(wrap: F) -> Self
	where
		F: FnOnce(MemoryReservationStore) -> ReservationStoreRef,
	{
		let config = Config {
			database_url:      String::new(),
			bind_address:      "127.0.0.1:0".to_string(),
			profile_id_header: PROFILE_ID_HEADER.to_string(),
			resources:         vec![RESOURCE.to_string()],
			slot_rules:        SlotRules::default(),
			request_timeout:   Duration::from_secs(5),
		};

		let reservations = MemoryReservationStore::new();
		let profiles = MemoryProfileStore::new();

		let bob = seed_profile(&profiles, "Bob", ProfileRole::Tenant);
		let alice = seed_profile(&profiles, "Alice", ProfileRole::Tenant);
		let admin = seed_profile(&profiles, "Admin", ProfileRole::Admin);

		let state = AppState {
			config,
			reservation_store: wrap(reservations.clone()),
			profile_store: Arc::new(profiles.clone()),
		};
		let app = routes::get_app_router(state);

		let test_server = TestServer::new(app).unwrap();

		TestEnv { app: test_server, reservations, profiles, bob, alice, admin }
	}

	fn identify(
		request: TestRequest,
		profile: &PrimitiveProfile,
	) -> TestRequest {
		request.add_header(
			HeaderName::from_static(PROFILE_ID_HEADER),
			HeaderValue::from_str(&profile.id.to_string()).unwrap(),
		)
	}

	pub fn get_as(
		&self,
		path: &str,
		profile: &PrimitiveProfile,
	) -> TestRequest {
		Self::identify(self.app.get(path), profile)
	}

	pub fn post_as(
		&self,
		path: &str,
		profile: &PrimitiveProfile,
	) -> TestRequest {
		Self::identify(self.app.post(path), profile)
	}

	pub fn delete_as(
		&self,
		path: &str,
		profile: &PrimitiveProfile,
	) -> TestRequest {
		Self::identify(self.app.delete(path), profile)
	}

	/// Store a reservation directly, skipping the slot rules
	pub async fn reserve(
		&self,
		owner: &PrimitiveProfile,
		date: NaiveDate,
		slot: &str,
	) -> i32 {
		let (start, end) = slot.split_once('-').unwrap();
		let slot = Slot::new(start.parse().unwrap(), end.parse().unwrap());

		self.reservations
			.insert(NewReservation::new(RESOURCE, date, slot, owner.id))
			.await
			.unwrap()
			.id
	}
}

/// A date safely in the future
#[allow(dead_code)]
#[must_use]
pub fn next_week() -> NaiveDate { Local::now().date_naive() + Days::new(7) }
