//! Controllers for reservations of shared resources

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, NoContent};
use chrono::Local;
use common::{CreateReservationError, Error};
use reservation::{NewReservation, ReservationFilter};
use slot::{Slot, SlotRequest};

use crate::schemas::profile::ProfileResponse;
use crate::schemas::reservation::{
	AvailabilityQuery,
	AvailabilityResponse,
	CreateReservationRequest,
	ReservationIncludes,
	ReservationResponse,
	ReservationScope,
};
use crate::{Config, ProfileStoreRef, ReservationStoreRef, Session};

/// Slots already booked for a resource on a given date
async fn booked_slots(
	store: &ReservationStoreRef,
	resource: &str,
	date: chrono::NaiveDate,
) -> Result<Vec<Slot>, Error> {
	store
		.list_by_resource_and_date(resource, date)
		.await?
		.iter()
		.map(|r| r.slot())
		.collect()
}

/// Run every check a new reservation has to pass, returning the accepted
/// slot
async fn check_request(
	config: &Config,
	store: &ReservationStoreRef,
	resource: &str,
	request: &CreateReservationRequest,
) -> Result<Slot, Error> {
	config.check_resource(resource)?;

	let today = Local::now().date_naive();
	if request.date < today {
		debug!("refused reservation for past date {}", request.date);

		return Err(CreateReservationError::DateInPast(request.date).into());
	}

	let slot_request = SlotRequest::parse(
		request.date,
		request.start_time.as_deref(),
		request.end_time.as_deref(),
	);

	let existing = booked_slots(store, resource, request.date).await?;

	let slot = config
		.slot_validator()
		.validate(&slot_request, &existing)
		.inspect_err(|v| debug!("refused reservation for {resource} -- {v}"))?;

	Ok(slot)
}

#[instrument(skip(config, store, profiles))]
pub async fn get_reservations(
	State(config): State<Config>,
	State(store): State<ReservationStoreRef>,
	State(profiles): State<ProfileStoreRef>,
	session: Session,
	Path(resource): Path<String>,
	Query(mut filter): Query<ReservationFilter>,
	Query(scope): Query<ReservationScope>,
	Query(includes): Query<ReservationIncludes>,
) -> Result<impl IntoResponse, Error> {
	config.check_resource(&resource)?;
	filter.check()?;

	if includes.owner && !session.is_admin() {
		return Err(Error::Forbidden);
	}

	if scope.mine {
		filter.owner_id = Some(session.data.profile_id);
	}

	let reservations = store.list(&resource, filter).await?;

	let owners: Option<HashMap<_, _>> = if includes.owner {
		let mut ids: Vec<_> = reservations.iter().map(|r| r.owner_id).collect();
		ids.sort_unstable();
		ids.dedup();

		let found = profiles.get_by_ids(ids).await?;

		Some(
			found
				.into_iter()
				.map(|p| (p.id, ProfileResponse::from(p)))
				.collect(),
		)
	} else {
		None
	};

	let response: Vec<ReservationResponse> = reservations
		.into_iter()
		.map(|r| {
			let owner_id = r.owner_id;
			let response =
				ReservationResponse::for_viewer(r, session.data.profile_id);

			match &owners {
				Some(owners) => {
					response.with_owner(owners.get(&owner_id).cloned())
				},
				None => response,
			}
		})
		.collect();

	Ok((StatusCode::OK, Json(response)))
}

#[instrument(skip(config, store))]
pub async fn get_availability(
	State(config): State<Config>,
	State(store): State<ReservationStoreRef>,
	Path(resource): Path<String>,
	Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, Error> {
	config.check_resource(&resource)?;

	let mut booked = booked_slots(&store, &resource, query.date).await?;
	booked.sort_by_key(|s| s.start_time);

	let validator = config.slot_validator();
	let free = validator.free_slots(&booked);

	let response = AvailabilityResponse {
		resource_name: resource,
		date: query.date,
		rules: *validator.rules(),
		booked,
		free,
	};

	Ok((StatusCode::OK, Json(response)))
}

/// Validate a reservation without storing it
#[instrument(skip(config, store))]
pub async fn check_reservation(
	State(config): State<Config>,
	State(store): State<ReservationStoreRef>,
	Path(resource): Path<String>,
	Json(request): Json<CreateReservationRequest>,
) -> Result<NoContent, Error> {
	check_request(&config, &store, &resource, &request).await?;

	Ok(NoContent)
}

#[instrument(skip(config, store))]
pub async fn create_reservation(
	State(config): State<Config>,
	State(store): State<ReservationStoreRef>,
	session: Session,
	Path(resource): Path<String>,
	Json(request): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, Error> {
	let slot = check_request(&config, &store, &resource, &request).await?;

	let new_reservation = NewReservation::new(
		&resource,
		request.date,
		slot,
		session.data.profile_id,
	);

	let reservation = store.insert(new_reservation).await?;

	let response =
		ReservationResponse::for_viewer(reservation, session.data.profile_id);

	Ok((StatusCode::CREATED, Json(response)))
}

/// Cancel one of the caller's own reservations
#[instrument(skip(config, store))]
pub async fn delete_reservation(
	State(config): State<Config>,
	State(store): State<ReservationStoreRef>,
	session: Session,
	Path((resource, r_id)): Path<(String, i32)>,
) -> Result<NoContent, Error> {
	config.check_resource(&resource)?;

	let reservation = store.get_by_id(r_id).await?;
	if reservation.resource_name != resource {
		return Err(Error::NotFound(format!("reservation {r_id}")));
	}

	store.delete_owned_by(r_id, session.data.profile_id).await?;

	Ok(NoContent)
}

/// Cancel any reservation, regardless of who made it
#[instrument(skip(store))]
pub async fn delete_any_reservation(
	State(store): State<ReservationStoreRef>,
	session: Session,
	Path(r_id): Path<i32>,
) -> Result<NoContent, Error> {
	store.delete_any(r_id).await?;

	info!("profile {} cancelled reservation {r_id}", session.data.profile_id);

	Ok(NoContent)
}
