use async_trait::async_trait;
use chrono::NaiveDate;
use common::{DbPool, Error};
use db::reservation;
use diesel::prelude::*;
use models_common::{QUERY_HARD_LIMIT, ToFilter};
use primitive_reservation::PrimitiveReservation;
use uuid::Uuid;

use crate::{NewReservation, ReservationFilter, ReservationStore};

/// [`ReservationStore`] backed by the platform database
///
/// Overlaps are rejected by the `reservation_no_overlap` exclusion constraint
#[derive(Clone)]
pub struct PgReservationStore {
	pool: DbPool,
}

impl PgReservationStore {
	#[must_use]
	pub fn new(pool: DbPool) -> Self { Self { pool } }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
	#[instrument(skip(self))]
	async fn list_by_resource_and_date(
		&self,
		resource: &str,
		date: NaiveDate,
	) -> Result<Vec<PrimitiveReservation>, Error> {
		let conn = self.pool.get().await?;
		let resource = resource.to_string();

		let reservations = conn
			.interact(move |conn| {
				use self::reservation::dsl::*;

				reservation
					.filter(resource_name.eq(resource))
					.filter(reservation_date.eq(date))
					.order(start_time.asc())
					.select(PrimitiveReservation::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(reservations)
	}

	#[instrument(skip(self))]
	async fn list(
		&self,
		resource: &str,
		filter: ReservationFilter,
	) -> Result<Vec<PrimitiveReservation>, Error> {
		let conn = self.pool.get().await?;
		let resource = resource.to_string();

		let reservations = conn
			.interact(move |conn| {
				use self::reservation::dsl::*;

				reservation
					.filter(resource_name.eq(resource))
					.filter(filter.to_filter())
					.order((reservation_date.asc(), start_time.asc()))
					.limit(QUERY_HARD_LIMIT)
					.select(PrimitiveReservation::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(reservations)
	}

	#[instrument(skip(self))]
	async fn get_by_id(
		&self,
		r_id: i32,
	) -> Result<PrimitiveReservation, Error> {
		let conn = self.pool.get().await?;

		PrimitiveReservation::get_by_id(r_id, &conn).await.map_err(|e| {
			match e {
				Error::NotFound(_) => {
					Error::NotFound(format!("reservation {r_id}"))
				},
				e => e,
			}
		})
	}

	#[instrument(skip(self))]
	async fn insert(
		&self,
		new: NewReservation,
	) -> Result<PrimitiveReservation, Error> {
		let conn = self.pool.get().await?;

		let created = conn
			.interact(|conn| {
				use self::reservation::dsl::*;

				diesel::insert_into(reservation)
					.values(new)
					.returning(PrimitiveReservation::as_returning())
					.get_result(conn)
			})
			.await??;

		info!("created reservation {created:?}");

		Ok(created)
	}

	#[instrument(skip(self))]
	async fn delete_owned_by(
		&self,
		r_id: i32,
		o_id: Uuid,
	) -> Result<(), Error> {
		let conn = self.pool.get().await?;

		let deleted = conn
			.interact(move |conn| {
				use self::reservation::dsl::*;

				diesel::delete(
					reservation.filter(id.eq(r_id)).filter(owner_id.eq(o_id)),
				)
				.execute(conn)
			})
			.await??;

		if deleted == 0 {
			return Err(Error::NotFound(format!(
				"reservation {r_id} owned by {o_id}"
			)));
		}

		info!("profile {o_id} cancelled reservation with id {r_id}");

		Ok(())
	}

	#[instrument(skip(self))]
	async fn delete_any(&self, r_id: i32) -> Result<(), Error> {
		let conn = self.pool.get().await?;

		let deleted = conn
			.interact(move |conn| {
				use self::reservation::dsl::*;

				diesel::delete(reservation.find(r_id)).execute(conn)
			})
			.await??;

		if deleted == 0 {
			return Err(Error::NotFound(format!("reservation {r_id}")));
		}

		info!("deleted reservation with id {r_id}");

		Ok(())
	}
}
