#[macro_use]
extern crate tracing;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use common::{DbConn, Error};
use db::reservation;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use slot::{Slot, TimeOfDay};
use uuid::Uuid;

#[derive(
	Clone,
	Debug,
	Deserialize,
	Identifiable,
	PartialEq,
	Eq,
	Queryable,
	Selectable,
	Serialize,
)]
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveReservation {
	pub id:               i32,
	pub resource_name:    String,
	pub reservation_date: NaiveDate,
	pub start_time:       NaiveTime,
	pub end_time:         NaiveTime,
	pub owner_id:         Uuid,
	pub created_at:       NaiveDateTime,
}

impl PrimitiveReservation {
	/// The time slot occupied by this reservation
	///
	/// # Errors
	/// Errors if a stored time is not on a whole minute
	pub fn slot(&self) -> Result<Slot, Error> {
		let convert = |time: NaiveTime| {
			TimeOfDay::try_from(time).map_err(|e| {
				Error::Infallible(format!(
					"stored reservation {} has an invalid time -- {e}",
					self.id
				))
			})
		};

		Ok(Slot::new(convert(self.start_time)?, convert(self.end_time)?))
	}

	/// Get a [`PrimitiveReservation`] by its id
	#[instrument(skip(conn))]
	pub async fn get_by_id(r_id: i32, conn: &DbConn) -> Result<Self, Error> {
		let reservation = conn
			.interact(move |conn| {
				use self::reservation::dsl::*;

				reservation
					.find(r_id)
					.select(Self::as_select())
					.get_result(conn)
			})
			.await??;

		Ok(reservation)
	}
}
