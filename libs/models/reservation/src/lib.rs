#[macro_use]
extern crate tracing;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Weekday};
use common::Error;
use db::reservation;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use models_common::{BoxedCondition, ToFilter};
pub use primitive_reservation::PrimitiveReservation;
use serde::{Deserialize, Serialize};
use slot::Slot;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryReservationStore;
pub use postgres::PgReservationStore;

/// Storage of reservations
///
/// Implementations must refuse to store two overlapping reservations for the
/// same resource on the same date, reporting
/// [`CreateReservationError::Conflict`](common::CreateReservationError) when
/// an insert loses that race
#[async_trait]
pub trait ReservationStore: Send + Sync {
	/// All reservations of a resource on a given date, ordered by start time
	async fn list_by_resource_and_date(
		&self,
		resource: &str,
		date: NaiveDate,
	) -> Result<Vec<PrimitiveReservation>, Error>;

	/// All reservations of a resource matching a filter, ordered by date and
	/// start time
	async fn list(
		&self,
		resource: &str,
		filter: ReservationFilter,
	) -> Result<Vec<PrimitiveReservation>, Error>;

	/// Get a reservation given its id
	async fn get_by_id(&self, id: i32) -> Result<PrimitiveReservation, Error>;

	/// Store a new reservation
	async fn insert(
		&self,
		reservation: NewReservation,
	) -> Result<PrimitiveReservation, Error>;

	/// Delete a reservation if it belongs to the given owner
	async fn delete_owned_by(&self, id: i32, owner_id: Uuid)
	-> Result<(), Error>;

	/// Delete any reservation
	async fn delete_any(&self, id: i32) -> Result<(), Error>;
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationFilter {
	/// Only reservations on this date
	pub date:       Option<NaiveDate>,
	/// Only reservations on or after this date
	pub from:       Option<NaiveDate>,
	/// Only reservations in the (monday to sunday) week containing this date
	pub in_week_of: Option<NaiveDate>,
	/// Only reservations made by this profile
	#[serde(skip)]
	pub owner_id:   Option<Uuid>,
}

/// First and last day of the monday to sunday week containing a date
///
/// [`None`] if that week reaches past the representable dates
fn week_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
	let week = date.week(Weekday::Mon);

	Some((week.checked_first_day()?, week.checked_last_day()?))
}

impl ReservationFilter {
	/// Check that every bound of this filter can be evaluated
	///
	/// # Errors
	/// Errors if `in_week_of` lies in a week at the edge of the calendar
	pub fn check(&self) -> Result<(), Error> {
		match self.in_week_of {
			Some(date) if week_bounds(date).is_none() => {
				Err(Error::ValidationError(format!(
					"the week of {date} is out of range"
				)))
			},
			_ => Ok(()),
		}
	}

	/// Check if a single reservation passes this filter
	#[must_use]
	pub fn matches(&self, r: &PrimitiveReservation) -> bool {
		if self.date.is_some_and(|date| r.reservation_date != date) {
			return false;
		}

		if self.from.is_some_and(|from| r.reservation_date < from) {
			return false;
		}

		if let Some(in_week_of) = self.in_week_of {
			let Some((first, last)) = week_bounds(in_week_of) else {
				return false;
			};

			if r.reservation_date < first || r.reservation_date > last {
				return false;
			}
		}

		if self.owner_id.is_some_and(|owner| r.owner_id != owner) {
			return false;
		}

		true
	}
}

impl ToFilter<reservation::table> for ReservationFilter {
	type SqlType = Bool;

	fn to_filter(&self) -> BoxedCondition<reservation::table, Self::SqlType> {
		let mut filter: BoxedCondition<reservation::table, Self::SqlType> =
			Box::new(true.into_sql::<Bool>());

		if let Some(date) = self.date {
			filter =
				Box::new(filter.and(reservation::reservation_date.eq(date)));
		}

		if let Some(from) = self.from {
			filter =
				Box::new(filter.and(reservation::reservation_date.ge(from)));
		}

		if let Some(in_week_of) = self.in_week_of {
			let Some((first, last)) = week_bounds(in_week_of) else {
				return Box::new(false.into_sql::<Bool>());
			};

			filter = Box::new(
				filter.and(reservation::reservation_date.between(first, last)),
			);
		}

		if let Some(owner) = self.owner_id {
			filter = Box::new(filter.and(reservation::owner_id.eq(owner)));
		}

		filter
	}
}

#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = reservation)]
#[diesel(check_for_backend(Pg))]
pub struct NewReservation {
	pub resource_name:    String,
	pub reservation_date: NaiveDate,
	pub start_time:       NaiveTime,
	pub end_time:         NaiveTime,
	pub owner_id:         Uuid,
}

impl NewReservation {
	#[must_use]
	pub fn new(
		resource_name: &str,
		reservation_date: NaiveDate,
		slot: Slot,
		owner_id: Uuid,
	) -> Self {
		Self {
			resource_name: resource_name.to_string(),
			reservation_date,
			start_time: slot.start_time.into(),
			end_time: slot.end_time.into(),
			owner_id,
		}
	}
}
