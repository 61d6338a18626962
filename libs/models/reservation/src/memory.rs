use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::{CreateReservationError, Error};
use parking_lot::Mutex;
use primitive_reservation::PrimitiveReservation;
use slot::Slot;
use uuid::Uuid;

use crate::{NewReservation, ReservationFilter, ReservationStore};

#[derive(Debug, Default)]
struct Rows {
	last_id: i32,
	rows:    Vec<PrimitiveReservation>,
}

/// [`ReservationStore`] kept in memory, for local development and tests
///
/// Enforces the same no-overlap constraint as the database, the check and
/// the insert happen under a single lock
#[derive(Clone, Default)]
pub struct MemoryReservationStore {
	inner: Arc<Mutex<Rows>>,
}

impl MemoryReservationStore {
	#[must_use]
	pub fn new() -> Self { Self::default() }
}

fn sort_rows(rows: &mut [PrimitiveReservation]) {
	rows.sort_by_key(|r| (r.reservation_date, r.start_time, r.id));
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
	async fn list_by_resource_and_date(
		&self,
		resource: &str,
		date: NaiveDate,
	) -> Result<Vec<PrimitiveReservation>, Error> {
		let filter =
			ReservationFilter { date: Some(date), ..Default::default() };

		self.list(resource, filter).await
	}

	async fn list(
		&self,
		resource: &str,
		filter: ReservationFilter,
	) -> Result<Vec<PrimitiveReservation>, Error> {
		let mut found: Vec<_> = self
			.inner
			.lock()
			.rows
			.iter()
			.filter(|r| r.resource_name == resource && filter.matches(r))
			.cloned()
			.collect();

		sort_rows(&mut found);

		Ok(found)
	}

	async fn get_by_id(
		&self,
		r_id: i32,
	) -> Result<PrimitiveReservation, Error> {
		self.inner
			.lock()
			.rows
			.iter()
			.find(|r| r.id == r_id)
			.cloned()
			.ok_or_else(|| Error::NotFound(format!("reservation {r_id}")))
	}

	#[instrument(skip(self))]
	async fn insert(
		&self,
		new: NewReservation,
	) -> Result<PrimitiveReservation, Error> {
		if new.end_time <= new.start_time {
			return Err(Error::ValidationError(
				"end time must be after start time".to_string(),
			));
		}

		let mut inner = self.inner.lock();

		let next = PrimitiveReservation {
			id:               inner.last_id + 1,
			resource_name:    new.resource_name,
			reservation_date: new.reservation_date,
			start_time:       new.start_time,
			end_time:         new.end_time,
			owner_id:         new.owner_id,
			created_at:       Utc::now().naive_utc(),
		};

		let candidate = next.slot()?;

		for row in &inner.rows {
			if row.resource_name != next.resource_name
				|| row.reservation_date != next.reservation_date
			{
				continue;
			}

			let existing: Slot = row.slot()?;

			if existing.overlaps(&candidate) {
				debug!(
					"refusing {candidate} on {}, overlaps {existing}",
					next.reservation_date
				);

				return Err(CreateReservationError::Conflict.into());
			}
		}

		inner.last_id = next.id;
		inner.rows.push(next.clone());

		info!("created reservation {next:?}");

		Ok(next)
	}

	#[instrument(skip(self))]
	async fn delete_owned_by(
		&self,
		r_id: i32,
		o_id: Uuid,
	) -> Result<(), Error> {
		let mut inner = self.inner.lock();

		let Some(idx) =
			inner.rows.iter().position(|r| r.id == r_id && r.owner_id == o_id)
		else {
			return Err(Error::NotFound(format!(
				"reservation {r_id} owned by {o_id}"
			)));
		};

		inner.rows.remove(idx);

		info!("profile {o_id} cancelled reservation with id {r_id}");

		Ok(())
	}

	#[instrument(skip(self))]
	async fn delete_any(&self, r_id: i32) -> Result<(), Error> {
		let mut inner = self.inner.lock();

		let Some(idx) = inner.rows.iter().position(|r| r.id == r_id) else {
			return Err(Error::NotFound(format!("reservation {r_id}")));
		};

		inner.rows.remove(idx);

		info!("deleted reservation with id {r_id}");

		Ok(())
	}
}
