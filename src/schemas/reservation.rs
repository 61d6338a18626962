use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reservation::PrimitiveReservation;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use slot::{FreeSlot, Slot, SlotRules};
use uuid::Uuid;

use crate::schemas::profile::ProfileResponse;
use crate::schemas::ser_includes;

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
	pub id:            i32,
	pub resource_name: String,
	pub date:          NaiveDate,
	pub start_time:    NaiveTime,
	pub end_time:      NaiveTime,
	pub owner_id:      Uuid,
	pub is_mine:       bool,
	pub created_at:    NaiveDateTime,
	#[serde(serialize_with = "ser_includes")]
	pub owner:         Option<Option<ProfileResponse>>,
}

impl ReservationResponse {
	/// Build a response as seen by the given profile
	#[must_use]
	pub fn for_viewer(reservation: PrimitiveReservation, viewer: Uuid) -> Self {
		Self {
			id:            reservation.id,
			is_mine:       reservation.owner_id == viewer,
			resource_name: reservation.resource_name,
			date:          reservation.reservation_date,
			start_time:    reservation.start_time,
			end_time:      reservation.end_time,
			owner_id:      reservation.owner_id,
			created_at:    reservation.created_at,
			owner:         None,
		}
	}

	/// Attach the owner of this reservation, [`None`] marks an owner that
	/// could not be found
	#[must_use]
	pub fn with_owner(mut self, owner: Option<ProfileResponse>) -> Self {
		self.owner = Some(owner);
		self
	}
}

/// A requested slot, times are kept as raw `HH:MM` strings so that missing
/// and malformed values are reported the same way
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
	pub date:       NaiveDate,
	pub start_time: Option<String>,
	pub end_time:   Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationIncludes {
	#[serde(default)]
	pub owner: bool,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationScope {
	/// Only list reservations made by the caller
	#[serde(default)]
	pub mine: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct AvailabilityQuery {
	pub date: NaiveDate,
}

/// Everything a client needs to draw the booking calendar of a day
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
	pub resource_name: String,
	pub date:          NaiveDate,
	pub rules:         SlotRules,
	pub booked:        Vec<Slot>,
	pub free:          Vec<FreeSlot>,
}
