//! Time slot rules for reservable resources
//!
//! A [`SlotValidator`] decides whether a requested slot may be booked given
//! the slots already booked for the same resource on the same day. None of
//! this touches a database, callers fetch the existing slots themselves.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod time;

pub use time::*;

/// A half-open `[start, end)` interval within a single day
#[derive(Clone, Copy, Debug, Deserialize, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
	pub start_time: TimeOfDay,
	pub end_time:   TimeOfDay,
}

impl Slot {
	#[must_use]
	pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
		Self { start_time, end_time }
	}

	/// Length of this slot in minutes
	#[must_use]
	pub fn duration_minutes(&self) -> i32 {
		self.end_time.minutes_since(self.start_time)
	}

	/// Check if two slots share any instant
	///
	/// Slots that merely touch (`a.end == b.start`) do not overlap
	#[must_use]
	pub fn overlaps(&self, other: &Slot) -> bool {
		self.start_time < other.end_time && other.start_time < self.end_time
	}
}

impl fmt::Display for Slot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.start_time, self.end_time)
	}
}

/// A requested reservation as it arrives from a client
///
/// Times that were missing or failed to parse are [`None`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRequest {
	pub date:       NaiveDate,
	pub start_time: Option<TimeOfDay>,
	pub end_time:   Option<TimeOfDay>,
}

impl SlotRequest {
	/// Build a request from raw `HH:MM` strings, unparsable values are
	/// treated as missing
	#[must_use]
	pub fn parse(
		date: NaiveDate,
		start_time: Option<&str>,
		end_time: Option<&str>,
	) -> Self {
		Self {
			date,
			start_time: start_time.and_then(|s| s.parse().ok()),
			end_time: end_time.and_then(|s| s.parse().ok()),
		}
	}
}

/// Reasons a requested slot can be refused
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SlotViolation {
	#[error("both a start and an end time (HH:MM) are required")]
	MissingOrInvalidTime,
	#[error("the end time must be after the start time")]
	EndNotAfterStart,
	#[error("a reservation must last at least {min_minutes} minutes")]
	DurationTooShort { min_minutes: u16 },
	#[error("a reservation can last at most {max_minutes} minutes")]
	DurationTooLong { max_minutes: u16 },
	#[error("reservations are only possible between {opens} and {closes}")]
	OutsideAvailableWindow { opens: TimeOfDay, closes: TimeOfDay },
	#[error("the requested time overlaps the existing reservation {0}")]
	OverlapsExistingReservation(Slot),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidRules {
	#[error("minimum duration must be positive")]
	ZeroMinimumDuration,
	#[error("minimum duration exceeds maximum duration")]
	MinimumAboveMaximum,
	#[error("opening hour {0} is not before closing hour {1}")]
	EmptyWindow(u8, u8),
	#[error("closing hour {0} is not a valid hour of the day")]
	InvalidClosingHour(u8),
}

/// Booking rules for a resource
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRules {
	pub min_duration_minutes: u16,
	pub max_duration_minutes: u16,
	pub opens_at:             TimeOfDay,
	pub closes_at:            TimeOfDay,
}

impl Default for SlotRules {
	/// Two to four hours, between 09:00 and 22:00
	fn default() -> Self {
		Self {
			min_duration_minutes: 2 * MINUTES_PER_HOUR,
			max_duration_minutes: 4 * MINUTES_PER_HOUR,
			opens_at:             TimeOfDay::from_hm(9, 0).unwrap_or_default(),
			closes_at:            TimeOfDay::from_hm(22, 0).unwrap_or_default(),
		}
	}
}

impl SlotRules {
	/// Build a set of rules from whole hours
	///
	/// # Errors
	/// Errors if the rules could never accept a reservation
	pub fn from_hours(
		min_duration_hours: u8,
		max_duration_hours: u8,
		available_start_hour: u8,
		available_end_hour: u8,
	) -> Result<Self, InvalidRules> {
		if min_duration_hours == 0 {
			return Err(InvalidRules::ZeroMinimumDuration);
		}

		if min_duration_hours > max_duration_hours {
			return Err(InvalidRules::MinimumAboveMaximum);
		}

		if available_start_hour >= available_end_hour {
			return Err(InvalidRules::EmptyWindow(
				available_start_hour,
				available_end_hour,
			));
		}

		let closes_at = TimeOfDay::from_hour(available_end_hour)
			.ok_or(InvalidRules::InvalidClosingHour(available_end_hour))?;
		let opens_at = TimeOfDay::from_hour(available_start_hour).ok_or(
			InvalidRules::EmptyWindow(available_start_hour, available_end_hour),
		)?;

		Ok(Self {
			min_duration_minutes: u16::from(min_duration_hours)
				* MINUTES_PER_HOUR,
			max_duration_minutes: u16::from(max_duration_hours)
				* MINUTES_PER_HOUR,
			opens_at,
			closes_at,
		})
	}

	/// The full bookable window of a day
	#[must_use]
	pub fn window(&self) -> Slot { Slot::new(self.opens_at, self.closes_at) }
}

/// An unbooked interval of a day
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeSlot {
	#[serde(flatten)]
	pub slot:     Slot,
	/// Whether the interval is long enough to hold a reservation
	pub bookable: bool,
}

/// Checks requested slots against a set of [`SlotRules`]
#[derive(Clone, Copy, Debug, Default)]
pub struct SlotValidator {
	rules: SlotRules,
}

impl SlotValidator {
	#[must_use]
	pub fn new(rules: SlotRules) -> Self { Self { rules } }

	#[must_use]
	pub fn rules(&self) -> &SlotRules { &self.rules }

	/// Validate a requested slot against the slots already booked on the
	/// same day for the same resource
	///
	/// Checks run in a fixed order and the first failing one is reported:
	/// presence, ordering, duration, window and finally overlap.
	///
	/// # Errors
	/// Returns the [`SlotViolation`] of the first failing check
	pub fn validate<'a, I>(
		&self,
		request: &SlotRequest,
		existing: I,
	) -> Result<Slot, SlotViolation>
	where
		I: IntoIterator<Item = &'a Slot>,
	{
		let (Some(start_time), Some(end_time)) =
			(request.start_time, request.end_time)
		else {
			return Err(SlotViolation::MissingOrInvalidTime);
		};

		if end_time <= start_time {
			return Err(SlotViolation::EndNotAfterStart);
		}

		let candidate = Slot::new(start_time, end_time);
		let duration = candidate.duration_minutes();

		if duration < i32::from(self.rules.min_duration_minutes) {
			return Err(SlotViolation::DurationTooShort {
				min_minutes: self.rules.min_duration_minutes,
			});
		}

		if duration > i32::from(self.rules.max_duration_minutes) {
			return Err(SlotViolation::DurationTooLong {
				max_minutes: self.rules.max_duration_minutes,
			});
		}

		if start_time < self.rules.opens_at || end_time > self.rules.closes_at {
			return Err(SlotViolation::OutsideAvailableWindow {
				opens:  self.rules.opens_at,
				closes: self.rules.closes_at,
			});
		}

		if let Some(conflict) =
			existing.into_iter().find(|s| candidate.overlaps(s))
		{
			return Err(SlotViolation::OverlapsExistingReservation(*conflict));
		}

		Ok(candidate)
	}

	/// Compute the unbooked intervals of a day within the available window
	///
	/// Existing slots may be unordered, overlap each other or reach outside
	/// the window.
	#[must_use]
	pub fn free_slots<'a, I>(&self, existing: I) -> Vec<FreeSlot>
	where
		I: IntoIterator<Item = &'a Slot>,
	{
		let window = self.rules.window();

		let mut booked: Vec<Slot> = existing
			.into_iter()
			.filter(|s| s.overlaps(&window))
			.copied()
			.collect();
		booked.sort_by_key(|s| s.start_time);

		let mut free = vec![];
		let mut cursor = window.start_time;

		for slot in booked {
			if slot.start_time > cursor {
				free.push(Slot::new(cursor, slot.start_time));
			}

			cursor = cursor.max(slot.end_time);
		}

		if cursor < window.end_time {
			free.push(Slot::new(cursor, window.end_time));
		}

		free.into_iter()
			.map(|slot| {
				FreeSlot {
					slot,
					bookable: slot.duration_minutes()
						>= i32::from(self.rules.min_duration_minutes),
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn date() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 6, 14).unwrap() }

	fn t(s: &str) -> TimeOfDay { s.parse().unwrap() }

	fn slot(start: &str, end: &str) -> Slot { Slot::new(t(start), t(end)) }

	fn request(start: &str, end: &str) -> SlotRequest {
		SlotRequest::parse(date(), Some(start), Some(end))
	}

	fn validator() -> SlotValidator { SlotValidator::default() }

	#[test]
	fn accept_on_empty_day() {
		let result = validator().validate(&request("09:00", "11:00"), &[]);

		assert_eq!(result, Ok(slot("09:00", "11:00")));
	}

	#[test]
	fn accept_touching_reservation() {
		let existing = [slot("09:00", "11:00")];

		let result =
			validator().validate(&request("11:00", "13:00"), &existing);

		assert_eq!(result, Ok(slot("11:00", "13:00")));
	}

	#[test]
	fn accept_reservation_ending_where_existing_starts() {
		let existing = [slot("13:00", "15:00")];

		let result =
			validator().validate(&request("11:00", "13:00"), &existing);

		assert!(result.is_ok());
	}

	#[test]
	fn reject_overlapping_reservation() {
		let existing = [slot("09:00", "11:00")];

		let result =
			validator().validate(&request("10:00", "12:00"), &existing);

		assert_eq!(
			result,
			Err(SlotViolation::OverlapsExistingReservation(slot(
				"09:00", "11:00"
			)))
		);
	}

	#[test]
	fn reject_reservation_containing_existing() {
		let existing = [slot("12:00", "13:00")];

		let result =
			validator().validate(&request("11:00", "14:00"), &existing);

		assert_eq!(
			result,
			Err(SlotViolation::OverlapsExistingReservation(slot(
				"12:00", "13:00"
			)))
		);
	}

	#[test]
	fn report_first_conflicting_slot() {
		let existing = [
			slot("09:00", "10:00"),
			slot("12:00", "14:00"),
			slot("14:00", "16:00"),
		];

		let result =
			validator().validate(&request("13:00", "15:00"), &existing);

		assert_eq!(
			result,
			Err(SlotViolation::OverlapsExistingReservation(slot(
				"12:00", "14:00"
			)))
		);
	}

	#[test]
	fn reject_too_short() {
		let result = validator().validate(&request("09:00", "09:30"), &[]);

		assert_eq!(
			result,
			Err(SlotViolation::DurationTooShort { min_minutes: 120 })
		);
	}

	#[test]
	fn reject_too_long() {
		let result = validator().validate(&request("09:00", "13:01"), &[]);

		assert_eq!(
			result,
			Err(SlotViolation::DurationTooLong { max_minutes: 240 })
		);
	}

	#[test]
	fn duration_bounds_are_inclusive() {
		assert!(validator().validate(&request("09:00", "11:00"), &[]).is_ok());
		assert!(validator().validate(&request("09:00", "13:00"), &[]).is_ok());
		assert!(validator().validate(&request("14:15", "16:45"), &[]).is_ok());
	}

	#[test]
	fn reject_one_minute_below_minimum() {
		let result = validator().validate(&request("09:00", "10:59"), &[]);

		assert_eq!(
			result,
			Err(SlotViolation::DurationTooShort { min_minutes: 120 })
		);
	}

	#[test]
	fn reject_past_closing_time() {
		let result = validator().validate(&request("20:00", "23:00"), &[]);

		assert_eq!(
			result,
			Err(SlotViolation::OutsideAvailableWindow {
				opens:  t("09:00"),
				closes: t("22:00"),
			})
		);
	}

	#[test]
	fn reject_one_minute_past_closing_time() {
		let result = validator().validate(&request("19:01", "22:01"), &[]);

		assert!(matches!(
			result,
			Err(SlotViolation::OutsideAvailableWindow { .. })
		));
	}

	#[test]
	fn accept_ending_exactly_at_closing_time() {
		let result = validator().validate(&request("20:00", "22:00"), &[]);

		assert_eq!(result, Ok(slot("20:00", "22:00")));
	}

	#[test]
	fn reject_before_opening_time() {
		let result = validator().validate(&request("08:59", "11:00"), &[]);

		assert!(matches!(
			result,
			Err(SlotViolation::OutsideAvailableWindow { .. })
		));
	}

	#[test]
	fn reject_end_equal_to_start() {
		let result = validator().validate(&request("10:00", "10:00"), &[]);

		assert_eq!(result, Err(SlotViolation::EndNotAfterStart));
	}

	#[test]
	fn reject_end_before_start() {
		let result = validator().validate(&request("15:00", "12:00"), &[]);

		assert_eq!(result, Err(SlotViolation::EndNotAfterStart));
	}

	#[test]
	fn reject_missing_or_unparsable_times() {
		let missing = SlotRequest::parse(date(), Some("10:00"), None);
		let garbage = SlotRequest::parse(date(), Some("ten"), Some("12:00"));

		assert_eq!(
			validator().validate(&missing, &[]),
			Err(SlotViolation::MissingOrInvalidTime)
		);
		assert_eq!(
			validator().validate(&garbage, &[]),
			Err(SlotViolation::MissingOrInvalidTime)
		);
	}

	#[test]
	fn ordering_is_checked_before_duration_and_window() {
		// Too short, outside the window and inverted at the same time
		let result = validator().validate(&request("23:00", "07:00"), &[]);

		assert_eq!(result, Err(SlotViolation::EndNotAfterStart));
	}

	#[test]
	fn duration_is_checked_before_window() {
		let result = validator().validate(&request("06:00", "07:00"), &[]);

		assert!(matches!(result, Err(SlotViolation::DurationTooShort { .. })));
	}

	#[test]
	fn window_is_checked_before_overlap() {
		let existing = [slot("20:00", "22:00")];

		let result =
			validator().validate(&request("20:00", "23:00"), &existing);

		assert!(matches!(
			result,
			Err(SlotViolation::OutsideAvailableWindow { .. })
		));
	}

	#[test]
	fn validation_is_idempotent() {
		let existing = [slot("09:00", "11:00"), slot("15:00", "18:00")];
		let candidate = request("10:30", "12:30");

		let first = validator().validate(&candidate, &existing);
		let second = validator().validate(&candidate, &existing);

		assert_eq!(first, second);
	}

	#[test]
	fn overlap_is_symmetric_and_half_open() {
		let all = [
			slot("09:00", "11:00"),
			slot("11:00", "13:00"),
			slot("10:00", "12:00"),
			slot("09:30", "10:00"),
			slot("12:59", "13:00"),
		];

		for a in &all {
			for b in &all {
				let expected = a.start_time < b.end_time
					&& b.start_time < a.end_time;

				assert_eq!(a.overlaps(b), expected, "{a} vs {b}");
				assert_eq!(a.overlaps(b), b.overlaps(a), "{a} vs {b}");
			}
		}

		assert!(!slot("09:00", "11:00").overlaps(&slot("11:00", "13:00")));
	}

	#[test]
	fn custom_rules_are_honored() {
		let rules = SlotRules::from_hours(1, 2, 8, 20).unwrap();
		let validator = SlotValidator::new(rules);

		assert!(validator.validate(&request("08:00", "09:00"), &[]).is_ok());
		assert_eq!(
			validator.validate(&request("08:00", "10:30"), &[]),
			Err(SlotViolation::DurationTooLong { max_minutes: 120 })
		);
	}

	#[test]
	fn rules_reject_impossible_configurations() {
		assert_eq!(
			SlotRules::from_hours(0, 4, 9, 22),
			Err(InvalidRules::ZeroMinimumDuration)
		);
		assert_eq!(
			SlotRules::from_hours(5, 4, 9, 22),
			Err(InvalidRules::MinimumAboveMaximum)
		);
		assert_eq!(
			SlotRules::from_hours(2, 4, 22, 9),
			Err(InvalidRules::EmptyWindow(22, 9))
		);
		assert_eq!(
			SlotRules::from_hours(2, 4, 9, 24),
			Err(InvalidRules::InvalidClosingHour(24))
		);
	}

	#[test]
	fn default_rules_match_hours() {
		assert_eq!(
			SlotRules::default(),
			SlotRules::from_hours(2, 4, 9, 22).unwrap()
		);
	}

	#[test]
	fn every_violation_has_a_distinct_message() {
		let messages = [
			SlotViolation::MissingOrInvalidTime,
			SlotViolation::EndNotAfterStart,
			SlotViolation::DurationTooShort { min_minutes: 120 },
			SlotViolation::DurationTooLong { max_minutes: 240 },
			SlotViolation::OutsideAvailableWindow {
				opens:  t("09:00"),
				closes: t("22:00"),
			},
			SlotViolation::OverlapsExistingReservation(slot("09:00", "11:00")),
		]
		.map(|v| v.to_string());

		for (i, a) in messages.iter().enumerate() {
			for b in &messages[i + 1..] {
				assert_ne!(a, b);
			}
		}
	}

	#[test]
	fn free_slots_of_empty_day() {
		let free = validator().free_slots(&[]);

		assert_eq!(
			free,
			vec![FreeSlot { slot: slot("09:00", "22:00"), bookable: true }]
		);
	}

	#[test]
	fn free_slots_between_bookings() {
		let existing = [
			slot("18:00", "22:00"),
			slot("09:00", "11:00"),
			slot("12:00", "15:00"),
		];

		let free = validator().free_slots(&existing);

		assert_eq!(
			free,
			vec![
				FreeSlot { slot: slot("11:00", "12:00"), bookable: false },
				FreeSlot { slot: slot("15:00", "18:00"), bookable: true },
			]
		);
	}

	#[test]
	fn free_slots_with_overlapping_and_clipped_bookings() {
		let existing = [
			slot("07:00", "10:00"),
			slot("09:30", "12:00"),
			slot("11:00", "11:30"),
			slot("21:00", "23:00"),
		];

		let free = validator().free_slots(&existing);

		assert_eq!(
			free,
			vec![FreeSlot { slot: slot("12:00", "21:00"), bookable: true }]
		);
	}

	#[test]
	fn free_slots_of_fully_booked_day() {
		let existing = [
			slot("09:00", "13:00"),
			slot("13:00", "17:00"),
			slot("17:00", "21:00"),
			slot("21:00", "22:00"),
		];

		assert!(validator().free_slots(&existing).is_empty());
	}
}
