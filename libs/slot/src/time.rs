use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const MINUTES_PER_HOUR: u16 = 60;
pub const HOURS_PER_DAY: u8 = 24;

/// A time of day with minute granularity
///
/// Stored as the number of minutes since midnight, parsed once from its
/// `HH:MM` representation when it enters the system
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(u16);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a valid time of day, expected HH:MM")]
pub struct ParseTimeOfDayError(String);

impl TimeOfDay {
	/// Build a [`TimeOfDay`] from an hour and a minute, returns [`None`] if
	/// either is out of range
	#[must_use]
	pub const fn from_hm(hour: u8, minute: u8) -> Option<Self> {
		if hour >= HOURS_PER_DAY || minute >= 60 {
			return None;
		}

		Some(Self(hour as u16 * MINUTES_PER_HOUR + minute as u16))
	}

	/// Build a [`TimeOfDay`] at the start of the given hour
	#[must_use]
	pub const fn from_hour(hour: u8) -> Option<Self> { Self::from_hm(hour, 0) }

	#[must_use]
	pub const fn minutes_since_midnight(self) -> u16 { self.0 }

	#[must_use]
	#[allow(clippy::cast_possible_truncation)]
	pub const fn hour(self) -> u8 { (self.0 / MINUTES_PER_HOUR) as u8 }

	#[must_use]
	#[allow(clippy::cast_possible_truncation)]
	pub const fn minute(self) -> u8 { (self.0 % MINUTES_PER_HOUR) as u8 }

	/// Number of minutes from `earlier` to `self`, negative if `earlier` is
	/// actually later
	#[must_use]
	pub fn minutes_since(self, earlier: Self) -> i32 {
		i32::from(self.0) - i32::from(earlier.0)
	}
}

impl fmt::Display for TimeOfDay {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:02}:{:02}", self.hour(), self.minute())
	}
}

impl TryFrom<NaiveTime> for TimeOfDay {
	type Error = ParseTimeOfDayError;

	fn try_from(value: NaiveTime) -> Result<Self, Self::Error> {
		if value.second() != 0 || value.nanosecond() != 0 {
			return Err(ParseTimeOfDayError(value.to_string()));
		}

		let hour = u8::try_from(value.hour())
			.map_err(|_| ParseTimeOfDayError(value.to_string()))?;
		let minute = u8::try_from(value.minute())
			.map_err(|_| ParseTimeOfDayError(value.to_string()))?;

		Self::from_hm(hour, minute)
			.ok_or_else(|| ParseTimeOfDayError(value.to_string()))
	}
}

impl From<TimeOfDay> for NaiveTime {
	fn from(value: TimeOfDay) -> Self {
		// Always in range, hour < 24 and minute < 60
		NaiveTime::from_hms_opt(value.hour().into(), value.minute().into(), 0)
			.unwrap_or_default()
	}
}

impl FromStr for TimeOfDay {
	type Err = ParseTimeOfDayError;

	/// Accepts `HH:MM` as well as `HH:MM:00`
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();

		let time = NaiveTime::parse_from_str(s, "%H:%M")
			.or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
			.map_err(|_| ParseTimeOfDayError(s.to_string()))?;

		Self::try_from(time)
	}
}

impl Serialize for TimeOfDay {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(self)
	}
}

struct TimeOfDayVisitor;

impl Visitor<'_> for TimeOfDayVisitor {
	type Value = TimeOfDay;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "a time of day formatted as HH:MM")
	}

	fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
	where
		E: serde::de::Error,
	{
		v.parse().map_err(E::custom)
	}
}

impl<'de> Deserialize<'de> for TimeOfDay {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_str(TimeOfDayVisitor)
	}
}
