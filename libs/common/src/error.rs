//! Library-wide error types and [`From`] impls

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use diesel::result::DatabaseErrorKind;
use slot::SlotViolation;
use thiserror::Error;

/// Name of the exclusion constraint preventing overlapping reservations
pub const RESERVATION_OVERLAP_CONSTRAINT: &str = "reservation_no_overlap";

/// Top level application error, can be converted into a [`Response`]
#[derive(Debug, Error)]
pub enum Error {
	/// Request/operation forbidden
	#[error("forbidden")]
	Forbidden,
	/// An error that should never happen
	#[error("{0}")]
	Infallible(String),
	/// Opaque internal server error
	#[error("internal server error")]
	InternalServerError,
	/// Resource not found
	#[error("not found - {0}")]
	NotFound(String),
	/// The requested bookable resource does not exist
	#[error("unknown resource '{0}'")]
	UnknownResource(String),
	/// Missing or unknown caller identity
	#[error(transparent)]
	IdentityError(#[from] IdentityError),
	/// Any error related to creating a reservation
	#[error(transparent)]
	CreateReservationError(#[from] CreateReservationError),
	/// Resource could not be validated
	#[error("{0}")]
	ValidationError(String),
}

impl Error {
	/// Return a unique identifying code for this error
	///
	/// When modifying this function the error code should only ever increase,
	/// an error code should never be reused once its assigned to avoid
	/// unexpectedly breaking the frontend
	fn code(&self) -> i32 {
		match self {
			Self::Forbidden => 1,
			Self::Infallible(_) => 2,
			Self::InternalServerError => 3,
			Self::NotFound(_) => 4,
			Self::IdentityError(e) => {
				match e {
					IdentityError::MissingIdentity => 5,
					IdentityError::UnknownProfile(_) => 6,
				}
			},
			Self::CreateReservationError(e) => {
				match e {
					CreateReservationError::InvalidSlot(v) => {
						match v {
							SlotViolation::MissingOrInvalidTime => 7,
							SlotViolation::EndNotAfterStart => 8,
							SlotViolation::DurationTooShort { .. } => 9,
							SlotViolation::DurationTooLong { .. } => 10,
							SlotViolation::OutsideAvailableWindow { .. } => 11,
							SlotViolation::OverlapsExistingReservation(_) => 12,
						}
					},
					CreateReservationError::DateInPast(_) => 13,
					CreateReservationError::Conflict => 14,
				}
			},
			Self::ValidationError(_) => 15,
			Self::UnknownResource(_) => 16,
		}
	}

	/// Return additional information about the error
	fn info(&self) -> Option<String> {
		let info = match self {
			Self::NotFound(m)
			| Self::UnknownResource(m)
			| Self::ValidationError(m)
			| Self::IdentityError(IdentityError::UnknownProfile(m)) => {
				return Some(m.to_owned());
			},
			Self::CreateReservationError(CreateReservationError::InvalidSlot(
				v,
			)) => {
				match v {
					SlotViolation::DurationTooShort { min_minutes } => {
						serde_json::json!({"min": min_minutes})
					},
					SlotViolation::DurationTooLong { max_minutes } => {
						serde_json::json!({"max": max_minutes})
					},
					SlotViolation::OutsideAvailableWindow { opens, closes } => {
						serde_json::json!({"opens": opens, "closes": closes})
					},
					SlotViolation::OverlapsExistingReservation(slot) => {
						serde_json::json!({"conflict": slot})
					},
					SlotViolation::MissingOrInvalidTime
					| SlotViolation::EndNotAfterStart => return None,
				}
			},
			Self::CreateReservationError(CreateReservationError::DateInPast(
				date,
			)) => serde_json::json!({"date": date}),
			_ => return None,
		};

		Some(info.to_string())
	}
}

/// Convert an error into a [`Response`]
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		error!("{self:?}");

		let message = self.to_string();

		let data = serde_json::json!({
			"message": message,
			"code": self.code(),
			"info": self.info(),
		});

		let status = match self {
			Self::InternalServerError | Self::Infallible(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			},
			Self::IdentityError(_) => StatusCode::UNAUTHORIZED,
			Self::Forbidden => StatusCode::FORBIDDEN,
			Self::CreateReservationError(CreateReservationError::Conflict) => {
				StatusCode::CONFLICT
			},
			Self::CreateReservationError(_) => StatusCode::BAD_REQUEST,
			Self::NotFound(_) | Self::UnknownResource(_) => {
				StatusCode::NOT_FOUND
			},
			Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
		};

		(status, axum::Json(data)).into_response()
	}
}

/// Any error related to the identity forwarded by the platform
#[derive(Debug, Error)]
pub enum IdentityError {
	#[error("missing or malformed profile id")]
	MissingIdentity,
	#[error("no profile found for the authenticated user")]
	UnknownProfile(String),
}

#[derive(Debug, Error)]
pub enum CreateReservationError {
	/// The requested slot breaks one of the booking rules
	#[error(transparent)]
	InvalidSlot(#[from] SlotViolation),
	/// The requested date has already passed
	#[error("reservations can not be made for a date in the past")]
	DateInPast(NaiveDate),
	/// Another reservation for an overlapping slot was stored first
	#[error(
		"this time was reserved by someone else in the meantime, refresh and \
		 try again"
	)]
	Conflict,
}

/// Map slot violations straight to application errors
impl From<SlotViolation> for Error {
	fn from(value: SlotViolation) -> Self {
		CreateReservationError::InvalidSlot(value).into()
	}
}

/// A list of possible internal errors
///
/// API end users should never see these details
#[derive(Debug, Error)]
pub enum InternalServerError {
	/// Error executing some database operation
	#[error("database error -- {0:?}")]
	DatabaseError(diesel::result::Error),
	/// Error interacting with a database connection
	#[error("database interaction error -- {0:?}")]
	DatabaseInteractionError(deadpool_diesel::InteractError),
	/// Error acquiring database pool connection
	#[error("database pool error -- {0:?}")]
	PoolError(deadpool_diesel::PoolError),
	/// Error related to `serde_json`
	#[error("serde_json error -- {0:?}")]
	SerdeJsonError(serde_json::Error),
	/// Attempted to extract a session from a request that has not been
	/// authorized
	#[error("attempted to extract session without checking authorization")]
	SessionWithoutAuthError,
}

// Map internal server errors to application errors
impl From<InternalServerError> for Error {
	fn from(value: InternalServerError) -> Self {
		error!("internal server error -- {value}");

		Self::InternalServerError
	}
}

/// Map database interaction errors to application errors
impl From<deadpool_diesel::InteractError> for Error {
	fn from(value: deadpool_diesel::InteractError) -> Self {
		InternalServerError::DatabaseInteractionError(value).into()
	}
}

/// Map database result errors to application errors.
impl From<diesel::result::Error> for Error {
	fn from(err: diesel::result::Error) -> Self {
		match &err {
			// No rows returned by query that expected at least one
			diesel::result::Error::NotFound => {
				Self::NotFound("no context provided".to_string())
			},
			// Postgres reports exclusion violations (23P01) without a
			// dedicated diesel error kind, match on the constraint instead
			diesel::result::Error::DatabaseError(_, info)
				if info.constraint_name()
					== Some(RESERVATION_OVERLAP_CONSTRAINT) =>
			{
				CreateReservationError::Conflict.into()
			},
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::CheckViolation,
				info,
			) => Self::ValidationError(info.message().to_string()),
			// Foreign key constraint violation
			diesel::result::Error::DatabaseError(
				DatabaseErrorKind::ForeignKeyViolation,
				info,
			) => Self::ValidationError(info.message().to_string()),
			_ => InternalServerError::DatabaseError(err).into(),
		}
	}
}

impl From<deadpool_diesel::PoolError> for Error {
	fn from(value: deadpool_diesel::PoolError) -> Self {
		InternalServerError::PoolError(value).into()
	}
}

impl From<serde_json::Error> for Error {
	fn from(value: serde_json::Error) -> Self {
		InternalServerError::SerdeJsonError(value).into()
	}
}

#[cfg(test)]
mod tests {
	use slot::{Slot, TimeOfDay};

	use super::*;

	fn status_and_code(err: Error) -> (StatusCode, i32) {
		let code = err.code();
		let status = err.into_response().status();

		(status, code)
	}

	#[test]
	fn slot_violations_are_bad_requests_with_distinct_codes() {
		let nine = TimeOfDay::from_hour(9).unwrap();
		let eleven = TimeOfDay::from_hour(11).unwrap();

		let violations = [
			SlotViolation::MissingOrInvalidTime,
			SlotViolation::EndNotAfterStart,
			SlotViolation::DurationTooShort { min_minutes: 120 },
			SlotViolation::DurationTooLong { max_minutes: 240 },
			SlotViolation::OutsideAvailableWindow {
				opens:  nine,
				closes: eleven,
			},
			SlotViolation::OverlapsExistingReservation(Slot::new(nine, eleven)),
		];

		let mut codes = vec![];

		for violation in violations {
			let (status, code) = status_and_code(violation.into());

			assert_eq!(status, StatusCode::BAD_REQUEST);
			assert!(!codes.contains(&code));

			codes.push(code);
		}
	}

	#[test]
	fn conflict_maps_to_409() {
		let (status, _) =
			status_and_code(CreateReservationError::Conflict.into());

		assert_eq!(status, StatusCode::CONFLICT);
	}

	/// Database error details as postgres reports a violated constraint
	struct ConstraintViolation(&'static str);

	impl diesel::result::DatabaseErrorInformation for ConstraintViolation {
		fn message(&self) -> &str { "constraint violated" }

		fn details(&self) -> Option<&str> { None }

		fn hint(&self) -> Option<&str> { None }

		fn table_name(&self) -> Option<&str> { Some("reservation") }

		fn column_name(&self) -> Option<&str> { None }

		fn constraint_name(&self) -> Option<&str> { Some(self.0) }

		fn statement_position(&self) -> Option<i32> { None }
	}

	fn database_error(
		kind: DatabaseErrorKind,
		constraint: &'static str,
	) -> Error {
		diesel::result::Error::DatabaseError(
			kind,
			Box::new(ConstraintViolation(constraint)),
		)
		.into()
	}

	#[test]
	fn overlap_constraint_maps_to_conflict() {
		let err = database_error(
			DatabaseErrorKind::Unknown,
			RESERVATION_OVERLAP_CONSTRAINT,
		);

		assert!(matches!(
			err,
			Error::CreateReservationError(CreateReservationError::Conflict)
		));
		assert_eq!(status_and_code(err), (StatusCode::CONFLICT, 14));
	}

	#[test]
	fn other_constraints_do_not_map_to_conflict() {
		let err = database_error(
			DatabaseErrorKind::CheckViolation,
			"reservation_end_after_start",
		);
		assert_eq!(status_and_code(err).0, StatusCode::UNPROCESSABLE_ENTITY);

		let err = database_error(DatabaseErrorKind::Unknown, "some_exclusion");
		assert_eq!(
			status_and_code(err).0,
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}

	#[test]
	fn missing_identity_maps_to_401() {
		let (status, _) =
			status_and_code(IdentityError::MissingIdentity.into());

		assert_eq!(status, StatusCode::UNAUTHORIZED);
	}

	#[test]
	fn overlap_info_carries_conflicting_slot() {
		let slot = Slot::new(
			TimeOfDay::from_hour(9).unwrap(),
			TimeOfDay::from_hour(11).unwrap(),
		);
		let err: Error =
			SlotViolation::OverlapsExistingReservation(slot).into();

		let info: serde_json::Value =
			serde_json::from_str(&err.info().unwrap()).unwrap();

		assert_eq!(
			info,
			serde_json::json!({
				"conflict": {"startTime": "09:00", "endTime": "11:00"}
			})
		);
	}
}
