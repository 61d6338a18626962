//! Identity of the caller, as established by the auth middleware

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::{Error, InternalServerError};
use db::ProfileRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;

/// The profile making the current request
///
/// ```rs
/// pub async fn foo_route(session: Session) -> impl IntoResponse {
///     println!("{:?}", session.data.profile_id);
///
///     ()
/// }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Session {
	pub data: SessionData,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct SessionData {
	pub profile_id: Uuid,
	pub role:       ProfileRole,
}

impl Session {
	#[must_use]
	pub fn is_admin(&self) -> bool { self.data.role.is_admin() }
}

impl FromRequestParts<AppState> for Session {
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut Parts,
		_state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let Some(data) = parts.extensions.get::<SessionData>().copied() else {
			return Err(InternalServerError::SessionWithoutAuthError.into());
		};

		Ok(Self { data })
	}
}
