//! Controllers for profiles

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::Error;

use crate::schemas::profile::ProfileResponse;
use crate::{ProfileStoreRef, Session};

/// Get the profile of the caller
#[instrument(skip(profiles))]
pub async fn get_current_profile(
	State(profiles): State<ProfileStoreRef>,
	session: Session,
) -> Result<impl IntoResponse, Error> {
	let profile = profiles.get_by_id(session.data.profile_id).await?;
	let response: ProfileResponse = profile.into();

	Ok((StatusCode::OK, Json(response)))
}
