//! Middleware to identify users and store their session data on the request

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, Response};
use axum::response::IntoResponse;
use common::{Error, IdentityError};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::session::SessionData;
use crate::{AppState, Session};

/// Middleware layer that guarantees a request carries the id of a known
/// profile
///
/// Authentication itself happens on the platform, which forwards the id of
/// the authenticated user in the configured header. If the profile exists its
/// [`SessionData`] is stored as an [`Extension`](axum::Extension)
///
/// Controllers that need this data should ask for a [`Session`] in their
/// arguments
#[derive(Clone)]
pub struct AuthLayer {
	state: AppState,
}

impl AuthLayer {
	#[must_use]
	pub fn new(state: AppState) -> Self { Self { state } }
}

impl<S> Layer<S> for AuthLayer {
	type Service = AuthMiddleware<S>;

	fn layer(&self, inner: S) -> Self::Service {
		AuthMiddleware { inner, state: self.state.clone() }
	}
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
	inner: S,
	state: AppState,
}

fn profile_id_from_headers(headers: &HeaderMap, name: &str) -> Option<Uuid> {
	let value = headers.get(name)?.to_str().ok()?;

	Uuid::parse_str(value.trim()).ok()
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
	S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
	S::Future: Send + 'static,
{
	type Error = S::Error;
	type Future = Pin<
		Box<
			dyn Future<Output = Result<Self::Response, Self::Error>>
				+ Send
				+ 'static,
		>,
	>;
	type Response = S::Response;

	fn poll_ready(
		&mut self,
		cx: &mut Context<'_>,
	) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	#[instrument(skip_all)]
	fn call(&mut self, mut req: Request<Body>) -> Self::Future {
		let cloned_inner = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, cloned_inner);

		let state = self.state.clone();

		Box::pin(async move {
			let Some(profile_id) = profile_id_from_headers(
				req.headers(),
				&state.config.profile_id_header,
			) else {
				info!("got request without valid profile id");

				return Ok(
					Error::from(IdentityError::MissingIdentity).into_response()
				);
			};

			let profile = match state.profile_store.get_by_id(profile_id).await
			{
				Ok(p) => p,
				Err(Error::NotFound(_)) => {
					warn!("unknown profile {profile_id} tried to authorize");

					return Ok(Error::from(IdentityError::UnknownProfile(
						profile_id.to_string(),
					))
					.into_response());
				},
				Err(e) => return Ok(e.into_response()),
			};

			let data =
				SessionData { profile_id: profile.id, role: profile.role };

			debug!("authorized {:?}", Session { data });

			req.extensions_mut().insert(data);

			inner.call(req).await
		})
	}
}
