//! Read access to the profiles managed by the hosting platform

#[macro_use]
extern crate tracing;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{DbPool, Error};
use db::profile;
use diesel::prelude::*;
use parking_lot::RwLock;
pub use primitive_profile::PrimitiveProfile;
use uuid::Uuid;

/// Lookup of tenant and administrator profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
	/// Get a single profile given its id
	async fn get_by_id(&self, id: Uuid) -> Result<PrimitiveProfile, Error>;

	/// Get all profiles matching the given ids, unknown ids are skipped
	async fn get_by_ids(
		&self,
		ids: Vec<Uuid>,
	) -> Result<Vec<PrimitiveProfile>, Error>;
}

/// [`ProfileStore`] backed by the platform database
#[derive(Clone)]
pub struct PgProfileStore {
	pool: DbPool,
}

impl PgProfileStore {
	#[must_use]
	pub fn new(pool: DbPool) -> Self { Self { pool } }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
	#[instrument(skip(self))]
	async fn get_by_id(&self, p_id: Uuid) -> Result<PrimitiveProfile, Error> {
		let conn = self.pool.get().await?;

		let found = conn
			.interact(move |conn| {
				use self::profile::dsl::*;

				profile
					.find(p_id)
					.select(PrimitiveProfile::as_select())
					.get_result(conn)
					.optional()
			})
			.await??;

		found.ok_or_else(|| Error::NotFound(format!("profile {p_id}")))
	}

	#[instrument(skip(self))]
	async fn get_by_ids(
		&self,
		p_ids: Vec<Uuid>,
	) -> Result<Vec<PrimitiveProfile>, Error> {
		if p_ids.is_empty() {
			return Ok(vec![]);
		}

		let conn = self.pool.get().await?;

		let profiles = conn
			.interact(move |conn| {
				use self::profile::dsl::*;

				profile
					.filter(id.eq_any(p_ids))
					.select(PrimitiveProfile::as_select())
					.get_results(conn)
			})
			.await??;

		Ok(profiles)
	}
}

/// [`ProfileStore`] kept in memory, for local development and tests
#[derive(Clone, Default)]
pub struct MemoryProfileStore {
	profiles: Arc<RwLock<HashMap<Uuid, PrimitiveProfile>>>,
}

impl MemoryProfileStore {
	#[must_use]
	pub fn new() -> Self { Self::default() }

	/// Add or replace a profile
	pub fn insert(&self, profile: PrimitiveProfile) {
		debug!("storing profile {} in memory", profile.id);

		self.profiles.write().insert(profile.id, profile);
	}
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
	async fn get_by_id(&self, p_id: Uuid) -> Result<PrimitiveProfile, Error> {
		self.profiles
			.read()
			.get(&p_id)
			.cloned()
			.ok_or_else(|| Error::NotFound(format!("profile {p_id}")))
	}

	async fn get_by_ids(
		&self,
		p_ids: Vec<Uuid>,
	) -> Result<Vec<PrimitiveProfile>, Error> {
		let profiles = self.profiles.read();

		let found =
			p_ids.iter().filter_map(|id| profiles.get(id)).cloned().collect();

		Ok(found)
	}
}
