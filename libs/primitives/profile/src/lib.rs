use chrono::NaiveDateTime;
use db::{ProfileRole, profile};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant or administrator as registered on the platform
#[derive(
	Clone,
	Debug,
	Deserialize,
	Identifiable,
	PartialEq,
	Eq,
	Queryable,
	Selectable,
	Serialize,
)]
#[diesel(table_name = profile)]
#[diesel(check_for_backend(Pg))]
pub struct PrimitiveProfile {
	pub id:               Uuid,
	pub role:             ProfileRole,
	pub full_name:        String,
	pub block_number:     String,
	pub apartment_number: Option<String>,
	pub created_at:       NaiveDateTime,
}

impl PrimitiveProfile {
	#[must_use]
	pub fn is_admin(&self) -> bool { self.role.is_admin() }
}
