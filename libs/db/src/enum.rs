use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

#[derive(
	Clone, Copy, DbEnum, Debug, Default, Deserialize, PartialEq, Eq, Serialize,
)]
#[ExistingTypePath = "crate::sql_types::ProfileRole"]
#[serde(rename_all = "camelCase")]
pub enum ProfileRole {
	#[default]
	Tenant,
	Admin,
}

impl ProfileRole {
	#[must_use]
	pub fn is_admin(self) -> bool { self == Self::Admin }
}
