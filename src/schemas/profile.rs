use chrono::NaiveDateTime;
use db::ProfileRole;
use profile::PrimitiveProfile;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
	pub id:               Uuid,
	pub role:             ProfileRole,
	pub full_name:        String,
	pub block_number:     String,
	pub apartment_number: Option<String>,
	pub is_admin:         bool,
	pub created_at:       NaiveDateTime,
}

impl From<PrimitiveProfile> for ProfileResponse {
	fn from(profile: PrimitiveProfile) -> Self {
		Self {
			id:               profile.id,
			role:             profile.role,
			is_admin:         profile.is_admin(),
			full_name:        profile.full_name,
			block_number:     profile.block_number,
			apartment_number: profile.apartment_number,
			created_at:       profile.created_at,
		}
	}
}
