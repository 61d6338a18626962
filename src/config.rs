use std::time::Duration;

use common::Error;
use deadpool_diesel::postgres::{Manager, Pool};
use slot::{SlotRules, SlotValidator};

#[derive(Clone, Debug)]
pub struct Config {
	pub database_url: String,
	pub bind_address: String,

	/// Header in which the platform forwards the authenticated profile id
	pub profile_id_header: String,

	/// Names of the bookable resources
	pub resources:  Vec<String>,
	pub slot_rules: SlotRules,

	pub request_timeout: Duration,
}

impl Config {
	fn get_env_var(var: &str) -> String {
		std::env::var(var).unwrap_or_else(|_| panic!("{var} must be set"))
	}

	fn get_env_default(var: &str, default: &str) -> String {
		std::env::var(var).unwrap_or_else(|_| default.to_string())
	}

	fn get_env_parsed<T>(var: &str, default: T) -> T
	where
		T: std::str::FromStr,
	{
		match std::env::var(var) {
			Ok(value) => {
				value.parse().unwrap_or_else(|_| panic!("{var} is not valid"))
			},
			Err(_) => default,
		}
	}

	/// Create a new [`Config`] from environment variables
	///
	/// # Panics
	/// Panics if an environment variable is missing or invalid
	#[must_use]
	pub fn from_env() -> Self {
		let database_url = Self::get_env_var("DATABASE_URL");
		let bind_address = Self::get_env_default("BIND_ADDRESS", "0.0.0.0:80");

		let profile_id_header =
			Self::get_env_default("PROFILE_ID_HEADER", "x-profile-id")
				.to_lowercase();

		let resources = Self::get_env_default(
			"RESERVATION_RESOURCES",
			"barbecue_area",
		)
		.split(',')
		.map(str::trim)
		.filter(|r| !r.is_empty())
		.map(ToString::to_string)
		.collect();

		let slot_rules = SlotRules::from_hours(
			Self::get_env_parsed("RESERVATION_MIN_DURATION_HOURS", 2),
			Self::get_env_parsed("RESERVATION_MAX_DURATION_HOURS", 4),
			Self::get_env_parsed("RESERVATION_AVAILABLE_START_HOUR", 9),
			Self::get_env_parsed("RESERVATION_AVAILABLE_END_HOUR", 22),
		)
		.unwrap_or_else(|e| panic!("invalid reservation rules -- {e}"));

		let request_timeout = Duration::from_secs(Self::get_env_parsed(
			"REQUEST_TIMEOUT_SECONDS",
			10,
		));

		Self {
			database_url,
			bind_address,
			profile_id_header,
			resources,
			slot_rules,
			request_timeout,
		}
	}

	/// Create a database pool for the given config
	///
	/// # Panics
	/// Panics if creating the pool fails
	#[must_use]
	pub fn create_database_pool(&self) -> Pool {
		let manager = Manager::new(
			self.database_url.clone(),
			deadpool_diesel::Runtime::Tokio1,
		);

		Pool::builder(manager).build().unwrap()
	}

	/// A validator enforcing the configured reservation rules
	#[must_use]
	pub fn slot_validator(&self) -> SlotValidator {
		SlotValidator::new(self.slot_rules)
	}

	/// Check that a resource is one of the configured bookable resources
	///
	/// # Errors
	/// Errors if the resource is unknown
	pub fn check_resource(&self, resource: &str) -> Result<(), Error> {
		if !self.resources.iter().any(|r| r == resource) {
			return Err(Error::UnknownResource(resource.to_string()));
		}

		Ok(())
	}
}
