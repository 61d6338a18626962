//! Database schema and enums shared by all models

mod r#enum;
mod schema;

pub use r#enum::*;
pub use schema::*;
