//! Data models for the release dashboard backend.
//!
//! JSON field names match the frontend TypeScript interfaces.

mod dashboard;
mod release;
mod user;

pub use dashboard::*;
pub use release::*;
pub use user::*;
