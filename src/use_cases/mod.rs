//! Use cases (orchestration)
//!
//! Workflows that chain several session operations together.

mod provision_key;
mod secure_session;

pub use provision_key::provision_key;
pub use secure_session::run_in_secure_session;
