//! Service layer providing record CRUD on top of the store contract.
//! - Separates business logic from data access.
//! - Reuses entity definitions and serialization in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod record;
