//! Trait definitions
//!
//! The seams of the crate: the database collaborator consumed by operation
//! builders, and the model traits implemented by records and `#[model]` types.

pub mod database;
pub mod model;

pub use database::{Database, DatabaseHandle};
pub use model::{DeclaredModel, Model};
