//! Operation builders
//!
//! Each builder compiles its SQL text and positional values when it is
//! constructed, may be narrowed with `filter`, and hands the statement to the
//! model's bound database on `execute`.

pub mod delete;
pub mod insert;
pub mod operation;
pub mod select;
pub mod sql_generation;
pub mod update;
pub mod values;

#[cfg(test)]
mod tests;

pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use operation::{OperationKind, OperationState, Statement};
pub use select::SelectQuery;
pub use sql_generation::{SqlGenerator, PLACEHOLDER};
pub use update::UpdateQuery;
pub use values::{Conditions, FieldValues};
