//! Procedural macros for declaring Rowhaus models
//!
//! This crate provides the `#[model]` attribute, which turns a plain struct
//! declaration into a record-backed model with a static schema.

use proc_macro::TokenStream;

mod codegen;
mod model_macro;
mod parsing;

use model_macro::model_attribute;

/// Declare a database model
///
/// Usage:
/// ```ignore
/// use rowhaus::prelude::*;
///
/// #[model]
/// #[table(name = "Ttt")]
/// pub struct Ttt {
///     pub count: i64,
///
///     #[field(default = 0, index)]
///     pub num: i64,
///
///     #[field(nullable = false, default = "n/a")]
///     pub note: String,
/// }
/// ```
///
/// The struct is replaced by a wrapper around a `model_object::Record` and gains:
/// - `model_object::Model` and `model_object::DeclaredModel` impls, so
///   `Ttt::bind(database)` returns a `Table<Ttt>`
/// - a getter `count(&self) -> Result<i64, OrmError>` per field
/// - a setter `set_count(&mut self, value: i64) -> Result<&mut Self, OrmError>`
///   per field, which marks the field dirty. A value that cannot be stored (a
///   NaN written to a non-`Option` float, say) is an `OrmError::Serialization`
///   and leaves the instance untouched
///
/// Field options:
/// - `default = <expr>`: value of a fresh instance; otherwise `Default::default()`
/// - `nullable = <bool>`: defaults to whether the type is an `Option`
/// - `index`, `unique`, `primary_key`: metadata flags, at most one primary key
///
/// `#[table(...)]` keys other than `name` become schema options; keys starting
/// with `_` are private and are not recorded.
#[proc_macro_attribute]
pub fn model(attr: TokenStream, item: TokenStream) -> TokenStream {
    model_attribute(attr, item)
}
