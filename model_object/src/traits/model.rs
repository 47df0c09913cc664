use crate::errors::OrmError;
use crate::record::Record;
use crate::schema::{Schema, SchemaBuilder};
use crate::table::Table;
use crate::traits::DatabaseHandle;
use std::fmt::Debug;

/// A type whose instances are backed by a [`Record`].
///
/// Select results are hydrated into records and then converted with
/// [`from_record`](Model::from_record).
pub trait Model: Sized + Clone + Debug {
    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    /// Insert this instance's full field mapping, then clear dirty fields
    fn save(&mut self) -> Result<(), OrmError> {
        self.record_mut().save()
    }

    fn is_dirty(&self) -> bool {
        self.record().is_dirty()
    }

    fn dirty_fields(&self) -> Vec<String> {
        self.record().dirty_fields()
    }
}

/// A model whose fields are declared statically, usually by `#[model]`.
///
/// Recommended usage:
/// ```ignore
/// use rowhaus::prelude::*;
///
/// #[model]
/// #[table(name = "Ttt")]
/// pub struct Ttt {
///     #[field(default = 0)]
///     pub count: i64,
///
///     #[field(index)]
///     pub num: i64,
/// }
///
/// let ttt = Ttt::bind(database)?;
/// ttt.update([("count", 0)])?.filter([("count", 8)])?.execute()?;
/// ```
pub trait DeclaredModel: Model {
    /// Table name, also the model name of the schema
    fn table_name() -> &'static str;

    /// Add this model's fields and options to `builder`
    fn declare(builder: SchemaBuilder) -> SchemaBuilder;

    fn schema_builder() -> SchemaBuilder {
        Self::declare(Schema::builder(Self::table_name()))
    }

    /// Build the schema bound to `database`
    fn bind(database: DatabaseHandle) -> Result<Table<Self>, OrmError> {
        Table::bind(database)
    }
}

impl Model for Record {
    fn from_record(record: Record) -> Self {
        record
    }

    fn record(&self) -> &Record {
        self
    }

    fn record_mut(&mut self) -> &mut Record {
        self
    }
}
