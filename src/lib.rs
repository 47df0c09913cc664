//! # Rowhaus
//!
//! A small Rust ORM for MySQL: models are declared once, instances track which
//! fields were written, and CRUD intents compile into SQL text with positional
//! `%s` parameters before they reach the database.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rowhaus::prelude::*;
//!
//! #[model]
//! #[table(name = "Ttt")]
//! pub struct Ttt {
//!     pub count: i64,
//!     pub num: i64,
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 3306, "peewee_test".to_string(),
//!         "root".to_string(), "password".to_string(),
//!     );
//!
//!     let mut rowhaus = Rowhaus::connect(&config)?;
//!     let ttt = rowhaus.register::<Ttt>()?;
//!
//!     let mut row = ttt.instance();
//!     row.set_count(8)?;
//!     row.save()?;
//!
//!     ttt.update([("count", 0)])?.filter([("count", 8)])?.execute()?;
//!
//!     for row in ttt.select(["count", "num"])?.execute()?.get()? {
//!         println!("count={} num={}", row.count()?, row.num()?);
//!     }
//!
//!     ttt.delete().filter([("count", 7)])?.execute()?;
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::Rowhaus;
pub use crate::errors::RowhausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use config;
pub use model_object;
pub use table_derive;
