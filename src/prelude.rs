//! Convenience re-exports for common Rowhaus usage
//!
//! # Example
//!
//! ```rust
//! use rowhaus::prelude::*;
//!
//! let schema = Schema::builder("Ttt")
//!     .field(FieldSpec::integer("count"))
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.field_names(), ["count"]);
//! ```

// Core Rowhaus components
pub use crate::core::Rowhaus;
pub use crate::errors::RowhausError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig};

// Re-export commonly used model-object types for convenience
pub use model_object::prelude::*;

// Re-export model_object module for macro-generated code
pub use model_object;

// Re-export table derive for model creation
pub use table_derive::model;
