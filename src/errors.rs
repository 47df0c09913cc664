//! Error types for the Rowhaus crate
//!
//! This module contains all error types that can be returned by the
//! [`Rowhaus`](crate::Rowhaus) coordinator.

use model_object::{DriverError, OrmError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RowhausError {
    #[error(transparent)]
    Orm(#[from] OrmError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Model not registered: {0}")]
    ModelNotFound(String),

    #[error("Model already registered: {0}")]
    ModelAlreadyRegistered(String),
}

impl From<DriverError> for RowhausError {
    fn from(error: DriverError) -> Self {
        Self::Orm(OrmError::Driver(error))
    }
}
