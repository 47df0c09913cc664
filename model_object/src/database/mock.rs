//! Recording in-memory collaborator
//!
//! Records every statement it receives and answers with queued results, so
//! builders can be exercised without a server.

use crate::database::{ResultSet, Row};
use crate::errors::DriverError;
use crate::traits::Database;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A statement as received by the collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub sql: String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEvent {
    Begin,
    Commit,
    Rollback,
}

#[derive(Debug, Default)]
struct MockState {
    statements: Vec<ExecutedStatement>,
    responses: VecDeque<Result<ResultSet, DriverError>>,
    transactions: Vec<TransactionEvent>,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct MockDatabase {
    state: Mutex<MockState>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the rows returned by the next statement
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.push_result(ResultSet::from_rows(rows));
    }

    pub fn push_result(&self, result: ResultSet) {
        self.lock().responses.push_back(Ok(result));
    }

    /// Make the next statement fail with `error`
    pub fn push_error(&self, error: DriverError) {
        self.lock().responses.push_back(Err(error));
    }

    pub fn statements(&self) -> Vec<ExecutedStatement> {
        self.lock().statements.clone()
    }

    pub fn last_statement(&self) -> Option<ExecutedStatement> {
        self.lock().statements.last().cloned()
    }

    pub fn transactions(&self) -> Vec<TransactionEvent> {
        self.lock().transactions.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    // Inspection helpers keep working after a panicking test poisoned the lock
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open_state(&self) -> Result<MutexGuard<'_, MockState>, DriverError> {
        let state = self.state.lock().map_err(|_| DriverError::LockPoisoned)?;
        if state.closed {
            return Err(DriverError::Closed);
        }
        Ok(state)
    }

    fn record_transaction(&self, event: TransactionEvent) -> Result<(), DriverError> {
        self.open_state()?.transactions.push(event);
        Ok(())
    }
}

impl Database for MockDatabase {
    fn execute(&self, sql: &str, values: &[Value]) -> Result<ResultSet, DriverError> {
        let mut state = self.open_state()?;
        state.statements.push(ExecutedStatement {
            sql: sql.to_string(),
            values: values.to_vec(),
        });
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(ResultSet::default()))
    }

    fn begin(&self) -> Result<(), DriverError> {
        self.record_transaction(TransactionEvent::Begin)
    }

    fn commit(&self) -> Result<(), DriverError> {
        self.record_transaction(TransactionEvent::Commit)
    }

    fn rollback(&self) -> Result<(), DriverError> {
        self.record_transaction(TransactionEvent::Rollback)
    }

    fn close(&self) -> Result<(), DriverError> {
        let mut state = self.open_state()?;
        state.closed = true;
        Ok(())
    }
}
