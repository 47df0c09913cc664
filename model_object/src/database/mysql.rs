//! MySQL collaborator backed by sqlx
//!
//! sqlx is async, the [`Database`] contract is not: the driver owns a
//! current-thread tokio runtime and blocks on it for every call. Do not call
//! it from inside another tokio runtime; wrap it in `spawn_blocking` there.

use crate::database::{ResultSet, Row};
use crate::errors::{DriverError, OrmError};
use crate::query_builder::PLACEHOLDER;
use crate::traits::Database;
use config::DatabaseConfig;
use serde_json::Value;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Connection, MySql, Row as _, TypeInfo};
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use tokio::runtime::Runtime;

const MYSQL_PLACEHOLDER: &str = "?";

enum ConnectionState {
    Disconnected,
    Open(MySqlConnection),
    Closed,
}

pub struct MySqlDatabase {
    config: DatabaseConfig,
    runtime: Runtime,
    connection: Mutex<ConnectionState>,
}

impl fmt::Debug for MySqlDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.connection.try_lock().as_deref() {
            Ok(ConnectionState::Disconnected) => "disconnected",
            Ok(ConnectionState::Open(_)) => "open",
            Ok(ConnectionState::Closed) => "closed",
            Err(_) => "busy",
        };
        f.debug_struct("MySqlDatabase")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("database", &self.config.database)
            .field("state", &state)
            .finish()
    }
}

impl MySqlDatabase {
    /// Prepare a driver for `config` without opening a connection
    pub fn new(config: DatabaseConfig) -> Result<Self, OrmError> {
        if config.driver != "mysql" {
            return Err(OrmError::Configuration(format!(
                "MySqlDatabase cannot serve driver '{}'",
                config.driver
            )));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DriverError::Connection(format!("failed to start runtime: {}", e)))?;

        Ok(Self {
            config,
            runtime,
            connection: Mutex::new(ConnectionState::Disconnected),
        })
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Open the connection. Calling it on an open driver does nothing.
    pub fn connect(&self) -> Result<(), DriverError> {
        let mut state = self.lock()?;
        match *state {
            ConnectionState::Open(_) => return Ok(()),
            ConnectionState::Closed => return Err(DriverError::Closed),
            ConnectionState::Disconnected => {}
        }

        let options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.username)
            .password(&self.config.password)
            .database(&self.config.database)
            .charset(&self.config.charset);

        let connection = self.runtime.block_on(async {
            let mut connection = MySqlConnection::connect_with(&options).await?;
            if !self.config.autocommit {
                sqlx::Executor::execute(&mut connection, "SET autocommit = 0").await?;
            }
            Ok::<_, sqlx::Error>(connection)
        });

        let connection = connection.map_err(|e| {
            tracing::error!(
                "Failed to connect to MySQL at {}:{}/{}: {}",
                self.config.host,
                self.config.port,
                self.config.database,
                e
            );
            map_sqlx_error(e)
        })?;

        tracing::info!(
            "Connected to MySQL at {}:{}/{}",
            self.config.host,
            self.config.port,
            self.config.database
        );
        *state = ConnectionState::Open(connection);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.lock().as_deref(), Ok(ConnectionState::Open(_)))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ConnectionState>, DriverError> {
        self.connection.lock().map_err(|_| DriverError::LockPoisoned)
    }

    fn run_raw(&self, sql: &'static str) -> Result<(), DriverError> {
        let mut state = self.lock()?;
        let connection = open_connection(&mut state)?;

        crate::debug_log!("[MYSQL] {}", sql);
        self.runtime
            .block_on(sqlx::Executor::execute(&mut *connection, sql))
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

impl Database for MySqlDatabase {
    fn execute(&self, sql: &str, values: &[Value]) -> Result<ResultSet, DriverError> {
        let mut state = self.lock()?;
        let connection = open_connection(&mut state)?;

        let translated = translate_placeholders(sql);
        let query = values
            .iter()
            .fold(sqlx::query(&translated), |query, value| bind_value(query, value));

        if is_query(sql) {
            let rows = self
                .runtime
                .block_on(query.fetch_all(&mut *connection))
                .map_err(map_sqlx_error)?;
            let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?;
            Ok(ResultSet::from_rows(rows))
        } else {
            let outcome = self
                .runtime
                .block_on(query.execute(&mut *connection))
                .map_err(map_sqlx_error)?;
            let result = ResultSet::affected(outcome.rows_affected());
            Ok(match outcome.last_insert_id() {
                0 => result,
                id => result.with_last_insert_id(id),
            })
        }
    }

    fn begin(&self) -> Result<(), DriverError> {
        self.run_raw("BEGIN")
    }

    fn commit(&self) -> Result<(), DriverError> {
        self.run_raw("COMMIT")
    }

    fn rollback(&self) -> Result<(), DriverError> {
        self.run_raw("ROLLBACK")
    }

    fn close(&self) -> Result<(), DriverError> {
        let mut state = self.lock()?;
        match std::mem::replace(&mut *state, ConnectionState::Closed) {
            ConnectionState::Open(connection) => {
                self.runtime
                    .block_on(connection.close())
                    .map_err(map_sqlx_error)?;
                tracing::info!("Closed MySQL connection to {}", self.config.host);
                Ok(())
            }
            ConnectionState::Disconnected | ConnectionState::Closed => Ok(()),
        }
    }
}

fn open_connection(state: &mut ConnectionState) -> Result<&mut MySqlConnection, DriverError> {
    match state {
        ConnectionState::Open(connection) => Ok(connection),
        ConnectionState::Disconnected => Err(DriverError::NotConnected),
        ConnectionState::Closed => Err(DriverError::Closed),
    }
}

/// MySQL expects `?` where the builders emit `%s`.
///
/// Compiled statements never contain literals, so a plain substitution is exact.
fn translate_placeholders(sql: &str) -> String {
    sql.replace(PLACEHOLDER, MYSQL_PLACEHOLDER)
}

fn is_query(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case("SELECT"))
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(u) = n.as_u64() {
                query.bind(u)
            } else {
                query.bind(n.as_f64())
            }
        }
        Value::String(s) => query.bind(s.clone()),
        Value::Array(_) | Value::Object(_) => query.bind(sqlx::types::Json(value.clone())),
    }
}

fn decode_row(row: &MySqlRow) -> Result<Row, DriverError> {
    row.columns()
        .iter()
        .map(|column| decode_column(row, column.ordinal(), column.type_info().name()))
        .collect()
}

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> Result<Value, DriverError> {
    fn get<'r, T>(row: &'r MySqlRow, index: usize) -> Result<Option<T>, DriverError>
    where
        T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
    {
        row.try_get::<Option<T>, _>(index).map_err(map_sqlx_error)
    }

    let value = match type_name {
        "NULL" => Value::Null,
        "BOOLEAN" => get::<bool>(row, index)?.map(Value::from).unwrap_or(Value::Null),
        name if name.ends_with("UNSIGNED") => {
            get::<u64>(row, index)?.map(Value::from).unwrap_or(Value::Null)
        }
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            get::<i64>(row, index)?.map(Value::from).unwrap_or(Value::Null)
        }
        "FLOAT" => get::<f32>(row, index)?
            .map(|f| Value::from(f64::from(f)))
            .unwrap_or(Value::Null),
        "DOUBLE" => get::<f64>(row, index)?.map(Value::from).unwrap_or(Value::Null),
        "DECIMAL" => row
            .try_get_unchecked::<Option<String>, _>(index)
            .map_err(map_sqlx_error)?
            .map(Value::from)
            .unwrap_or(Value::Null),
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            get::<String>(row, index)?.map(Value::from).unwrap_or(Value::Null)
        }
        "JSON" => get::<sqlx::types::Json<Value>>(row, index)?
            .map(|json| json.0)
            .unwrap_or(Value::Null),
        "DATE" => get::<chrono::NaiveDate>(row, index)?
            .map(|date| Value::from(date.to_string()))
            .unwrap_or(Value::Null),
        "TIME" => get::<chrono::NaiveTime>(row, index)?
            .map(|time| Value::from(time.to_string()))
            .unwrap_or(Value::Null),
        "DATETIME" => get::<chrono::NaiveDateTime>(row, index)?
            .map(|datetime| Value::from(datetime.format("%Y-%m-%d %H:%M:%S%.f").to_string()))
            .unwrap_or(Value::Null),
        "TIMESTAMP" => get::<chrono::DateTime<chrono::Utc>>(row, index)?
            .map(|timestamp| Value::from(timestamp.to_rfc3339()))
            .unwrap_or(Value::Null),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            get::<Vec<u8>>(row, index)?
                .map(|bytes| Value::Array(bytes.into_iter().map(Value::from).collect()))
                .unwrap_or(Value::Null)
        }
        other => return Err(DriverError::UnsupportedType(other.to_string())),
    };

    Ok(value)
}

fn map_sqlx_error(error: sqlx::Error) -> DriverError {
    match error {
        sqlx::Error::Database(db_error) => match db_error.kind() {
            sqlx::error::ErrorKind::Other => DriverError::Statement(db_error.to_string()),
            _ => DriverError::Constraint(db_error.to_string()),
        },
        sqlx::Error::Io(e) => DriverError::Connection(e.to_string()),
        sqlx::Error::Tls(e) => DriverError::Connection(e.to_string()),
        other => DriverError::Statement(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> DatabaseConfig {
        DatabaseConfig::new(
            "localhost".to_string(),
            3306,
            "peewee_test".to_string(),
            "root".to_string(),
            String::new(),
        )
    }

    #[test]
    fn test_translate_placeholders() {
        assert_eq!(
            translate_placeholders("UPDATE Ttt SET count = %s WHERE count = %s"),
            "UPDATE Ttt SET count = ? WHERE count = ?"
        );
        assert_eq!(translate_placeholders("DELETE FROM Ttt"), "DELETE FROM Ttt");
    }

    #[test]
    fn test_is_query() {
        assert!(is_query("SELECT count, num FROM Ttt"));
        assert!(is_query("  select count FROM Ttt"));
        assert!(!is_query("INSERT INTO Ttt (count) VALUES (%s)"));
        assert!(!is_query("SET"));
    }

    #[test]
    fn test_map_sqlx_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            map_sqlx_error(sqlx::Error::Io(io)),
            DriverError::Connection(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            DriverError::Statement(_)
        ));
    }

    #[test]
    fn test_rejects_foreign_driver() {
        let mut config = config();
        config.driver = "postgres".to_string();
        assert!(matches!(
            MySqlDatabase::new(config),
            Err(OrmError::Configuration(_))
        ));
    }

    #[test]
    fn test_statements_require_connection() {
        let database = MySqlDatabase::new(config()).unwrap();
        assert!(!database.is_connected());
        assert_eq!(
            database.execute("DELETE FROM Ttt", &[]),
            Err(DriverError::NotConnected)
        );
        assert_eq!(database.begin(), Err(DriverError::NotConnected));

        database.close().unwrap();
        assert_eq!(
            database.execute("SELECT count FROM Ttt WHERE count = %s", &[json!(8)]),
            Err(DriverError::Closed)
        );
        assert_eq!(database.connect(), Err(DriverError::Closed));
    }
}
