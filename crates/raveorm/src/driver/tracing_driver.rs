use tracing::Level;

use super::Driver;
use crate::error::OrmResult;
use crate::params::Params;
use crate::row::Row;

/// Truncate `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// A driver wrapper that emits every statement as a `tracing` event before
/// handing it to the inner driver.
///
/// Events go to target `raveorm.sql` with the operation name, the parameter
/// count, and the (optionally truncated) SQL. Bound values are never logged.
///
/// ```ignore
/// use raveorm::{SqliteDriver, TracingDriver};
/// use tracing::Level;
///
/// let driver = TracingDriver::new(SqliteDriver::open_in_memory()?)
///     .level(Level::INFO)
///     .max_sql_length(500);
/// ```
#[derive(Debug, Clone)]
pub struct TracingDriver<D> {
    inner: D,
    level: Level,
    max_sql_length: Option<usize>,
}

impl<D: Driver> TracingDriver<D> {
    /// Wrap `inner`, logging at DEBUG and truncating SQL at 200 bytes.
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// The wrapped driver.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Unwrap into the inner driver.
    pub fn into_inner(self) -> D {
        self.inner
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    fn emit(&self, operation: &'static str, sql: &str, params: &Params) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(sql);
        emit_at_level!(
            self.level,
            target: "raveorm.sql",
            operation,
            param_count = params.len(),
            sql = %sql,
        );
    }
}

impl<D: Driver> Driver for TracingDriver<D> {
    fn execute(&self, sql: &str, params: &Params) -> OrmResult<u64> {
        self.emit("execute", sql, params);
        self.inner.execute(sql, params)
    }

    fn query_many(&self, sql: &str, params: &Params) -> OrmResult<Vec<Row>> {
        self.emit("query_many", sql, params);
        self.inner.query_many(sql, params)
    }

    fn query_one(&self, sql: &str, params: &Params) -> OrmResult<Option<Row>> {
        self.emit("query_one", sql, params);
        self.inner.query_one(sql, params)
    }

    fn last_insert_id(&self) -> OrmResult<i64> {
        self.inner.last_insert_id()
    }
}
