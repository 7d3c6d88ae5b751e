//! Storage drivers: the boundary where rendered statements meet a database.

mod sqlite;
#[cfg(feature = "tracing")]
mod tracing_driver;

pub use sqlite::SqliteDriver;
#[cfg(feature = "tracing")]
pub use tracing_driver::TracingDriver;

use crate::error::OrmResult;
use crate::params::Params;
use crate::row::Row;

/// A synchronous database driver.
///
/// Statements arrive fully rendered with `:name` placeholders and the matching
/// bindings. Every call blocks until the engine answers. Driver failures are
/// reported as [`OrmError::Database`](crate::OrmError::Database) (or another
/// non-`Query` variant), never as builder errors.
pub trait Driver {
    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str, params: &Params) -> OrmResult<u64>;

    /// Execute a query and return all rows.
    fn query_many(&self, sql: &str, params: &Params) -> OrmResult<Vec<Row>>;

    /// Execute a query and return the first row, if any.
    ///
    /// Extra rows are ignored.
    fn query_one(&self, sql: &str, params: &Params) -> OrmResult<Option<Row>>;

    /// Row id generated by the most recent successful INSERT.
    fn last_insert_id(&self) -> OrmResult<i64>;
}

impl<D: Driver + ?Sized> Driver for &D {
    fn execute(&self, sql: &str, params: &Params) -> OrmResult<u64> {
        (**self).execute(sql, params)
    }

    fn query_many(&self, sql: &str, params: &Params) -> OrmResult<Vec<Row>> {
        (**self).query_many(sql, params)
    }

    fn query_one(&self, sql: &str, params: &Params) -> OrmResult<Option<Row>> {
        (**self).query_one(sql, params)
    }

    fn last_insert_id(&self) -> OrmResult<i64> {
        (**self).last_insert_id()
    }
}

impl<D: Driver + ?Sized> Driver for Box<D> {
    fn execute(&self, sql: &str, params: &Params) -> OrmResult<u64> {
        (**self).execute(sql, params)
    }

    fn query_many(&self, sql: &str, params: &Params) -> OrmResult<Vec<Row>> {
        (**self).query_many(sql, params)
    }

    fn query_one(&self, sql: &str, params: &Params) -> OrmResult<Option<Row>> {
        (**self).query_one(sql, params)
    }

    fn last_insert_id(&self) -> OrmResult<i64> {
        (**self).last_insert_id()
    }
}
