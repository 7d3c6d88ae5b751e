//! # raveorm
//!
//! A small SQL statement builder and data layer for SQLite.
//!
//! ## Features
//!
//! - **Checked clause order**: INSERT, SELECT, UPDATE and DELETE statements are
//!   assembled clause by clause and rejected when a clause is out of place
//! - **Named parameters**: every value is bound under a `:name`, never spliced
//!   into the SQL text
//! - **Condition trees**: nested AND/OR conditions compile to parenthesized SQL
//!   with collision-free parameter names
//! - **Pluggable drivers**: statements run through the [`Driver`] trait;
//!   [`SqliteDriver`] ships with the crate
//! - **Entities and models**: `#[derive(Entity, FromRow, Model)]` for
//!   table-backed repositories
//!
//! ## Statement builder
//!
//! ```ignore
//! use raveorm::{Condition, Query, SqliteDriver, params};
//!
//! let driver = SqliteDriver::open_in_memory()?;
//!
//! // INSERT
//! Query::new()
//!     .insert_into("articles")?
//!     .values(vec![("title", "Hello"), ("content", "world")])?
//!     .execute(&driver)?;
//!
//! // SELECT
//! let rows = Query::new()
//!     .select(["id", "title"])?
//!     .from("articles")?
//!     .where_(Condition::or(vec![
//!         Condition::eq("id", 1),
//!         Condition::like("title", "Hel%"),
//!     ]))?
//!     .append_sql(" ORDER BY id")?
//!     .find(&driver)?;
//!
//! // Raw SQL
//! let row = Query::raw("SELECT * FROM articles WHERE id = :id", params! { ":id" => 1 })
//!     .first(&driver)?;
//! ```

pub mod condition;
pub mod config;
pub mod driver;
pub mod entity;
pub mod error;
pub mod params;
pub mod prelude;
pub mod query;
pub mod row;
pub mod value;

pub use condition::{Combinator, Condition, WhereSpec};
pub use config::{DatabaseConfig, DriverKind, connect};
pub use driver::{Driver, SqliteDriver};
pub use entity::{Entity, Model, TableHandle};
pub use error::{OrmError, OrmResult, QueryError, QueryResult};
pub use params::Params;
pub use query::{
    BuiltQuery, Clause, ClauseTable, Columns, FindOptions, Query, RowData, StatementKind, Target,
    Targets,
};
pub use row::{FromRow, Row};
pub use value::{FromValue, Value};

#[cfg(feature = "tracing")]
pub use driver::TracingDriver;

#[cfg(feature = "derive")]
pub use raveorm_derive::{Entity, FromRow, Model};
