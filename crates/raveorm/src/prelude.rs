//! Convenient imports for typical `raveorm` usage.
//!
//! ```ignore
//! use raveorm::prelude::*;
//! ```

pub use crate::{
    Columns, Condition, Driver, Entity, FindOptions, FromRow, Model, OrmError, OrmResult, Params,
    Query, QueryError, Row, SqliteDriver, Value, WhereSpec, params,
};

#[cfg(feature = "tracing")]
pub use crate::TracingDriver;
