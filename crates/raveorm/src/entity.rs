//! Entities, table handles, and the model repository.
//!
//! An [`Entity`] is one row's worth of named column values. A [`Model`] binds
//! a table name to an entity type and provides the usual repository
//! operations on top of [`Query`]. Both are normally derived:
//!
//! ```ignore
//! use raveorm::{Entity, FromRow, Model};
//!
//! #[derive(Debug, Entity, FromRow)]
//! struct ArticleEntity {
//!     #[orm(id)]
//!     id: Option<i64>,
//!     title: String,
//!     content: Option<String>,
//! }
//!
//! #[derive(Model)]
//! #[orm(table = "articles", entity = "ArticleEntity")]
//! struct ArticleModel;
//!
//! let articles = ArticleModel.all(&driver)?;
//! ```

use crate::condition::Condition;
use crate::driver::Driver;
use crate::error::{OrmError, OrmResult};
use crate::query::{Columns, Query};
use crate::row::FromRow;
use crate::value::Value;

/// A record with an ordered set of public columns.
pub trait Entity {
    /// `(column, value)` pairs in declaration order.
    fn columns(&self) -> Vec<(&'static str, Value)>;

    /// Primary key column names. Empty when the entity has none.
    fn primary_keys(&self) -> &'static [&'static str];

    /// Value of a single column.
    fn value_of(&self, column: &str) -> Option<Value> {
        self.columns()
            .into_iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}

/// Anything that names a table: accepted by `insert_into`, `from` and `update`.
pub trait TableHandle {
    fn table_name(&self) -> &str;
}

impl<M: Model> TableHandle for M {
    fn table_name(&self) -> &str {
        M::TABLE
    }
}

/// Repository of one table's entities.
///
/// All operations are provided; an implementation only names the table and
/// the entity type.
pub trait Model: Sized {
    /// Table name.
    const TABLE: &'static str;

    /// Entity stored in the table.
    type Entity: Entity + FromRow;

    /// A fresh statement builder.
    fn new_query(&self) -> Query {
        Query::new()
    }

    /// Every row of the table.
    fn all<D: Driver + ?Sized>(&self, driver: &D) -> OrmResult<Vec<Self::Entity>> {
        let mut query = self.new_query();
        query.select(Columns::All)?.from(self)?;
        query.find_as(driver)
    }

    /// The row matching every `(column, value)` key, if any.
    fn get<D: Driver + ?Sized>(
        &self,
        driver: &D,
        keys: &[(&str, Value)],
    ) -> OrmResult<Option<Self::Entity>> {
        if keys.is_empty() {
            return Err(OrmError::entity(format!(
                "no key given to look up a row of {}",
                Self::TABLE
            )));
        }
        let conditions = keys
            .iter()
            .map(|(column, value)| Condition::eq(*column, value.clone()))
            .collect();

        let mut query = self.new_query();
        query
            .select(Columns::All)?
            .from(self)?
            .where_(combine(conditions))?;
        query.first_as(driver)
    }

    /// Insert `entity`; null columns are left to their defaults.
    fn add<D: Driver + ?Sized>(&self, driver: &D, entity: &Self::Entity) -> OrmResult<u64> {
        let mut query = self.new_query();
        query.insert_into(self)?.values(entity)?;
        query.execute(driver)
    }

    /// Update the row identified by the entity's primary key(s).
    fn update<D: Driver + ?Sized>(&self, driver: &D, entity: &Self::Entity) -> OrmResult<u64> {
        let filter = primary_key_condition(entity)?;
        let mut query = self.new_query();
        query.update(self)?.set(entity)?.where_(filter)?;
        query.execute(driver)
    }

    /// Delete the row identified by the entity's primary key(s).
    fn delete<D: Driver + ?Sized>(&self, driver: &D, entity: &Self::Entity) -> OrmResult<u64> {
        let filter = primary_key_condition(entity)?;
        let mut query = self.new_query();
        query.delete()?.from(self)?.where_(filter)?;
        query.execute(driver)
    }

    /// Insert or update.
    ///
    /// Updates when every primary key is set. With a single, unset primary key
    /// the entity is inserted. A composite key that is not fully set cannot be
    /// inserted and is rejected.
    fn save<D: Driver + ?Sized>(&self, driver: &D, entity: &Self::Entity) -> OrmResult<u64> {
        let keys = entity.primary_keys();
        let unset = keys
            .iter()
            .filter(|key| entity.value_of(key).is_none_or(|value| value.is_null()))
            .count();
        match (keys.len(), unset) {
            (0, _) => Err(OrmError::entity(format!(
                "entity of {} has no primary key",
                Self::TABLE
            ))),
            (_, 0) => self.update(driver, entity),
            (1, 1) => self.add(driver, entity),
            _ => Err(OrmError::entity(format!(
                "cannot add an entity of {} with a partially set composite primary key",
                Self::TABLE
            ))),
        }
    }

    /// Row id generated by the last insert on `driver`.
    fn last_insert_id<D: Driver + ?Sized>(&self, driver: &D) -> OrmResult<i64> {
        driver.last_insert_id()
    }
}

fn primary_key_condition<E: Entity>(entity: &E) -> OrmResult<Condition> {
    let keys = entity.primary_keys();
    if keys.is_empty() {
        return Err(OrmError::entity("incorrect primary key setup: no primary key"));
    }
    let conditions = keys
        .iter()
        .map(|key| {
            entity
                .value_of(key)
                .map(|value| Condition::eq(*key, value))
                .ok_or_else(|| {
                    OrmError::entity(format!("primary key '{key}' is not a column of the entity"))
                })
        })
        .collect::<OrmResult<Vec<_>>>()?;
    Ok(combine(conditions))
}

/// A single condition stays a leaf; several are AND-ed.
fn combine(mut conditions: Vec<Condition>) -> Condition {
    if conditions.len() == 1 {
        conditions.remove(0)
    } else {
        Condition::and(conditions)
    }
}
