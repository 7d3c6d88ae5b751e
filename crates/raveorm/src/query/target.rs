//! Closed argument types accepted by the clause methods.

use super::clause::Clause;
use crate::entity::{Entity, TableHandle};
use crate::error::{QueryError, QueryResult};
use crate::value::Value;

/// A table reference: a literal name or something that knows its table.
#[derive(Clone, Copy)]
pub enum Target<'a> {
    Name(&'a str),
    Handle(&'a dyn TableHandle),
}

impl<'a> Target<'a> {
    /// The table name, rejecting blank names.
    pub(crate) fn resolve(&self, clause: Clause) -> QueryResult<&'a str> {
        let name = match *self {
            Target::Name(name) => name,
            Target::Handle(handle) => handle.table_name(),
        };
        if name.trim().is_empty() {
            return Err(QueryError::unsupported_target(
                clause.keyword(),
                format!("{name:?}"),
            ));
        }
        Ok(name)
    }
}

impl std::fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Target::Handle(handle) => f.debug_tuple("Handle").field(&handle.table_name()).finish(),
        }
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(name: &'a str) -> Self {
        Target::Name(name)
    }
}

impl<'a> From<&'a dyn TableHandle> for Target<'a> {
    fn from(handle: &'a dyn TableHandle) -> Self {
        Target::Handle(handle)
    }
}

impl<'a, T: TableHandle> From<&'a T> for Target<'a> {
    fn from(handle: &'a T) -> Self {
        Target::Handle(handle)
    }
}

/// One or more tables for `FROM`, rendered comma-joined in order.
#[derive(Clone, Debug)]
pub struct Targets<'a>(pub Vec<Target<'a>>);

impl<'a> Targets<'a> {
    pub(crate) fn resolve(&self, clause: Clause) -> QueryResult<Vec<&'a str>> {
        if self.0.is_empty() {
            return Err(QueryError::unsupported_target(clause.keyword(), "no table given"));
        }
        self.0.iter().map(|target| target.resolve(clause)).collect()
    }
}

impl<'a> From<Target<'a>> for Targets<'a> {
    fn from(target: Target<'a>) -> Self {
        Targets(vec![target])
    }
}

impl<'a> From<&'a str> for Targets<'a> {
    fn from(name: &'a str) -> Self {
        Targets(vec![Target::Name(name)])
    }
}

impl<'a> From<&'a dyn TableHandle> for Targets<'a> {
    fn from(handle: &'a dyn TableHandle) -> Self {
        Targets(vec![Target::Handle(handle)])
    }
}

impl<'a, T: TableHandle> From<&'a T> for Targets<'a> {
    fn from(handle: &'a T) -> Self {
        Targets(vec![Target::Handle(handle)])
    }
}

impl<'a> From<Vec<Target<'a>>> for Targets<'a> {
    fn from(targets: Vec<Target<'a>>) -> Self {
        Targets(targets)
    }
}

impl<'a> From<Vec<&'a str>> for Targets<'a> {
    fn from(names: Vec<&'a str>) -> Self {
        Targets(names.into_iter().map(Target::Name).collect())
    }
}

impl<'a, const N: usize> From<[&'a str; N]> for Targets<'a> {
    fn from(names: [&'a str; N]) -> Self {
        Targets(names.into_iter().map(Target::Name).collect())
    }
}

impl<'a, const N: usize> From<[Target<'a>; N]> for Targets<'a> {
    fn from(targets: [Target<'a>; N]) -> Self {
        Targets(targets.into())
    }
}

/// Column list for `SELECT`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Columns {
    /// `*`
    #[default]
    All,
    /// Literal column text, e.g. `"id, title"`.
    Raw(String),
    /// Column names, comma-joined in order.
    List(Vec<String>),
}

impl Columns {
    pub(crate) fn render(&self, clause: Clause) -> QueryResult<String> {
        match self {
            Columns::All => Ok("*".to_string()),
            Columns::Raw(text) if text.trim().is_empty() => {
                Err(QueryError::bad_data(clause.keyword(), "empty column list"))
            }
            Columns::Raw(text) => Ok(text.clone()),
            Columns::List(columns) if columns.is_empty() => {
                Err(QueryError::bad_data(clause.keyword(), "empty column list"))
            }
            Columns::List(columns) => Ok(columns.join(", ")),
        }
    }
}

impl From<&str> for Columns {
    fn from(text: &str) -> Self {
        Columns::Raw(text.to_string())
    }
}

impl From<String> for Columns {
    fn from(text: String) -> Self {
        Columns::Raw(text)
    }
}

impl<S: Into<String>> From<Vec<S>> for Columns {
    fn from(columns: Vec<S>) -> Self {
        Columns::List(columns.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Columns {
    fn from(columns: [S; N]) -> Self {
        Columns::List(columns.into_iter().map(Into::into).collect())
    }
}

/// Row data for `VALUES` and `SET`.
pub enum RowData<'a> {
    /// Ordered `(column, value)` pairs.
    Mapping(Vec<(String, Value)>),
    /// The public columns of an entity.
    Entity(&'a dyn Entity),
    /// A JSON object of column to scalar value.
    Json(serde_json::Value),
}

impl RowData<'_> {
    /// Columns to bind: nulls skipped, a repeated column keeps its first
    /// position and its last value.
    pub(crate) fn into_bindable(self, clause: Clause) -> QueryResult<Vec<(String, Value)>> {
        let pairs: Vec<(String, Value)> = match self {
            RowData::Mapping(pairs) => pairs,
            RowData::Entity(entity) => entity
                .columns()
                .into_iter()
                .map(|(column, value)| (column.to_string(), value))
                .collect(),
            RowData::Json(serde_json::Value::Object(map)) => map
                .into_iter()
                .map(|(column, value)| match Value::from_json(&value) {
                    Some(scalar) => Ok((column, scalar)),
                    None => Err(QueryError::bad_data(
                        clause.keyword(),
                        format!("value of '{column}' is not a scalar"),
                    )),
                })
                .collect::<QueryResult<_>>()?,
            RowData::Json(other) => {
                return Err(QueryError::bad_data(
                    clause.keyword(),
                    format!("expected a mapping or an entity, found {other}"),
                ));
            }
        };

        let mut bindable: Vec<(String, Value)> = Vec::with_capacity(pairs.len());
        for (column, value) in pairs {
            if column.trim().is_empty() {
                return Err(QueryError::bad_data(clause.keyword(), "empty column name"));
            }
            if value.is_null() {
                continue;
            }
            match bindable.iter_mut().find(|(name, _)| *name == column) {
                Some(slot) => slot.1 = value,
                None => bindable.push((column, value)),
            }
        }
        if bindable.is_empty() {
            return Err(QueryError::bad_data(clause.keyword(), "no non-null values"));
        }
        Ok(bindable)
    }
}

impl std::fmt::Debug for RowData<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowData::Mapping(pairs) => f.debug_tuple("Mapping").field(pairs).finish(),
            RowData::Entity(entity) => f.debug_tuple("Entity").field(&entity.columns()).finish(),
            RowData::Json(json) => f.debug_tuple("Json").field(json).finish(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for RowData<'_> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        RowData::Mapping(
            pairs
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for RowData<'_> {
    fn from(pairs: [(K, V); N]) -> Self {
        RowData::Mapping(
            pairs
                .into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> From<&'a dyn Entity> for RowData<'a> {
    fn from(entity: &'a dyn Entity) -> Self {
        RowData::Entity(entity)
    }
}

impl<'a, T: Entity> From<&'a T> for RowData<'a> {
    fn from(entity: &'a T) -> Self {
        RowData::Entity(entity)
    }
}

impl From<serde_json::Value> for RowData<'_> {
    fn from(json: serde_json::Value) -> Self {
        RowData::Json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_table_is_unsupported() {
        let err = Target::from("  ").resolve(Clause::InsertInto).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedTarget { .. }));
        let err = Targets(vec![]).resolve(Clause::From).unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedTarget { .. }));
    }

    #[test]
    fn offending_from_element_is_named() {
        let err = Targets::from(["articles", ""]).resolve(Clause::From).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported table in FROM: \"\"");
    }

    #[test]
    fn columns_render() {
        assert_eq!(Columns::All.render(Clause::Select).unwrap(), "*");
        assert_eq!(
            Columns::from(["id", "title"]).render(Clause::Select).unwrap(),
            "id, title"
        );
        let empty: Vec<String> = Vec::new();
        assert!(matches!(
            Columns::from(empty).render(Clause::Select),
            Err(QueryError::BadDataShape { .. })
        ));
    }

    #[test]
    fn nulls_are_skipped_and_repeats_collapse() {
        let row = RowData::Mapping(vec![
            ("title".into(), Value::from("a")),
            ("content".into(), Value::Null),
            ("name".into(), Value::from("n")),
            ("title".into(), Value::from("b")),
        ]);
        let pairs = row.into_bindable(Clause::UpdateSet).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("title".to_string(), Value::from("b")),
                ("name".to_string(), Value::from("n")),
            ]
        );
    }

    #[test]
    fn json_rows_must_be_objects() {
        let err = RowData::from(json!([1, 2]))
            .into_bindable(Clause::InsertIntoValues)
            .unwrap_err();
        assert!(matches!(err, QueryError::BadDataShape { .. }));

        let pairs = RowData::from(json!({"title": "t", "views": 3}))
            .into_bindable(Clause::InsertIntoValues)
            .unwrap();
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn all_null_row_is_rejected() {
        let err = RowData::from(vec![("title", Value::Null)])
            .into_bindable(Clause::InsertIntoValues)
            .unwrap_err();
        assert!(matches!(err, QueryError::BadDataShape { .. }));
    }
}
