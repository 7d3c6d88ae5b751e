//! WHERE condition trees and their compilation to named-parameter SQL.
//!
//! A condition is either a comparison leaf `column op value` or an AND/OR
//! group of conditions. Compiling a tree renders parenthesized SQL text and
//! binds every leaf value under a unique `:name`.
//!
//! ```ignore
//! use raveorm::Condition;
//!
//! let cond = Condition::and(vec![
//!     Condition::eq("id", 2),
//!     Condition::eq("title", "salut les geeks"),
//!     Condition::or(vec![
//!         Condition::eq("id", 3),
//!         Condition::eq("id", 4),
//!     ]),
//! ]);
//! // (id = :id AND title = :title AND (id = :id0 OR id = :id1))
//! ```
//!
//! The same trees can be read from JSON, the form used by request payloads:
//! a leaf is `["id", "=", 2]`, a group is `{"AND": [...]}` or `{"OR": [...]}`.

use crate::error::{QueryError, QueryResult};
use crate::params::Params;
use crate::value::Value;

/// Key of the raw conditions string in the JSON WHERE form.
pub const CONDITIONS_KEY: &str = "conditions";
/// Key of the raw conditions' bindings in the JSON WHERE form.
pub const VALUES_KEY: &str = "values";

/// Boolean operator joining the children of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    /// SQL keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "AND" => Some(Combinator::And),
            "OR" => Some(Combinator::Or),
            _ => None,
        }
    }
}

/// Condition tree node.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// `column op :column`
    Compare {
        column: String,
        op: String,
        value: Value,
    },

    /// Children joined by the combinator, wrapped in parentheses.
    Group {
        combinator: Combinator,
        children: Vec<Condition>,
    },
}

impl Condition {
    /// Comparison with an arbitrary operator.
    pub fn cmp(column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Compare {
            column: column.into(),
            op: op.into(),
            value: value.into(),
        }
    }

    /// `column = value`
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, "=", value)
    }

    /// `column != value`
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, "!=", value)
    }

    /// `column > value`
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, ">", value)
    }

    /// `column >= value`
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, ">=", value)
    }

    /// `column < value`
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, "<", value)
    }

    /// `column <= value`
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::cmp(column, "<=", value)
    }

    /// `column LIKE pattern`
    pub fn like(column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Self::cmp(column, "LIKE", pattern)
    }

    /// AND group.
    pub fn and(children: Vec<Condition>) -> Self {
        Condition::Group {
            combinator: Combinator::And,
            children,
        }
    }

    /// OR group.
    pub fn or(children: Vec<Condition>) -> Self {
        Condition::Group {
            combinator: Combinator::Or,
            children,
        }
    }

    /// Read a condition tree from its JSON form.
    pub fn from_json(json: &serde_json::Value) -> QueryResult<Self> {
        match json {
            serde_json::Value::Array(items) => leaf_from_json(items),
            serde_json::Value::Object(map) => {
                let mut entries = map.iter();
                let (key, children) = match (entries.next(), entries.next()) {
                    (Some(entry), None) => entry,
                    _ => {
                        return Err(QueryError::bad_condition(format!(
                            "a group must have exactly one AND/OR key, found {} keys",
                            map.len()
                        )));
                    }
                };
                let combinator = Combinator::from_key(key).ok_or_else(|| {
                    QueryError::bad_condition(format!("unknown combinator '{key}'"))
                })?;
                let serde_json::Value::Array(children) = children else {
                    return Err(QueryError::bad_condition(format!(
                        "{key} must map to a list of conditions"
                    )));
                };
                let children = children
                    .iter()
                    .map(Condition::from_json)
                    .collect::<QueryResult<Vec<_>>>()?;
                Ok(Condition::Group {
                    combinator,
                    children,
                })
            }
            other => Err(QueryError::bad_condition(format!(
                "expected a [column, operator, value] list or an AND/OR group, found {other}"
            ))),
        }
    }

    /// Render the tree and bind its values into `params`.
    ///
    /// Leaves are visited depth-first, left to right. A leaf whose `:column`
    /// is already bound gets the next free numeric suffix (`:id0`, `:id1`, ...)
    /// from a counter shared by the whole pass. On error `params` may hold a
    /// partial set of bindings; callers compile into a scratch copy.
    pub fn compile(self, params: &mut Params) -> QueryResult<String> {
        let mut counter = 0;
        self.compile_with(params, &mut counter)
    }

    fn compile_with(self, params: &mut Params, counter: &mut usize) -> QueryResult<String> {
        match self {
            Condition::Compare { column, op, value } => {
                if column.trim().is_empty() {
                    return Err(QueryError::bad_condition("empty column name"));
                }
                if op.trim().is_empty() {
                    return Err(QueryError::bad_condition(format!(
                        "empty operator for column '{column}'"
                    )));
                }
                let name = params.bind_unique(&column, value, counter);
                Ok(format!("{column} {op} :{name}"))
            }
            Condition::Group {
                combinator,
                children,
            } => {
                if children.is_empty() {
                    return Err(QueryError::bad_condition(format!(
                        "empty {} group",
                        combinator.as_str()
                    )));
                }
                let parts = children
                    .into_iter()
                    .map(|child| child.compile_with(params, counter))
                    .collect::<QueryResult<Vec<_>>>()?;
                let separator = format!(" {} ", combinator.as_str());
                Ok(format!("({})", parts.join(&separator)))
            }
        }
    }
}

fn leaf_from_json(items: &[serde_json::Value]) -> QueryResult<Condition> {
    let [column, op, value] = items else {
        return Err(QueryError::bad_condition(format!(
            "expected [column, operator, value], found {} elements",
            items.len()
        )));
    };
    let column = column
        .as_str()
        .ok_or_else(|| QueryError::bad_condition(format!("column must be a string, found {column}")))?;
    let op = op
        .as_str()
        .ok_or_else(|| QueryError::bad_condition(format!("operator must be a string, found {op}")))?;
    let value = Value::from_json(value).ok_or_else(|| {
        QueryError::bad_condition(format!("value for '{column}' must be a scalar, found {value}"))
    })?;
    Ok(Condition::cmp(column, op, value))
}

impl<C, O, V> From<(C, O, V)> for Condition
where
    C: Into<String>,
    O: Into<String>,
    V: Into<Value>,
{
    fn from((column, op, value): (C, O, V)) -> Self {
        Condition::cmp(column, op, value)
    }
}

/// Argument of [`Query::where_`](crate::Query::where_).
#[derive(Clone, Debug, PartialEq)]
pub enum WhereSpec {
    /// Literal SQL, passed through, with its own bindings.
    Raw { conditions: String, values: Params },

    /// Declarative tree compiled with collision-free parameter names.
    Tree(Condition),
}

impl WhereSpec {
    /// Literal conditions without bindings.
    pub fn raw(conditions: impl Into<String>) -> Self {
        WhereSpec::Raw {
            conditions: conditions.into(),
            values: Params::new(),
        }
    }

    /// Literal conditions with bindings, e.g. `("id = :id", params!{":id" => 2})`.
    pub fn raw_with(conditions: impl Into<String>, values: Params) -> Self {
        WhereSpec::Raw {
            conditions: conditions.into(),
            values,
        }
    }

    /// Read a WHERE argument from JSON.
    ///
    /// Accepts `{"conditions": "<sql>", "values": {":name": v}}`,
    /// `{"conditions": <tree>}`, or a bare tree.
    pub fn from_json(json: &serde_json::Value) -> QueryResult<Self> {
        let Some(conditions) = json.get(CONDITIONS_KEY) else {
            return Condition::from_json(json).map(WhereSpec::Tree);
        };
        let Some(sql) = conditions.as_str() else {
            return Condition::from_json(conditions).map(WhereSpec::Tree);
        };

        let mut values = Params::new();
        match json.get(VALUES_KEY) {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::Object(map)) => {
                for (name, value) in map {
                    let value = Value::from_json(value).ok_or_else(|| {
                        QueryError::bad_condition(format!("value for '{name}' must be a scalar"))
                    })?;
                    values.bind(name.clone(), value);
                }
            }
            Some(other) => {
                return Err(QueryError::bad_condition(format!(
                    "values must be a map of names to values, found {other}"
                )));
            }
        }
        Ok(WhereSpec::Raw {
            conditions: sql.to_string(),
            values,
        })
    }
}

impl From<Condition> for WhereSpec {
    fn from(cond: Condition) -> Self {
        WhereSpec::Tree(cond)
    }
}

impl<C, O, V> From<(C, O, V)> for WhereSpec
where
    C: Into<String>,
    O: Into<String>,
    V: Into<Value>,
{
    fn from(leaf: (C, O, V)) -> Self {
        WhereSpec::Tree(leaf.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaf_renders_named_param() {
        let mut params = Params::new();
        let sql = Condition::eq("id", 1).compile(&mut params).unwrap();
        assert_eq!(sql, "id = :id");
        assert_eq!(params.get(":id"), Some(&Value::Int(1)));
    }

    #[test]
    fn duplicate_columns_get_suffixes() {
        let mut params = Params::new();
        let sql = Condition::and(vec![Condition::eq("id", 2), Condition::eq("id", 4)])
            .compile(&mut params)
            .unwrap();
        assert_eq!(sql, "(id = :id AND id = :id0)");
        let names: Vec<_> = params.names().collect();
        assert_eq!(names, [":id", ":id0"]);
    }

    #[test]
    fn nested_groups_are_parenthesized() {
        let mut params = Params::new();
        let sql = Condition::and(vec![
            Condition::eq("id", 2),
            Condition::eq("title", "salut les geeks"),
            Condition::or(vec![
                Condition::eq("id", 3),
                Condition::eq("id", 4),
                Condition::eq("id", 5),
            ]),
        ])
        .compile(&mut params)
        .unwrap();
        assert_eq!(
            sql,
            "(id = :id AND title = :title AND (id = :id0 OR id = :id1 OR id = :id2))"
        );
        assert_eq!(params.get(":id2"), Some(&Value::Int(5)));
    }

    #[test]
    fn suffixes_follow_depth_first_order() {
        let mut params = Params::new();
        let sql = Condition::or(vec![
            Condition::and(vec![Condition::eq("a", 1), Condition::eq("b", 2)]),
            Condition::and(vec![Condition::eq("b", 3), Condition::eq("a", 4)]),
        ])
        .compile(&mut params)
        .unwrap();
        assert_eq!(sql, "((a = :a AND b = :b) OR (b = :b0 AND a = :a1))");
    }

    #[test]
    fn existing_binding_forces_suffix() {
        let mut params = Params::new().with(":title", "from set");
        let sql = Condition::eq("title", "Hello Jackson")
            .compile(&mut params)
            .unwrap();
        assert_eq!(sql, "title = :title0");
        assert_eq!(params.get(":title"), Some(&Value::Text("from set".into())));
    }

    #[test]
    fn empty_group_is_rejected() {
        let mut params = Params::new();
        let err = Condition::and(vec![]).compile(&mut params).unwrap_err();
        assert!(matches!(err, QueryError::BadConditionShape(_)));
    }

    #[test]
    fn json_tree_parses() {
        let cond = Condition::from_json(&json!({
            "AND": [["id", "=", 2], {"OR": [["id", "=", 3], ["name", "LIKE", "a%"]]}]
        }))
        .unwrap();
        assert_eq!(
            cond,
            Condition::and(vec![
                Condition::eq("id", 2),
                Condition::or(vec![Condition::eq("id", 3), Condition::like("name", "a%")]),
            ])
        );
    }

    #[test]
    fn json_leaf_with_four_elements_is_rejected() {
        let err = Condition::from_json(&json!(["test", "=", 2, 4])).unwrap_err();
        assert!(err.to_string().starts_with("Bad where construction"));
    }

    #[test]
    fn json_group_with_two_keys_is_rejected() {
        let err = Condition::from_json(&json!({"AND": [], "OR": []})).unwrap_err();
        assert!(matches!(err, QueryError::BadConditionShape(_)));
    }

    #[test]
    fn json_unknown_key_is_rejected() {
        let err = Condition::from_json(&json!({"XOR": [["a", "=", 1]]})).unwrap_err();
        assert!(err.to_string().contains("XOR"));
    }

    #[test]
    fn where_spec_raw_from_json() {
        let spec = WhereSpec::from_json(&json!({
            "conditions": "id = :id",
            "values": {":id": 2}
        }))
        .unwrap();
        assert_eq!(
            spec,
            WhereSpec::raw_with("id = :id", Params::new().with(":id", 2))
        );
    }

    #[test]
    fn where_spec_wrapped_tree_from_json() {
        let spec = WhereSpec::from_json(&json!({"conditions": ["id", "=", 7]})).unwrap();
        assert_eq!(spec, WhereSpec::Tree(Condition::eq("id", 7)));
    }
}
