use std::path::Path;

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{Connection, Statement, ToSql};

use super::Driver;
use crate::error::OrmResult;
use crate::params::Params;
use crate::row::Row;
use crate::value::Value;

/// SQLite driver backed by a single `rusqlite` connection.
///
/// SQLite understands `:name` placeholders natively, so rendered statements
/// are prepared as-is. Bindings whose name does not occur in the statement
/// are skipped; a placeholder left without a binding fails the call instead
/// of being bound to NULL.
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> OrmResult<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> OrmResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Run several `;`-separated statements without bindings (schema setup).
    pub fn execute_batch(&self, sql: &str) -> OrmResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Access the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn prepare(&self, sql: &str, params: &Params) -> OrmResult<Statement<'_>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut bound = vec![false; stmt.parameter_count()];
        for (name, value) in params.iter() {
            if let Some(idx) = stmt.parameter_index(name)? {
                stmt.raw_bind_parameter(idx, value)?;
                bound[idx - 1] = true;
            }
        }
        if let Some(idx) = bound.iter().position(|bound| !bound) {
            let name = stmt
                .parameter_name(idx + 1)
                .map_or_else(|| format!("?{}", idx + 1), str::to_string);
            return Err(rusqlite::Error::InvalidParameterName(name).into());
        }
        Ok(stmt)
    }

    fn collect_rows(&self, sql: &str, params: &Params, limit: Option<usize>) -> OrmResult<Vec<Row>> {
        let mut stmt = self.prepare(sql, params)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.raw_query();
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut columns = Vec::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                columns.push((name.clone(), value_from_ref(row.get_ref(idx)?)));
            }
            out.push(Row::new(columns));
            if limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
        }
        Ok(out)
    }
}

impl std::fmt::Debug for SqliteDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDriver")
            .field("path", &self.conn.path())
            .finish()
    }
}

impl Driver for SqliteDriver {
    fn execute(&self, sql: &str, params: &Params) -> OrmResult<u64> {
        let mut stmt = self.prepare(sql, params)?;
        Ok(stmt.raw_execute()? as u64)
    }

    fn query_many(&self, sql: &str, params: &Params) -> OrmResult<Vec<Row>> {
        self.collect_rows(sql, params, None)
    }

    fn query_one(&self, sql: &str, params: &Params) -> OrmResult<Option<Row>> {
        Ok(self.collect_rows(sql, params, Some(1))?.into_iter().next())
    }

    fn last_insert_id(&self) -> OrmResult<i64> {
        Ok(self.conn.last_insert_rowid())
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Bool(b) => ToSqlOutput::Borrowed(ValueRef::Integer(i64::from(*b))),
            Value::Int(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Float(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(text) => match std::str::from_utf8(text) {
            Ok(text) => Value::Text(text.to_string()),
            Err(_) => Value::Blob(text.to_vec()),
        },
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}
