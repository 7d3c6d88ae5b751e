//! Parameterized SQL statement builder.
//!
//! A [`Query`] is built by calling clause methods in an order the clause
//! dependency table allows. Each call validates legality first and only then
//! records its fragment and bindings, so a failing call leaves the builder
//! unchanged.
//!
//! # Example
//!
//! ```ignore
//! use raveorm::{Condition, Query};
//!
//! let mut q = Query::new();
//! q.update("articles")?
//!     .set(vec![("title", "Hello world")])?
//!     .where_(Condition::eq("id", 2))?;
//!
//! assert_eq!(q.statement()?, "UPDATE articles SET title = :title WHERE id = :id ");
//! ```

mod clause;
mod target;


pub use clause::{Clause, ClauseTable, KindRules, StatementKind};
pub use target::{Columns, RowData, Target, Targets};

use crate::condition::WhereSpec;
use crate::driver::Driver;
use crate::error::{OrmResult, QueryError, QueryResult};
use crate::params::{Params, param_name};
use crate::row::{FromRow, Row};

/// A rendered statement ready for a driver.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    /// SQL text with `:name` placeholders.
    pub statement: String,
    /// Bindings, omitted when empty.
    pub values: Option<Params>,
}

/// Options for [`Query::find_with`]: a whole SELECT in one value.
#[derive(Debug, Clone)]
pub struct FindOptions<'a> {
    pub select: Columns,
    pub from: Targets<'a>,
    pub filter: Option<WhereSpec>,
    pub append: Option<String>,
}

impl<'a> FindOptions<'a> {
    /// Select every column of `from`.
    pub fn new(from: impl Into<Targets<'a>>) -> Self {
        Self {
            select: Columns::All,
            from: from.into(),
            filter: None,
            append: None,
        }
    }

    pub fn select(mut self, columns: impl Into<Columns>) -> Self {
        self.select = columns.into();
        self
    }

    pub fn filter(mut self, filter: impl Into<WhereSpec>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn append(mut self, sql: impl Into<String>) -> Self {
        self.append = Some(sql.into());
        self
    }
}

/// Parameterized SQL statement under construction.
#[derive(Debug, Clone)]
pub struct Query {
    table: &'static ClauseTable,
    kind: Option<StatementKind>,
    clauses: [Option<String>; Clause::COUNT],
    custom: Option<String>,
    append: Option<String>,
    params: Params,
    rendered: Option<String>,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    /// An empty builder using [`ClauseTable::STANDARD`].
    pub fn new() -> Self {
        Self::with_rules(&ClauseTable::STANDARD)
    }

    /// An empty builder validated against a custom clause table.
    pub fn with_rules(table: &'static ClauseTable) -> Self {
        Self {
            table,
            kind: None,
            clauses: Default::default(),
            custom: None,
            append: None,
            params: Params::new(),
            rendered: None,
        }
    }

    /// A custom statement from raw SQL and its bindings.
    pub fn raw(sql: impl Into<String>, values: Params) -> Self {
        let mut query = Self::new();
        query.custom = Some(sql.into());
        query.params = values;
        query.kind = Some(StatementKind::Custom);
        query
    }

    /// Kind of the statement, once a clause-initiating call has set it.
    pub fn kind(&self) -> Option<StatementKind> {
        self.kind
    }

    /// Whether `clause` has been added.
    pub fn has_clause(&self, clause: Clause) -> bool {
        self.clauses[clause.index()].is_some()
    }

    /// Whether the statement has been rendered (and is therefore frozen).
    pub fn is_rendered(&self) -> bool {
        self.rendered.is_some()
    }

    // ==================== Clauses ====================

    /// Use raw SQL as the statement. Only legal on a fresh builder.
    pub fn set_query(&mut self, sql: impl Into<String>, values: Params) -> QueryResult<&mut Self> {
        if self.rendered.is_some() {
            return Err(QueryError::Finalized {
                clause: "custom".to_string(),
            });
        }
        if let Some(kind) = self.kind {
            return Err(QueryError::prerequisite(
                "custom",
                format!("statement is already {kind}"),
            ));
        }
        self.kind = Some(StatementKind::Custom);
        self.custom = Some(sql.into());
        self.params = values;
        Ok(self)
    }

    /// `INSERT INTO <table>`
    pub fn insert_into<'a>(&mut self, target: impl Into<Target<'a>>) -> QueryResult<&mut Self> {
        self.check_legal(Clause::InsertInto)?;
        let table = target.into().resolve(Clause::InsertInto)?;
        self.commit(Clause::InsertInto, format!("INSERT INTO {table}"));
        Ok(self)
    }

    /// ` (<columns>) VALUES (<:columns>)`; null values are skipped.
    pub fn values<'a>(&mut self, row: impl Into<RowData<'a>>) -> QueryResult<&mut Self> {
        self.check_legal(Clause::InsertIntoValues)?;
        let pairs = row.into().into_bindable(Clause::InsertIntoValues)?;

        let columns: Vec<&str> = pairs.iter().map(|(column, _)| column.as_str()).collect();
        let names: Vec<String> = columns.iter().map(|column| param_name(column)).collect();
        let fragment = format!(" ({}) VALUES ({})", columns.join(", "), names.join(", "));

        self.params = pairs
            .into_iter()
            .map(|(column, value)| (param_name(&column), value))
            .collect();
        self.commit(Clause::InsertIntoValues, fragment);
        Ok(self)
    }

    /// `SELECT <columns> `
    pub fn select(&mut self, columns: impl Into<Columns>) -> QueryResult<&mut Self> {
        self.check_legal(Clause::Select)?;
        let columns = columns.into().render(Clause::Select)?;
        self.commit(Clause::Select, format!("SELECT {columns} "));
        Ok(self)
    }

    /// `SELECT * `
    pub fn select_all(&mut self) -> QueryResult<&mut Self> {
        self.select(Columns::All)
    }

    /// `FROM <table>, ... `; only after `select` or `delete`.
    pub fn from<'a>(&mut self, targets: impl Into<Targets<'a>>) -> QueryResult<&mut Self> {
        self.check_legal(Clause::From)?;
        let tables = targets.into().resolve(Clause::From)?;
        self.commit(Clause::From, format!("FROM {} ", tables.join(", ")));
        Ok(self)
    }

    /// `UPDATE <table> `
    pub fn update<'a>(&mut self, target: impl Into<Target<'a>>) -> QueryResult<&mut Self> {
        self.check_legal(Clause::Update)?;
        let table = target.into().resolve(Clause::Update)?;
        self.commit(Clause::Update, format!("UPDATE {table} "));
        Ok(self)
    }

    /// `SET <column> = :<column>, ... `; null values are skipped.
    ///
    /// Bindings are merged without suffixing. A later tree `where_` on the
    /// same column gets a suffixed name, while a raw `where_` binding of the
    /// same name overwrites the SET value.
    pub fn set<'a>(&mut self, row: impl Into<RowData<'a>>) -> QueryResult<&mut Self> {
        self.check_legal(Clause::UpdateSet)?;
        let pairs = row.into().into_bindable(Clause::UpdateSet)?;

        let assignments: Vec<String> = pairs
            .iter()
            .map(|(column, _)| format!("{column} = {}", param_name(column)))
            .collect();
        let fragment = format!("SET {} ", assignments.join(", "));

        for (column, value) in pairs {
            self.params.bind(param_name(&column), value);
        }
        self.commit(Clause::UpdateSet, fragment);
        Ok(self)
    }

    /// `DELETE `
    pub fn delete(&mut self) -> QueryResult<&mut Self> {
        self.check_legal(Clause::Delete)?;
        self.commit(Clause::Delete, "DELETE ".to_string());
        Ok(self)
    }

    /// `WHERE <conditions> `
    ///
    /// A condition tree is compiled with collision-free parameter names. Raw
    /// conditions are passed through; their values are merged into the
    /// bindings of an UPDATE and replace the bindings of other statements.
    pub fn where_(&mut self, spec: impl Into<WhereSpec>) -> QueryResult<&mut Self> {
        self.check_legal(Clause::Where)?;
        match spec.into() {
            WhereSpec::Raw { conditions, values } => {
                if conditions.trim().is_empty() {
                    return Err(QueryError::bad_condition("empty WHERE conditions"));
                }
                if self.kind == Some(StatementKind::Update) {
                    self.params.merge(values);
                } else {
                    self.params = values;
                }
                self.commit(Clause::Where, format!("WHERE {conditions} "));
            }
            WhereSpec::Tree(condition) => {
                let mut staged = self.params.clone();
                let sql = condition.compile(&mut staged)?;
                self.params = staged;
                self.commit(Clause::Where, format!("WHERE {sql} "));
            }
        }
        Ok(self)
    }

    /// Trailing SQL rendered after every clause, e.g. `" ORDER BY id"`.
    ///
    /// Concatenated as-is; a second call replaces the first.
    pub fn append_sql(&mut self, sql: impl Into<String>) -> QueryResult<&mut Self> {
        if self.rendered.is_some() {
            return Err(QueryError::Finalized {
                clause: "append".to_string(),
            });
        }
        self.append = Some(sql.into());
        Ok(self)
    }

    // ==================== Rendering ====================

    /// The SQL text. Renders on first call; later calls return the cached text.
    pub fn statement(&mut self) -> QueryResult<&str> {
        self.finalize().map(|(sql, _)| sql)
    }

    /// The bindings, after rendering.
    pub fn bindings(&mut self) -> QueryResult<&Params> {
        self.finalize().map(|(_, params)| params)
    }

    /// Statement and bindings as one value; `values` is `None` when nothing is bound.
    pub fn build(&mut self) -> QueryResult<BuiltQuery> {
        let (sql, params) = self.finalize()?;
        Ok(BuiltQuery {
            statement: sql.to_string(),
            values: (!params.is_empty()).then(|| params.clone()),
        })
    }

    fn finalize(&mut self) -> QueryResult<(&str, &Params)> {
        if self.rendered.is_none() {
            let sql = self.render()?;
            #[cfg(feature = "tracing")]
            tracing::trace!(
                target: "raveorm.sql",
                kind = ?self.kind,
                param_count = self.params.len(),
                sql = %sql,
                "rendered statement"
            );
            self.rendered = Some(sql);
        }
        let sql = self.rendered.as_deref().unwrap_or_default();
        Ok((sql, &self.params))
    }

    fn render(&self) -> QueryResult<String> {
        let Some(kind) = self.kind else {
            return Err(QueryError::incomplete("empty"));
        };
        let mut sql = String::new();
        match self.table.rules(kind) {
            None => sql.push_str(self.custom.as_deref().unwrap_or_default()),
            Some(rules) => {
                if rules.required.iter().any(|clause| !self.has_clause(*clause)) {
                    return Err(QueryError::incomplete(kind.as_str()));
                }
                for fragment in rules
                    .order
                    .iter()
                    .filter_map(|clause| self.clauses[clause.index()].as_deref())
                {
                    sql.push_str(fragment);
                }
            }
        }
        if let Some(append) = &self.append {
            sql.push_str(append);
        }
        Ok(sql)
    }

    // ==================== Execution ====================

    /// Run the statement and return the number of affected rows.
    pub fn execute<D: Driver + ?Sized>(&mut self, driver: &D) -> OrmResult<u64> {
        let (sql, params) = self.finalize()?;
        driver.execute(sql, params)
    }

    /// Run the statement and return every row.
    pub fn find<D: Driver + ?Sized>(&mut self, driver: &D) -> OrmResult<Vec<Row>> {
        let (sql, params) = self.finalize()?;
        driver.query_many(sql, params)
    }

    /// Run the statement and return the first row, if any.
    pub fn first<D: Driver + ?Sized>(&mut self, driver: &D) -> OrmResult<Option<Row>> {
        let (sql, params) = self.finalize()?;
        driver.query_one(sql, params)
    }

    /// [`Query::find`], mapping every row to `T`.
    pub fn find_as<T: FromRow, D: Driver + ?Sized>(&mut self, driver: &D) -> OrmResult<Vec<T>> {
        self.find(driver)?.iter().map(T::from_row).collect()
    }

    /// [`Query::first`], mapping the row to `T`.
    pub fn first_as<T: FromRow, D: Driver + ?Sized>(
        &mut self,
        driver: &D,
    ) -> OrmResult<Option<T>> {
        self.first(driver)?.as_ref().map(T::from_row).transpose()
    }

    /// Build a SELECT from `options` and return every row.
    ///
    /// The clauses are applied to a copy first; on error the builder is unchanged.
    pub fn find_with<D: Driver + ?Sized>(
        &mut self,
        driver: &D,
        options: FindOptions<'_>,
    ) -> OrmResult<Vec<Row>> {
        let mut staged = self.clone();
        staged.select(options.select)?.from(options.from)?;
        if let Some(filter) = options.filter {
            staged.where_(filter)?;
        }
        if let Some(append) = options.append {
            staged.append_sql(append)?;
        }
        *self = staged;
        self.find(driver)
    }

    // ==================== Internals ====================

    /// Validate that `clause` may be added now.
    fn check_legal(&self, clause: Clause) -> QueryResult<()> {
        let keyword = clause.keyword();
        if self.rendered.is_some() {
            return Err(QueryError::Finalized {
                clause: keyword.to_string(),
            });
        }
        if self.kind == Some(StatementKind::Custom) {
            return Err(QueryError::prerequisite(keyword, "statement is a custom query"));
        }
        if self.has_clause(clause) {
            return Err(QueryError::duplicate(keyword));
        }

        if self.table.kind_established_by(clause).is_some() {
            return match self.kind {
                Some(kind) => Err(QueryError::prerequisite(
                    keyword,
                    format!("statement is already {kind}"),
                )),
                None => Ok(()),
            };
        }

        let Some(kind) = self.kind else {
            return Err(QueryError::prerequisite(keyword, "no statement started"));
        };
        let rules = self
            .table
            .rules(kind)
            .filter(|rules| rules.allows(clause))
            .ok_or_else(|| {
                QueryError::prerequisite(keyword, format!("not allowed in a {kind} statement"))
            })?;
        match rules
            .prerequisites_of(clause)
            .iter()
            .find(|dep| !self.has_clause(**dep))
        {
            Some(missing) => Err(QueryError::prerequisite(
                keyword,
                format!("{missing} is missing"),
            )),
            None => Ok(()),
        }
    }

    /// Record a validated clause; establishing clauses also set the kind.
    fn commit(&mut self, clause: Clause, fragment: String) {
        if let Some(kind) = self.table.kind_established_by(clause) {
            self.kind = Some(kind);
        }
        self.clauses[clause.index()] = Some(fragment);
    }
}
