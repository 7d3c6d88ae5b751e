//! Statement kinds, clause names, and the clause dependency table.

use std::fmt;

/// Kind of statement being built. Set once by the first clause-initiating call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Raw SQL given to `set_query`.
    Custom,
    Insert,
    Select,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Custom => "CUSTOM",
            StatementKind::Insert => "INSERT",
            StatementKind::Select => "SELECT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, renderable fragment of a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Clause {
    InsertInto,
    InsertIntoValues,
    Select,
    From,
    Update,
    UpdateSet,
    Delete,
    Where,
}

impl Clause {
    pub(crate) const COUNT: usize = 8;

    pub(crate) fn index(self) -> usize {
        match self {
            Clause::InsertInto => 0,
            Clause::InsertIntoValues => 1,
            Clause::Select => 2,
            Clause::From => 3,
            Clause::Update => 4,
            Clause::UpdateSet => 5,
            Clause::Delete => 6,
            Clause::Where => 7,
        }
    }

    /// Clause name as used in the dependency table.
    pub fn name(self) -> &'static str {
        match self {
            Clause::InsertInto => "insert_into",
            Clause::InsertIntoValues => "insert_into_values",
            Clause::Select => "select",
            Clause::From => "from",
            Clause::Update => "update",
            Clause::UpdateSet => "update_set",
            Clause::Delete => "delete",
            Clause::Where => "where",
        }
    }

    /// SQL wording used in error messages.
    pub fn keyword(self) -> &'static str {
        match self {
            Clause::InsertInto => "INSERT INTO",
            Clause::InsertIntoValues => "(...) VALUES (...)",
            Clause::Select => "SELECT",
            Clause::From => "FROM",
            Clause::Update => "UPDATE",
            Clause::UpdateSet => "SET",
            Clause::Delete => "DELETE",
            Clause::Where => "WHERE",
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Clause rules for one statement kind.
#[derive(Debug)]
pub struct KindRules {
    /// The clause that establishes this kind.
    pub establishing: Clause,
    /// Render order; also the full set of clauses legal for this kind.
    pub order: &'static [Clause],
    /// Clauses that must be present to render.
    pub required: &'static [Clause],
    /// `(clause, prerequisites)` for every kind-dependent clause.
    pub prerequisites: &'static [(Clause, &'static [Clause])],
}

impl KindRules {
    /// Whether `clause` can appear in a statement of this kind.
    pub fn allows(&self, clause: Clause) -> bool {
        self.order.contains(&clause)
    }

    /// Clauses that must be present before `clause` may be added.
    pub fn prerequisites_of(&self, clause: Clause) -> &'static [Clause] {
        match self.prerequisites.iter().find(|(c, _)| *c == clause) {
            Some((_, deps)) => *deps,
            None => &[],
        }
    }
}

/// Immutable per-kind clause dependency table.
#[derive(Debug)]
pub struct ClauseTable {
    pub insert: KindRules,
    pub select: KindRules,
    pub update: KindRules,
    pub delete: KindRules,
}

impl ClauseTable {
    /// Rules for the four structured statement kinds.
    pub const STANDARD: ClauseTable = ClauseTable {
        insert: KindRules {
            establishing: Clause::InsertInto,
            order: &[Clause::InsertInto, Clause::InsertIntoValues],
            required: &[Clause::InsertInto, Clause::InsertIntoValues],
            prerequisites: &[(Clause::InsertIntoValues, &[Clause::InsertInto])],
        },
        select: KindRules {
            establishing: Clause::Select,
            order: &[Clause::Select, Clause::From, Clause::Where],
            required: &[Clause::Select, Clause::From],
            prerequisites: &[
                (Clause::From, &[Clause::Select]),
                (Clause::Where, &[Clause::Select, Clause::From]),
            ],
        },
        update: KindRules {
            establishing: Clause::Update,
            order: &[Clause::Update, Clause::UpdateSet, Clause::Where],
            required: &[Clause::Update, Clause::UpdateSet, Clause::Where],
            prerequisites: &[
                (Clause::UpdateSet, &[Clause::Update]),
                (Clause::Where, &[Clause::Update, Clause::UpdateSet]),
            ],
        },
        delete: KindRules {
            establishing: Clause::Delete,
            order: &[Clause::Delete, Clause::From, Clause::Where],
            required: &[Clause::Delete, Clause::From, Clause::Where],
            prerequisites: &[
                (Clause::From, &[Clause::Delete]),
                (Clause::Where, &[Clause::Delete, Clause::From]),
            ],
        },
    };

    /// Rules for `kind`; `None` for custom statements, which have no clauses.
    pub fn rules(&self, kind: StatementKind) -> Option<&KindRules> {
        match kind {
            StatementKind::Custom => None,
            StatementKind::Insert => Some(&self.insert),
            StatementKind::Select => Some(&self.select),
            StatementKind::Update => Some(&self.update),
            StatementKind::Delete => Some(&self.delete),
        }
    }

    /// The kind `clause` establishes, if it is kind-establishing.
    pub fn kind_established_by(&self, clause: Clause) -> Option<StatementKind> {
        [
            StatementKind::Insert,
            StatementKind::Select,
            StatementKind::Update,
            StatementKind::Delete,
        ]
        .into_iter()
        .find(|kind| {
            self.rules(*kind)
                .is_some_and(|rules| rules.establishing == clause)
        })
    }
}
