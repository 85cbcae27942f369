//! Top-level query forms: SELECT and UPDATE.
//!
//! Queries hold pattern handles, not patterns. Render them against the
//! [`PatternArena`](super::PatternArena) the handles came from.

use super::pattern::PatternId;
use super::terms::{GroupBy, Having, OrderBy, Prefix};

/// Namespaces added by `with_popular_prefixes`, in emission order.
pub const POPULAR_PREFIXES: &[(&str, &str)] = &[
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("xml", "http://www.w3.org/2001/XMLSchema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("prov", "http://www.w3.org/ns/prov#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
];

/// [`POPULAR_PREFIXES`] as prefix clauses.
pub fn popular_prefixes() -> impl Iterator<Item = Prefix> {
    POPULAR_PREFIXES
        .iter()
        .map(|(name, namespace)| Prefix::new(*name, *namespace))
}

/// A SELECT query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    pub distinct: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub prefixes: Vec<Prefix>,
    /// Projected variables. Empty means `SELECT *`.
    pub variables: Vec<String>,
    pub where_pattern: Option<PatternId>,
    pub group_by: Vec<GroupBy>,
    pub having: Vec<Having>,
    pub order_by: Vec<OrderBy>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_popular_prefixes(mut self) -> Self {
        self.prefixes.extend(popular_prefixes());
        self
    }

    /// Append a prefix. Duplicates are kept; both lines are emitted.
    pub fn add_prefix(&mut self, prefix: Prefix) -> &mut Self {
        self.prefixes.push(prefix);
        self
    }

    pub fn add_variables<S: Into<String>>(
        &mut self,
        variables: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.variables.extend(variables.into_iter().map(Into::into));
        self
    }

    /// Point the WHERE section at `pattern`.
    ///
    /// The slot only references the pattern; it does not claim it. The same
    /// handle may also be nested in a pattern or fill another query's slot.
    /// Use [`PatternArena::nest_select`](super::PatternArena::nest_select) for
    /// a sub-select whose WHERE pattern must be owned and cycle-checked.
    pub fn set_where_pattern(&mut self, pattern: PatternId) -> &mut Self {
        self.where_pattern = Some(pattern);
        self
    }

    pub fn add_group_by(&mut self, group: GroupBy) -> &mut Self {
        self.group_by.push(group);
        self
    }

    pub fn add_having(&mut self, having: Having) -> &mut Self {
        self.having.push(having);
        self
    }

    pub fn add_order_by(&mut self, order: OrderBy) -> &mut Self {
        self.order_by.push(order);
        self
    }
}

/// A DELETE/INSERT/WHERE update. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateQuery {
    pub prefixes: Vec<Prefix>,
    pub delete_pattern: Option<PatternId>,
    pub insert_pattern: Option<PatternId>,
    pub where_pattern: Option<PatternId>,
}

impl UpdateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_popular_prefixes(mut self) -> Self {
        self.prefixes.extend(popular_prefixes());
        self
    }

    pub fn add_prefix(&mut self, prefix: Prefix) -> &mut Self {
        self.prefixes.push(prefix);
        self
    }

    /// Slots reference patterns without claiming them, as in
    /// [`SelectQuery::set_where_pattern`].
    pub fn set_delete_pattern(&mut self, pattern: PatternId) -> &mut Self {
        self.delete_pattern = Some(pattern);
        self
    }

    pub fn set_insert_pattern(&mut self, pattern: PatternId) -> &mut Self {
        self.insert_pattern = Some(pattern);
        self
    }

    pub fn set_where_pattern(&mut self, pattern: PatternId) -> &mut Self {
        self.where_pattern = Some(pattern);
        self
    }
}

/// Either query form, as produced from a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Select(SelectQuery),
    Update(UpdateQuery),
}
