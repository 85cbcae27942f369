//! Graph patterns and the arena that owns them.
//!
//! Patterns are stored in a [`PatternArena`] and addressed by [`PatternId`].
//! Nesting is an arena operation so that every attach can be checked against
//! the existing tree before any link is written: a pattern has at most one
//! parent, and no pattern is ever reachable from itself.

use std::fmt;
use std::ops::{Index, IndexMut};

use super::query::SelectQuery;
use super::terms::{Binding, Filter, Triple, Values};
use crate::error::{BuildResult, BuilderError};

/// Handle to a pattern inside a [`PatternArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatternId(usize);

impl PatternId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a pattern relates to the sibling rendered before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatternKind {
    #[default]
    Plain,
    /// `OPTIONAL { ... }`
    Optional,
    /// `UNION` line, then `{ ... }`. Alternates with the preceding sibling.
    Union,
}

/// An entry in a pattern's nested category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nested {
    Pattern(PatternId),
    Select(Box<SelectQuery>),
}

/// A braced block of clauses.
///
/// Each clause category is kept in its own list, so rendering order is
/// values, triples, nested, bindings, filters no matter how appends were
/// interleaved.
#[derive(Debug, Default)]
pub struct GraphPattern {
    kind: PatternKind,
    values: Vec<Values>,
    triples: Vec<Triple>,
    nested: Vec<Nested>,
    bindings: Vec<Binding>,
    filters: Vec<Filter>,
}

impl GraphPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optional() -> Self {
        Self::with_kind(PatternKind::Optional)
    }

    pub fn union() -> Self {
        Self::with_kind(PatternKind::Union)
    }

    pub fn with_kind(kind: PatternKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Build from a pair of flags. Setting both is rejected rather than
    /// guessing at a combined syntax.
    pub fn with_flags(optional: bool, union: bool) -> BuildResult<Self> {
        let kind = match (optional, union) {
            (true, true) => return Err(BuilderError::ConflictingModifiers),
            (true, false) => PatternKind::Optional,
            (false, true) => PatternKind::Union,
            (false, false) => PatternKind::Plain,
        };
        Ok(Self::with_kind(kind))
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.kind == PatternKind::Optional
    }

    pub fn is_union(&self) -> bool {
        self.kind == PatternKind::Union
    }

    pub fn add_triples(&mut self, triples: impl IntoIterator<Item = Triple>) -> &mut Self {
        self.triples.extend(triples);
        self
    }

    pub fn add_triple(&mut self, triple: Triple) -> &mut Self {
        self.triples.push(triple);
        self
    }

    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    pub fn add_binding(&mut self, binding: Binding) -> &mut Self {
        self.bindings.push(binding);
        self
    }

    pub fn add_values(&mut self, values: Values) -> &mut Self {
        self.values.push(values);
        self
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    pub fn nested(&self) -> &[Nested] {
        &self.nested
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn values(&self) -> &[Values] {
        &self.values
    }
}

/// Owner of every pattern in one query tree (or forest).
///
/// Indexing with a [`PatternId`] from a different arena panics, the same way
/// slice indexing does.
#[derive(Debug, Default)]
pub struct PatternArena {
    nodes: Vec<GraphPattern>,
    parents: Vec<Option<PatternId>>,
}

impl PatternArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a pattern into the arena as a new, parentless root.
    pub fn add(&mut self, pattern: GraphPattern) -> PatternId {
        let id = PatternId(self.nodes.len());
        self.nodes.push(pattern);
        self.parents.push(None);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: PatternId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn get(&self, id: PatternId) -> Option<&GraphPattern> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: PatternId) -> Option<&mut GraphPattern> {
        self.nodes.get_mut(id.0)
    }

    /// The pattern `id` is nested in, if any.
    pub fn parent(&self, id: PatternId) -> Option<PatternId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// Nest `child` inside `parent`, after every previously nested entry.
    ///
    /// Fails without touching either pattern if `child` is `parent`, if
    /// `parent` is reachable from `child`, or if `child` already has a parent.
    pub fn nest(&mut self, parent: PatternId, child: PatternId) -> BuildResult<()> {
        self.check_attach(parent, child)?;
        self.parents[child.0] = Some(parent);
        self.nodes[parent.0].nested.push(Nested::Pattern(child));
        tracing::debug!("Nested pattern {} into {}", child, parent);
        Ok(())
    }

    /// Nest a sub-select inside `parent`. Its WHERE pattern, when set, is
    /// checked and claimed exactly like a directly nested pattern.
    pub fn nest_select(&mut self, parent: PatternId, query: SelectQuery) -> BuildResult<()> {
        if !self.contains(parent) {
            return Err(BuilderError::UnknownPattern(parent));
        }
        if let Some(child) = query.where_pattern {
            self.check_attach(parent, child)?;
            self.parents[child.0] = Some(parent);
        }
        self.nodes[parent.0]
            .nested
            .push(Nested::Select(Box::new(query)));
        tracing::debug!("Nested sub-select into {}", parent);
        Ok(())
    }

    fn check_attach(&self, parent: PatternId, child: PatternId) -> BuildResult<()> {
        for id in [parent, child] {
            if !self.contains(id) {
                return Err(BuilderError::UnknownPattern(id));
            }
        }
        if self.is_reachable(child, parent) {
            tracing::warn!("Rejected nesting {} into {}: cycle", child, parent);
            return Err(BuilderError::CyclicNesting { parent, child });
        }
        if let Some(owner) = self.parent(child) {
            tracing::warn!("Rejected nesting {} into {}: owned by {}", child, parent, owner);
            return Err(BuilderError::AlreadyNested {
                child,
                parent: owner,
            });
        }
        Ok(())
    }

    /// Whether `target` is `from` or one of its descendants, following both
    /// nested patterns and the WHERE patterns of nested sub-selects.
    pub fn is_reachable(&self, from: PatternId, target: PatternId) -> bool {
        if !self.contains(from) {
            return false;
        }
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if std::mem::replace(&mut visited[id.0], true) {
                continue;
            }
            stack.extend(self.children(id));
        }
        false
    }

    /// Direct child patterns of `id`, in insertion order.
    pub fn children(&self, id: PatternId) -> impl Iterator<Item = PatternId> + '_ {
        self.nodes[id.0].nested.iter().filter_map(|entry| match entry {
            Nested::Pattern(child) => Some(*child),
            Nested::Select(query) => query.where_pattern,
        })
    }
}

impl Index<PatternId> for PatternArena {
    type Output = GraphPattern;

    fn index(&self, id: PatternId) -> &GraphPattern {
        &self.nodes[id.0]
    }
}

impl IndexMut<PatternId> for PatternArena {
    fn index_mut(&mut self, id: PatternId) -> &mut GraphPattern {
        &mut self.nodes[id.0]
    }
}
