//! Query tree data model.

pub mod pattern;
pub mod query;
pub mod terms;

pub use pattern::{GraphPattern, Nested, PatternArena, PatternId, PatternKind};
pub use query::{POPULAR_PREFIXES, Query, SelectQuery, UpdateQuery, popular_prefixes};
pub use terms::{
    Binding, BindingBuilder, BoundPredicate, ConditionalBuilder, ConditionalExpression,
    Expression, Filter, GroupBy, Having, OrderBy, Prefix, Triple, Values,
};
