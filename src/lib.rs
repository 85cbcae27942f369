//! # sparqlburger
//!
//! Build SPARQL graph patterns and queries as trees, then render them as
//! readable, consistently indented text.
//!
//! ## Quick Example
//!
//! ```
//! use sparqlburger::prelude::*;
//!
//! let mut patterns = PatternArena::new();
//! let person = patterns.add(GraphPattern::new());
//! patterns[person].add_triples([
//!     Triple::new("?person", "rdf:type", "ex:Person"),
//!     Triple::new("?person", "ex:hasName", "?name"),
//! ]);
//!
//! let age = patterns.add(GraphPattern::optional());
//! patterns[age].add_triple(Triple::new("?person", "ex:hasAge", "?age"));
//! patterns.nest(person, age).unwrap();
//!
//! let mut query = SelectQuery::new().with_distinct(true).with_limit(10);
//! query
//!     .add_prefix(Prefix::new("ex", "http://www.example.com#"))
//!     .add_variables(["?name", "?age"])
//!     .set_where_pattern(person);
//!
//! let text = query.render(&patterns);
//! assert!(text.starts_with("PREFIX ex: <http://www.example.com#>\n\nSELECT DISTINCT ?name ?age\n"));
//! assert!(text.contains("   OPTIONAL {\n      ?person ex:hasAge ?age . \n   }\n"));
//! assert!(text.ends_with("}\nLIMIT 10"));
//! ```
//!
//! ## Output Layout
//!
//! | Clause            | Rendered as                       |
//! |-------------------|-----------------------------------|
//! | `Triple`          | `s p o . `                        |
//! | `Filter`          | `FILTER (expr)`                   |
//! | `Binding`         | `BIND (value AS ?var)`            |
//! | `ConditionalExpression` | `IF (cond, then, else)`     |
//! | `BoundPredicate`  | `BOUND (?var)`                    |
//! | `Values`          | `VALUES ?var {<iri> ...}`         |
//!
//! Inside a pattern, clauses are emitted by category: values, triples, nested
//! patterns, bindings, filters. Each nesting level indents three spaces.

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod recipe;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::error::*;
    pub use crate::parser::parse_triple;
    pub use crate::recipe::{BuiltQuery, Recipe};
    pub use crate::transpiler::ToSparql;
}

/// Load a recipe file and build it.
///
/// # Example
///
/// ```rust,ignore
/// let built = sparqlburger::load("people.toml")?;
/// println!("{}", built.render());
/// ```
pub fn load(
    path: impl AsRef<std::path::Path>,
) -> Result<recipe::BuiltQuery, error::BuilderError> {
    recipe::Recipe::load(path)?.build()
}
