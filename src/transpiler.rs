//! SPARQL text generation for the query tree.
//!
//! Leaf clauses render through [`ToSparql`]. Patterns and queries need the
//! arena their handles point into, so they render through inherent
//! `render` methods instead.

use crate::ast::*;

/// One level of indentation.
pub const INDENT: &str = "   ";

/// Trait for converting leaf clauses to SPARQL text.
pub trait ToSparql {
    /// Convert this clause to a SPARQL fragment.
    fn to_sparql(&self) -> String;
}

fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

/// Wrap bare `http...` IRIs in angle brackets. Anything else is left as is.
pub fn in_brackets(uri: &str) -> String {
    if uri.starts_with("http") {
        format!("<{}>", uri)
    } else {
        uri.to_string()
    }
}

impl ToSparql for Prefix {
    fn to_sparql(&self) -> String {
        format!("PREFIX {}: <{}>", self.name, self.namespace)
    }
}

impl ToSparql for Triple {
    fn to_sparql(&self) -> String {
        format!("{} {} {} . ", self.subject, self.predicate, self.object)
    }
}

impl ToSparql for Filter {
    fn to_sparql(&self) -> String {
        format!("FILTER ({})", self.expression)
    }
}

impl ToSparql for Having {
    fn to_sparql(&self) -> String {
        format!("HAVING ({})", self.expression)
    }
}

impl ToSparql for BoundPredicate {
    fn to_sparql(&self) -> String {
        format!("BOUND ({})", self.variable)
    }
}

impl ToSparql for Expression {
    fn to_sparql(&self) -> String {
        match self {
            Expression::Literal(text) => text.clone(),
            Expression::If(expr) => expr.to_sparql(),
            Expression::Bound(bound) => bound.to_sparql(),
        }
    }
}

impl ToSparql for ConditionalExpression {
    fn to_sparql(&self) -> String {
        format!(
            "IF ({}, {}, {})",
            self.condition.to_sparql(),
            self.true_value.to_sparql(),
            self.false_value.to_sparql()
        )
    }
}

impl ToSparql for Binding {
    fn to_sparql(&self) -> String {
        format!("BIND ({} AS {})", self.value.to_sparql(), self.variable)
    }
}

impl ToSparql for GroupBy {
    fn to_sparql(&self) -> String {
        format!("GROUP BY {}", self.variables.join(" "))
    }
}

impl ToSparql for OrderBy {
    fn to_sparql(&self) -> String {
        format!("ORDER BY {}", self.variables.join(" "))
    }
}

impl ToSparql for Values {
    fn to_sparql(&self) -> String {
        let values: Vec<String> = self.values.iter().map(|v| in_brackets(v)).collect();
        format!("VALUES {} {{{}}}", self.name, values.join(" "))
    }
}

/// Where a pattern's opening brace goes.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Opener {
    /// Own line(s), indented, with OPTIONAL/UNION applied.
    Nested,
    /// Directly after a keyword such as `WHERE `, plain brace.
    Inline,
}

impl PatternArena {
    /// Render a pattern as a braced block ending in a newline.
    ///
    /// Body lines are indented `depth + 1` levels and the closing brace
    /// `depth` levels. At depth 0 the opening line is always a bare `{`;
    /// deeper, OPTIONAL and UNION modifiers are applied.
    ///
    /// # Panics
    ///
    /// If `id` was not issued by this arena.
    pub fn render(&self, id: PatternId, depth: usize) -> String {
        let mut sparql = String::new();
        let opener = if depth == 0 {
            Opener::Inline
        } else {
            Opener::Nested
        };
        self.write_pattern(&mut sparql, id, depth, opener);
        sparql
    }

    fn write_pattern(&self, sparql: &mut String, id: PatternId, depth: usize, opener: Opener) {
        tracing::trace!("Rendering pattern {} at depth {}", id, depth);
        let pattern = &self[id];
        let outer = indent(depth);
        let inner = indent(depth + 1);

        if opener == Opener::Nested {
            sparql.push_str(&outer);
            match pattern.kind() {
                PatternKind::Optional => sparql.push_str("OPTIONAL "),
                PatternKind::Union => {
                    sparql.push_str("UNION\n");
                    sparql.push_str(&outer);
                }
                PatternKind::Plain => {}
            }
        }
        sparql.push_str("{\n");

        for values in pattern.values() {
            sparql.push_str(&format!("{}{}\n", inner, values.to_sparql()));
        }

        for triple in pattern.triples() {
            sparql.push_str(&format!("{}{}\n", inner, triple.to_sparql()));
        }

        for entry in pattern.nested() {
            match entry {
                Nested::Pattern(child) => {
                    self.write_pattern(sparql, *child, depth + 1, Opener::Nested)
                }
                Nested::Select(query) => {
                    sparql.push_str(&format!("{}{{\n", inner));
                    sparql.push_str(&self.select_text(query, depth + 2, false));
                    sparql.push_str(&format!("\n{}}}\n", inner));
                }
            }
        }

        for binding in pattern.bindings() {
            sparql.push_str(&format!("{}{}\n", inner, binding.to_sparql()));
        }

        for filter in pattern.filters() {
            sparql.push_str(&format!("{}{}\n", inner, filter.to_sparql()));
        }

        sparql.push_str(&outer);
        sparql.push_str("}\n");
    }

    /// `KEYWORD {...}` with the block's trailing newline dropped.
    fn section(&self, keyword: &str, id: PatternId, depth: usize) -> String {
        let mut sparql = format!("{}{} ", indent(depth), keyword);
        self.write_pattern(&mut sparql, id, depth, Opener::Inline);
        sparql.truncate(sparql.trim_end_matches('\n').len());
        sparql
    }

    fn select_text(&self, query: &SelectQuery, depth: usize, with_prefixes: bool) -> String {
        let pad = indent(depth);
        let mut lines: Vec<String> = Vec::new();

        let mut select = format!("{}SELECT ", pad);
        if query.distinct {
            select.push_str("DISTINCT ");
        }
        if query.variables.is_empty() {
            select.push('*');
        } else {
            select.push_str(&query.variables.join(" "));
        }
        lines.push(select);

        if let Some(id) = query.where_pattern {
            lines.push(self.section("WHERE", id, depth));
        }

        for group in &query.group_by {
            lines.push(format!("{}{}", pad, group.to_sparql()));
        }

        for having in &query.having {
            lines.push(format!("{}{}", pad, having.to_sparql()));
        }

        for order in &query.order_by {
            lines.push(format!("{}{}", pad, order.to_sparql()));
        }

        if let Some(n) = query.limit {
            lines.push(format!("{}LIMIT {}", pad, n));
        }

        if let Some(n) = query.offset {
            lines.push(format!("{}OFFSET {}", pad, n));
        }

        let prefixes: &[Prefix] = if with_prefixes { &query.prefixes } else { &[] };
        with_prologue(prefixes, &lines)
    }
}

/// Prefix lines, one blank line, then the body. The blank line only appears
/// when there is something on both sides of it.
fn with_prologue(prefixes: &[Prefix], body: &[String]) -> String {
    let prologue: Vec<String> = prefixes.iter().map(|p| p.to_sparql()).collect();
    let mut sparql = prologue.join("\n");
    if !prologue.is_empty() && !body.is_empty() {
        sparql.push_str("\n\n");
    }
    sparql.push_str(&body.join("\n"));
    sparql
}

impl SelectQuery {
    /// Generate the query text. Handles must come from `patterns`.
    pub fn render(&self, patterns: &PatternArena) -> String {
        patterns.select_text(self, 0, true)
    }
}

impl UpdateQuery {
    /// Generate the query text. Handles must come from `patterns`.
    pub fn render(&self, patterns: &PatternArena) -> String {
        let sections = [
            ("DELETE", self.delete_pattern),
            ("INSERT", self.insert_pattern),
            ("WHERE", self.where_pattern),
        ];
        let body: Vec<String> = sections
            .into_iter()
            .filter_map(|(keyword, slot)| slot.map(|id| patterns.section(keyword, id, 0)))
            .collect();
        with_prologue(&self.prefixes, &body)
    }
}

impl Query {
    pub fn render(&self, patterns: &PatternArena) -> String {
        match self {
            Query::Select(query) => query.render(patterns),
            Query::Update(query) => query.render(patterns),
        }
    }
}
