//! Declarative query recipes.
//!
//! A recipe describes one SELECT or UPDATE query as TOML or JSON. Building it
//! produces a fresh [`PatternArena`] plus the query that points into it, so a
//! recipe that fails halfway leaves nothing behind.
//!
//! ```toml
//! distinct = true
//! variables = ["?person", "?age"]
//!
//! [[prefix]]
//! name = "ex"
//! namespace = "http://www.example.com#"
//!
//! [where]
//! triples = ["?person rdf:type ex:Person", ["?person", "ex:hasAge", "?age"]]
//!
//! [[where.patterns]]
//! optional = true
//! triples = ["?person ex:hasName ?name"]
//!
//! [[where.bindings]]
//! variable = "?status"
//! value = { if = "?age >= 18", then = "'adult'", else = "'minor'" }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::ast::*;
use crate::config::PrefixSpec;
use crate::error::{BuildResult, BuilderError};
use crate::parser::parse_triple;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    #[default]
    Select,
    Update,
}

impl std::fmt::Display for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Form::Select => write!(f, "select"),
            Form::Update => write!(f, "update"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    #[serde(default)]
    pub form: Form,
    #[serde(default)]
    pub distinct: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    #[serde(default)]
    pub popular_prefixes: bool,
    #[serde(default, rename = "prefix")]
    pub prefixes: Vec<PrefixSpec>,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub group_by: Vec<Vec<String>>,
    #[serde(default)]
    pub having: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<Vec<String>>,
    #[serde(rename = "where")]
    pub where_pattern: Option<PatternSpec>,
    pub delete: Option<PatternSpec>,
    pub insert: Option<PatternSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternSpec {
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub union: bool,
    #[serde(default)]
    pub values: Vec<ValuesSpec>,
    #[serde(default)]
    pub triples: Vec<TripleSpec>,
    /// Nested patterns, emitted before `subqueries`.
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,
    #[serde(default)]
    pub subqueries: Vec<Recipe>,
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
    #[serde(default)]
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValuesSpec {
    pub name: String,
    pub values: Vec<String>,
}

/// `"?s ?p ?o"` or `["?s", "?p", "?o"]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TripleSpec {
    Line(String),
    Terms([String; 3]),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingSpec {
    pub value: Option<ExpressionSpec>,
    pub variable: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpressionSpec {
    Literal(String),
    Bound(BoundSpec),
    If(IfSpec),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundSpec {
    pub bound: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IfSpec {
    #[serde(rename = "if")]
    pub condition: Option<Box<ExpressionSpec>>,
    pub then: Option<Box<ExpressionSpec>>,
    #[serde(rename = "else")]
    pub otherwise: Option<Box<ExpressionSpec>>,
}

/// A built recipe: the patterns and the query that references them.
#[derive(Debug)]
pub struct BuiltQuery {
    pub patterns: PatternArena,
    pub query: Query,
}

impl BuiltQuery {
    pub fn render(&self) -> String {
        self.query.render(&self.patterns)
    }
}

impl Recipe {
    pub fn from_toml_str(content: &str) -> BuildResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> BuildResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a recipe file. `.json` files are JSON, everything else TOML.
    pub fn load(path: impl AsRef<Path>) -> BuildResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn build(&self) -> BuildResult<BuiltQuery> {
        self.build_with_prefixes(&[])
    }

    /// Build with `base` prefixes emitted ahead of the recipe's own.
    pub fn build_with_prefixes(&self, base: &[Prefix]) -> BuildResult<BuiltQuery> {
        self.check_form()?;
        let mut patterns = PatternArena::new();

        let mut prefixes = base.to_vec();
        if self.popular_prefixes {
            prefixes.extend(popular_prefixes());
        }
        prefixes.extend(self.prefixes.iter().map(Prefix::from));

        let query = match self.form {
            Form::Select => {
                let mut query = self.build_select(&mut patterns)?;
                query.prefixes = prefixes;
                Query::Select(query)
            }
            Form::Update => {
                let mut query = UpdateQuery::new();
                query.prefixes = prefixes;
                if let Some(spec) = &self.delete {
                    query.set_delete_pattern(spec.build(&mut patterns)?);
                }
                if let Some(spec) = &self.insert {
                    query.set_insert_pattern(spec.build(&mut patterns)?);
                }
                if let Some(spec) = &self.where_pattern {
                    query.set_where_pattern(spec.build(&mut patterns)?);
                }
                Query::Update(query)
            }
        };

        tracing::debug!("Built {} query with {} patterns", self.form, patterns.len());
        Ok(BuiltQuery { patterns, query })
    }

    /// Everything except prefixes, which only the outermost query carries.
    fn build_select(&self, patterns: &mut PatternArena) -> BuildResult<SelectQuery> {
        let mut query = SelectQuery::new().with_distinct(self.distinct);
        query.limit = self.limit;
        query.offset = self.offset;
        query.add_variables(&self.variables);
        if let Some(spec) = &self.where_pattern {
            query.set_where_pattern(spec.build(patterns)?);
        }
        for group in &self.group_by {
            query.add_group_by(GroupBy::new(group));
        }
        for having in &self.having {
            query.add_having(Having::new(having));
        }
        for order in &self.order_by {
            query.add_order_by(OrderBy::new(order));
        }
        Ok(query)
    }

    fn check_form(&self) -> BuildResult<()> {
        let misplaced: Vec<(&str, bool)> = match self.form {
            Form::Select => vec![
                ("delete", self.delete.is_some()),
                ("insert", self.insert.is_some()),
            ],
            Form::Update => vec![
                ("distinct", self.distinct),
                ("limit", self.limit.is_some()),
                ("offset", self.offset.is_some()),
                ("variables", !self.variables.is_empty()),
                ("group_by", !self.group_by.is_empty()),
                ("having", !self.having.is_empty()),
                ("order_by", !self.order_by.is_empty()),
            ],
        };
        match misplaced.iter().find(|(_, present)| *present) {
            Some((field, _)) => Err(BuilderError::Config(format!(
                "'{}' is not valid for form '{}'",
                field, self.form
            ))),
            None => Ok(()),
        }
    }
}

impl PatternSpec {
    fn build(&self, patterns: &mut PatternArena) -> BuildResult<PatternId> {
        let mut pattern = GraphPattern::with_flags(self.optional, self.union)?;
        for values in &self.values {
            pattern.add_values(Values::new(&values.name, &values.values));
        }
        for triple in &self.triples {
            pattern.add_triple(triple.to_triple()?);
        }
        for binding in &self.bindings {
            pattern.add_binding(binding.to_binding()?);
        }
        for filter in &self.filters {
            pattern.add_filter(Filter::new(filter));
        }

        let id = patterns.add(pattern);
        for child in &self.patterns {
            let child = child.build(patterns)?;
            patterns.nest(id, child)?;
        }
        for sub in &self.subqueries {
            if sub.form != Form::Select {
                return Err(BuilderError::Config(
                    "subqueries must be select recipes".to_string(),
                ));
            }
            sub.check_form()?;
            // Only the outermost query emits a prologue.
            let misplaced = [
                ("prefix", !sub.prefixes.is_empty()),
                ("popular_prefixes", sub.popular_prefixes),
            ];
            if let Some((field, _)) = misplaced.iter().find(|(_, present)| *present) {
                return Err(BuilderError::Config(format!(
                    "'{}' is not valid for a subquery",
                    field
                )));
            }
            let query = sub.build_select(patterns)?;
            patterns.nest_select(id, query)?;
        }
        Ok(id)
    }
}

impl TripleSpec {
    fn to_triple(&self) -> BuildResult<Triple> {
        match self {
            TripleSpec::Line(line) => parse_triple(line),
            TripleSpec::Terms([subject, predicate, object]) => {
                Ok(Triple::new(subject, predicate, object))
            }
        }
    }
}

impl BindingSpec {
    fn to_binding(&self) -> BuildResult<Binding> {
        let mut builder = Binding::builder();
        if let Some(value) = &self.value {
            builder = builder.value(value.to_expression()?);
        }
        if let Some(variable) = &self.variable {
            builder = builder.variable(variable);
        }
        builder.build()
    }
}

impl ExpressionSpec {
    fn to_expression(&self) -> BuildResult<Expression> {
        match self {
            ExpressionSpec::Literal(text) => Ok(Expression::from(text.as_str())),
            ExpressionSpec::Bound(spec) => Ok(BoundPredicate::new(&spec.bound).into()),
            ExpressionSpec::If(spec) => {
                let mut builder = ConditionalExpression::builder();
                if let Some(condition) = &spec.condition {
                    builder = builder.condition(condition.to_expression()?);
                }
                if let Some(value) = &spec.then {
                    builder = builder.then(value.to_expression()?);
                }
                if let Some(value) = &spec.otherwise {
                    builder = builder.otherwise(value.to_expression()?);
                }
                Ok(builder.build()?.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_recipe() {
        let recipe = Recipe::from_toml_str(
            r#"
            distinct = true
            limit = 5
            variables = ["?person", "?status"]
            order_by = [["?person"]]

            [where]
            triples = ["?person rdf:type ex:Person", ["?person", "ex:hasAge", "?age"]]
            filters = ["?age < 65"]

            [[where.patterns]]
            optional = true
            triples = ["?person ex:hasName 'John Smith'@en ."]

            [[where.bindings]]
            variable = "?status"
            value = { if = { bound = "?age" }, then = "'known'", else = "'unknown'" }
            "#,
        )
        .unwrap();

        let built = recipe.build().unwrap();
        assert_eq!(
            built.render(),
            concat!(
                "SELECT DISTINCT ?person ?status\n",
                "WHERE {\n",
                "   ?person rdf:type ex:Person . \n",
                "   ?person ex:hasAge ?age . \n",
                "   OPTIONAL {\n",
                "      ?person ex:hasName 'John Smith'@en . \n",
                "   }\n",
                "   BIND (IF (BOUND (?age), 'known', 'unknown') AS ?status)\n",
                "   FILTER (?age < 65)\n",
                "}\n",
                "ORDER BY ?person\n",
                "LIMIT 5",
            )
        );
    }

    #[test]
    fn test_json_update_recipe() {
        let recipe = Recipe::from_json_str(
            r#"{
                "form": "update",
                "prefix": [{ "name": "ex", "namespace": "http://www.example.com#" }],
                "delete": { "triples": ["?person ex:hasAge ?age"] },
                "insert": { "triples": [["?person", "ex:hasAge", "32"]] }
            }"#,
        )
        .unwrap();

        let built = recipe.build().unwrap();
        assert_eq!(
            built.render(),
            concat!(
                "PREFIX ex: <http://www.example.com#>\n",
                "\n",
                "DELETE {\n",
                "   ?person ex:hasAge ?age . \n",
                "}\n",
                "INSERT {\n",
                "   ?person ex:hasAge 32 . \n",
                "}",
            )
        );
    }

    #[test]
    fn test_base_prefixes_come_first() {
        let recipe = Recipe::from_toml_str(
            r#"
            popular_prefixes = true

            [[prefix]]
            name = "ex"
            namespace = "http://www.example.com#"
            "#,
        )
        .unwrap();

        let built = recipe
            .build_with_prefixes(&[Prefix::new("base", "http://base.example#")])
            .unwrap();
        let Query::Select(query) = built.query else {
            panic!("expected a select query");
        };
        let names: Vec<&str> = query.prefixes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["base", "rdf", "rdfs", "xml", "owl", "prov", "foaf", "ex"]
        );
    }

    #[test]
    fn test_missing_else_branch() {
        let recipe = Recipe::from_toml_str(
            r#"
            [[where.bindings]]
            variable = "?status"
            value = { if = "?age >= 18", then = "'adult'" }
            "#,
        )
        .unwrap();

        let err = recipe.build().unwrap_err();
        assert!(matches!(
            err,
            BuilderError::MissingArgument {
                argument: "false_value",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_binding_variable() {
        let recipe = Recipe::from_toml_str(
            r#"
            [[where.bindings]]
            value = "?age"
            "#,
        )
        .unwrap();

        assert!(matches!(
            recipe.build().unwrap_err(),
            BuilderError::MissingArgument {
                clause: "BIND",
                argument: "variable"
            }
        ));
    }

    #[test]
    fn test_optional_union_conflict() {
        let recipe = Recipe::from_toml_str(
            r#"
            [[where.patterns]]
            optional = true
            union = true
            "#,
        )
        .unwrap();

        assert!(matches!(
            recipe.build().unwrap_err(),
            BuilderError::ConflictingModifiers
        ));
    }

    #[test]
    fn test_form_mismatch() {
        let recipe = Recipe::from_toml_str(
            r#"
            form = "update"
            limit = 10
            "#,
        )
        .unwrap();

        let err = recipe.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: 'limit' is not valid for form 'update'"
        );
    }

    #[test]
    fn test_subquery_recipe() {
        let recipe = Recipe::from_toml_str(
            r#"
            variables = ["?person"]

            [where]
            triples = ["?person ex:knows ?friend"]

            [[where.subqueries]]
            variables = ["?friend"]
            limit = 1

            [where.subqueries.where]
            triples = ["?friend rdf:type ex:Person"]
            "#,
        )
        .unwrap();

        let built = recipe.build().unwrap();
        assert_eq!(built.patterns.len(), 2);
        assert!(built.render().contains("      SELECT ?friend\n"));
    }

    #[test]
    fn test_subquery_prefixes_rejected() {
        let recipe = Recipe::from_toml_str(
            r#"
            [where]
            triples = ["?a ?b ?c"]

            [[where.subqueries]]
            popular_prefixes = true

            [[where.subqueries.prefix]]
            name = "ex"
            namespace = "http://www.example.com#"
            "#,
        )
        .unwrap();

        let err = recipe.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: 'prefix' is not valid for a subquery"
        );

        let recipe = Recipe::from_toml_str(
            r#"
            [[where.subqueries]]
            popular_prefixes = true
            "#,
        )
        .unwrap();

        assert!(matches!(
            recipe.build().unwrap_err(),
            BuilderError::Config(message) if message.contains("'popular_prefixes'")
        ));
    }
}
