//! Leaf clauses: the atoms a graph pattern or query is assembled from.
//!
//! Every field is free-form text. Nothing is escaped or quoted, so callers
//! pass exactly what should appear in the output, quote marks included.

use crate::error::{BuildResult, BuilderError};

/// A `PREFIX name: <namespace>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub name: String,
    pub namespace: String,
}

impl Prefix {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

/// A subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// `FILTER (expression)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub expression: String,
}

impl Filter {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

/// `HAVING (expression)`, a filter over grouped results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Having {
    pub expression: String,
}

impl Having {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

/// `BOUND (variable)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundPredicate {
    pub variable: String,
}

impl BoundPredicate {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }
}

/// A value slot: literal text, or an expression that renders itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Literal(String),
    If(Box<ConditionalExpression>),
    Bound(BoundPredicate),
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Expression::Literal(text.to_string())
    }
}

impl From<String> for Expression {
    fn from(text: String) -> Self {
        Expression::Literal(text)
    }
}

impl From<ConditionalExpression> for Expression {
    fn from(expr: ConditionalExpression) -> Self {
        Expression::If(Box::new(expr))
    }
}

impl From<BoundPredicate> for Expression {
    fn from(bound: BoundPredicate) -> Self {
        Expression::Bound(bound)
    }
}

/// `IF (condition, true_value, false_value)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalExpression {
    pub condition: Expression,
    pub true_value: Expression,
    pub false_value: Expression,
}

impl ConditionalExpression {
    pub fn new(
        condition: impl Into<Expression>,
        true_value: impl Into<Expression>,
        false_value: impl Into<Expression>,
    ) -> Self {
        Self {
            condition: condition.into(),
            true_value: true_value.into(),
            false_value: false_value.into(),
        }
    }

    /// Start a conditional whose slots are filled one at a time.
    ///
    /// # Example
    /// ```
    /// use sparqlburger::prelude::*;
    ///
    /// let expr = ConditionalExpression::builder()
    ///     .condition("?age >= 18")
    ///     .then("'adult'")
    ///     .otherwise("'minor'")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(expr.to_sparql(), "IF (?age >= 18, 'adult', 'minor')");
    /// ```
    pub fn builder() -> ConditionalBuilder {
        ConditionalBuilder::default()
    }
}

/// Incremental constructor for [`ConditionalExpression`].
#[derive(Debug, Clone, Default)]
pub struct ConditionalBuilder {
    condition: Option<Expression>,
    true_value: Option<Expression>,
    false_value: Option<Expression>,
}

impl ConditionalBuilder {
    pub fn condition(mut self, condition: impl Into<Expression>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn then(mut self, value: impl Into<Expression>) -> Self {
        self.true_value = Some(value.into());
        self
    }

    pub fn otherwise(mut self, value: impl Into<Expression>) -> Self {
        self.false_value = Some(value.into());
        self
    }

    pub fn build(self) -> BuildResult<ConditionalExpression> {
        Ok(ConditionalExpression {
            condition: self
                .condition
                .ok_or_else(|| BuilderError::missing("IF", "condition"))?,
            true_value: self
                .true_value
                .ok_or_else(|| BuilderError::missing("IF", "true_value"))?,
            false_value: self
                .false_value
                .ok_or_else(|| BuilderError::missing("IF", "false_value"))?,
        })
    }
}

/// `BIND (value AS variable)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub value: Expression,
    pub variable: String,
}

impl Binding {
    pub fn new(value: impl Into<Expression>, variable: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            variable: variable.into(),
        }
    }

    pub fn builder() -> BindingBuilder {
        BindingBuilder::default()
    }
}

/// Incremental constructor for [`Binding`].
#[derive(Debug, Clone, Default)]
pub struct BindingBuilder {
    value: Option<Expression>,
    variable: Option<String>,
}

impl BindingBuilder {
    pub fn value(mut self, value: impl Into<Expression>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    pub fn build(self) -> BuildResult<Binding> {
        Ok(Binding {
            value: self
                .value
                .ok_or_else(|| BuilderError::missing("BIND", "value"))?,
            variable: self
                .variable
                .ok_or_else(|| BuilderError::missing("BIND", "variable"))?,
        })
    }
}

/// `GROUP BY var...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBy {
    pub variables: Vec<String>,
}

impl GroupBy {
    pub fn new<S: Into<String>>(variables: impl IntoIterator<Item = S>) -> Self {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }
}

/// `ORDER BY expr...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub variables: Vec<String>,
}

impl OrderBy {
    pub fn new<S: Into<String>>(variables: impl IntoIterator<Item = S>) -> Self {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }
}

/// `VALUES name {v1 v2 ...}`, an inline set of candidate values for one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Values {
    pub name: String,
    pub values: Vec<String>,
}

impl Values {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}
