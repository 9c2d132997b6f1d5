//! UniProtKB query builder
//!
//! Predicates are validated against the field registry and rendered with a
//! small dispatch on the field's [`FieldType`]. Every binary operator is
//! parenthesised, left to right, so the rendered string never depends on
//! the service's operator precedence:
//!
//! ```text
//! reviewed AND human OR mouse  ->  ((reviewed:true AND organism_id:9606) OR organism_id:10090)
//! ```
//!
//! Two front ends share the renderer: [`QueryBuilder::build`] takes a flat
//! list of predicates and operators, and [`Query`] composes expressions
//! with `&`, `|` and `!`.

use crate::error::{MapperError, Result};
use crate::fields::{FieldDescriptor, FieldRegistry, FieldType};
use chrono::NaiveDate;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    Range,
    /// Prefix match; `*` is appended when missing
    Wildcard,
    /// Quoted phrase match
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateValue {
    Single(String),
    /// Inclusive bounds; `*` leaves a side open
    Range(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field_name: String,
    pub operator: Operator,
    pub value: PredicateValue,
}

impl Predicate {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::single(field, Operator::Equals, value)
    }

    pub fn exact(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::single(field, Operator::Exact, value)
    }

    pub fn wildcard(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::single(field, Operator::Wildcard, value)
    }

    pub fn range(field: impl Into<String>, low: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            field_name: field.into(),
            operator: Operator::Range,
            value: PredicateValue::Range(low.into(), high.into()),
        }
    }

    fn single(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field_name: field.into(),
            operator,
            value: PredicateValue::Single(value.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    /// Binary "and not": `a NOT b`
    Not,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Not => "NOT",
        })
    }
}

/// Renders predicates into the UniProt query language
pub struct QueryBuilder<'r> {
    registry: &'r dyn FieldRegistry,
}

impl<'r> QueryBuilder<'r> {
    pub fn new(registry: &'r dyn FieldRegistry) -> Self {
        Self { registry }
    }

    /// Combine `predicates` with `logical_ops`, grouping left to right
    ///
    /// `logical_ops[i]` joins everything up to `predicates[i]` with
    /// `predicates[i + 1]`.
    pub fn build(&self, predicates: &[Predicate], logical_ops: &[LogicalOp]) -> Result<String> {
        let Some((first, rest)) = predicates.split_first() else {
            return Err(MapperError::invalid_input("a query needs at least one predicate"));
        };
        if logical_ops.len() != rest.len() {
            return Err(MapperError::invalid_input(format!(
                "{} predicates need {} logical operators, got {}",
                predicates.len(),
                rest.len(),
                logical_ops.len()
            )));
        }

        let mut query = self.render(first)?;
        for (op, predicate) in logical_ops.iter().zip(rest) {
            query = format!("({} {} {})", query, op, self.render(predicate)?);
        }
        Ok(query)
    }

    /// Render a single predicate
    pub fn render(&self, predicate: &Predicate) -> Result<String> {
        let name = predicate.field_name.as_str();
        let field = self
            .registry
            .lookup(name)
            .ok_or_else(|| MapperError::UnknownField(name.to_string()))?;
        if !field.queryable {
            return Err(MapperError::invalid_predicate(
                name,
                "field can be returned but not queried",
            ));
        }

        match (field.field_type, predicate.operator, &predicate.value) {
            (FieldType::Boolean, Operator::Equals | Operator::Exact, PredicateValue::Single(v)) => {
                render_boolean(field, v)
            }
            (FieldType::Text, Operator::Equals, PredicateValue::Single(v)) => {
                render_text(field, v, false)
            }
            (FieldType::Text, Operator::Exact, PredicateValue::Single(v)) => {
                render_text(field, v, true)
            }
            (FieldType::Text, Operator::Wildcard, PredicateValue::Single(v)) => {
                render_wildcard(field, v)
            }
            (FieldType::DateRange, Operator::Range, PredicateValue::Range(lo, hi)) => {
                let (lo, hi) = date_bounds(field, lo, hi)?;
                Ok(format!("{}:[{} TO {}]", field.name, lo, hi))
            }
            (FieldType::NumericRange, Operator::Range, PredicateValue::Range(lo, hi)) => {
                let (lo, hi) = numeric_bounds(field.name, lo, hi)?;
                Ok(format!("{}:[{} TO {}]", field.name, lo, hi))
            }
            (FieldType::CrossReference, Operator::Equals | Operator::Exact, PredicateValue::Single(v)) => {
                let db = xref_db(field)?;
                let v = non_empty(field, v)?;
                Ok(format!("xref:{}-{}", db, v))
            }
            (FieldType::CrossReference, Operator::Range, PredicateValue::Range(lo, hi)) => {
                let db = xref_db(field)?;
                let (lo, hi) = numeric_bounds(field.name, lo, hi)?;
                Ok(format!("xrefcount_{}:[{} TO {}]", db, lo, hi))
            }
            (field_type, operator, value) => Err(MapperError::invalid_predicate(
                name,
                format!(
                    "{:?} with a {} value is not valid for a {} field",
                    operator,
                    match value {
                        PredicateValue::Single(_) => "single",
                        PredicateValue::Range(..) => "range",
                    },
                    field_type
                ),
            )),
        }
    }
}

fn non_empty<'v>(field: &FieldDescriptor, value: &'v str) -> Result<&'v str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MapperError::invalid_predicate(field.name, "value is empty"));
    }
    Ok(value)
}

fn render_boolean(field: &FieldDescriptor, value: &str) -> Result<String> {
    match value.trim().to_lowercase().as_str() {
        v @ ("true" | "false") => Ok(format!("{}:{}", field.name, v)),
        other => Err(MapperError::invalid_predicate(
            field.name,
            format!("expected true or false, got '{}'", other),
        )),
    }
}

fn render_text(field: &FieldDescriptor, value: &str, exact: bool) -> Result<String> {
    let value = non_empty(field, value)?;
    if exact || value.chars().any(char::is_whitespace) {
        Ok(format!("{}:\"{}\"", field.name, value.replace('"', "\\\"")))
    } else {
        Ok(format!("{}:{}", field.name, value))
    }
}

fn render_wildcard(field: &FieldDescriptor, value: &str) -> Result<String> {
    let value = non_empty(field, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(MapperError::invalid_predicate(
            field.name,
            "wildcard values cannot contain whitespace",
        ));
    }
    if value.ends_with('*') {
        Ok(format!("{}:{}", field.name, value))
    } else {
        Ok(format!("{}:{}*", field.name, value))
    }
}

fn xref_db(field: &FieldDescriptor) -> Result<&'static str> {
    field
        .xref_database()
        .ok_or_else(|| MapperError::invalid_predicate(field.name, "not a cross-reference field"))
}

fn date_bounds<'v>(field: &FieldDescriptor, lo: &'v str, hi: &'v str) -> Result<(&'v str, &'v str)> {
    let parse = |raw: &'v str| -> Result<(&'v str, Option<NaiveDate>)> {
        let raw = raw.trim();
        if raw == "*" {
            return Ok((raw, None));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| (raw, Some(d)))
            .map_err(|_| {
                MapperError::invalid_range(field.name, format!("'{}' is not a YYYY-MM-DD date", raw))
            })
    };

    let (lo, lo_date) = parse(lo)?;
    let (hi, hi_date) = parse(hi)?;
    if let (Some(a), Some(b)) = (lo_date, hi_date) {
        if a > b {
            return Err(MapperError::invalid_range(
                field.name,
                format!("{} is after {}", lo, hi),
            ));
        }
    }
    Ok((lo, hi))
}

fn numeric_bounds<'v>(name: &str, lo: &'v str, hi: &'v str) -> Result<(&'v str, &'v str)> {
    let parse = |raw: &'v str| -> Result<(&'v str, Option<u64>)> {
        let raw = raw.trim();
        if raw == "*" {
            return Ok((raw, None));
        }
        raw.parse::<u64>()
            .map(|n| (raw, Some(n)))
            .map_err(|_| MapperError::invalid_range(name, format!("'{}' is not a whole number", raw)))
    };

    let (lo, lo_n) = parse(lo)?;
    let (hi, hi_n) = parse(hi)?;
    if let (Some(a), Some(b)) = (lo_n, hi_n) {
        if a > b {
            return Err(MapperError::invalid_range(
                name,
                format!("{} is greater than {}", a, b),
            ));
        }
    }
    Ok((lo, hi))
}

/// Composable query expression
///
/// ```
/// use upm_core::fields::StaticRegistry;
/// use upm_core::query::{Predicate, Query};
///
/// let q = Query::from(Predicate::equals("reviewed", "true"))
///     & (Query::from(Predicate::equals("organism_id", "9606"))
///         | Query::from(Predicate::equals("organism_id", "10090")));
/// assert_eq!(
///     q.render(&StaticRegistry).unwrap(),
///     "(reviewed:true AND (organism_id:9606 OR organism_id:10090))"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Term(Predicate),
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
    Not(Box<Query>),
}

impl Query {
    pub fn render(&self, registry: &dyn FieldRegistry) -> Result<String> {
        let builder = QueryBuilder::new(registry);
        self.render_with(&builder)
    }

    fn render_with(&self, builder: &QueryBuilder<'_>) -> Result<String> {
        match self {
            Query::Term(p) => builder.render(p),
            Query::And(a, b) => Ok(format!(
                "({} AND {})",
                a.render_with(builder)?,
                b.render_with(builder)?
            )),
            Query::Or(a, b) => Ok(format!(
                "({} OR {})",
                a.render_with(builder)?,
                b.render_with(builder)?
            )),
            Query::Not(q) => Ok(format!("NOT {}", q.render_with(builder)?)),
        }
    }
}

impl From<Predicate> for Query {
    fn from(p: Predicate) -> Self {
        Query::Term(p)
    }
}

impl BitAnd for Query {
    type Output = Query;

    fn bitand(self, rhs: Query) -> Query {
        Query::And(Box::new(self), Box::new(rhs))
    }
}

impl BitOr for Query {
    type Output = Query;

    fn bitor(self, rhs: Query) -> Query {
        Query::Or(Box::new(self), Box::new(rhs))
    }
}

impl Not for Query {
    type Output = Query;

    fn not(self) -> Query {
        Query::Not(Box::new(self))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fields::StaticRegistry;

    fn build(predicates: &[Predicate], ops: &[LogicalOp]) -> Result<String> {
        QueryBuilder::new(&StaticRegistry).build(predicates, ops)
    }

    #[test]
    fn test_single_boolean() {
        assert_eq!(
            build(&[Predicate::equals("reviewed", "true")], &[]).unwrap(),
            "reviewed:true"
        );
        assert_eq!(
            build(&[Predicate::equals("reviewed", "FALSE")], &[]).unwrap(),
            "reviewed:false"
        );
        assert!(matches!(
            build(&[Predicate::equals("reviewed", "yes")], &[]),
            Err(MapperError::InvalidPredicate { .. })
        ));
    }

    #[test]
    fn test_left_to_right_grouping() {
        let query = build(
            &[
                Predicate::equals("reviewed", "true"),
                Predicate::equals("organism_id", "9606"),
                Predicate::equals("organism_id", "10090"),
            ],
            &[LogicalOp::And, LogicalOp::Or],
        )
        .unwrap();
        assert_eq!(
            query,
            "((reviewed:true AND organism_id:9606) OR organism_id:10090)"
        );
    }

    #[test]
    fn test_binary_not() {
        let query = build(
            &[
                Predicate::equals("gene", "BRCA1"),
                Predicate::equals("fragment", "true"),
            ],
            &[LogicalOp::Not],
        )
        .unwrap();
        assert_eq!(query, "(gene:BRCA1 NOT fragment:true)");
    }

    #[test]
    fn test_operator_count_mismatch() {
        let err = build(
            &[
                Predicate::equals("reviewed", "true"),
                Predicate::equals("gene", "TP53"),
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, MapperError::InvalidInput(_)));
        assert!(matches!(build(&[], &[]), Err(MapperError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            build(&[Predicate::equals("flavour", "sweet")], &[]),
            Err(MapperError::UnknownField("flavour".into()))
        );
    }

    #[test]
    fn test_return_only_field_is_not_queryable() {
        assert!(matches!(
            build(&[Predicate::equals("sequence", "MKT")], &[]),
            Err(MapperError::InvalidPredicate { .. })
        ));
    }

    #[test]
    fn test_text_rendering() {
        assert_eq!(
            build(&[Predicate::equals("organism_name", "Homo sapiens")], &[]).unwrap(),
            "organism_name:\"Homo sapiens\""
        );
        assert_eq!(
            build(&[Predicate::exact("gene_exact", "TP53")], &[]).unwrap(),
            "gene_exact:\"TP53\""
        );
        assert_eq!(
            build(&[Predicate::wildcard("gene", "BRCA")], &[]).unwrap(),
            "gene:BRCA*"
        );
        assert_eq!(
            build(&[Predicate::wildcard("gene", "BRCA*")], &[]).unwrap(),
            "gene:BRCA*"
        );
        assert!(build(&[Predicate::equals("gene", "  ")], &[]).is_err());
    }

    #[test]
    fn test_numeric_range() {
        assert_eq!(
            build(&[Predicate::range("length", "100", "200")], &[]).unwrap(),
            "length:[100 TO 200]"
        );
        assert_eq!(
            build(&[Predicate::range("mass", "5000", "*")], &[]).unwrap(),
            "mass:[5000 TO *]"
        );
        assert!(matches!(
            build(&[Predicate::range("length", "300", "200")], &[]),
            Err(MapperError::InvalidRange { .. })
        ));
        assert!(matches!(
            build(&[Predicate::range("length", "ten", "200")], &[]),
            Err(MapperError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_date_range() {
        assert_eq!(
            build(
                &[Predicate::range("date_modified", "2019-01-01", "2021-12-31")],
                &[]
            )
            .unwrap(),
            "date_modified:[2019-01-01 TO 2021-12-31]"
        );
        assert_eq!(
            build(&[Predicate::range("date_created", "*", "2000-01-01")], &[]).unwrap(),
            "date_created:[* TO 2000-01-01]"
        );
        assert!(matches!(
            build(
                &[Predicate::range("date_created", "2021-01-01", "2020-01-01")],
                &[]
            ),
            Err(MapperError::InvalidRange { .. })
        ));
        assert!(matches!(
            build(&[Predicate::range("date_created", "2021-13-01", "*")], &[]),
            Err(MapperError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_cross_reference() {
        assert_eq!(
            build(&[Predicate::equals("xref_pdb", "1A2B")], &[]).unwrap(),
            "xref:pdb-1A2B"
        );
        assert_eq!(
            build(&[Predicate::range("xref_pdb", "1", "*")], &[]).unwrap(),
            "xrefcount_pdb:[1 TO *]"
        );
    }

    #[test]
    fn test_operator_type_mismatch() {
        assert!(matches!(
            build(&[Predicate::equals("length", "100")], &[]),
            Err(MapperError::InvalidPredicate { .. })
        ));
        assert!(matches!(
            build(&[Predicate::range("gene", "a", "b")], &[]),
            Err(MapperError::InvalidPredicate { .. })
        ));
        assert!(matches!(
            build(&[Predicate::wildcard("xref_pdb", "1A")], &[]),
            Err(MapperError::InvalidPredicate { .. })
        ));
    }

    #[test]
    fn test_query_operators() {
        let reviewed = Query::from(Predicate::equals("reviewed", "true"));
        let human = Query::from(Predicate::equals("organism_id", "9606"));
        let long = Query::from(Predicate::range("length", "100", "200"));

        let q = !reviewed | (human & long);
        assert_eq!(
            q.render(&StaticRegistry).unwrap(),
            "(NOT reviewed:true OR (organism_id:9606 AND length:[100 TO 200]))"
        );
    }

    #[test]
    fn test_query_propagates_errors() {
        let q = Query::from(Predicate::equals("reviewed", "true"))
            & Query::from(Predicate::equals("nope", "x"));
        assert_eq!(
            q.render(&StaticRegistry),
            Err(MapperError::UnknownField("nope".into()))
        );
    }
}
