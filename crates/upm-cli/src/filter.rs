//! `--filter` expression parsing
//!
//! | Syntax            | Predicate  |
//! |-------------------|------------|
//! | `name==value`     | exact      |
//! | `name~value`      | wildcard   |
//! | `name=low..high`  | range      |
//! | `name=value`      | equals     |
//!
//! Either side of a range may be left empty for an open bound.

use crate::error::{CliError, Result};
use upm_core::{LogicalOp, Predicate, QueryBuilder, StaticRegistry};

pub fn parse(expr: &str) -> Result<Predicate> {
    let invalid = || CliError::invalid_filter(expr);

    let (field, operator, value) = if let Some((f, v)) = expr.split_once("==") {
        (f, "==", v)
    } else if let Some((f, v)) = expr.split_once('~') {
        (f, "~", v)
    } else if let Some((f, v)) = expr.split_once('=') {
        (f, "=", v)
    } else {
        return Err(invalid());
    };

    let field = field.trim();
    let value = value.trim();
    if field.is_empty() || value.is_empty() {
        return Err(invalid());
    }

    Ok(match operator {
        "==" => Predicate::exact(field, value),
        "~" => Predicate::wildcard(field, value.trim_end_matches('*')),
        _ => match value.split_once("..") {
            Some((low, high)) => Predicate::range(field, open_bound(low), open_bound(high)),
            None => Predicate::equals(field, value),
        },
    })
}

fn open_bound(bound: &str) -> &str {
    match bound.trim() {
        "" => "*",
        b => b,
    }
}

/// Combine a raw query and filter expressions into one query string
pub fn build_query(raw: Option<&str>, filters: &[String], any: bool) -> Result<String> {
    let raw = raw.map(str::trim).filter(|q| !q.is_empty());
    if filters.is_empty() {
        return raw.map(str::to_string).ok_or(CliError::EmptySearch);
    }

    let predicates = filters
        .iter()
        .map(|f| parse(f))
        .collect::<Result<Vec<_>>>()?;
    let op = if any { LogicalOp::Or } else { LogicalOp::And };
    let ops = vec![op; predicates.len() - 1];

    let registry = StaticRegistry;
    let built = QueryBuilder::new(&registry).build(&predicates, &ops)?;

    Ok(match raw {
        Some(raw) => format!("({}) AND {}", raw, built),
        None => built,
    })
}
