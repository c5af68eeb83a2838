// salesmart-core/src/domain/query.rs

use sqlparser::ast::{Query, SetExpr, Statement};
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;

use crate::domain::error::DomainError;

/// Accepts exactly one read-only query statement (SELECT, WITH, VALUES, set operations).
pub fn ensure_read_only(sql: &str) -> Result<(), DomainError> {
    let statements = Parser::parse_sql(&DuckDbDialect {}, sql)
        .map_err(|e| DomainError::ReadOnlyViolation(format!("unparseable query: {}", e)))?;

    match statements.as_slice() {
        [] => Err(DomainError::ReadOnlyViolation("empty query".to_string())),
        [Statement::Query(query)] if is_read_only(query) => Ok(()),
        [Statement::Query(_)] => Err(DomainError::ReadOnlyViolation(
            "query writes data (SELECT INTO or data-modifying clause)".to_string(),
        )),
        [other] => Err(DomainError::ReadOnlyViolation(format!(
            "statement is not a query: {}",
            first_words(&other.to_string())
        ))),
        many => Err(DomainError::ReadOnlyViolation(format!(
            "expected a single statement, got {}",
            many.len()
        ))),
    }
}

fn is_read_only(query: &Query) -> bool {
    let ctes_ok = query
        .with
        .as_ref()
        .is_none_or(|with| with.cte_tables.iter().all(|cte| is_read_only(&cte.query)));
    ctes_ok && set_expr_read_only(&query.body)
}

fn set_expr_read_only(body: &SetExpr) -> bool {
    match body {
        SetExpr::Select(select) => select.into.is_none(),
        SetExpr::Query(query) => is_read_only(query),
        SetExpr::SetOperation { left, right, .. } => set_expr_read_only(left) && set_expr_read_only(right),
        SetExpr::Values(_) | SetExpr::Table(_) => true,
        _ => false,
    }
}

fn first_words(sql: &str) -> String {
    sql.split_whitespace().take(3).collect::<Vec<_>>().join(" ")
}
