// salesmart-core/src/infrastructure/sql.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::infrastructure::error::InfrastructureError;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    // Static pattern, compiles or nothing matches.
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
});

/// Validates a table or column name and returns it double-quoted for DDL.
pub fn quote_identifier(name: &str) -> Result<String, InfrastructureError> {
    if IDENTIFIER.is_match(name) {
        Ok(format!("\"{}\"", name))
    } else {
        Err(InfrastructureError::InvalidIdentifier(name.to_string()))
    }
}

/// Single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(matches!(quote_identifier("fact_sales").as_deref(), Ok("\"fact_sales\"")));
        assert!(quote_identifier("_tmp1").is_ok());
        for bad in ["", "1orders", "orders; DROP TABLE x", "fact-sales", "a\"b"] {
            assert!(
                matches!(quote_identifier(bad), Err(InfrastructureError::InvalidIdentifier(_))),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_literal_escaping() {
        assert_eq!(quote_literal("it's.csv"), "'it''s.csv'");
    }
}
