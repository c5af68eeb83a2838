// salesmart-core/src/domain/cleaning/customers.rs

use chrono::Datelike;

use super::{CleanRun, Cleaned, Cleaner, TextCase};
use crate::domain::error::DomainError;
use crate::domain::schema::customers;
use crate::domain::table::{ColumnType, Table, Value};

impl Cleaner {
    pub fn clean_customers(&self, raw: &Table) -> Result<Cleaned, DomainError> {
        let _enter = self.span.enter();

        let run = CleanRun::start(raw, customers::TABLE, &[customers::CUSTOMER_ID])?
            .warn_absent(&customers::RAW_COLUMNS)
            .fill_text(customers::EMAIL, customers::DEFAULT_EMAIL)
            .drop_missing_keys(&[customers::CUSTOMER_ID])
            .normalize_text(customers::CUSTOMER_NAME, TextCase::Title)
            .normalize_text(customers::CITY, TextCase::Title)
            .normalize_text(customers::EMAIL, TextCase::Lower)
            .parse_dates(customers::REGISTRATION_DATE)
            .dedup(customers::CUSTOMER_ID)
            .derive_from_date(
                customers::REGISTRATION_DATE,
                customers::REGISTRATION_YEAR,
                ColumnType::BigInt,
                |d| Value::Int(i64::from(d.year())),
            )?
            .derive_from_date(
                customers::REGISTRATION_DATE,
                customers::REGISTRATION_MONTH,
                ColumnType::BigInt,
                |d| Value::Int(i64::from(d.month())),
            )?;

        Ok(run.finish())
    }
}
