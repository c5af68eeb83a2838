// salesmart-core/src/domain/cleaning/products.rs

use super::{CleanRun, Cleaned, Cleaner, TextCase};
use crate::domain::error::DomainError;
use crate::domain::schema::products;
use crate::domain::table::Table;

impl Cleaner {
    pub fn clean_products(&self, raw: &Table) -> Result<Cleaned, DomainError> {
        let _enter = self.span.enter();

        let run = CleanRun::start(raw, products::TABLE, &[products::PRODUCT_ID])?
            .warn_absent(&products::RAW_COLUMNS)
            .drop_missing_keys(&[products::PRODUCT_ID])
            .fill_text(products::PRODUCT_NAME, products::DEFAULT_NAME)
            .fill_text(products::CATEGORY, products::DEFAULT_CATEGORY)
            .coerce_numeric(products::PRICE, 0.0)
            .coerce_numeric(products::STOCK, 0.0)
            .normalize_text(products::PRODUCT_NAME, TextCase::Title)
            .normalize_text(products::CATEGORY, TextCase::Title)
            .dedup(products::PRODUCT_ID);

        Ok(run.finish())
    }
}
