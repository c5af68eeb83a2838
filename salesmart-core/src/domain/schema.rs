// salesmart-core/src/domain/schema.rs

//! Table and column names of the sales warehouse, plus the cleaning defaults.

pub mod orders {
    pub const TABLE: &str = "orders";

    pub const ORDER_ID: &str = "order_id";
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const ORDER_DATE: &str = "order_date";
    pub const ORDER_STATUS: &str = "order_status";
    pub const TOTAL_AMOUNT: &str = "total_amount";

    pub const ORDER_YEAR: &str = "order_year";
    pub const ORDER_MONTH: &str = "order_month";
    pub const ORDER_DAY: &str = "order_day";
    pub const ORDER_DAY_NAME: &str = "order_day_name";

    pub const RAW_COLUMNS: [&str; 5] = [ORDER_ID, CUSTOMER_ID, ORDER_DATE, ORDER_STATUS, TOTAL_AMOUNT];

    pub const UNKNOWN_CUSTOMER: &str = "UNKNOWN";
    pub const UNKNOWN_STATUS: &str = "unknown";
}

pub mod customers {
    pub const TABLE: &str = "customers";

    pub const CUSTOMER_ID: &str = "customer_id";
    pub const CUSTOMER_NAME: &str = "customer_name";
    pub const CITY: &str = "city";
    pub const EMAIL: &str = "email";
    pub const REGISTRATION_DATE: &str = "registration_date";

    pub const REGISTRATION_YEAR: &str = "registration_year";
    pub const REGISTRATION_MONTH: &str = "registration_month";

    pub const RAW_COLUMNS: [&str; 5] = [CUSTOMER_ID, CUSTOMER_NAME, CITY, EMAIL, REGISTRATION_DATE];

    pub const DEFAULT_EMAIL: &str = "no-email@unknown.com";
}

pub mod order_items {
    pub const TABLE: &str = "order_items";

    pub const ORDER_ITEM_ID: &str = "order_item_id";
    pub const ORDER_ID: &str = "order_id";
    pub const PRODUCT_ID: &str = "product_id";
    pub const QUANTITY: &str = "quantity";
    pub const PRICE_PER_UNIT: &str = "price_per_unit";

    pub const TOTAL_ITEM_PRICE: &str = "total_item_price";

    pub const RAW_COLUMNS: [&str; 5] = [ORDER_ITEM_ID, ORDER_ID, PRODUCT_ID, QUANTITY, PRICE_PER_UNIT];
}

pub mod products {
    pub const TABLE: &str = "products";

    pub const PRODUCT_ID: &str = "product_id";
    pub const PRODUCT_NAME: &str = "product_name";
    pub const CATEGORY: &str = "category";
    pub const PRICE: &str = "price";
    pub const STOCK: &str = "stock";

    pub const RAW_COLUMNS: [&str; 5] = [PRODUCT_ID, PRODUCT_NAME, CATEGORY, PRICE, STOCK];

    pub const DEFAULT_NAME: &str = "Unknown Product";
    pub const DEFAULT_CATEGORY: &str = "Uncategorized";
}

pub mod fact_sales {
    use super::{customers, order_items, orders, products};

    pub const TABLE: &str = "fact_sales";

    pub const CUSTOMER_PROJECTION: [&str; 3] =
        [customers::CUSTOMER_ID, customers::CUSTOMER_NAME, customers::CITY];

    pub const ITEM_PROJECTION: [&str; 5] = [
        order_items::ORDER_ID,
        order_items::PRODUCT_ID,
        order_items::QUANTITY,
        order_items::PRICE_PER_UNIT,
        order_items::TOTAL_ITEM_PRICE,
    ];

    pub const PRODUCT_PROJECTION: [&str; 3] =
        [products::PRODUCT_ID, products::PRODUCT_NAME, products::CATEGORY];

    /// Output order of the fact table; columns that cannot be resolved are left out.
    pub const OUTPUT_COLUMNS: [&str; 16] = [
        orders::ORDER_ID,
        orders::CUSTOMER_ID,
        customers::CUSTOMER_NAME,
        customers::CITY,
        products::PRODUCT_ID,
        products::PRODUCT_NAME,
        products::CATEGORY,
        orders::ORDER_DATE,
        orders::ORDER_STATUS,
        order_items::QUANTITY,
        order_items::PRICE_PER_UNIT,
        order_items::TOTAL_ITEM_PRICE,
        orders::ORDER_YEAR,
        orders::ORDER_MONTH,
        orders::ORDER_DAY,
        orders::ORDER_DAY_NAME,
    ];

    /// Columns backing the analytics workload's filters and group-bys.
    pub const INDEXED_COLUMNS: [&str; 4] = [
        orders::ORDER_DATE,
        orders::CUSTOMER_ID,
        products::PRODUCT_ID,
        products::CATEGORY,
    ];
}
