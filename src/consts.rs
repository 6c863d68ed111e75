use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

pub const CHEAP_SERVICE_MAX_PRICE: Decimal = dec!(50.00);
pub const MEDIUM_SERVICE_MAX_PRICE: Decimal = dec!(100.00);
pub const EXPENSIVE_SERVICE_MAX_PRICE: Decimal = dec!(500.00);
