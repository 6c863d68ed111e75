//! Query strings and path segments accepted by the JSON routes

use crate::models;
use serde::Deserialize;

/// `?offset=&limit=` of every listing route
#[derive(Debug, Default, Deserialize, Clone, Copy)]
pub struct PaginationQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl From<PaginationQuery> for models::Pagination {
    fn from(val: PaginationQuery) -> Self {
        models::Pagination::new(val.offset, val.limit)
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceCategoryQuery {
    pub category_price: models::service::PriceCategory,
}

#[derive(Debug, Deserialize)]
pub struct ClientPetPath {
    pub client_id: i64,
    pub pet_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct MonthPath {
    pub year: i32,
    pub month: u32,
}
