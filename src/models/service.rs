use crate::consts;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: i64,
    pub duration_in_minutes: i64,
    pub type_service: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServicePatch {
    pub duration_in_minutes: Option<i64>,
    pub type_service: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

impl ServicePatch {
    pub fn apply(self, service: &mut Service) {
        if let Some(duration) = self.duration_in_minutes {
            service.duration_in_minutes = duration;
        }
        if let Some(type_service) = self.type_service {
            service.type_service = type_service;
        }
        if let Some(price) = self.price {
            service.price = price;
        }
    }
}

/// Price bands used to browse the service catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PriceCategory {
    #[serde(rename = "cheap services", alias = "cheap")]
    Cheap,
    #[serde(rename = "medium services", alias = "medium")]
    Medium,
    #[serde(rename = "expensive services", alias = "expensive")]
    Expensive,
}

impl PriceCategory {
    /// Returns `(exclusive lower bound, inclusive upper bound)` of the band
    pub fn bounds(&self) -> (Option<Decimal>, Decimal) {
        match self {
            PriceCategory::Cheap => (None, consts::CHEAP_SERVICE_MAX_PRICE),
            PriceCategory::Medium => (
                Some(consts::CHEAP_SERVICE_MAX_PRICE),
                consts::MEDIUM_SERVICE_MAX_PRICE,
            ),
            PriceCategory::Expensive => (
                Some(consts::MEDIUM_SERVICE_MAX_PRICE),
                consts::EXPENSIVE_SERVICE_MAX_PRICE,
            ),
        }
    }
}
