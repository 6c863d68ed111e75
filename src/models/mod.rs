pub mod client;
pub mod pet;
pub mod schedule;
pub mod service;

use crate::consts;
use derive_more::Display;

/// The persisted entity kinds, used for generic store lookups
/// (`max_id`, `count`, `exists`) and in not-found errors.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    #[display("client")]
    Client,
    #[display("pet")]
    Pet,
    #[display("service")]
    Service,
    #[display("schedule")]
    Schedule,
}

impl Entity {
    pub fn table_name(&self) -> &'static str {
        match self {
            Entity::Client => "client",
            Entity::Pet => "pet",
            Entity::Service => "services",
            Entity::Schedule => "schedule",
        }
    }
}

/// Offset/limit window over a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: i64,
    pub limit: i64,
}

impl Pagination {
    /// Negative offsets become 0, the limit defaults to
    /// [`consts::DEFAULT_PAGE_LIMIT`] and is capped at [`consts::MAX_PAGE_LIMIT`].
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            offset: offset.unwrap_or(0).max(0),
            limit: limit
                .unwrap_or(consts::DEFAULT_PAGE_LIMIT)
                .clamp(0, consts::MAX_PAGE_LIMIT),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        assert_eq!(
            Pagination::default(),
            Pagination {
                offset: 0,
                limit: 10
            }
        );
    }

    #[test]
    fn test_pagination_limit_is_capped() {
        let page = Pagination::new(Some(20), Some(500));
        assert_eq!(page.offset, 20);
        assert_eq!(page.limit, 100);

        let page = Pagination::new(Some(-3), Some(-1));
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 0);
    }

    #[test]
    fn test_entity_display() {
        assert_eq!(Entity::Service.to_string(), "service");
        assert_eq!(Entity::Service.table_name(), "services");
    }
}
