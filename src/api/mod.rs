//! # API Module
//!
//! Business logic of the pet-care scheduling service. Every operation takes
//! the store as [`repo::ImplAppRepo`] and answers with an [`errors::ApiResult`],
//! so the request gateway only has to map [`errors::ApiError`] to a status code.
//!
//! ## Modules
//!
//! - [`client`] - Client registry and cascading removal
//! - [`pet`] - Pets of a client
//! - [`service`] - Service catalog and price categories
//! - [`schedule`] - Appointment lifecycle (create, read, update, delete)
//! - [`schedule_query`] - Appointment listings and counts
//! - [`validator`] - Read-only checks over a candidate appointment

pub mod client;
pub mod errors;
pub mod pet;
pub mod schedule;
pub mod schedule_query;
pub mod service;
pub mod validator;

use crate::{models::Entity, repo};
use errors::{ApiError, ApiResult};

/// Decides the id a new row is stored with.
///
/// * `None` -> `0`, the store assigns the id
/// * `Some(0)` -> `max(id) + 1` of the entity, `1` on an empty table,
///   [`ApiError::Conflict`] once `i64::MAX` is taken
/// * `Some(n)` -> `n` when free, [`ApiError::Conflict`] when taken
/// * negative -> [`ApiError::InvalidInput`]
pub async fn resolve_id(
    requested: Option<i64>,
    entity: Entity,
    repo: &repo::ImplAppRepo,
) -> ApiResult<i64> {
    match requested {
        None => Ok(0),
        Some(id) if id < 0 => Err(ApiError::InvalidInput(format!(
            "{entity} id must not be negative, got {id}"
        ))),
        Some(0) => match repo.max_id(entity).await? {
            None => Ok(1),
            Some(max_id) => max_id.checked_add(1).ok_or_else(|| {
                ApiError::Conflict(format!("no {entity} id left after {max_id}"))
            }),
        },
        Some(id) => {
            if repo.exists(entity, id).await? {
                return Err(ApiError::Conflict(format!(
                    "{entity} with id {id} already exists"
                )));
            }
            Ok(id)
        }
    }
}

/// Fails with [`ApiError::InvalidInput`] when the value is blank
fn require_text(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{field} must not be blank")));
    }
    Ok(())
}

/// Fails with [`ApiError::InvalidInput`] when the value is negative
fn require_non_negative(field: &str, value: i64) -> ApiResult<()> {
    if value < 0 {
        return Err(ApiError::InvalidInput(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mocked(repo: repo::MockAppRepo) -> repo::ImplAppRepo {
        Box::new(repo)
    }

    #[ntex::test]
    async fn test_absent_id_lets_the_store_assign() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_max_id().times(0);
        repo.expect_exists().times(0);

        assert_eq!(resolve_id(None, Entity::Client, &mocked(repo)).await.unwrap(), 0);
    }

    #[ntex::test]
    async fn test_zero_id_takes_next_after_max() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_max_id()
            .times(1)
            .returning(|_| Ok(Some(41)));

        assert_eq!(
            resolve_id(Some(0), Entity::Schedule, &mocked(repo))
                .await
                .unwrap(),
            42
        );
    }

    #[ntex::test]
    async fn test_zero_id_on_empty_table() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_max_id().returning(|_| Ok(None));

        assert_eq!(
            resolve_id(Some(0), Entity::Pet, &mocked(repo)).await.unwrap(),
            1
        );
    }

    #[ntex::test]
    async fn test_zero_id_after_largest_id() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_max_id().returning(|_| Ok(Some(i64::MAX)));

        let result = resolve_id(Some(0), Entity::Client, &mocked(repo)).await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[ntex::test]
    async fn test_explicit_id_taken() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_exists().returning(|_, _| Ok(true));

        let result = resolve_id(Some(7), Entity::Service, &mocked(repo)).await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[ntex::test]
    async fn test_negative_id_is_invalid() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_exists().times(0);

        let result = resolve_id(Some(-1), Entity::Client, &mocked(repo)).await;

        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }
}
