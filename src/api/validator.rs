//! Read-only checks a new appointment has to pass before it is written.

use super::errors::{ApiError, ApiResult};
use crate::{
    models::{Entity, schedule::DateSchedule},
    repo,
};

/// Appointment proposed by a caller, date already normalized to UTC
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleCandidate {
    pub client_id: i64,
    pub pet_id: i64,
    pub date_schedule: DateSchedule,
    pub service_ids: Vec<i64>,
}

/// Accepts or rejects the candidate, stopping at the first failed check:
///
/// 1. the pet exists
/// 2. the pet belongs to the candidate client
/// 3. the client has no other appointment at that date
/// 4. the service list is not empty and every service exists
pub async fn validate(candidate: &ScheduleCandidate, repo: &repo::ImplAppRepo) -> ApiResult<()> {
    let pet = repo
        .get_pet(candidate.pet_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Entity::Pet, candidate.pet_id))?;

    if pet.client_id != candidate.client_id {
        return Err(ApiError::InvalidAssociation {
            pet_id: candidate.pet_id,
            client_id: candidate.client_id,
        });
    }

    if repo
        .get_schedule_by_slot(candidate.client_id, &candidate.date_schedule)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(format!(
            "client {} already has a schedule at {}",
            candidate.client_id,
            candidate.date_schedule.to_rfc3339()
        )));
    }

    if candidate.service_ids.is_empty() {
        return Err(ApiError::InvalidInput(
            "a schedule needs at least one service".into(),
        ));
    }

    for service_id in &candidate.service_ids {
        if !repo.exists(Entity::Service, *service_id).await? {
            return Err(ApiError::not_found(Entity::Service, *service_id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        pet::Pet,
        schedule::{Schedule, parse_date_schedule},
    };

    fn candidate(service_ids: Vec<i64>) -> ScheduleCandidate {
        ScheduleCandidate {
            client_id: 1,
            pet_id: 1,
            date_schedule: parse_date_schedule("2024-06-01T10:00:00Z").unwrap(),
            service_ids,
        }
    }

    fn pet_of(client_id: i64) -> Pet {
        Pet {
            id: 1,
            client_id,
            name: "Rex".into(),
            breed: "Beagle".into(),
            age: 3,
            size_in_centimeters: 40,
        }
    }

    #[ntex::test]
    async fn test_missing_pet() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_get_pet().times(1).returning(|_| Ok(None));
        repo.expect_get_schedule_by_slot().times(0);
        repo.expect_exists().times(0);
        let repo: repo::ImplAppRepo = Box::new(repo);

        let result = validate(&candidate(vec![1]), &repo).await;

        assert!(matches!(
            result,
            Err(ApiError::NotFound {
                entity: Entity::Pet,
                id: 1
            })
        ));
    }

    #[ntex::test]
    async fn test_pet_of_another_client() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_get_pet().returning(|_| Ok(Some(pet_of(2))));
        repo.expect_get_schedule_by_slot().times(0);
        repo.expect_exists().times(0);
        let repo: repo::ImplAppRepo = Box::new(repo);

        let result = validate(&candidate(vec![1]), &repo).await;

        assert!(matches!(
            result,
            Err(ApiError::InvalidAssociation {
                pet_id: 1,
                client_id: 1
            })
        ));
    }

    #[ntex::test]
    async fn test_slot_already_taken() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_get_pet().returning(|_| Ok(Some(pet_of(1))));
        repo.expect_get_schedule_by_slot()
            .times(1)
            .returning(|client_id, date_schedule| {
                Ok(Some(Schedule {
                    id: 9,
                    date_schedule: *date_schedule,
                    client_id,
                    pet_id: 1,
                }))
            });
        repo.expect_exists().times(0);
        let repo: repo::ImplAppRepo = Box::new(repo);

        let result = validate(&candidate(vec![1]), &repo).await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[ntex::test]
    async fn test_empty_service_list() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_get_pet().returning(|_| Ok(Some(pet_of(1))));
        repo.expect_get_schedule_by_slot().returning(|_, _| Ok(None));
        repo.expect_exists().times(0);
        let repo: repo::ImplAppRepo = Box::new(repo);

        let result = validate(&candidate(vec![]), &repo).await;

        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[ntex::test]
    async fn test_first_missing_service_is_reported() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_get_pet().returning(|_| Ok(Some(pet_of(1))));
        repo.expect_get_schedule_by_slot().returning(|_, _| Ok(None));
        repo.expect_exists()
            .times(2)
            .returning(|_, service_id| Ok(service_id == 1));
        let repo: repo::ImplAppRepo = Box::new(repo);

        let result = validate(&candidate(vec![1, 5, 6]), &repo).await;

        assert!(matches!(
            result,
            Err(ApiError::NotFound {
                entity: Entity::Service,
                id: 5
            })
        ));
    }

    #[ntex::test]
    async fn test_valid_candidate() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_get_pet().returning(|_| Ok(Some(pet_of(1))));
        repo.expect_get_schedule_by_slot().returning(|_, _| Ok(None));
        repo.expect_exists().times(2).returning(|_, _| Ok(true));
        let repo: repo::ImplAppRepo = Box::new(repo);

        assert!(validate(&candidate(vec![1, 2]), &repo).await.is_ok());
    }
}
