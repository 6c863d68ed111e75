//! # Schedule API Module
//!
//! Lifecycle of an appointment: a candidate is validated, persisted together
//! with its services in one transaction, and can later be read, partially
//! updated or deleted.

use super::{
    errors::{ApiError, ApiResult},
    resolve_id, validator,
};
use crate::{
    metric,
    models::{
        Entity,
        schedule::{
            DateScheduleError, Schedule, ScheduleDetails, SchedulePatch, ScheduleWithServices,
            parse_date_schedule,
        },
    },
    repo::{self, ScheduleWrite},
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateScheduleRequest {
    pub id: Option<i64>,
    pub date_schedule: String,
    pub client_id: i64,
    pub pet_id: i64,
    pub service_ids: Vec<i64>,
}

fn invalid_date(raw: &str, e: DateScheduleError) -> ApiError {
    ApiError::InvalidInput(format!("invalid date_schedule '{raw}': {e}"))
}

/// Keeps the first occurrence of every id, in request order
fn dedup_service_ids(service_ids: Vec<i64>) -> Vec<i64> {
    let mut unique = Vec::with_capacity(service_ids.len());
    for service_id in service_ids {
        if !unique.contains(&service_id) {
            unique.push(service_id);
        }
    }
    unique
}

/// Creates an appointment and links its services.
///
/// The date is parsed and normalized to UTC, the candidate goes through
/// [`validator::validate`], then the row and its links are written in a single
/// transaction. A service vanishing between validation and write rolls the
/// whole creation back.
pub async fn create_schedule(
    request: CreateScheduleRequest,
    repo: &repo::ImplAppRepo,
) -> ApiResult<ScheduleWithServices> {
    let _span = logfire::span!("create_schedule").entered();

    let date_schedule = parse_date_schedule(&request.date_schedule)
        .map_err(|e| invalid_date(&request.date_schedule, e))?;

    let candidate = validator::ScheduleCandidate {
        client_id: request.client_id,
        pet_id: request.pet_id,
        date_schedule,
        service_ids: dedup_service_ids(request.service_ids),
    };

    validator::validate(&candidate, repo).await?;

    let schedule = Schedule {
        id: resolve_id(request.id, Entity::Schedule, repo).await?,
        date_schedule: candidate.date_schedule,
        client_id: candidate.client_id,
        pet_id: candidate.pet_id,
    };

    let schedule_id = match repo
        .insert_schedule(&schedule, &candidate.service_ids)
        .await?
    {
        ScheduleWrite::Saved(schedule_id) => schedule_id,
        ScheduleWrite::MissingService(service_id) => {
            return Err(ApiError::not_found(Entity::Service, service_id));
        }
        ScheduleWrite::SlotTaken => {
            return Err(ApiError::Conflict(format!(
                "client {} already has a schedule at {}",
                schedule.client_id,
                schedule.date_schedule.to_rfc3339()
            )));
        }
    };

    metric::incr_schedule_action_statds("create");

    Ok(ScheduleWithServices {
        services: repo.get_schedule_services(schedule_id).await?,
        schedule: Schedule {
            id: schedule_id,
            ..schedule
        },
    })
}

/// Schedule with its client, pet and services
pub async fn get_schedule(
    schedule_id: i64,
    repo: &repo::ImplAppRepo,
) -> ApiResult<ScheduleDetails> {
    repo.get_schedule_details(schedule_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Entity::Schedule, schedule_id))
}

/// Overwrites the supplied fields of the schedule.
///
/// Ownership is not checked again, but a new client or pet must exist and the
/// new slot must be free.
pub async fn update_schedule(
    schedule_id: i64,
    patch: SchedulePatch,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Schedule> {
    let _span = logfire::span!("update_schedule").entered();

    let mut schedule = repo
        .get_schedule(schedule_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Entity::Schedule, schedule_id))?;

    let raw_date = patch.date_schedule.clone().unwrap_or_default();
    patch
        .apply(&mut schedule)
        .map_err(|e| invalid_date(&raw_date, e))?;

    if !repo.exists(Entity::Client, schedule.client_id).await? {
        return Err(ApiError::not_found(Entity::Client, schedule.client_id));
    }
    if !repo.exists(Entity::Pet, schedule.pet_id).await? {
        return Err(ApiError::not_found(Entity::Pet, schedule.pet_id));
    }

    match repo.update_schedule(&schedule).await? {
        ScheduleWrite::Saved(_) => {
            metric::incr_schedule_action_statds("update");
            Ok(schedule)
        }
        ScheduleWrite::SlotTaken => Err(ApiError::Conflict(format!(
            "client {} already has a schedule at {}",
            schedule.client_id,
            schedule.date_schedule.to_rfc3339()
        ))),
        ScheduleWrite::MissingService(service_id) => {
            Err(ApiError::not_found(Entity::Service, service_id))
        }
    }
}

/// Unlinks the services of the schedule and removes it
pub async fn delete_schedule(schedule_id: i64, repo: &repo::ImplAppRepo) -> ApiResult<()> {
    let _span = logfire::span!("delete_schedule").entered();

    if !repo.exists(Entity::Schedule, schedule_id).await? {
        return Err(ApiError::not_found(Entity::Schedule, schedule_id));
    }

    repo.delete_schedule(schedule_id).await?;

    metric::incr_schedule_action_statds("delete");

    Ok(())
}
