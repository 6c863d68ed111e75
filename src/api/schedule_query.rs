use super::errors::{ApiError, ApiResult};
use crate::{
    models::{
        Entity, Pagination,
        schedule::{ScheduleDetails, month_bounds},
    },
    repo,
};

pub async fn get_schedules(
    page: Pagination,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Vec<ScheduleDetails>> {
    Ok(repo.get_schedules_details(page).await?)
}

/// Appointments in `[first day of month, first day of next month)`, UTC
pub async fn get_schedules_by_month(
    year: i32,
    month: u32,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Vec<ScheduleDetails>> {
    let _span = logfire::span!("get_schedules_by_month").entered();

    let (start, end) = month_bounds(year, month).ok_or_else(|| {
        ApiError::InvalidInput(format!("invalid date, check year {year} and month {month}"))
    })?;

    let schedules = repo.get_schedules_details_between(&start, &end).await?;

    if schedules.is_empty() {
        return Err(ApiError::NoMatch(format!(
            "no schedule found for {month}/{year}"
        )));
    }

    Ok(schedules)
}

pub async fn count_schedules(repo: &repo::ImplAppRepo) -> ApiResult<i64> {
    Ok(repo.count(Entity::Schedule).await?)
}
