use ntex::web;
use serde_json::json;

use crate::{
    api,
    front::{AppState, errors, forms},
    models,
};

#[web::post("")]
async fn create_schedule(
    app_state: web::types::State<AppState>,
    request_body: web::types::Json<api::schedule::CreateScheduleRequest>,
) -> Result<impl web::Responder, web::Error> {
    let created = api::schedule::create_schedule(request_body.into_inner(), &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Created().json(&created))
}

#[web::get("")]
async fn get_schedules(
    app_state: web::types::State<AppState>,
    query: web::types::Query<forms::PaginationQuery>,
) -> Result<impl web::Responder, web::Error> {
    let schedules =
        api::schedule_query::get_schedules(query.into_inner().into(), &app_state.repo)
            .await
            .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&schedules))
}

#[web::get("/total-schedule")]
async fn get_total_schedules(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let total = api::schedule_query::count_schedules(&app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&total))
}

#[web::get("/{year}/{month}")]
async fn get_schedules_by_month(
    app_state: web::types::State<AppState>,
    path: web::types::Path<forms::MonthPath>,
) -> Result<impl web::Responder, web::Error> {
    let schedules =
        api::schedule_query::get_schedules_by_month(path.year, path.month, &app_state.repo)
            .await
            .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&schedules))
}

#[web::get("/{schedule_id}")]
async fn get_schedule(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    let schedule = api::schedule::get_schedule(path.0, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&schedule))
}

#[web::put("/{schedule_id}")]
async fn update_schedule(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
    request_body: web::types::Json<models::schedule::SchedulePatch>,
) -> Result<impl web::Responder, web::Error> {
    let schedule =
        api::schedule::update_schedule(path.0, request_body.into_inner(), &app_state.repo)
            .await
            .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&schedule))
}

#[web::delete("/{schedule_id}")]
async fn delete_schedule(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    api::schedule::delete_schedule(path.0, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&json!({ "ok": true })))
}
