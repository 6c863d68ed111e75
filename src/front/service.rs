use ntex::web;
use serde_json::json;

use crate::{
    api,
    front::{AppState, errors, forms},
    models,
};

#[web::post("")]
async fn create_service(
    app_state: web::types::State<AppState>,
    request_body: web::types::Json<api::service::CreateServiceRequest>,
) -> Result<impl web::Responder, web::Error> {
    let service = api::service::create_service(request_body.into_inner(), &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Created().json(&service))
}

#[web::get("")]
async fn get_services(
    app_state: web::types::State<AppState>,
    query: web::types::Query<forms::PaginationQuery>,
) -> Result<impl web::Responder, web::Error> {
    let services = api::service::get_services(query.into_inner().into(), &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&services))
}

#[web::get("/category-price")]
async fn get_services_by_category(
    app_state: web::types::State<AppState>,
    query: web::types::Query<forms::PriceCategoryQuery>,
) -> Result<impl web::Responder, web::Error> {
    let services = api::service::get_services_by_category(query.category_price, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&services))
}

#[web::get("/total-services")]
async fn get_total_services(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let total = api::service::count_services(&app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&total))
}

#[web::get("/{service_id}")]
async fn get_service(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    let service = api::service::get_service(path.0, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&service))
}

#[web::put("/{service_id}")]
async fn update_service(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
    request_body: web::types::Json<models::service::ServicePatch>,
) -> Result<impl web::Responder, web::Error> {
    let service =
        api::service::update_service(path.0, request_body.into_inner(), &app_state.repo)
            .await
            .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&service))
}

#[web::delete("/{service_id}")]
async fn delete_service(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    api::service::delete_service(path.0, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&json!({ "ok": true })))
}
