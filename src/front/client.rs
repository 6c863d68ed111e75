use ntex::web;
use serde_json::json;

use crate::{
    api,
    front::{AppState, errors, forms},
    models,
};

#[web::post("")]
async fn create_client(
    app_state: web::types::State<AppState>,
    request_body: web::types::Json<api::client::CreateClientRequest>,
) -> Result<impl web::Responder, web::Error> {
    let client = api::client::create_client(request_body.into_inner(), &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Created().json(&client))
}

#[web::get("")]
async fn get_clients(
    app_state: web::types::State<AppState>,
    query: web::types::Query<forms::PaginationQuery>,
) -> Result<impl web::Responder, web::Error> {
    let clients = api::client::get_clients(query.into_inner().into(), &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&clients))
}

#[web::get("/{client_id}")]
async fn get_client(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    let client = api::client::get_client(path.0, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&client))
}

#[web::get("/{client_id}/pets")]
async fn get_client_pets(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    let pets = api::client::get_client_pets(path.0, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&pets))
}

#[web::put("/{client_id}")]
async fn update_client(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
    request_body: web::types::Json<models::client::ClientPatch>,
) -> Result<impl web::Responder, web::Error> {
    let client = api::client::update_client(path.0, request_body.into_inner(), &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&client))
}

#[web::delete("/{client_id}")]
async fn delete_client(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    api::client::delete_client(path.0, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&json!({ "ok": true })))
}
