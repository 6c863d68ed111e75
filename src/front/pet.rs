use ntex::web;
use serde_json::json;

use crate::{
    api,
    front::{AppState, errors, forms},
    models,
};

#[web::post("/{client_id}/pet")]
async fn create_pet(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
    request_body: web::types::Json<api::pet::CreatePetRequest>,
) -> Result<impl web::Responder, web::Error> {
    let pet = api::pet::create_pet(path.0, request_body.into_inner(), &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Created().json(&pet))
}

#[web::get("")]
async fn get_pets(
    app_state: web::types::State<AppState>,
    query: web::types::Query<forms::PaginationQuery>,
) -> Result<impl web::Responder, web::Error> {
    let pets = api::pet::get_pets(query.into_inner().into(), &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&pets))
}

#[web::get("/{client_id}")]
async fn get_pets_by_client(
    app_state: web::types::State<AppState>,
    path: web::types::Path<(i64,)>,
) -> Result<impl web::Responder, web::Error> {
    let pets = api::pet::get_pets_by_client(path.0, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&pets))
}

#[web::put("/{client_id}/pets/{pet_id}")]
async fn update_pet(
    app_state: web::types::State<AppState>,
    path: web::types::Path<forms::ClientPetPath>,
    request_body: web::types::Json<models::pet::PetPatch>,
) -> Result<impl web::Responder, web::Error> {
    let pet = api::pet::update_pet(
        path.client_id,
        path.pet_id,
        request_body.into_inner(),
        &app_state.repo,
    )
    .await
    .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&pet))
}

#[web::delete("/{client_id}/pets/{pet_id}")]
async fn delete_pet(
    app_state: web::types::State<AppState>,
    path: web::types::Path<forms::ClientPetPath>,
) -> Result<impl web::Responder, web::Error> {
    api::pet::delete_pet(path.client_id, path.pet_id, &app_state.repo)
        .await
        .map_err(errors::api_error)?;

    Ok(web::HttpResponse::Ok().json(&json!({ "ok": true })))
}
