//! # Client API Module
//!
//! Client registry. A client is identified by its `cpf`, owns pets and
//! appointments, and takes all of them along when deleted.

use super::{
    errors::{ApiError, ApiResult},
    require_non_negative, require_text, resolve_id,
};
use crate::{
    metric,
    models::{
        Entity, Pagination,
        client::{Client, ClientPatch, ClientWithPets},
        pet::Pet,
    },
    repo,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientRequest {
    pub id: Option<i64>,
    pub name: String,
    pub cpf: String,
    pub age: i64,
    #[serde(default)]
    pub is_admin: bool,
}

fn fields_are_valid(client: &Client) -> ApiResult<()> {
    require_text("name", &client.name)?;
    require_text("cpf", &client.cpf)?;
    require_non_negative("age", client.age)
}

/// Fails with [`ApiError::Conflict`] when another client holds the cpf
async fn check_cpf_is_free(
    cpf: &str,
    client_id: Option<i64>,
    repo: &repo::ImplAppRepo,
) -> ApiResult<()> {
    match repo.get_client_by_cpf(cpf).await? {
        Some(owner) if Some(owner.id) != client_id => Err(ApiError::Conflict(format!(
            "cpf {cpf} is already registered"
        ))),
        _ => Ok(()),
    }
}

pub async fn create_client(
    request: CreateClientRequest,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Client> {
    let _span = logfire::span!("create_client").entered();

    let mut client = Client {
        id: 0,
        name: request.name,
        cpf: request.cpf,
        age: request.age,
        is_admin: request.is_admin,
    };
    fields_are_valid(&client)?;
    check_cpf_is_free(&client.cpf, None, repo).await?;

    client.id = resolve_id(request.id, Entity::Client, repo).await?;
    client.id = repo.insert_client(&client).await?;

    metric::incr_catalog_action_statds("client", "create");

    Ok(client)
}

async fn with_pets(client: Client, repo: &repo::ImplAppRepo) -> ApiResult<ClientWithPets> {
    Ok(ClientWithPets {
        pets: repo.get_pets_by_client(client.id).await?,
        client,
    })
}

pub async fn get_clients(
    page: Pagination,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Vec<ClientWithPets>> {
    let mut clients = vec![];
    for client in repo.get_clients(page).await? {
        clients.push(with_pets(client, repo).await?);
    }
    Ok(clients)
}

pub async fn get_client(client_id: i64, repo: &repo::ImplAppRepo) -> ApiResult<ClientWithPets> {
    let client = repo
        .get_client(client_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Entity::Client, client_id))?;

    with_pets(client, repo).await
}

pub async fn update_client(
    client_id: i64,
    patch: ClientPatch,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Client> {
    let _span = logfire::span!("update_client").entered();

    let mut client = repo
        .get_client(client_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Entity::Client, client_id))?;

    patch.apply(&mut client);
    fields_are_valid(&client)?;
    check_cpf_is_free(&client.cpf, Some(client_id), repo).await?;

    repo.update_client(&client).await?;

    metric::incr_catalog_action_statds("client", "update");

    Ok(client)
}

/// Removes the client with its pets, their appointments and the service links
pub async fn delete_client(client_id: i64, repo: &repo::ImplAppRepo) -> ApiResult<()> {
    let _span = logfire::span!("delete_client").entered();

    if !repo.exists(Entity::Client, client_id).await? {
        return Err(ApiError::not_found(Entity::Client, client_id));
    }

    repo.delete_client(client_id).await?;

    metric::incr_catalog_action_statds("client", "delete");

    Ok(())
}

/// Pets of the client, [`ApiError::NoMatch`] when it has none
pub async fn get_client_pets(client_id: i64, repo: &repo::ImplAppRepo) -> ApiResult<Vec<Pet>> {
    if !repo.exists(Entity::Client, client_id).await? {
        return Err(ApiError::not_found(Entity::Client, client_id));
    }

    let pets = repo.get_pets_by_client(client_id).await?;
    if pets.is_empty() {
        return Err(ApiError::NoMatch(format!(
            "client {client_id} has no pets"
        )));
    }

    Ok(pets)
}
