use super::{
    errors::{ApiError, ApiResult},
    require_non_negative, require_text, resolve_id,
};
use crate::{
    metric,
    models::{
        Entity, Pagination,
        pet::{Pet, PetPatch},
    },
    repo,
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePetRequest {
    pub id: Option<i64>,
    pub name: String,
    pub breed: String,
    pub age: i64,
    pub size_in_centimeters: i64,
}

fn fields_are_valid(pet: &Pet) -> ApiResult<()> {
    require_text("name", &pet.name)?;
    require_text("breed", &pet.breed)?;
    require_non_negative("age", pet.age)?;
    require_non_negative("size_in_centimeters", pet.size_in_centimeters)
}

/// The pet when it exists and belongs to the client, [`ApiError::NotFound`] otherwise
async fn get_owned_pet(client_id: i64, pet_id: i64, repo: &repo::ImplAppRepo) -> ApiResult<Pet> {
    repo.get_pet(pet_id)
        .await?
        .filter(|pet| pet.client_id == client_id)
        .ok_or_else(|| ApiError::not_found(Entity::Pet, pet_id))
}

pub async fn create_pet(
    client_id: i64,
    request: CreatePetRequest,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Pet> {
    let _span = logfire::span!("create_pet").entered();

    let mut pet = Pet {
        id: 0,
        client_id,
        name: request.name,
        breed: request.breed,
        age: request.age,
        size_in_centimeters: request.size_in_centimeters,
    };
    fields_are_valid(&pet)?;

    if !repo.exists(Entity::Client, client_id).await? {
        return Err(ApiError::not_found(Entity::Client, client_id));
    }

    pet.id = resolve_id(request.id, Entity::Pet, repo).await?;
    pet.id = repo.insert_pet(&pet).await?;

    metric::incr_catalog_action_statds("pet", "create");

    Ok(pet)
}

/// Page of every pet, [`ApiError::NoMatch`] when there is none at all
pub async fn get_pets(page: Pagination, repo: &repo::ImplAppRepo) -> ApiResult<Vec<Pet>> {
    let pets = repo.get_pets(page).await?;

    if pets.is_empty() && repo.count(Entity::Pet).await? == 0 {
        return Err(ApiError::NoMatch("no pet registered".into()));
    }

    Ok(pets)
}

pub async fn get_pets_by_client(client_id: i64, repo: &repo::ImplAppRepo) -> ApiResult<Vec<Pet>> {
    if !repo.exists(Entity::Client, client_id).await? {
        return Err(ApiError::not_found(Entity::Client, client_id));
    }

    Ok(repo.get_pets_by_client(client_id).await?)
}

pub async fn update_pet(
    client_id: i64,
    pet_id: i64,
    patch: PetPatch,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Pet> {
    let _span = logfire::span!("update_pet").entered();

    let mut pet = get_owned_pet(client_id, pet_id, repo).await?;

    patch.apply(&mut pet);
    fields_are_valid(&pet)?;

    repo.update_pet(&pet).await?;

    metric::incr_catalog_action_statds("pet", "update");

    Ok(pet)
}

/// Removes the pet, its appointments and their service links
pub async fn delete_pet(client_id: i64, pet_id: i64, repo: &repo::ImplAppRepo) -> ApiResult<()> {
    let _span = logfire::span!("delete_pet").entered();

    get_owned_pet(client_id, pet_id, repo).await?;

    repo.delete_pet(pet_id).await?;

    metric::incr_catalog_action_statds("pet", "delete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::client::Client, repo::sqlite::test_utils};

    async fn setup() -> repo::ImplAppRepo {
        let repo: repo::ImplAppRepo = Box::new(test_utils::setup_memory_repo().await);
        for cpf in ["123", "456"] {
            repo.insert_client(&Client {
                id: 0,
                name: "Ana".into(),
                cpf: cpf.into(),
                age: 30,
                is_admin: false,
            })
            .await
            .unwrap();
        }
        repo
    }

    fn request() -> CreatePetRequest {
        CreatePetRequest {
            id: None,
            name: "Rex".into(),
            breed: "Beagle".into(),
            age: 3,
            size_in_centimeters: 40,
        }
    }

    #[ntex::test]
    async fn test_create_pet_for_missing_client() {
        let repo = setup().await;

        let result = create_pet(9, request(), &repo).await;

        assert!(matches!(
            result,
            Err(ApiError::NotFound {
                entity: Entity::Client,
                id: 9
            })
        ));
    }

    #[ntex::test]
    async fn test_empty_pet_listing() {
        let repo = setup().await;

        assert!(matches!(
            get_pets(Pagination::default(), &repo).await,
            Err(ApiError::NoMatch(_))
        ));
        assert!(get_pets_by_client(1, &repo).await.unwrap().is_empty());

        create_pet(1, request(), &repo).await.unwrap();

        assert_eq!(
            get_pets(Pagination::default(), &repo).await.unwrap().len(),
            1
        );
        assert!(
            get_pets(Pagination::new(Some(5), None), &repo)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[ntex::test]
    async fn test_pet_of_another_client_is_not_found() {
        let repo = setup().await;
        let pet = create_pet(1, request(), &repo).await.unwrap();

        let result = update_pet(2, pet.id, PetPatch::default(), &repo).await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));

        let result = delete_pet(2, pet.id, &repo).await;
        assert!(matches!(result, Err(ApiError::NotFound { .. })));

        let updated = update_pet(
            1,
            pet.id,
            PetPatch {
                age: Some(4),
                ..PetPatch::default()
            },
            &repo,
        )
        .await
        .unwrap();
        assert_eq!(updated.age, 4);

        delete_pet(1, pet.id, &repo).await.unwrap();
        assert!(repo.get_pet(pet.id).await.unwrap().is_none());
    }

    #[ntex::test]
    async fn test_blank_breed_is_rejected() {
        let repo = setup().await;

        let result = create_pet(
            1,
            CreatePetRequest {
                breed: "".into(),
                ..request()
            },
            &repo,
        )
        .await;

        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }
}
