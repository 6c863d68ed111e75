//! # Service API Module
//!
//! Catalog of the services an appointment can book. `type_service` is unique
//! across the catalog, and removing a service drops every appointment that
//! was left without services.

use super::{
    errors::{ApiError, ApiResult},
    require_non_negative, require_text, resolve_id,
};
use crate::{
    metric,
    models::{
        Entity, Pagination,
        service::{PriceCategory, Service, ServicePatch},
    },
    repo,
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateServiceRequest {
    pub id: Option<i64>,
    pub duration_in_minutes: i64,
    pub type_service: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

fn fields_are_valid(service: &Service) -> ApiResult<()> {
    require_text("type_service", &service.type_service)?;
    require_non_negative("duration_in_minutes", service.duration_in_minutes)?;

    if service.price.is_sign_negative() {
        return Err(ApiError::InvalidInput(format!(
            "price must not be negative, got {}",
            service.price
        )));
    }

    Ok(())
}

/// Fails with [`ApiError::Conflict`] when another service has the same type
async fn check_type_is_free(
    type_service: &str,
    service_id: Option<i64>,
    repo: &repo::ImplAppRepo,
) -> ApiResult<()> {
    match repo.get_service_by_type(type_service).await? {
        Some(existing) if Some(existing.id) != service_id => Err(ApiError::Conflict(format!(
            "service '{type_service}' already exists"
        ))),
        _ => Ok(()),
    }
}

pub async fn create_service(
    request: CreateServiceRequest,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Service> {
    let _span = logfire::span!("create_service").entered();

    let mut service = Service {
        id: 0,
        duration_in_minutes: request.duration_in_minutes,
        type_service: request.type_service,
        price: request.price,
    };
    fields_are_valid(&service)?;
    check_type_is_free(&service.type_service, None, repo).await?;

    service.id = resolve_id(request.id, Entity::Service, repo).await?;
    service.id = repo.insert_service(&service).await?;

    metric::incr_catalog_action_statds("service", "create");

    Ok(service)
}

/// Page of the catalog, [`ApiError::NoMatch`] only when the catalog is empty
pub async fn get_services(page: Pagination, repo: &repo::ImplAppRepo) -> ApiResult<Vec<Service>> {
    let services = repo.get_services(page).await?;

    if services.is_empty() && repo.count(Entity::Service).await? == 0 {
        return Err(ApiError::NoMatch("no service found".into()));
    }

    Ok(services)
}

pub async fn get_service(service_id: i64, repo: &repo::ImplAppRepo) -> ApiResult<Service> {
    repo.get_service(service_id)
        .await?
        .ok_or_else(|| ApiError::not_found(Entity::Service, service_id))
}

/// Services whose price falls in the category band, cheapest first
pub async fn get_services_by_category(
    category: PriceCategory,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Vec<Service>> {
    let (min_exclusive, max_inclusive) = category.bounds();

    let services = repo
        .get_services_by_price(min_exclusive, max_inclusive)
        .await?;

    if services.is_empty() {
        return Err(ApiError::NoMatch(format!(
            "no service found for category {category:?}"
        )));
    }

    Ok(services)
}

pub async fn update_service(
    service_id: i64,
    patch: ServicePatch,
    repo: &repo::ImplAppRepo,
) -> ApiResult<Service> {
    let _span = logfire::span!("update_service").entered();

    let mut service = get_service(service_id, repo).await?;

    patch.apply(&mut service);
    fields_are_valid(&service)?;
    check_type_is_free(&service.type_service, Some(service_id), repo).await?;

    repo.update_service(&service).await?;

    metric::incr_catalog_action_statds("service", "update");

    Ok(service)
}

/// Removes the service and returns the ids of the appointments it left empty
pub async fn delete_service(service_id: i64, repo: &repo::ImplAppRepo) -> ApiResult<Vec<i64>> {
    let _span = logfire::span!("delete_service").entered();

    if !repo.exists(Entity::Service, service_id).await? {
        return Err(ApiError::not_found(Entity::Service, service_id));
    }

    let orphans = repo.delete_service(service_id).await?;

    if !orphans.is_empty() {
        log::info!("service {service_id} removed with its only-service schedules {orphans:?}");
    }

    metric::incr_catalog_action_statds("service", "delete");

    Ok(orphans)
}

pub async fn count_services(repo: &repo::ImplAppRepo) -> ApiResult<i64> {
    Ok(repo.count(Entity::Service).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::schedule::{CreateScheduleRequest, create_schedule},
        models::{client::Client, pet::Pet},
        repo::sqlite::test_utils,
    };
    use rust_decimal_macros::dec;

    fn request(type_service: &str, price: Decimal) -> CreateServiceRequest {
        CreateServiceRequest {
            id: None,
            duration_in_minutes: 30,
            type_service: type_service.into(),
            price,
        }
    }

    #[ntex::test]
    async fn test_duplicate_type_service() {
        let repo: repo::ImplAppRepo = Box::new(test_utils::setup_memory_repo().await);

        create_service(request("bath", dec!(40)), &repo)
            .await
            .unwrap();
        let result = create_service(request("bath", dec!(45)), &repo).await;

        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(count_services(&repo).await.unwrap(), 1);
    }

    #[ntex::test]
    async fn test_update_type_onto_another_service() {
        let repo: repo::ImplAppRepo = Box::new(test_utils::setup_memory_repo().await);
        create_service(request("bath", dec!(40)), &repo)
            .await
            .unwrap();
        create_service(request("grooming", dec!(80)), &repo)
            .await
            .unwrap();

        let result = update_service(
            2,
            ServicePatch {
                type_service: Some("bath".into()),
                ..ServicePatch::default()
            },
            &repo,
        )
        .await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));

        let updated = update_service(
            2,
            ServicePatch {
                price: Some(dec!(85.5)),
                ..ServicePatch::default()
            },
            &repo,
        )
        .await
        .unwrap();
        assert_eq!(updated.price, dec!(85.5));
        assert_eq!(get_service(2, &repo).await.unwrap().price, dec!(85.5));
    }

    #[ntex::test]
    async fn test_price_categories() {
        let repo: repo::ImplAppRepo = Box::new(test_utils::setup_memory_repo().await);
        for (type_service, price) in [
            ("nails", dec!(50)),
            ("bath", dec!(60)),
            ("grooming", dec!(100)),
        ] {
            create_service(request(type_service, price), &repo)
                .await
                .unwrap();
        }

        let cheap = get_services_by_category(PriceCategory::Cheap, &repo)
            .await
            .unwrap();
        assert_eq!(cheap.len(), 1);

        let medium = get_services_by_category(PriceCategory::Medium, &repo)
            .await
            .unwrap();
        assert_eq!(
            medium.iter().map(|s| s.type_service.as_str()).collect::<Vec<_>>(),
            vec!["bath", "grooming"]
        );

        assert!(matches!(
            get_services_by_category(PriceCategory::Expensive, &repo).await,
            Err(ApiError::NoMatch(_))
        ));
    }

    #[ntex::test]
    async fn test_negative_price_is_rejected() {
        let mut repo = repo::MockAppRepo::new();
        repo.expect_get_service_by_type().times(0);
        let repo: repo::ImplAppRepo = Box::new(repo);

        let result = create_service(request("bath", dec!(-1)), &repo).await;

        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[ntex::test]
    async fn test_delete_sole_service_removes_schedule() {
        let repo: repo::ImplAppRepo = Box::new(test_utils::setup_memory_repo().await);
        repo.insert_client(&Client {
            id: 0,
            name: "Ana".into(),
            cpf: "123".into(),
            age: 30,
            is_admin: false,
        })
        .await
        .unwrap();
        repo.insert_pet(&Pet {
            id: 0,
            client_id: 1,
            name: "Rex".into(),
            breed: "Beagle".into(),
            age: 3,
            size_in_centimeters: 40,
        })
        .await
        .unwrap();
        create_service(request("bath", dec!(40)), &repo)
            .await
            .unwrap();
        create_service(request("grooming", dec!(80)), &repo)
            .await
            .unwrap();

        for (date_schedule, service_ids) in [
            ("2024-06-01T10:00:00Z", vec![1]),
            ("2024-06-02T10:00:00Z", vec![1, 2]),
        ] {
            create_schedule(
                CreateScheduleRequest {
                    id: None,
                    date_schedule: date_schedule.into(),
                    client_id: 1,
                    pet_id: 1,
                    service_ids,
                },
                &repo,
            )
            .await
            .unwrap();
        }

        assert_eq!(delete_service(1, &repo).await.unwrap(), vec![1]);

        assert!(repo.get_schedule(1).await.unwrap().is_none());
        assert_eq!(
            repo.get_schedule_services(2)
                .await
                .unwrap()
                .iter()
                .map(|s| s.id)
                .collect::<Vec<_>>(),
            vec![2]
        );
        assert!(matches!(
            delete_service(1, &repo).await,
            Err(ApiError::NotFound { .. })
        ));
    }

    #[ntex::test]
    async fn test_page_past_the_end_is_empty() {
        let repo: repo::ImplAppRepo = Box::new(test_utils::setup_memory_repo().await);
        create_service(request("bath", dec!(40)), &repo)
            .await
            .unwrap();

        let services = get_services(Pagination::new(Some(5), Some(10)), &repo)
            .await
            .unwrap();

        assert!(services.is_empty());
    }

    #[ntex::test]
    async fn test_empty_catalog() {
        let repo: repo::ImplAppRepo = Box::new(test_utils::setup_memory_repo().await);

        assert!(matches!(
            get_services(Pagination::default(), &repo).await,
            Err(ApiError::NoMatch(_))
        ));
        assert!(matches!(
            get_service(1, &repo).await,
            Err(ApiError::NotFound { .. })
        ));
    }
}
