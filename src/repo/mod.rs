pub mod association;
pub mod sqlite;
pub mod sqlite_queries;

use crate::models;
use async_trait::async_trait;
use rust_decimal::Decimal;

#[cfg(test)]
use mockall::automock;

/// Outcome of a schedule write that can be refused by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleWrite {
    /// Row persisted under this id
    Saved(i64),
    /// A service id did not resolve, nothing was written
    MissingService(i64),
    /// Another schedule of the client already holds that date
    SlotTaken,
}

/// Persistent records of the pet-care business.
///
/// Entities carrying `id == 0` are unsaved: inserting them lets the store
/// assign the id. Every multi-row write runs in a single transaction.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AppRepo {
    async fn max_id(&self, entity: models::Entity) -> anyhow::Result<Option<i64>>;

    async fn count(&self, entity: models::Entity) -> anyhow::Result<i64>;

    async fn exists(&self, entity: models::Entity, id: i64) -> anyhow::Result<bool>;

    async fn insert_client(&self, client: &models::client::Client) -> anyhow::Result<i64>;

    async fn get_client(&self, client_id: i64) -> anyhow::Result<Option<models::client::Client>>;

    async fn get_client_by_cpf(
        &self,
        cpf: &str,
    ) -> anyhow::Result<Option<models::client::Client>>;

    async fn get_clients(
        &self,
        page: models::Pagination,
    ) -> anyhow::Result<Vec<models::client::Client>>;

    async fn update_client(&self, client: &models::client::Client) -> anyhow::Result<()>;

    /// Removes the client with every pet, schedule and schedule link it owns
    async fn delete_client(&self, client_id: i64) -> anyhow::Result<()>;

    async fn insert_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<i64>;

    async fn get_pet(&self, pet_id: i64) -> anyhow::Result<Option<models::pet::Pet>>;

    async fn get_pets(&self, page: models::Pagination) -> anyhow::Result<Vec<models::pet::Pet>>;

    async fn get_pets_by_client(&self, client_id: i64) -> anyhow::Result<Vec<models::pet::Pet>>;

    async fn update_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<()>;

    /// Removes the pet with its schedules and their links
    async fn delete_pet(&self, pet_id: i64) -> anyhow::Result<()>;

    async fn insert_service(&self, service: &models::service::Service) -> anyhow::Result<i64>;

    async fn get_service(
        &self,
        service_id: i64,
    ) -> anyhow::Result<Option<models::service::Service>>;

    async fn get_service_by_type(
        &self,
        type_service: &str,
    ) -> anyhow::Result<Option<models::service::Service>>;

    async fn get_services(
        &self,
        page: models::Pagination,
    ) -> anyhow::Result<Vec<models::service::Service>>;

    /// Services priced in `(min_exclusive, max_inclusive]`
    async fn get_services_by_price(
        &self,
        min_exclusive: Option<Decimal>,
        max_inclusive: Decimal,
    ) -> anyhow::Result<Vec<models::service::Service>>;

    async fn update_service(&self, service: &models::service::Service) -> anyhow::Result<()>;

    /// Removes the service and every schedule left without services.
    /// Returns the ids of those schedules.
    async fn delete_service(&self, service_id: i64) -> anyhow::Result<Vec<i64>>;

    async fn get_schedule(
        &self,
        schedule_id: i64,
    ) -> anyhow::Result<Option<models::schedule::Schedule>>;

    async fn get_schedule_by_slot(
        &self,
        client_id: i64,
        date_schedule: &models::schedule::DateSchedule,
    ) -> anyhow::Result<Option<models::schedule::Schedule>>;

    /// Persists the schedule and links every service, all or nothing
    async fn insert_schedule(
        &self,
        schedule: &models::schedule::Schedule,
        service_ids: &[i64],
    ) -> anyhow::Result<ScheduleWrite>;

    async fn update_schedule(
        &self,
        schedule: &models::schedule::Schedule,
    ) -> anyhow::Result<ScheduleWrite>;

    /// Unlinks the schedule services then removes the schedule
    async fn delete_schedule(&self, schedule_id: i64) -> anyhow::Result<()>;

    async fn get_schedule_services(
        &self,
        schedule_id: i64,
    ) -> anyhow::Result<Vec<models::service::Service>>;

    async fn get_schedule_details(
        &self,
        schedule_id: i64,
    ) -> anyhow::Result<Option<models::schedule::ScheduleDetails>>;

    async fn get_schedules_details(
        &self,
        page: models::Pagination,
    ) -> anyhow::Result<Vec<models::schedule::ScheduleDetails>>;

    /// Schedules with `start <= date_schedule < end`, ordered by date
    async fn get_schedules_details_between(
        &self,
        start: &models::schedule::DateSchedule,
        end: &models::schedule::DateSchedule,
    ) -> anyhow::Result<Vec<models::schedule::ScheduleDetails>>;
}

pub type ImplAppRepo = Box<dyn AppRepo>;
