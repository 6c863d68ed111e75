//! Route configuration.
//!
//! Routes are grouped by resource into scopes. Inside a scope the literal
//! paths (`/total-schedule`, `/category-price`, ...) are registered before the
//! `/{id}` ones so they are never read as an id.

use super::{client, pet, schedule, service};
use ntex::web;

/// # Routes
/// - `POST /clients` - Create client
/// - `GET /clients` - Client page, each with its pets
/// - `GET /clients/{client_id}` - Client with its pets
/// - `GET /clients/{client_id}/pets` - Pets of the client
/// - `PUT /clients/{client_id}` - Patch client
/// - `DELETE /clients/{client_id}` - Delete client, its pets and schedules
pub fn clients(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/clients").service((
        client::create_client,
        client::get_clients,
        client::get_client_pets,
        client::get_client,
        client::update_client,
        client::delete_client,
    )));
}

/// # Routes
/// - `POST /pets/{client_id}/pet` - Create pet for the client
/// - `GET /pets` - Pet page
/// - `GET /pets/{client_id}` - Pets of the client
/// - `PUT /pets/{client_id}/pets/{pet_id}` - Patch pet
/// - `DELETE /pets/{client_id}/pets/{pet_id}` - Delete pet and its schedules
pub fn pets(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/pets").service((
        pet::create_pet,
        pet::get_pets,
        pet::get_pets_by_client,
        pet::update_pet,
        pet::delete_pet,
    )));
}

/// # Routes
/// - `POST /services` - Create service
/// - `GET /services` - Service page
/// - `GET /services/category-price?category_price=` - Services of a price band
/// - `GET /services/total-services` - Number of services
/// - `GET /services/{service_id}` - Service
/// - `PUT /services/{service_id}` - Patch service
/// - `DELETE /services/{service_id}` - Delete service and the schedules left empty
pub fn services(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/services").service((
        service::create_service,
        service::get_services,
        service::get_services_by_category,
        service::get_total_services,
        service::get_service,
        service::update_service,
        service::delete_service,
    )));
}

/// # Routes
/// - `POST /schedules` - Create schedule with its services
/// - `GET /schedules` - Schedule page with client, pet and services
/// - `GET /schedules/total-schedule` - Number of schedules
/// - `GET /schedules/{year}/{month}` - Schedules of a month
/// - `GET /schedules/{schedule_id}` - Schedule with client, pet and services
/// - `PUT /schedules/{schedule_id}` - Patch schedule
/// - `DELETE /schedules/{schedule_id}` - Delete schedule
pub fn schedules(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/schedules").service((
        schedule::create_schedule,
        schedule::get_schedules,
        schedule::get_total_schedules,
        schedule::get_schedules_by_month,
        schedule::get_schedule,
        schedule::update_schedule,
        schedule::delete_schedule,
    )));
}
