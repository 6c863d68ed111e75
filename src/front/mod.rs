//! Request gateway: ntex JSON routes over the [`api`](crate::api) operations.

pub mod client;
pub mod errors;
pub mod forms;
pub mod pet;
pub mod routes;
pub mod schedule;
pub mod server;
pub mod service;

use crate::repo;

pub struct AppState {
    pub repo: repo::ImplAppRepo,
}
