use crate::api::errors::ApiError;
use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};
use serde_json::json;

fn json_detail(status: http::StatusCode, detail: &str) -> web::HttpResponse {
    web::HttpResponse::build(status).json(&json!({ "detail": detail }))
}

#[derive(Debug, Display, Error)]
pub enum UserError {
    #[display("resource not found")]
    UrlNotFound,
    #[display("{_0}")]
    NotFound(#[error(not(source))] String),
    #[display("{_0}")]
    Conflict(#[error(not(source))] String),
    #[display("{_0}")]
    InvalidInput(#[error(not(source))] String),
    #[display("{_0}")]
    InvalidAssociation(#[error(not(source))] String),
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        error!("{:#?}", self);
        json_detail(self.status_code(), &self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound | UserError::NotFound(_) => http::StatusCode::NOT_FOUND,
            UserError::Conflict(_) => http::StatusCode::CONFLICT,
            UserError::InvalidInput(_) | UserError::InvalidAssociation(_) => {
                http::StatusCode::BAD_REQUEST
            }
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum ServerError {
    #[display("internal server error")]
    InternalServerError(#[error(not(source))] String),
}

impl web::error::WebResponseError for ServerError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        match self {
            ServerError::InternalServerError(msg) => error!("[InternalServerError] {msg}"),
        }
        json_detail(self.status_code(), &self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Maps an api failure to the gateway error answered to the caller.
/// Store failures keep their details in the logs only.
pub fn api_error(e: ApiError) -> web::Error {
    let reason = e.to_string();
    match e {
        ApiError::NotFound { .. } | ApiError::NoMatch(_) => UserError::NotFound(reason).into(),
        ApiError::Conflict(_) => UserError::Conflict(reason).into(),
        ApiError::InvalidAssociation { .. } => UserError::InvalidAssociation(reason).into(),
        ApiError::InvalidInput(_) => UserError::InvalidInput(reason).into(),
        ApiError::Store(err) => {
            logfire::error!("store failure: {error}", error = format!("{err:#}"));
            ServerError::InternalServerError(format!("{err:#}")).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::web::error::WebResponseError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            UserError::NotFound("schedule with id 1 not found".into()).status_code(),
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            UserError::Conflict("taken".into()).status_code(),
            http::StatusCode::CONFLICT
        );
        assert_eq!(
            UserError::InvalidAssociation("pet 1 does not belong to client 2".into()).status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::InternalServerError("locked".into()).status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_details_are_not_exposed() {
        let err = ServerError::InternalServerError("database is locked".into());

        assert_eq!(err.to_string(), "internal server error");
    }
}
