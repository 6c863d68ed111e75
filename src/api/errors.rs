use crate::models::Entity;
use derive_more::{Display, Error};

/// Failure of an api operation, every variant carries the reason shown to the caller
#[derive(Debug, Display, Error)]
pub enum ApiError {
    #[display("{entity} with id {id} not found")]
    NotFound { entity: Entity, id: i64 },
    /// A listing or lookup that matched nothing
    #[display("{_0}")]
    NoMatch(#[error(not(source))] String),
    #[display("{_0}")]
    Conflict(#[error(not(source))] String),
    #[display("pet {pet_id} does not belong to client {client_id}")]
    InvalidAssociation { pet_id: i64, client_id: i64 },
    #[display("{_0}")]
    InvalidInput(#[error(not(source))] String),
    #[display("store failure: {_0}")]
    Store(#[error(not(source))] anyhow::Error),
}

impl ApiError {
    pub fn not_found(entity: Entity, id: i64) -> Self {
        ApiError::NotFound { entity, id }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Store(e)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_is_human_readable() {
        assert_eq!(
            ApiError::not_found(Entity::Pet, 3).to_string(),
            "pet with id 3 not found"
        );
        assert_eq!(
            ApiError::InvalidAssociation {
                pet_id: 2,
                client_id: 1
            }
            .to_string(),
            "pet 2 does not belong to client 1"
        );
        assert_eq!(
            ApiError::Conflict("cpf 123 already registered".into()).to_string(),
            "cpf 123 already registered"
        );
    }

    #[test]
    fn test_store_errors_convert() {
        let err: ApiError = anyhow::anyhow!("disk full").into();
        assert!(matches!(err, ApiError::Store(_)));
    }
}
