//! Business workflows shared by the HTTP handlers and the in-process gateway.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::forms::FieldErrors;
use crate::repository::errors::RepositoryError;

#[cfg(feature = "server")]
pub mod auth;
pub mod client;

/// Message returned for rejected logins.
pub const INVALID_CREDENTIALS: &str = "Credenciais inválidas.";

/// Generic message for failures the caller cannot act on.
pub const GENERIC_FAILURE: &str = "Não foi possível completar a ação. Tente novamente.";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Form(FieldErrors),

    #[error("invalid value: {0}")]
    TypeConstraint(#[from] TypeConstraintError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Message suitable for showing to the person using the registry.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Unauthorized => "Sessão expirada. Faça login novamente.".to_string(),
            ServiceError::InvalidCredentials => INVALID_CREDENTIALS.to_string(),
            ServiceError::NotFound => "Cliente não encontrado.".to_string(),
            ServiceError::Form(_) => "Verifique os campos do formulário.".to_string(),
            ServiceError::TypeConstraint(err) => err.to_string(),
            ServiceError::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Form(errors)
    }
}
