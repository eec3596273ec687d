//! Asynchronous access to the client registry, in-process or over HTTP.
//!
//! Callers see a single failure kind, [`GatewayError`], carrying a message
//! that can be shown as is. Nothing is retried.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::domain::client::Client;
use crate::domain::query::QueryDescriptor;
use crate::domain::types::ClientId;
use crate::forms::FieldErrors;
use crate::forms::client::ClientForm;
use crate::pagination::Paginated;
use crate::repository::{ClientReader, ClientWriter};
use crate::services::{GENERIC_FAILURE, ServiceError, client as client_service};

pub mod http;

pub use http::HttpGateway;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The operation did not complete.
    #[error("{message}")]
    OperationFailed {
        message: String,
        errors: Option<FieldErrors>,
    },
}

impl GatewayError {
    pub fn generic() -> Self {
        Self::with_message(GENERIC_FAILURE)
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        GatewayError::OperationFailed {
            message: message.into(),
            errors: None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            GatewayError::OperationFailed { message, .. } => message,
        }
    }

    /// Per-field messages when the failure was a rejected form.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            GatewayError::OperationFailed { errors, .. } => errors.as_ref(),
        }
    }
}

impl From<ServiceError> for GatewayError {
    fn from(err: ServiceError) -> Self {
        let message = err.user_message();
        let errors = match err {
            ServiceError::Form(errors) => Some(errors),
            _ => None,
        };
        GatewayError::OperationFailed { message, errors }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

pub trait ClientGateway: Send + Sync {
    fn list(
        &self,
        query: &QueryDescriptor,
    ) -> impl Future<Output = GatewayResult<Paginated<Client>>> + Send;

    fn create(&self, form: &ClientForm) -> impl Future<Output = GatewayResult<Client>> + Send;

    fn update(
        &self,
        id: &ClientId,
        form: &ClientForm,
    ) -> impl Future<Output = GatewayResult<Client>> + Send;

    fn delete(&self, id: &ClientId) -> impl Future<Output = GatewayResult<()>> + Send;
}

/// Gateway over a repository handle in the same process.
///
/// An optional latency is awaited before each call to stand in for a network
/// round trip.
#[derive(Clone, Debug)]
pub struct StoreGateway<R> {
    repo: R,
    latency: Duration,
}

impl<R> StoreGateway<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl<R> ClientGateway for StoreGateway<R>
where
    R: ClientReader + ClientWriter + Send + Sync,
{
    async fn list(&self, query: &QueryDescriptor) -> GatewayResult<Paginated<Client>> {
        self.wait().await;
        Ok(client_service::list_clients(query, &self.repo)?)
    }

    async fn create(&self, form: &ClientForm) -> GatewayResult<Client> {
        self.wait().await;
        Ok(client_service::create_client(form, &self.repo)?)
    }

    async fn update(&self, id: &ClientId, form: &ClientForm) -> GatewayResult<Client> {
        self.wait().await;
        Ok(client_service::update_client(id.as_str(), form, &self.repo)?)
    }

    async fn delete(&self, id: &ClientId) -> GatewayResult<()> {
        self.wait().await;
        Ok(client_service::delete_client(id.as_str(), &self.repo)?)
    }
}
